//! Property tests for wraparound, collision and rendering invariants.

use proptest::prelude::*;
use voxelscape::colors;
use voxelscape::prelude::*;

fn noise_map(seed: u32, width: u32, height: u32) -> HeightMap {
    HeightMap::from_fn(width, height, |x, y| {
        let v = (x.wrapping_mul(374_761_393) ^ y.wrapping_mul(668_265_263) ^ seed)
            .wrapping_mul(1_274_126_177);
        let a = (v >> 24) as u8;
        (a, colors::rgb(a, (v >> 8) as u8, (v >> 16) as u8))
    })
    .unwrap()
}

fn arb_camera() -> impl Strategy<Value = Camera> {
    (
        -500.0f32..500.0,
        -500.0f32..500.0,
        0.0f32..400.0,
        -10.0f32..10.0,
        -200.0f32..300.0,
        2.0f32..300.0,
    )
        .prop_map(|(x, y, height, angle, horizon, distance)| Camera {
            x,
            y,
            height,
            angle,
            horizon,
            distance,
        })
}

fn arb_intent() -> impl Strategy<Value = Intent> {
    (
        -3.0f32..3.0,
        -3.0f32..3.0,
        -5.0f32..5.0,
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(strafe_turn, move_axis, lift_axis, pitch_up, pitch_down)| Intent {
            strafe_turn,
            move_axis,
            lift_axis,
            pitch_up,
            pitch_down,
        })
}

proptest! {
    #[test]
    fn sampling_wraps_in_both_axes(
        seed in any::<u32>(),
        gx in -10_000i32..10_000,
        gy in -10_000i32..10_000,
        k in -50i32..50,
    ) {
        let map = noise_map(seed, 16, 8);
        prop_assert_eq!(map.sample(gx + k * 16, gy), map.sample(gx, gy));
        prop_assert_eq!(map.sample(gx, gy + k * 8), map.sample(gx, gy));
    }

    #[test]
    fn camera_never_ends_below_ground(
        seed in any::<u32>(),
        start in arb_camera(),
        steps in prop::collection::vec((arb_intent(), 0.0f32..100.0), 1..20),
    ) {
        let map = noise_map(seed, 32, 32);
        let integrator = MotionIntegrator::default();
        let mut camera = start;

        for (intent, elapsed) in &steps {
            integrator.advance(&mut camera, &map, intent, *elapsed);
            let ground = map.altitude_at(camera.x.floor() as i32, camera.y.floor() as i32) as f32
                + integrator.config.clearance;
            prop_assert!(camera.height >= ground);
        }
    }

    #[test]
    fn idle_intent_only_applies_clamp(seed in any::<u32>(), start in arb_camera()) {
        let map = noise_map(seed, 32, 32);
        let integrator = MotionIntegrator::default();

        let mut camera = start;
        integrator.advance(&mut camera, &map, &Intent::default(), 16.0);
        let once = camera;
        integrator.advance(&mut camera, &map, &Intent::default(), 16.0);

        prop_assert_eq!(once, camera);
        prop_assert_eq!(
            (once.x, once.y, once.angle, once.horizon),
            (start.x, start.y, start.angle, start.horizon)
        );
        prop_assert!(once.height >= start.height);
    }

    #[test]
    fn occlusion_is_monotonic(seed in any::<u32>(), camera in arb_camera()) {
        let map = noise_map(seed, 64, 64);
        let renderer = ColumnRenderer::default();
        let mut fb = FrameBuffer::new(24, 16);
        let mut previous = vec![16i32; 24];
        let mut monotonic = true;

        renderer
            .render_frame_observed(&camera, &map, &mut fb, |_, occlusion| {
                monotonic &= occlusion.iter().zip(&previous).all(|(now, before)| now <= before);
                previous.copy_from_slice(occlusion);
            })
            .unwrap();

        prop_assert!(monotonic);
    }

    #[test]
    fn rendering_is_deterministic(seed in any::<u32>(), camera in arb_camera()) {
        let map = noise_map(seed, 64, 64);
        let renderer = ColumnRenderer::default();
        let mut a = FrameBuffer::new(20, 12);
        let mut b = FrameBuffer::new(20, 12);
        b.clear(0xFF010203);

        renderer.render_frame(&camera, &map, &mut a).unwrap();
        renderer.render_frame(&camera, &map, &mut b).unwrap();
        prop_assert_eq!(a, b);
    }
}
