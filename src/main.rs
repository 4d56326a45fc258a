use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use voxelscape::prelude::*;
use voxelscape::window::{FpsCounter, FrameClock, WINDOW_HEIGHT, WINDOW_WIDTH};

/// Fly over a height map rendered with a column-based voxel renderer.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Color image of the terrain.
    #[arg(long, requires = "altitude_map")]
    color_map: Option<String>,

    /// Height image of the terrain (red channel is the altitude).
    #[arg(long, requires = "color_map")]
    altitude_map: Option<String>,

    #[arg(long, default_value_t = WINDOW_WIDTH)]
    width: u32,

    #[arg(long, default_value_t = WINDOW_HEIGHT)]
    height: u32,

    /// Draw distance in map units.
    #[arg(long, default_value_t = 800.0)]
    distance: f32,

    /// Flight speed in map units per millisecond.
    #[arg(long, default_value_t = 0.03)]
    movement_scale: f32,

    /// Render columns on all cores.
    #[arg(long)]
    parallel: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut window = Window::new("Voxelscape", args.width, args.height)
        .map_err(anyhow::Error::msg)
        .context("failed to open window")?;

    let mut engine = Engine::with_config(
        window.width(),
        window.height(),
        MotionConfig::default(),
        RenderConfig {
            parallel: args.parallel,
            ..RenderConfig::default()
        },
    );
    engine.camera_mut().distance = args.distance;
    engine.motion_config_mut().movement_scale = args.movement_scale;

    if let (Some(color), Some(altitude)) = (&args.color_map, &args.altitude_map) {
        let map = HeightMap::from_images(color, altitude)
            .with_context(|| format!("failed to load map {color} / {altitude}"))?;
        engine.load_map(map);
    } else {
        info!("no map given, showing flat placeholder terrain");
    }

    let mut input = InputState::default();
    let mut clock = FrameClock::new(&window);
    let mut fps = FpsCounter::new(window.timer().ticks64());

    // Draw once on startup, then only while input is active or after events.
    let mut needs_frame = true;
    let mut running = false;

    loop {
        match window.poll_events(&mut input, !needs_frame && !running) {
            WindowEvent::Quit => break,
            WindowEvent::Resize(w, h) => {
                info!("window resized to {w}x{h}");
                window.resize(w, h).map_err(anyhow::Error::msg)?;
                engine.resize(w, h);
                needs_frame = true;
            }
            WindowEvent::Input | WindowEvent::Redraw => needs_frame = true,
            WindowEvent::None => {}
        }

        if !needs_frame && !running {
            continue;
        }
        if !running {
            clock.restart(&window);
        }

        let intent = input.intent(window.width(), window.height());
        let elapsed = clock.delta_ms(&window);
        needs_frame = false;

        running = match engine.tick(&intent, elapsed) {
            Ok(active) => active,
            Err(err) => {
                warn!("skipping frame: {err}");
                false
            }
        };

        if !engine.frame().is_empty() {
            window
                .present(engine.frame_bytes())
                .map_err(anyhow::Error::msg)?;
        }

        if let Some(rate) = fps.frame(window.timer().ticks64()) {
            window.set_title(&format!("Voxelscape - {rate:.1} fps"));
        }
    }

    Ok(())
}
