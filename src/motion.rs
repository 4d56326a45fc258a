//! Camera motion from timed input intent, with ground collision.

use crate::camera::Camera;
use crate::heightmap::HeightMap;

/// Input intent for one frame, produced by whatever reads the input devices.
///
/// Axes are signed; magnitude scales the rate. The core never sees raw key codes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Intent {
    /// Positive turns left (counter-clockwise heading).
    pub strafe_turn: f32,
    /// Positive moves forward.
    pub move_axis: f32,
    /// Positive climbs.
    pub lift_axis: f32,
    pub pitch_up: bool,
    pub pitch_down: bool,
}

impl Intent {
    /// True while any axis is non-zero or any flag is set.
    ///
    /// This is the "produce another frame" signal for the scheduler.
    pub fn is_active(&self) -> bool {
        self.strafe_turn != 0.0
            || self.move_axis != 0.0
            || self.lift_axis != 0.0
            || self.pitch_up
            || self.pitch_down
    }
}

/// Tunable rates for [`MotionIntegrator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionConfig {
    /// Distance units per millisecond for a unit axis.
    pub movement_scale: f32,
    /// Radians per distance unit of a unit turn axis.
    pub turn_rate: f32,
    /// Horizon pixels per distance unit while pitching.
    pub pitch_rate: f32,
    /// Minimum height kept above the terrain.
    pub clearance: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            movement_scale: 0.03,
            turn_rate: 0.1,
            pitch_rate: 2.0,
            clearance: 10.0,
        }
    }
}

/// Advances a [`Camera`] by an [`Intent`] over elapsed time.
#[derive(Debug, Clone, Default)]
pub struct MotionIntegrator {
    pub config: MotionConfig,
}

impl MotionIntegrator {
    pub fn new(config: MotionConfig) -> Self {
        Self { config }
    }

    /// Applies one tick of motion.
    ///
    /// Order matters: the heading is updated first so that forward movement in
    /// the same tick follows the new heading. The ground clamp runs last.
    ///
    /// After moving, the position is wrapped into the map's tile so long
    /// flights keep full f32 precision.
    pub fn advance(&self, camera: &mut Camera, map: &HeightMap, intent: &Intent, elapsed_ms: f32) {
        let step = elapsed_ms * self.config.movement_scale;

        camera.angle += intent.strafe_turn * self.config.turn_rate * step;

        if intent.move_axis != 0.0 {
            camera.x -= intent.move_axis * camera.angle.sin() * step;
            camera.y -= intent.move_axis * camera.angle.cos() * step;
            (camera.x, camera.y) = map.wrap_position(camera.x, camera.y);
        }

        camera.height += intent.lift_axis * step;

        if intent.pitch_up {
            camera.horizon += self.config.pitch_rate * step;
        }
        if intent.pitch_down {
            camera.horizon -= self.config.pitch_rate * step;
        }

        self.clamp_to_ground(camera, map);
    }

    /// Lifts the camera to `clearance` above the terrain under it, if needed.
    pub fn clamp_to_ground(&self, camera: &mut Camera, map: &HeightMap) {
        let (gx, gy) = camera.cell();
        let ground = map.altitude_at(gx, gy) as f32 + self.config.clearance;
        if camera.height < ground {
            camera.height = ground;
        }
    }
}
