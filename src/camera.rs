//! Viewpoint over the height map.
//!
//! # Coordinate System
//!
//! Positions are in map-grid units and wrap with the map.
//! - X: increases to the east
//! - Y: increases to the south, so heading 0 looks "north" along -Y
//! - Height: elevation above the map's zero plane
//!
//! Pitch is not an angle: `horizon` is the screen row the skyline sits on, so
//! larger values tilt the view up and push the terrain down the screen.

/// Camera state read by the renderer and mutated by the
/// [`MotionIntegrator`](crate::motion::MotionIntegrator).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
    pub height: f32,
    /// Heading in radians, 0 = facing -Y.
    pub angle: f32,
    /// Screen row of the horizon in pixels.
    pub horizon: f32,
    /// Maximum marching depth in map units.
    pub distance: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            x: 512.0,
            y: 800.0,
            height: 78.0,
            angle: 0.0,
            horizon: 100.0,
            distance: 800.0,
        }
    }
}

impl Camera {
    /// Creates a camera at the given map position with default orientation.
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    /// Grid cell below the camera.
    #[inline]
    pub fn cell(&self) -> (i32, i32) {
        (self.x.floor() as i32, self.y.floor() as i32)
    }
}
