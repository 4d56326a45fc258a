//! A CPU-based "voxel space" terrain renderer.
//!
//! Terrain is a 2D height map plus a color map. Instead of building geometry,
//! the renderer marches depth layers front to back and draws one vertical strip
//! per screen column per layer, using a per-column occlusion cursor for hidden
//! surface removal. SDL2 is used only by the viewer for the window and display.
//!
//! # Quick Start
//!
//! ```ignore
//! use voxelscape::prelude::*;
//!
//! let map = HeightMap::from_images("maps/color.png", "maps/height.png")?;
//! let mut engine = Engine::new(800, 600);
//! engine.load_map(map);
//! let keep_going = engine.tick(&Intent { move_axis: 3.0, ..Intent::default() }, 16.0)?;
//! ```

// Public API - exposed to library consumers
pub mod camera;
pub mod colors;
pub mod engine;
pub mod error;
pub mod heightmap;
pub mod motion;
pub mod render;
pub mod window;

// Re-export commonly needed types at crate root for convenience
pub use camera::Camera;
pub use engine::Engine;
pub use error::{MapError, RenderError};
pub use heightmap::HeightMap;
pub use motion::{Intent, MotionConfig, MotionIntegrator};
pub use render::{ColumnRenderer, FrameBuffer, RenderConfig, RenderOutcome};

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use voxelscape::prelude::*;
/// ```
pub mod prelude {
    // Terrain
    pub use crate::heightmap::HeightMap;

    // Camera & motion
    pub use crate::camera::Camera;
    pub use crate::motion::{Intent, MotionConfig, MotionIntegrator};

    // Engine
    pub use crate::engine::Engine;

    // Rendering
    pub use crate::render::{ColumnRenderer, FrameBuffer, RenderConfig, RenderOutcome};

    // Errors
    pub use crate::error::{MapError, RenderError};

    // Window & Input
    pub use crate::window::{InputState, Window, WindowEvent};
}
