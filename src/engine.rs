//! One render context: camera, terrain, and output buffer.
//!
//! The [`Engine`] struct is the main entry point. Each [`tick`](Engine::tick)
//! performs one motion update followed by one full render pass. Scheduling is
//! left to the caller: `tick` reports whether the input intent is still active,
//! which is the signal to produce another frame right away instead of idling
//! until the next input event.

use log::{debug, info};

use crate::camera::Camera;
use crate::error::RenderError;
use crate::heightmap::HeightMap;
use crate::motion::{Intent, MotionConfig, MotionIntegrator};
use crate::render::{ColumnRenderer, FrameBuffer, RenderConfig};

pub struct Engine {
    camera: Camera,
    map: HeightMap,
    frame: FrameBuffer,
    integrator: MotionIntegrator,
    renderer: ColumnRenderer,
}

impl Engine {
    /// Create an engine over the flat placeholder map with default tuning.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_config(
            width,
            height,
            MotionConfig::default(),
            RenderConfig::default(),
        )
    }

    pub fn with_config(
        width: u32,
        height: u32,
        motion: MotionConfig,
        render: RenderConfig,
    ) -> Self {
        Self {
            camera: Camera::default(),
            map: HeightMap::default(),
            frame: FrameBuffer::new(width, height),
            integrator: MotionIntegrator::new(motion),
            renderer: ColumnRenderer::new(render),
        }
    }

    /// Replace the terrain and lift the camera clear of it.
    pub fn load_map(&mut self, map: HeightMap) {
        info!("switching to {}x{} map", map.width(), map.height());
        self.map = map;
        self.integrator.clamp_to_ground(&mut self.camera, &self.map);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        debug!("resizing frame buffer to {width}x{height}");
        self.frame.resize(width, height);
    }

    /// Advance the camera by `intent` over `elapsed_ms` and render a frame.
    ///
    /// Returns `true` while the intent is active, i.e. another frame should be
    /// scheduled immediately.
    pub fn tick(&mut self, intent: &Intent, elapsed_ms: f32) -> Result<bool, RenderError> {
        self.integrator
            .advance(&mut self.camera, &self.map, intent, elapsed_ms);
        self.render()?;
        Ok(intent.is_active())
    }

    /// Render the current state without moving the camera.
    pub fn render(&mut self) -> Result<(), RenderError> {
        self.renderer
            .render_frame(&self.camera, &self.map, &mut self.frame)
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn map(&self) -> &HeightMap {
        &self.map
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Returns the rendered frame as bytes (ARGB8888 format)
    pub fn frame_bytes(&self) -> &[u8] {
        self.frame.as_bytes()
    }

    pub fn render_config_mut(&mut self) -> &mut RenderConfig {
        &mut self.renderer.config
    }

    pub fn motion_config_mut(&mut self) -> &mut MotionConfig {
        &mut self.integrator.config
    }
}
