//! Front-to-back column renderer for height-map terrain.
//!
//! # Algorithm Overview
//!
//! The view is built from depth layers rather than polygons. For each depth
//! `z`, a horizontal line segment on the map spanning the field of view is
//! sampled once per screen column, and each sample is projected to a screen row
//! with a perspective divide:
//!
//! ```text
//! screen_y = (camera.height - altitude) * (scale / z) + camera.horizon
//! ```
//!
//! Layers are processed nearest first. Each column keeps an occlusion cursor:
//! the highest screen row already covered by closer terrain. A layer only fills
//! the rows between its projected top and that cursor, then raises the cursor.
//! Because the cursor never moves down, farther terrain can never overdraw
//! nearer terrain and no depth buffer is needed.
//!
//! ```text
//!         camera
//!           *
//!          /|\          z = 1  ....   dense near the viewer
//!         / | \         z = 2  ....
//!        /  |  \        ...
//!       /___|___\       z = far       sparse at range (step grows each layer)
//!    left         right
//! ```
//!
//! The depth step starts at 1 and grows by a fixed increment per layer, so
//! sampling is dense close to the camera and sparse in the distance where
//! detail covers few pixels anyway.

use std::ops::ControlFlow;
use std::time::Instant;

use log::debug;

use super::framebuffer::FrameBuffer;
use super::parallel;
use crate::camera::Camera;
use crate::colors;
use crate::error::RenderError;
use crate::heightmap::HeightMap;

/// Tunable constants of the projection and marching loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    /// Perspective scale applied to `1 / z`.
    pub perspective_scale: f32,
    /// Amount the depth step grows after every layer.
    pub depth_step_growth: f32,
    /// Horizontal field of view.
    pub field_of_view_degrees: f32,
    /// Fill color for everything the terrain does not cover.
    pub background_color: u32,
    /// Split columns across the rayon thread pool.
    pub parallel: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            perspective_scale: 240.0,
            depth_step_growth: 0.005,
            field_of_view_degrees: 90.0,
            background_color: colors::SKY,
            parallel: false,
        }
    }
}

/// How far a deadline-bounded render got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Every depth layer up to the view distance was drawn.
    Complete,
    /// The deadline passed after `layers` depth layers.
    Truncated { layers: usize },
}

/// One depth slice of the view: map-space endpoints and per-column stride.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Layer {
    pub z: f32,
    /// Map position sampled by column 0.
    pub left_x: f32,
    pub left_y: f32,
    /// Map-space step between adjacent columns.
    pub dx: f32,
    pub dy: f32,
    /// `scale / z`
    pub inv_z: f32,
}

impl Layer {
    /// Map positions sampled by each of `columns` screen columns, left to right.
    ///
    /// Positions are accumulated one step at a time rather than computed as
    /// `left + i * step`, and every render path walks them the same way.
    #[inline]
    pub fn columns(&self, columns: usize) -> impl Iterator<Item = (f32, f32)> + '_ {
        (0..columns).scan((self.left_x, self.left_y), |pos, _| {
            let current = *pos;
            pos.0 += self.dx;
            pos.1 += self.dy;
            Some(current)
        })
    }

    /// Screen row of terrain at `altitude` in this layer, truncated toward zero.
    #[inline]
    pub fn project(&self, camera: &Camera, altitude: u8) -> i32 {
        ((camera.height - altitude as f32) * self.inv_z + camera.horizon) as i32
    }
}

/// Yields the depth layers of one frame, nearest first.
pub(crate) struct DepthLayers {
    z: f32,
    delta_z: f32,
    growth: f32,
    distance: f32,
    sin: f32,
    cos: f32,
    spread: f32,
    origin: (f32, f32),
    columns: f32,
    scale: f32,
}

impl DepthLayers {
    /// Marching starts from the camera position wrapped into the map tile,
    /// so a camera offset by whole tiles yields the same layers.
    pub fn new(camera: &Camera, map: &HeightMap, config: &RenderConfig, columns: u32) -> Self {
        Self {
            z: 1.0,
            delta_z: 1.0,
            growth: config.depth_step_growth,
            distance: camera.distance,
            sin: camera.angle.sin(),
            cos: camera.angle.cos(),
            spread: (config.field_of_view_degrees * 0.5).to_radians().tan(),
            origin: map.wrap_position(camera.x, camera.y),
            columns: columns as f32,
            scale: config.perspective_scale,
        }
    }
}

impl Iterator for DepthLayers {
    type Item = Layer;

    fn next(&mut self) -> Option<Layer> {
        if self.z >= self.distance || self.delta_z <= 0.0 {
            return None;
        }
        let z = self.z;
        let half = self.spread * z;

        // Rotate (-half, -z) and (half, -z) by the heading.
        let left_x = -self.cos * half - self.sin * z;
        let left_y = self.sin * half - self.cos * z;
        let right_x = self.cos * half - self.sin * z;
        let right_y = -self.sin * half - self.cos * z;

        let layer = Layer {
            z,
            left_x: left_x + self.origin.0,
            left_y: left_y + self.origin.1,
            dx: (right_x - left_x) / self.columns,
            dy: (right_y - left_y) / self.columns,
            inv_z: self.scale / z,
        };

        self.z += self.delta_z;
        self.delta_z += self.growth;
        Some(layer)
    }
}

/// Renders a [`HeightMap`] as seen from a [`Camera`] into a [`FrameBuffer`].
#[derive(Debug, Clone, Default)]
pub struct ColumnRenderer {
    pub config: RenderConfig,
}

impl ColumnRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Draw a full frame, overwriting every pixel.
    ///
    /// Fails with [`RenderError::InvalidDimensions`] on a zero-sized target,
    /// leaving it untouched. Dispatches to the column-parallel path when
    /// [`RenderConfig::parallel`] is set.
    pub fn render_frame(
        &self,
        camera: &Camera,
        map: &HeightMap,
        fb: &mut FrameBuffer,
    ) -> Result<(), RenderError> {
        if self.config.parallel {
            return self.render_frame_parallel(camera, map, fb);
        }
        self.march(camera, map, fb, |_, _| ControlFlow::Continue(()))
            .map(|_| ())
    }

    /// Draw a full frame, calling `on_layer(z, occlusion)` after every depth
    /// layer with the per-column occlusion cursors.
    pub fn render_frame_observed<F>(
        &self,
        camera: &Camera,
        map: &HeightMap,
        fb: &mut FrameBuffer,
        mut on_layer: F,
    ) -> Result<(), RenderError>
    where
        F: FnMut(f32, &[i32]),
    {
        self.march(camera, map, fb, |z, occlusion| {
            on_layer(z, occlusion);
            ControlFlow::Continue(())
        })
        .map(|_| ())
    }

    /// Draw layers until either the view distance or `deadline` is reached.
    ///
    /// The deadline is checked between layers, so at least one layer is drawn.
    /// A truncated frame is still fully background-filled.
    pub fn render_frame_until(
        &self,
        camera: &Camera,
        map: &HeightMap,
        fb: &mut FrameBuffer,
        deadline: Instant,
    ) -> Result<RenderOutcome, RenderError> {
        let outcome = self.march(camera, map, fb, |_, _| {
            if Instant::now() >= deadline {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })?;
        if let RenderOutcome::Truncated { layers } = outcome {
            debug!("frame truncated after {layers} depth layers");
        }
        Ok(outcome)
    }

    /// Draw a full frame with columns split across the rayon thread pool.
    ///
    /// Produces exactly the same pixels as the serial path: column positions
    /// are walked serially per layer and only the fills run in parallel.
    pub fn render_frame_parallel(
        &self,
        camera: &Camera,
        map: &HeightMap,
        fb: &mut FrameBuffer,
    ) -> Result<(), RenderError> {
        check_dimensions(fb)?;
        parallel::render_columns(&self.config, camera, map, fb);
        Ok(())
    }

    fn march<F>(
        &self,
        camera: &Camera,
        map: &HeightMap,
        fb: &mut FrameBuffer,
        mut after_layer: F,
    ) -> Result<RenderOutcome, RenderError>
    where
        F: FnMut(f32, &[i32]) -> ControlFlow<()>,
    {
        check_dimensions(fb)?;
        fb.clear(self.config.background_color);

        let width = fb.width();
        let mut hidden_y = vec![fb.height() as i32; width as usize];

        let layers = DepthLayers::new(camera, map, &self.config, width);
        for (n, layer) in layers.enumerate() {
            let columns = hidden_y.iter_mut().zip(layer.columns(width as usize));

            for (i, (hidden, (px, py))) in columns.enumerate() {
                let (altitude, color) = map.sample(px.floor() as i32, py.floor() as i32);
                let screen_y = layer.project(camera, altitude);

                fb.draw_vertical_line(i as u32, screen_y, *hidden, color);
                if screen_y < *hidden {
                    *hidden = screen_y;
                }
            }

            if after_layer(layer.z, &hidden_y).is_break() {
                return Ok(RenderOutcome::Truncated { layers: n + 1 });
            }
        }

        Ok(RenderOutcome::Complete)
    }
}

fn check_dimensions(fb: &FrameBuffer) -> Result<(), RenderError> {
    if fb.is_empty() {
        return Err(RenderError::InvalidDimensions {
            width: fb.width(),
            height: fb.height(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const GREEN: u32 = 0xFF00FF00;

    fn uniform(size: u32, altitude: u8, color: u32) -> HeightMap {
        HeightMap::from_fn(size, size, |_, _| (altitude, color)).unwrap()
    }

    fn hills() -> HeightMap {
        HeightMap::from_fn(64, 64, |x, y| {
            let a = (x * 7 + y * 13) % 200;
            (a as u8, colors::rgb(a as u8, (x * 4) as u8, (y * 4) as u8))
        })
        .unwrap()
    }

    fn depths(distance: f32) -> Vec<f32> {
        let mut out = Vec::new();
        let (mut z, mut dz) = (1.0f32, 1.0f32);
        while z < distance {
            out.push(z);
            z += dz;
            dz += 0.005;
        }
        out
    }

    #[test]
    fn layers_span_ninety_degrees_facing_north() {
        let camera = Camera {
            x: 10.0,
            y: 20.0,
            ..Camera::default()
        };
        let layer = DepthLayers::new(&camera, &hills(), &RenderConfig::default(), 4)
            .nth(1)
            .unwrap();

        assert_relative_eq!(layer.z, 2.0);
        assert_relative_eq!(layer.left_x, 8.0, epsilon = 1e-4);
        assert_relative_eq!(layer.left_y, 18.0, epsilon = 1e-4);
        assert_relative_eq!(layer.dx, 1.0, epsilon = 1e-4);
        assert_relative_eq!(layer.dy, 0.0, epsilon = 1e-4);
        assert_relative_eq!(layer.inv_z, 120.0);
    }

    #[test]
    fn column_walk_accumulates_steps() {
        let layer = Layer {
            z: 1.0,
            left_x: 0.1,
            left_y: -3.0,
            dx: 0.1,
            dy: 0.25,
            inv_z: 240.0,
        };
        let walk: Vec<(f32, f32)> = layer.columns(4).collect();

        let (mut x, mut y) = (0.1f32, -3.0f32);
        for &(px, py) in &walk {
            assert_eq!((px, py), (x, y));
            x += 0.1;
            y += 0.25;
        }
        assert_eq!(walk.len(), 4);
    }

    #[test]
    fn depth_step_grows_each_layer() {
        let camera = Camera {
            distance: 100.0,
            ..Camera::default()
        };
        let z: Vec<f32> = DepthLayers::new(&camera, &hills(), &RenderConfig::default(), 8)
            .map(|l| l.z)
            .collect();

        assert_eq!(z, depths(100.0));
        assert_relative_eq!(z[2] - z[1], 1.005, epsilon = 1e-5);
        assert!(*z.last().unwrap() < 100.0);
    }

    #[test]
    fn zero_sized_target_is_rejected_untouched() {
        let renderer = ColumnRenderer::default();
        let map = uniform(2, 0, GREEN);
        let camera = Camera::default();

        for (w, h) in [(0, 4), (4, 0), (0, 0)] {
            let mut fb = FrameBuffer::new(w, h);
            let before = fb.clone();
            let err = renderer.render_frame(&camera, &map, &mut fb).unwrap_err();
            assert_eq!(err, RenderError::InvalidDimensions { width: w, height: h });
            assert_eq!(fb, before);
        }
    }

    #[test]
    fn degenerate_map_low_horizon_is_all_sky() {
        let renderer = ColumnRenderer::default();
        let map = uniform(2, 0, GREEN);
        let camera = Camera {
            x: 1.0,
            y: 1.0,
            height: 50.0,
            angle: 0.0,
            horizon: 0.0,
            distance: 100.0,
        };
        let mut fb = FrameBuffer::new(4, 4);
        renderer.render_frame(&camera, &map, &mut fb).unwrap();

        // Even the farthest layer projects below the bottom row.
        assert!(fb.pixels().iter().all(|&c| c == colors::SKY));
    }

    #[test]
    fn degenerate_map_splits_columns_at_projected_row() {
        let renderer = ColumnRenderer::default();
        let map = uniform(2, 0, GREEN);
        let camera = Camera {
            x: 1.0,
            y: 1.0,
            height: 50.0,
            angle: 0.0,
            horizon: -118.0,
            distance: 100.0,
        };
        let mut fb = FrameBuffer::new(4, 4);
        renderer.render_frame(&camera, &map, &mut fb).unwrap();

        let top = depths(camera.distance)
            .into_iter()
            .map(|z| ((50.0 - 0.0) * (240.0 / z) + camera.horizon) as i32)
            .min()
            .unwrap();
        assert!((1..4).contains(&top));

        for x in 0..4 {
            for y in 0..4 {
                let expected = if (y as i32) >= top { GREEN } else { colors::SKY };
                assert_eq!(fb.get_pixel(x, y), Some(expected), "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn terrain_above_camera_covers_background() {
        let renderer = ColumnRenderer::default();
        let map = uniform(16, 255, GREEN);
        let camera = Camera {
            x: 8.0,
            y: 8.0,
            height: 0.0,
            ..Camera::default()
        };
        let mut fb = FrameBuffer::new(32, 24);
        renderer.render_frame(&camera, &map, &mut fb).unwrap();

        assert!(fb.pixels().iter().all(|&c| c != colors::SKY));
    }

    #[test]
    fn render_is_deterministic() {
        let renderer = ColumnRenderer::default();
        let map = hills();
        let camera = Camera {
            x: 30.5,
            y: 12.25,
            height: 220.0,
            angle: 0.7,
            horizon: 60.0,
            distance: 300.0,
        };

        let mut first = FrameBuffer::new(64, 48);
        let mut second = FrameBuffer::new(64, 48);
        second.clear(0xFF123456);
        renderer.render_frame(&camera, &map, &mut first).unwrap();
        renderer.render_frame(&camera, &map, &mut second).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn occlusion_cursor_never_moves_down() {
        let renderer = ColumnRenderer::default();
        let map = hills();
        let camera = Camera {
            x: 3.0,
            y: 50.0,
            height: 210.0,
            angle: -1.3,
            horizon: 80.0,
            distance: 250.0,
        };
        let mut fb = FrameBuffer::new(40, 30);

        let mut previous = vec![30; 40];
        let mut layers = 0;
        renderer
            .render_frame_observed(&camera, &map, &mut fb, |_, occlusion| {
                for (now, before) in occlusion.iter().zip(&previous) {
                    assert!(now <= before);
                }
                previous.copy_from_slice(occlusion);
                layers += 1;
            })
            .unwrap();

        assert_eq!(layers, depths(250.0).len());
    }

    #[test]
    fn resized_target_is_fully_rewritten() {
        let renderer = ColumnRenderer::default();
        let map = hills();
        let camera = Camera {
            x: 5.0,
            y: 5.0,
            height: 230.0,
            ..Camera::default()
        };

        let mut fb = FrameBuffer::new(16, 16);
        renderer.render_frame(&camera, &map, &mut fb).unwrap();
        fb.resize(24, 10);
        renderer.render_frame(&camera, &map, &mut fb).unwrap();

        let mut fresh = FrameBuffer::new(24, 10);
        renderer.render_frame(&camera, &map, &mut fresh).unwrap();
        assert_eq!(fb, fresh);
        assert_eq!(fb.pixels().len(), 240);
    }

    #[test]
    fn whole_tile_offsets_render_the_same_frame() {
        let renderer = ColumnRenderer::default();
        let map = hills();
        let camera = Camera {
            x: 30.5,
            y: 12.25,
            height: 220.0,
            angle: 0.7,
            horizon: 60.0,
            distance: 300.0,
        };
        let mut expected = FrameBuffer::new(160, 120);
        renderer.render_frame(&camera, &map, &mut expected).unwrap();

        for k in [16.0f32, 64.0, 256.0, 1024.0, -1024.0] {
            let shifted = Camera {
                x: camera.x + 64.0 * k,
                y: camera.y + 64.0 * k,
                ..camera
            };
            let mut fb = FrameBuffer::new(160, 120);
            renderer.render_frame(&shifted, &map, &mut fb).unwrap();
            assert_eq!(fb, expected, "offset of {k} tiles");
        }
    }

    #[test]
    fn expired_deadline_stops_after_first_layer() {
        let renderer = ColumnRenderer::default();
        let map = hills();
        let camera = Camera::at(10.0, 10.0);
        let mut fb = FrameBuffer::new(20, 20);
        fb.clear(0xFF123456);

        let outcome = renderer
            .render_frame_until(&camera, &map, &mut fb, Instant::now())
            .unwrap();

        assert_eq!(outcome, RenderOutcome::Truncated { layers: 1 });
        assert!(fb.pixels().iter().all(|&c| c != 0xFF123456));
    }

    #[test]
    fn generous_deadline_completes() {
        let renderer = ColumnRenderer::default();
        let map = hills();
        let camera = Camera {
            distance: 50.0,
            ..Camera::at(10.0, 10.0)
        };
        let mut fb = FrameBuffer::new(20, 20);
        let deadline = Instant::now() + std::time::Duration::from_secs(3600);

        let outcome = renderer
            .render_frame_until(&camera, &map, &mut fb, deadline)
            .unwrap();
        assert_eq!(outcome, RenderOutcome::Complete);
    }
}
