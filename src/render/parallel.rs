//! Column-parallel variant of the depth marcher.
//!
//! Columns are independent: each owns its occlusion cursor and never reads
//! another column's state. Depth layers are not independent, so each worker
//! walks every layer for its own column in order.
//!
//! Column positions on the map are walked serially for every layer, exactly as
//! the serial marcher walks them, and stored in a table. Workers read their
//! column's positions from it, so both paths sample the same cells.
//!
//! The frame buffer is row-major, which interleaves columns in memory. Workers
//! therefore draw into a column-major scratch buffer that splits cleanly into
//! disjoint `&mut` chunks, and the result is transposed into the frame.
//!
//! ```text
//! scratch (column-major)          frame (row-major)
//! [c0 r0..rh][c1 r0..rh]...  -->  [r0 c0..cw][r1 c0..cw]...
//! ```

use rayon::prelude::*;

use super::column::{DepthLayers, Layer, RenderConfig};
use super::framebuffer::FrameBuffer;
use crate::camera::Camera;
use crate::heightmap::HeightMap;

/// Render all columns of `fb` in parallel. `fb` must be non-empty.
pub(super) fn render_columns(
    config: &RenderConfig,
    camera: &Camera,
    map: &HeightMap,
    fb: &mut FrameBuffer,
) {
    let width = fb.width() as usize;
    let height = fb.height() as usize;
    let layers: Vec<Layer> = DepthLayers::new(camera, map, config, fb.width()).collect();

    // positions[l * width + i] is where column i samples layer l.
    let positions: Vec<(f32, f32)> = layers
        .iter()
        .flat_map(|layer| layer.columns(width))
        .collect();

    let mut scratch = vec![config.background_color; width * height];
    scratch
        .par_chunks_mut(height)
        .enumerate()
        .for_each(|(i, column)| {
            let walk = positions.iter().skip(i).step_by(width).copied();
            march_column(column, layers.iter().zip(walk), camera, map);
        });

    fb.pixels_mut()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = scratch[x * height + y];
            }
        });
}

fn march_column<'a, I>(column: &mut [u32], samples: I, camera: &Camera, map: &HeightMap)
where
    I: Iterator<Item = (&'a Layer, (f32, f32))>,
{
    let mut hidden = column.len() as i32;

    for (layer, (px, py)) in samples {
        let (altitude, color) = map.sample(px.floor() as i32, py.floor() as i32);
        let screen_y = layer.project(camera, altitude);

        let top = screen_y.max(0);
        if top < hidden {
            column[top as usize..hidden as usize].fill(color);
        }
        if screen_y < hidden {
            hidden = screen_y;
        }
    }
}
