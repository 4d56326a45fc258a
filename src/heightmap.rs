//! Terrain altitude and color samples with wraparound addressing.
//!
//! Both grids share one row-major layout. Dimensions are powers of two so that
//! any integer grid coordinate wraps into bounds with a bitmask, which makes the
//! terrain tile infinitely in both axes:
//!
//! ```text
//! index = ((gy & (height - 1)) << log2(width)) + (gx & (width - 1))
//! ```
//!
//! Negative coordinates wrap correctly because masking works on the two's
//! complement representation.

use std::path::Path;

use log::info;

use crate::colors;
use crate::error::MapError;

const DEFAULT_SIZE: u32 = 1024;

/// Altitude and color grid sampled by the renderer and the collision clamp.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightMap {
    altitude: Vec<u8>,
    color: Vec<u32>, // ARGB8888, one per altitude cell
    width: u32,
    height: u32,
    shift: u32, // log2(width)
}

impl Default for HeightMap {
    /// Flat placeholder terrain shown until a real map is loaded.
    fn default() -> Self {
        let size = (DEFAULT_SIZE * DEFAULT_SIZE) as usize;
        Self {
            altitude: vec![0; size],
            color: vec![colors::DEFAULT_GROUND; size],
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            shift: DEFAULT_SIZE.trailing_zeros(),
        }
    }
}

impl HeightMap {
    /// Build a map from raw samples.
    ///
    /// Fails with [`MapError::DimensionMismatch`] if the two sources differ in
    /// size, do not match `width * height`, or a dimension is not a power of two.
    pub fn from_samples(
        color: Vec<u32>,
        altitude: Vec<u8>,
        width: u32,
        height: u32,
    ) -> Result<Self, MapError> {
        validate(color.len(), altitude.len(), width, height)?;
        Ok(Self {
            altitude,
            color,
            width,
            height,
            shift: width.trailing_zeros(),
        })
    }

    /// Generate a map by evaluating `f(x, y) -> (altitude, color)` for every cell.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Result<Self, MapError>
    where
        F: FnMut(u32, u32) -> (u8, u32),
    {
        validate(
            (width as usize) * (height as usize),
            (width as usize) * (height as usize),
            width,
            height,
        )?;

        let (altitude, color): (Vec<u8>, Vec<u32>) = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| f(x, y))
            .unzip();

        Self::from_samples(color, altitude, width, height)
    }

    /// Decode a color image and a height image into a map.
    ///
    /// The color image is converted to opaque ARGB; the altitude of each cell is
    /// the red channel of the height image. Both images must have the same
    /// power-of-two dimensions.
    pub fn from_images<P: AsRef<Path>, Q: AsRef<Path>>(
        color_path: P,
        altitude_path: Q,
    ) -> Result<Self, MapError> {
        let color_img = image::open(color_path.as_ref())?.to_rgba8();
        let altitude_img = image::open(altitude_path.as_ref())?.to_rgba8();

        if color_img.dimensions() != altitude_img.dimensions() {
            return Err(MapError::DimensionMismatch(format!(
                "color image is {}x{} but height image is {}x{}",
                color_img.width(),
                color_img.height(),
                altitude_img.width(),
                altitude_img.height()
            )));
        }

        let (width, height) = color_img.dimensions();
        let color: Vec<u32> = color_img
            .pixels()
            .map(|p| {
                let [r, g, b, _] = p.0;
                colors::rgb(r, g, b)
            })
            .collect();
        let altitude: Vec<u8> = altitude_img.pixels().map(|p| p.0[0]).collect();

        let map = Self::from_samples(color, altitude, width, height)?;
        info!(
            "loaded {}x{} map from {} and {}",
            width,
            height,
            color_path.as_ref().display(),
            altitude_path.as_ref().display()
        );
        Ok(map)
    }

    /// Replace the grid contents. On error the current contents stay active.
    pub fn load(
        &mut self,
        color: Vec<u32>,
        altitude: Vec<u8>,
        width: u32,
        height: u32,
    ) -> Result<(), MapError> {
        *self = Self::from_samples(color, altitude, width, height)?;
        Ok(())
    }

    /// Sample the altitude and color at a grid coordinate.
    ///
    /// Total over all integers: coordinates wrap around the map edges.
    #[inline]
    pub fn sample(&self, gx: i32, gy: i32) -> (u8, u32) {
        let idx = self.index(gx, gy);
        (self.altitude[idx], self.color[idx])
    }

    #[inline]
    pub fn altitude_at(&self, gx: i32, gy: i32) -> u8 {
        self.altitude[self.index(gx, gy)]
    }

    #[inline]
    fn index(&self, gx: i32, gy: i32) -> usize {
        let x = (gx as u32) & (self.width - 1);
        let y = (gy as u32) & (self.height - 1);
        ((y << self.shift) + x) as usize
    }

    /// Wrap a map-space position into `[0, width) x [0, height)`.
    ///
    /// Keeps positions small so f32 precision stays finer than a column step.
    /// Samples at the wrapped position are identical to the unwrapped ones.
    pub fn wrap_position(&self, x: f32, y: f32) -> (f32, f32) {
        (wrap(x, self.width as f32), wrap(y, self.height as f32))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

// rem_euclid rounds tiny negative values up to `period` itself.
fn wrap(value: f32, period: f32) -> f32 {
    let wrapped = value.rem_euclid(period);
    if wrapped >= period {
        0.0
    } else {
        wrapped
    }
}

fn validate(
    color_len: usize,
    altitude_len: usize,
    width: u32,
    height: u32,
) -> Result<(), MapError> {
    if !width.is_power_of_two() || !height.is_power_of_two() {
        return Err(MapError::DimensionMismatch(format!(
            "{width}x{height} is not power-of-two sized"
        )));
    }
    if color_len != altitude_len {
        return Err(MapError::DimensionMismatch(format!(
            "{color_len} color samples but {altitude_len} altitude samples"
        )));
    }
    let expected = (width as usize) * (height as usize);
    if color_len != expected {
        return Err(MapError::DimensionMismatch(format!(
            "{color_len} samples do not fill a {width}x{height} grid"
        )));
    }
    Ok(())
}
