//! Owned pixel grid handed to the presentation surface.
//!
//! Pixels are packed ARGB8888, row-major. The buffer is overwritten completely
//! by every render pass, so it carries no state between frames apart from its
//! allocation.

/// Row-major ARGB8888 pixel grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: Vec<u32>,
    width: u32,
    height: u32,
}

impl FrameBuffer {
    /// Create a buffer of the given size filled with opaque black.
    ///
    /// Zero-sized buffers are allowed here; rendering into one is rejected.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0xFF000000; (width as usize) * (height as usize)],
            width,
            height,
        }
    }

    /// Reallocate for a new surface size. Previous contents are discarded.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.pixels = vec![0xFF000000; (width as usize) * (height as usize)];
        self.width = width;
        self.height = height;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    /// Fill column `x` from row `top` down to, but not including, `bottom`.
    ///
    /// `top` is clamped to 0 and `bottom` to the buffer height. A span with
    /// `top >= bottom` draws nothing.
    #[inline]
    pub fn draw_vertical_line(&mut self, x: u32, top: i32, bottom: i32, color: u32) {
        if x >= self.width {
            return;
        }
        let top = top.max(0);
        let bottom = bottom.min(self.height as i32);
        if top >= bottom {
            return;
        }

        let width = self.width as usize;
        let start = top as usize * width + x as usize;
        let end = bottom as usize * width;
        for idx in (start..end).step_by(width) {
            self.pixels[idx] = color;
        }
    }

    /// Get the color at (x, y), or None if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    /// Pixel bytes in native order, ready for an ARGB8888 streaming texture.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Iterate over the colors of column `x`, top to bottom.
    pub fn column(&self, x: u32) -> impl Iterator<Item = u32> + '_ {
        self.pixels
            .iter()
            .skip(x as usize)
            .step_by(self.width.max(1) as usize)
            .copied()
            .take(if x < self.width { self.height as usize } else { 0 })
    }
}
