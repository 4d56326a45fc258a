//! Colors in ARGB8888 format, the layout the SDL streaming texture expects.

/// Sky/fog fill drawn behind the terrain.
pub const SKY: u32 = 0xFF9090E0;

/// Ground color of the placeholder map shown before any map is loaded.
pub const DEFAULT_GROUND: u32 = 0xFF507000;

/// Pack 8-bit channels into an opaque ARGB8888 value.
#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    0xFF00_0000 | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_packs_channels_opaque() {
        assert_eq!(rgb(0x50, 0x70, 0x00), DEFAULT_GROUND);
        assert_eq!(rgb(0, 0, 0), 0xFF000000);
    }
}
