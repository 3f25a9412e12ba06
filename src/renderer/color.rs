/// Represents an 8-bit-per-channel RGBA color
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Packed form for cheap equality checks in hot loops.
    #[inline(always)]
    pub fn to_u32(self) -> u32 {
        u32::from_be_bytes([self.r, self.g, self.b, self.a])
    }

    /// Blend `self` over an opaque `background` using straight alpha.
    pub fn over(self, background: Color) -> Color {
        match self.a {
            0xff => self,
            0 => background,
            a => {
                let a = a as u32;
                let mix = |fg: u8, bg: u8| ((fg as u32 * a + bg as u32 * (255 - a) + 127) / 255) as u8;
                Color::rgb(
                    mix(self.r, background.r),
                    mix(self.g, background.g),
                    mix(self.b, background.b),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_equality_includes_alpha() {
        assert_eq!(Color::rgb(1, 2, 3).to_u32(), 0x010203ff);
        assert_ne!(Color::rgba(1, 2, 3, 0).to_u32(), Color::rgb(1, 2, 3).to_u32());
    }

    #[test]
    fn test_over_blends_against_background() {
        let bg = Color::rgb(0, 0, 255);
        assert_eq!(Color::rgb(255, 0, 0).over(bg), Color::rgb(255, 0, 0));
        assert_eq!(Color::rgba(255, 0, 0, 0).over(bg), bg);
        assert_eq!(Color::rgba(255, 0, 0, 128).over(bg), Color::rgb(128, 0, 127));
    }
}
