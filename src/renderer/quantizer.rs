//! Nearest-color mapping onto the 16 and 256 color terminal palettes.
//!
//! Palette tables are built once on first use and read-only afterwards.

use lazy_static::lazy_static;

use super::color::Color;

/// Per-axis levels of the xterm 6x6x6 cube: 0, 95, 135, 175, 215, 255
const fn cube_level(n: u8) -> u8 {
    if n == 0 {
        0
    } else {
        40 * n + 55
    }
}

lazy_static! {
    /// 4-bit ANSI palette, codes 0-15.
    pub static ref PALETTE_4BIT: [Color; 16] = build_4bit();
    /// 8-bit palette without the first 16 entries, codes 16-255.
    pub static ref PALETTE_8BIT: Vec<Color> = build_8bit();
}

fn build_4bit() -> [Color; 16] {
    let mut table = [Color::BLACK; 16];
    for (i, entry) in table.iter_mut().enumerate() {
        let n = if i & 0x8 != 0 { 0xff } else { 0x80 };
        let channel = |bit: usize| if i & bit != 0 { n } else { 0x00 };
        *entry = Color::rgb(channel(0x1), channel(0x2), channel(0x4));
    }
    // bright black is the dim white, plain white is silver
    table[8] = table[7];
    table[7] = Color::rgb(0xc0, 0xc0, 0xc0);
    table
}

fn build_8bit() -> Vec<Color> {
    let mut table = Vec::with_capacity(240);
    for r in 0..6 {
        for g in 0..6 {
            for b in 0..6 {
                table.push(Color::rgb(cube_level(r), cube_level(g), cube_level(b)));
            }
        }
    }
    for level in (8..=238u8).step_by(10) {
        table.push(Color::rgb(level, level, level));
    }
    table
}

/// Squared euclidean distance over r, g and b. Alpha is ignored.
#[inline(always)]
pub fn distance(a: Color, b: Color) -> u32 {
    let sq = |x: u8, y: u8| {
        let d = x as i32 - y as i32;
        (d * d) as u32
    };
    sq(a.r, b.r) + sq(a.g, b.g) + sq(a.b, b.b)
}

/// Index of the closest palette entry. Ties go to the lowest index.
///
/// An empty palette yields 0.
pub fn nearest_index(color: Color, palette: &[Color]) -> usize {
    let mut closest = 0;
    let mut closest_dist = u32::MAX;
    for (i, &entry) in palette.iter().enumerate() {
        let dist = distance(color, entry);
        if dist < closest_dist {
            closest = i;
            closest_dist = dist;
        }
    }
    closest
}

/// Terminal color code in 0..=15
pub fn to_4bit(color: Color) -> u8 {
    nearest_index(color, &PALETTE_4BIT[..]) as u8
}

/// Terminal color code in 16..=255
pub fn to_8bit(color: Color) -> u8 {
    (nearest_index(color, &PALETTE_8BIT) + 16) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_4bit_table_layout() {
        let table = &*PALETTE_4BIT;
        assert_eq!(table[0], Color::rgb(0, 0, 0));
        assert_eq!(table[1], Color::rgb(0x80, 0, 0));
        assert_eq!(table[4], Color::rgb(0, 0, 0x80));
        assert_eq!(table[7], Color::rgb(0xc0, 0xc0, 0xc0));
        assert_eq!(table[8], Color::rgb(0x80, 0x80, 0x80));
        assert_eq!(table[9], Color::rgb(0xff, 0, 0));
        assert_eq!(table[15], Color::rgb(0xff, 0xff, 0xff));
    }

    #[test]
    fn test_8bit_table_layout() {
        let table = &*PALETTE_8BIT;
        assert_eq!(table.len(), 240);
        assert_eq!(table[0], Color::rgb(0, 0, 0));
        // blue varies fastest
        assert_eq!(table[1], Color::rgb(0, 0, 95));
        assert_eq!(table[6], Color::rgb(0, 95, 0));
        assert_eq!(table[36], Color::rgb(95, 0, 0));
        assert_eq!(table[215], Color::rgb(255, 255, 255));
        assert_eq!(table[216], Color::rgb(8, 8, 8));
        assert_eq!(table[239], Color::rgb(238, 238, 238));
    }

    #[test]
    fn test_black_and_white_4bit() {
        assert_eq!(to_4bit(Color::rgb(0, 0, 0)), 0);
        assert_eq!(to_4bit(Color::rgb(255, 255, 255)), 15);
        assert_eq!(to_4bit(Color::rgb(0xc0, 0xc0, 0xc0)), 7);
        assert_eq!(to_4bit(Color::rgb(250, 10, 10)), 9);
    }

    #[test]
    fn test_8bit_codes_are_offset() {
        assert_eq!(to_8bit(Color::rgb(0, 0, 0)), 16);
        assert_eq!(to_8bit(Color::rgb(255, 255, 255)), 231);
        assert_eq!(to_8bit(Color::rgb(255, 0, 0)), 196);
        assert_eq!(to_8bit(Color::rgb(128, 128, 128)), 16 + 216 + 12);
    }

    #[test]
    fn test_alpha_is_ignored() {
        assert_eq!(to_4bit(Color::rgba(255, 255, 255, 0)), 15);
        assert_eq!(distance(Color::rgba(1, 2, 3, 0), Color::rgba(1, 2, 3, 255)), 0);
    }

    #[test]
    fn test_ties_prefer_lowest_index() {
        let palette = [Color::rgb(0, 0, 0), Color::rgb(20, 0, 0), Color::rgb(0, 0, 0)];
        assert_eq!(nearest_index(Color::rgb(10, 0, 0), &palette), 0);
        assert_eq!(nearest_index(Color::rgb(20, 0, 0), &palette), 1);
    }

    #[test]
    fn test_result_is_never_beaten() {
        for r in (0..=255u16).step_by(17) {
            for g in (0..=255u16).step_by(51) {
                for b in (0..=255u16).step_by(85) {
                    let c = Color::rgb(r as u8, g as u8, b as u8);
                    for palette in [&PALETTE_4BIT[..], &PALETTE_8BIT[..]] {
                        let best = distance(c, palette[nearest_index(c, palette)]);
                        assert!(palette.iter().all(|&p| best <= distance(c, p)));
                    }
                }
            }
        }
    }

    #[test]
    fn test_empty_palette() {
        assert_eq!(nearest_index(Color::rgb(1, 1, 1), &[]), 0);
    }
}
