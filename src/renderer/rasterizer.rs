//! Paints a 32-bit surface into a character-cell terminal with ANSI escapes.
//!
//! With half blocks enabled each cell covers two source rows: the cell
//! background is the upper pixel and a lower-half-block glyph drawn in the
//! foreground color is the lower one.

use std::io::Write;

use super::color::Color;
use super::quantizer;
use crate::image::surface::{Surface, SurfaceLock};
use crate::shared::constants;

/// Color resolution targeted by the emitted escapes.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, clap::ValueEnum, serde::Deserialize)]
pub enum BitDepth {
    /// Resolved from the environment before rendering.
    #[default]
    #[value(name = "auto")]
    #[serde(rename = "auto")]
    Auto,
    #[value(name = "4")]
    #[serde(rename = "4")]
    Four,
    #[value(name = "8")]
    #[serde(rename = "8")]
    Eight,
    #[value(name = "24")]
    #[serde(rename = "24")]
    TrueColor,
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("surface has {0} bits per pixel, expected 32")]
    UnsupportedFormat(u32),
    #[error("surface has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },
    #[error("surface is already locked")]
    Locked,
    #[error("pixel ({x}, {y}) could not be read")]
    PixelRead { x: u32, y: u32 },
    #[error("terminal write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// How a render call ended.
#[derive(Debug)]
pub enum RenderOutcome {
    Succeeded,
    /// The poll callback asked to stop.
    Aborted,
    Failed(RenderError),
}

#[cfg(test)]
impl RenderOutcome {
    pub fn is_succeeded(&self) -> bool {
        matches!(self, RenderOutcome::Succeeded)
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, RenderOutcome::Aborted)
    }
}

const REQUIRED_BITS_PER_PIXEL: u32 = 32;

pub struct TerminalRasterizer {
    pub unicode: bool,
    pub depth: BitDepth,
    /// Top-left cell of the image, zero based (column, row).
    pub origin: (u16, u16),
    /// Pre-allocated row buffer
    render_buffer: Vec<u8>,
}

impl TerminalRasterizer {
    pub fn new(unicode: bool, depth: BitDepth) -> Self {
        Self {
            unicode,
            depth,
            origin: (0, 0),
            render_buffer: Vec::with_capacity(64 * 1024),
        }
    }

    pub fn with_origin(mut self, column: u16, row: u16) -> Self {
        self.origin = (column, row);
        self
    }

    /// Paint `surface` to `out`, polling `keep_going` once per column.
    ///
    /// Every exit path ends the stream with a style reset and flushes it.
    pub fn render<W, F>(&mut self, surface: &Surface, out: &mut W, mut keep_going: F) -> RenderOutcome
    where
        W: Write,
        F: FnMut() -> bool,
    {
        let mut buffer = std::mem::take(&mut self.render_buffer);
        buffer.clear();

        let painted = match surface.try_lock() {
            Some(lock) => self.paint(surface, &lock, &mut buffer, out, &mut keep_going),
            None => Err(RenderError::Locked),
        };

        let outcome = match painted {
            Ok(completed) => {
                buffer.extend_from_slice(constants::ESC_RESET);
                match out.write_all(&buffer).and_then(|_| out.flush()) {
                    Ok(()) if completed => RenderOutcome::Succeeded,
                    Ok(()) => RenderOutcome::Aborted,
                    Err(e) => RenderOutcome::Failed(e.into()),
                }
            }
            Err(e) => {
                // whatever was buffered belongs to a half-written row
                let _ = out.write_all(constants::ESC_RESET);
                let _ = out.flush();
                RenderOutcome::Failed(e)
            }
        };

        self.render_buffer = buffer;
        outcome
    }

    /// Returns `Ok(false)` when aborted. Complete rows are written to `out`
    /// as they finish; a partial row is left in `buffer`.
    fn paint<W, F>(
        &self,
        surface: &Surface,
        lock: &SurfaceLock<'_>,
        buffer: &mut Vec<u8>,
        out: &mut W,
        keep_going: &mut F,
    ) -> Result<bool, RenderError>
    where
        W: Write,
        F: FnMut() -> bool,
    {
        let bits = surface.format().bits_per_pixel();
        if bits != REQUIRED_BITS_PER_PIXEL {
            return Err(RenderError::UnsupportedFormat(bits));
        }
        let (width, height) = (surface.width(), surface.height());
        if width == 0 || height == 0 {
            return Err(RenderError::Empty { width, height });
        }

        let y_step = if self.unicode { 2 } else { 1 };
        let read = |x: u32, y: u32| lock.pixel(x, y).ok_or(RenderError::PixelRead { x, y });

        for y in (0..height).step_by(y_step) {
            let mut last_bg: Option<u32> = None;
            let mut last_fg: Option<u32> = None;

            for x in 0..width {
                if !keep_going() {
                    return Ok(false);
                }

                let bg = read(x, y)?;

                // the terminal advances the cursor by itself after the first cell
                if x == 0 {
                    self.push_cursor(buffer, x, y / y_step as u32);
                }

                if last_bg != Some(bg.to_u32()) {
                    last_bg = Some(bg.to_u32());
                    self.push_color(buffer, bg, false);
                }

                if self.unicode {
                    let fg = if y + 1 < height { read(x, y + 1)? } else { bg };
                    if fg.to_u32() != bg.to_u32() {
                        if last_fg != Some(fg.to_u32()) {
                            last_fg = Some(fg.to_u32());
                            self.push_color(buffer, fg, true);
                        }
                        buffer.extend_from_slice(constants::LOWER_HALF_BLOCK.as_bytes());
                        continue;
                    }
                }
                buffer.push(b' ');
            }

            buffer.extend_from_slice(constants::ESC_RESET);
            out.write_all(buffer)?;
            buffer.clear();
        }

        Ok(true)
    }

    fn push_cursor(&self, buffer: &mut Vec<u8>, column: u32, row: u32) {
        buffer.extend_from_slice(b"\x1b[");
        write_u32_fast(buffer, row + self.origin.1 as u32 + 1);
        buffer.push(b';');
        write_u32_fast(buffer, column + self.origin.0 as u32 + 1);
        buffer.push(b'H');
    }

    fn push_color(&self, buffer: &mut Vec<u8>, color: Color, foreground: bool) {
        buffer.extend_from_slice(if foreground { b"\x1b[3" } else { b"\x1b[4" });
        match self.depth {
            BitDepth::Four => {
                buffer.extend_from_slice(b"8;5;");
                write_u8_fast(buffer, quantizer::to_4bit(color));
            }
            BitDepth::Eight => {
                buffer.extend_from_slice(b"8;5;");
                write_u8_fast(buffer, quantizer::to_8bit(color));
            }
            BitDepth::TrueColor => {
                buffer.extend_from_slice(b"8;2;");
                write_u8_fast(buffer, color.r);
                buffer.push(b';');
                write_u8_fast(buffer, color.g);
                buffer.push(b';');
                write_u8_fast(buffer, color.b);
            }
            // depth should have been resolved by the caller
            BitDepth::Auto => buffer.push(b'0'),
        }
        buffer.push(b'm');
    }
}

// Helper for zero-allocation integer writing
#[inline(always)]
fn write_u8_fast(buffer: &mut Vec<u8>, mut n: u8) {
    if n >= 100 {
        buffer.push(b'0' + (n / 100));
        n %= 100;
        buffer.push(b'0' + (n / 10));
        n %= 10;
    } else if n >= 10 {
        buffer.push(b'0' + (n / 10));
        n %= 10;
    }
    buffer.push(b'0' + n);
}

#[inline(always)]
fn write_u32_fast(buffer: &mut Vec<u8>, n: u32) {
    let mut digits = [0u8; 10];
    let mut i = digits.len();
    let mut n = n;
    loop {
        i -= 1;
        digits[i] = b'0' + (n % 10) as u8;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    buffer.extend_from_slice(&digits[i..]);
}
