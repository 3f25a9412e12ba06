use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{bail, Result};

use crate::core::transform::Size;
use crate::renderer::color::Color;

/// Byte layout of one pixel.
#[derive(Copy, Clone, PartialEq, Eq, Debug, clap::ValueEnum)]
pub enum PixelFormat {
    /// r, g, b, a
    #[value(name = "rgba")]
    Rgba8888,
    /// b, g, r, a
    #[value(name = "bgra")]
    Bgra8888,
    /// r, g, b
    #[value(name = "rgb")]
    Rgb888,
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgba8888 | PixelFormat::Bgra8888 => 4,
            PixelFormat::Rgb888 => 3,
        }
    }

    pub fn bits_per_pixel(self) -> u32 {
        self.bytes_per_pixel() as u32 * 8
    }

    #[inline(always)]
    fn decode(self, px: &[u8]) -> Color {
        match self {
            PixelFormat::Rgba8888 => Color::rgba(px[0], px[1], px[2], px[3]),
            PixelFormat::Bgra8888 => Color::rgba(px[2], px[1], px[0], px[3]),
            PixelFormat::Rgb888 => Color::rgb(px[0], px[1], px[2]),
        }
    }
}

/// Row-major pixel buffer with an exclusive-access flag.
#[derive(Debug)]
pub struct Surface {
    width: u32,
    height: u32,
    stride: usize,
    format: PixelFormat,
    data: Vec<u8>,
    locked: AtomicBool,
}

impl Surface {
    /// Wrap tightly packed pixel bytes.
    pub fn from_raw(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Result<Self> {
        let stride = width as usize * format.bytes_per_pixel();
        let expected = stride * height as usize;
        if data.len() != expected {
            bail!(
                "expected {} bytes for {}x{} {:?} pixels, got {}",
                expected,
                width,
                height,
                format,
                data.len()
            );
        }
        Ok(Self {
            width,
            height,
            stride,
            format,
            data,
            locked: AtomicBool::new(false),
        })
    }

    /// Solid `Rgba8888` surface.
    pub fn filled(size: Size, color: Color) -> Self {
        let pixel = [color.r, color.g, color.b, color.a];
        let data = pixel.repeat(size.width as usize * size.height as usize);
        Self {
            width: size.width,
            height: size.height,
            stride: size.width as usize * 4,
            format: PixelFormat::Rgba8888,
            data,
            locked: AtomicBool::new(false),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Take exclusive read access for the guard's lifetime.
    ///
    /// Returns `None` while another guard is alive.
    pub fn try_lock(&self) -> Option<SurfaceLock<'_>> {
        self.locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| SurfaceLock { surface: self })
    }

    /// Copy of the pixels in `Rgba8888` order.
    pub fn to_rgba(&self) -> Surface {
        if self.format == PixelFormat::Rgba8888 {
            return Self {
                width: self.width,
                height: self.height,
                stride: self.stride,
                format: self.format,
                data: self.data.clone(),
                locked: AtomicBool::new(false),
            };
        }

        let bpp = self.format.bytes_per_pixel();
        let mut data = Vec::with_capacity(self.width as usize * self.height as usize * 4);
        let rows: &[u8] = if self.stride == 0 { &[] } else { &self.data };
        for row in rows.chunks_exact(self.stride.max(1)) {
            for px in row.chunks_exact(bpp) {
                let c = self.format.decode(px);
                data.extend_from_slice(&[c.r, c.g, c.b, c.a]);
            }
        }
        Self {
            width: self.width,
            height: self.height,
            stride: self.width as usize * 4,
            format: PixelFormat::Rgba8888,
            data,
            locked: AtomicBool::new(false),
        }
    }
}

/// Scoped exclusive access to a [`Surface`]. Unlocks on drop.
pub struct SurfaceLock<'a> {
    surface: &'a Surface,
}

impl SurfaceLock<'_> {
    /// Bounds-checked pixel read.
    #[inline(always)]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let s = self.surface;
        if x >= s.width || y >= s.height {
            return None;
        }
        let bpp = s.format.bytes_per_pixel();
        let offset = y as usize * s.stride + x as usize * bpp;
        s.data.get(offset..offset + bpp).map(|px| s.format.decode(px))
    }
}

impl Drop for SurfaceLock<'_> {
    fn drop(&mut self) {
        self.surface.locked.store(false, Ordering::Release);
    }
}
