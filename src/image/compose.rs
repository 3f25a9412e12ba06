use anyhow::{anyhow, Result};
use fast_image_resize as fr;
use fr::images::Image;
use rayon::prelude::*;

use super::surface::{PixelFormat, Surface};
use crate::core::transform::{Rect, Size, Transform};
use crate::renderer::color::Color;

/// How the image is placed on the target.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum FitMode {
    /// Preserve aspect ratio, pad with background.
    #[default]
    Letterbox,
    /// Fill the target, distorting if needed.
    Stretch,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, clap::ValueEnum, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeFilter {
    #[default]
    Nearest,
    Bilinear,
    CatmullRom,
    Lanczos3,
}

impl ResizeFilter {
    fn algorithm(self) -> Option<fr::ResizeAlg> {
        let filter = match self {
            ResizeFilter::Nearest => return None,
            ResizeFilter::Bilinear => fr::FilterType::Bilinear,
            ResizeFilter::CatmullRom => fr::FilterType::CatmullRom,
            ResizeFilter::Lanczos3 => fr::FilterType::Lanczos3,
        };
        Some(fr::ResizeAlg::Convolution(filter))
    }
}

/// Scales an image onto a background-filled canvas of the target size.
pub struct Compositor {
    pub fit: FitMode,
    pub filter: ResizeFilter,
    pub background: Color,
    resizer: fr::Resizer,
}

impl Compositor {
    pub fn new(fit: FitMode, filter: ResizeFilter, background: Color) -> Self {
        Self {
            fit,
            filter,
            background: Color { a: 0xff, ..background },
            resizer: fr::Resizer::new(),
        }
    }

    pub fn transform(&self, image: Size, target: Size) -> Transform {
        match self.fit {
            FitMode::Letterbox => Transform::letterbox(image, target),
            FitMode::Stretch => Transform::stretch(target),
        }
    }

    /// Build an `Rgba8888` canvas of `target` size with `image` placed on it.
    pub fn compose(&mut self, image: &Surface, target: Size) -> Result<Surface> {
        let mut canvas = Surface::filled(target, self.background);
        if target.is_empty() || image.size().is_empty() {
            return Ok(canvas);
        }

        let converted;
        let image = if image.format() == PixelFormat::Rgba8888 {
            image
        } else {
            converted = image.to_rgba();
            &converted
        };

        let transform = self.transform(image.size(), target);
        let rect = clip(transform.dest_rect(), target);
        if rect.width == 0 || rect.height == 0 {
            return Ok(canvas);
        }

        let scaled = match self.filter.algorithm() {
            Some(alg) => self.resample(image, rect, alg)?,
            None => self.sample_nearest(image, &transform, rect)?,
        };

        let background = self.background;
        let row_bytes = rect.width as usize * 4;
        let stride = canvas.stride();
        canvas
            .bytes_mut()
            .par_chunks_mut(stride)
            .enumerate()
            .skip(rect.y as usize)
            .take(rect.height as usize)
            .for_each(|(y, line)| {
                let src_row = &scaled[(y - rect.y as usize) * row_bytes..][..row_bytes];
                let dst_row = &mut line[rect.x as usize * 4..][..row_bytes];
                for (src, dst) in src_row.chunks_exact(4).zip(dst_row.chunks_exact_mut(4)) {
                    let c = Color::rgba(src[0], src[1], src[2], src[3]).over(background);
                    dst.copy_from_slice(&[c.r, c.g, c.b, c.a]);
                }
            });

        Ok(canvas)
    }

    fn resample(&mut self, image: &Surface, rect: Rect, alg: fr::ResizeAlg) -> Result<Vec<u8>> {
        let src_image = Image::from_vec_u8(
            image.width(),
            image.height(),
            image.bytes().to_vec(),
            fr::PixelType::U8x4,
        )?;
        let mut dst_image = Image::new(rect.width, rect.height, fr::PixelType::U8x4);
        let options = fr::ResizeOptions::new().resize_alg(alg);
        self.resizer.resize(&src_image, &mut dst_image, &options)?;
        Ok(dst_image.buffer().to_vec())
    }

    fn sample_nearest(&self, image: &Surface, transform: &Transform, rect: Rect) -> Result<Vec<u8>> {
        let lock = image
            .try_lock()
            .ok_or_else(|| anyhow!("image surface is locked"))?;
        let (max_x, max_y) = (image.width() - 1, image.height() - 1);
        let (ratio_x, ratio_y) = (
            image.width() as f64 / rect.width as f64,
            image.height() as f64 / rect.height as f64,
        );
        let fit = self.fit;
        let background = self.background;

        let mut scaled = vec![0u8; rect.width as usize * rect.height as usize * 4];
        scaled
            .par_chunks_mut(rect.width as usize * 4)
            .enumerate()
            .for_each(|(dy, row)| {
                let y = rect.y + dy as u32;
                for (dx, px) in row.chunks_exact_mut(4).enumerate() {
                    let x = rect.x + dx as u32;
                    let (sx, sy) = match fit {
                        FitMode::Letterbox => {
                            let p = transform.source_point(x, y);
                            (p.x as u32, p.y as u32)
                        }
                        FitMode::Stretch => (
                            ((dx as f64 + 0.5) * ratio_x) as u32,
                            ((dy as f64 + 0.5) * ratio_y) as u32,
                        ),
                    };
                    let c = lock.pixel(sx.min(max_x), sy.min(max_y)).unwrap_or(background);
                    px.copy_from_slice(&[c.r, c.g, c.b, c.a]);
                }
            });

        Ok(scaled)
    }
}

fn clip(rect: Rect, bounds: Size) -> Rect {
    let x = rect.x.min(bounds.width);
    let y = rect.y.min(bounds.height);
    Rect {
        x,
        y,
        width: rect.width.min(bounds.width - x),
        height: rect.height.min(bounds.height - y),
    }
}
