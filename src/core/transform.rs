/// Integer dimensions of an image or a target surface.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Zero components become 1 so aspect ratios never divide by zero.
    pub fn to_vec2_clamped(self) -> Vec2 {
        Vec2 {
            x: self.width.max(1) as f64,
            y: self.height.max(1) as f64,
        }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

/// Integer placement of the drawn image inside the target.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// How an image maps onto a target: uniform scale plus centering offset.
///
/// Equality is exact float comparison. Callers compare the last drawn
/// transform with a freshly computed one to skip redundant redraws.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Transform {
    pub translate: Vec2,
    pub drawn_size: Vec2,
    pub scale: f64,
    pub inverse_scale: f64,
}

impl Transform {
    /// Fit `image` inside `target` without cropping or distortion.
    ///
    /// A relatively wider image fits to width (bars above and below),
    /// anything else, equal aspect ratios included, fits to height.
    pub fn letterbox(image: Size, target: Size) -> Self {
        let image = image.to_vec2_clamped();
        let target = target.to_vec2_clamped();

        if image.x / image.y > target.x / target.y {
            let scale = target.x / image.x;
            let drawn_height = image.y * scale;
            Self {
                translate: Vec2 {
                    x: 0.0,
                    y: (target.y - drawn_height) / 2.0,
                },
                drawn_size: Vec2 {
                    x: target.x,
                    y: drawn_height,
                },
                scale,
                inverse_scale: image.x / target.x,
            }
        } else {
            let scale = target.y / image.y;
            let drawn_width = image.x * scale;
            Self {
                translate: Vec2 {
                    x: (target.x - drawn_width) / 2.0,
                    y: 0.0,
                },
                drawn_size: Vec2 {
                    x: drawn_width,
                    y: target.y,
                },
                scale,
                inverse_scale: image.y / target.y,
            }
        }
    }

    /// Cover the whole target, ignoring the image's aspect ratio.
    pub fn stretch(target: Size) -> Self {
        let target = target.to_vec2_clamped();
        Self {
            translate: Vec2::default(),
            drawn_size: target,
            scale: 1.0,
            inverse_scale: 1.0,
        }
    }

    /// Rounded destination rectangle, never smaller than 1x1.
    pub fn dest_rect(&self) -> Rect {
        Rect {
            x: self.translate.x.round().max(0.0) as u32,
            y: self.translate.y.round().max(0.0) as u32,
            width: (self.drawn_size.x.round() as u32).max(1),
            height: (self.drawn_size.y.round() as u32).max(1),
        }
    }

    /// Image-space coordinates of the centre of target pixel `(x, y)`.
    pub fn source_point(&self, x: u32, y: u32) -> Vec2 {
        Vec2 {
            x: (x as f64 + 0.5 - self.translate.x) * self.inverse_scale,
            y: (y as f64 + 0.5 - self.translate.y) * self.inverse_scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_fits(image: Size, target: Size) {
        let t = Transform::letterbox(image, target);
        let (tw, th) = (target.width as f64, target.height as f64);

        assert!(t.drawn_size.x == tw || t.drawn_size.y == th, "{:?}", t);
        assert!(t.drawn_size.x <= tw + 1e-9);
        assert!(t.drawn_size.y <= th + 1e-9);
        assert!(t.translate.x >= 0.0 && t.translate.y >= 0.0);
        assert!(t.translate.x + t.drawn_size.x <= tw + 1e-9);
        assert!(t.translate.y + t.drawn_size.y <= th + 1e-9);
        assert!((t.scale * t.inverse_scale - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_wide_image_fits_to_width() {
        let t = Transform::letterbox(Size::new(100, 50), Size::new(200, 200));
        assert_eq!(t.scale, 2.0);
        assert_eq!(t.inverse_scale, 0.5);
        assert_eq!(t.drawn_size, Vec2 { x: 200.0, y: 100.0 });
        assert_eq!(t.translate, Vec2 { x: 0.0, y: 50.0 });
    }

    #[test]
    fn test_tall_image_fits_to_height() {
        let t = Transform::letterbox(Size::new(50, 100), Size::new(200, 200));
        assert_eq!(t.scale, 2.0);
        assert_eq!(t.drawn_size, Vec2 { x: 100.0, y: 200.0 });
        assert_eq!(t.translate, Vec2 { x: 50.0, y: 0.0 });
    }

    #[test]
    fn test_equal_aspect_takes_height_branch() {
        let t = Transform::letterbox(Size::new(40, 20), Size::new(80, 40));
        assert_eq!(t.translate, Vec2 { x: 0.0, y: 0.0 });
        assert_eq!(t.drawn_size, Vec2 { x: 80.0, y: 40.0 });
        // inverse scale comes from the height axis
        assert_eq!(t.inverse_scale, 20.0 / 40.0);
    }

    #[test]
    fn test_fit_properties_hold_across_shapes() {
        let sizes = [1, 2, 3, 7, 16, 33, 100, 641, 1920];
        for &iw in &sizes {
            for &ih in &sizes {
                check_fits(Size::new(iw, ih), Size::new(80, 48));
                check_fits(Size::new(iw, ih), Size::new(13, 211));
            }
        }
    }

    #[test]
    fn test_zero_dimensions_are_clamped() {
        let t = Transform::letterbox(Size::new(0, 0), Size::new(0, 10));
        assert!(t.scale.is_finite());
        assert!(t.inverse_scale.is_finite());
        assert!(!t.translate.x.is_nan() && !t.translate.y.is_nan());
    }

    #[test]
    fn test_identical_inputs_compare_equal() {
        let a = Transform::letterbox(Size::new(123, 77), Size::new(80, 48));
        let b = Transform::letterbox(Size::new(123, 77), Size::new(80, 48));
        assert_eq!(a, b);
        assert_ne!(a, Transform::letterbox(Size::new(123, 77), Size::new(81, 48)));
    }

    #[test]
    fn test_dest_rect_rounds_placement() {
        let t = Transform::letterbox(Size::new(100, 50), Size::new(200, 201));
        let rect = t.dest_rect();
        assert_eq!(rect.width, 200);
        assert_eq!(rect.height, 100);
        assert_eq!(rect.x, 0);
        // 50.5 rounds away from zero
        assert_eq!(rect.y, 51);
    }

    #[test]
    fn test_source_point_maps_back_into_image() {
        let t = Transform::letterbox(Size::new(100, 50), Size::new(200, 200));
        let p = t.source_point(0, 50);
        assert_eq!(p, Vec2 { x: 0.25, y: 0.25 });
        let p = t.source_point(199, 149);
        assert!(p.x < 100.0 && p.y < 50.0);
    }

    #[test]
    fn test_stretch_covers_target() {
        let t = Transform::stretch(Size::new(30, 12));
        assert_eq!(
            t.dest_rect(),
            Rect {
                x: 0,
                y: 0,
                width: 30,
                height: 12
            }
        );
    }
}
