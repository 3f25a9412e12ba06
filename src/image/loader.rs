use anyhow::{Context, Result};
use std::path::Path;

use super::surface::{PixelFormat, Surface};
use crate::core::transform::Size;
use crate::shared::constants;
use crate::utils::file_utils;

/// Where the pixels come from and how they are laid out.
#[derive(Clone, Debug)]
pub struct ImageSource {
    pub path: String,
    pub size: Size,
    pub format: PixelFormat,
}

impl ImageSource {
    pub fn is_stdin(&self) -> bool {
        self.path == constants::STDIN_PATH
    }

    /// Read the whole input and wrap it as a surface.
    pub fn load(&self) -> Result<Surface> {
        let data = file_utils::read_input(&self.path)?;
        Surface::from_raw(self.size.width, self.size.height, self.format, data)
            .with_context(|| format!("Failed to load image from {}", display_name(&self.path)))
    }
}

/// Basename used for titles, `stdin` for `-`.
pub fn display_name(path: &str) -> String {
    if path == constants::STDIN_PATH {
        return constants::STDIN_NAME.to_string();
    }
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("-"), "stdin");
        assert_eq!(display_name("/tmp/pics/cat.rgba"), "cat.rgba");
        assert_eq!(display_name("cat.rgba"), "cat.rgba");
    }

    #[test]
    fn test_load_raw_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[255, 0, 0, 255, 0, 255, 0, 255]).unwrap();

        let source = ImageSource {
            path: file.path().to_string_lossy().into_owned(),
            size: Size::new(2, 1),
            format: PixelFormat::Rgba8888,
        };
        let surface = source.load().unwrap();
        assert_eq!(surface.size(), Size::new(2, 1));
        assert!(!source.is_stdin());
    }

    #[test]
    fn test_load_rejects_wrong_length() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[1, 2, 3]).unwrap();

        let source = ImageSource {
            path: file.path().to_string_lossy().into_owned(),
            size: Size::new(2, 2),
            format: PixelFormat::Rgb888,
        };
        let err = source.load().unwrap_err();
        assert!(format!("{:#}", err).contains("expected 12 bytes"));
    }

    #[test]
    fn test_missing_file() {
        let source = ImageSource {
            path: "/definitely/not/here.rgba".into(),
            size: Size::new(1, 1),
            format: PixelFormat::Rgba8888,
        };
        assert!(source.load().is_err());
    }
}
