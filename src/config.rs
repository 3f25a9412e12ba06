//! Defaults loaded from `~/.config/foto/config.json` (or `--config`).
//! Command line flags override every field.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::image::ResizeFilter;
use crate::renderer::BitDepth;
use crate::shared::constants;

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub depth: BitDepth,
    /// Half-block rendering.
    pub unicode: bool,
    pub background: [u8; 3],
    pub stretch: bool,
    pub filter: ResizeFilter,
    pub hot_reload: bool,
    pub reload_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            depth: BitDepth::Auto,
            unicode: true,
            background: [0, 0, 0],
            stretch: false,
            filter: ResizeFilter::Nearest,
            hot_reload: false,
            reload_interval_ms: constants::RELOAD_INTERVAL_MS,
        }
    }
}

impl Config {
    /// An explicit path must exist; the default path may be missing.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match default_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        if !required && !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(constants::CONFIG_DIR).join(constants::CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = Config::parse(r#"{ "depth": "8", "background": [10, 20, 30] }"#).unwrap();
        assert_eq!(config.depth, BitDepth::Eight);
        assert_eq!(config.background, [10, 20, 30]);
        assert!(config.unicode);
        assert_eq!(config.reload_interval_ms, 1000);
    }

    #[test]
    fn test_filter_names() {
        let config = Config::parse(r#"{ "filter": "catmull-rom" }"#).unwrap();
        assert_eq!(config.filter, ResizeFilter::CatmullRom);
    }

    #[test]
    fn test_rejects_unknown_fields() {
        assert!(Config::parse(r#"{ "colour": 1 }"#).is_err());
        assert!(Config::parse(r#"{ "depth": "16" }"#).is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "stretch": true, "unicode": false }}"#).unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert!(config.stretch);
        assert!(!config.unicode);
    }

    #[test]
    fn test_missing_explicit_path_is_an_error() {
        assert!(Config::load(Some(Path::new("/no/such/foto.json"))).is_err());
    }
}
