use anyhow::{Context, Result};
use std::fs;
use std::io::Read;
use std::path::Path;
use std::time::SystemTime;

use crate::shared::constants;

/// Read a whole file, or standard input for `-`.
pub fn read_input(path: &str) -> Result<Vec<u8>> {
    if path == constants::STDIN_PATH {
        let mut data = Vec::new();
        std::io::stdin()
            .lock()
            .read_to_end(&mut data)
            .context("Failed to read standard input")?;
        return Ok(data);
    }
    read_file(Path::new(path))
}

pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read file: {:?}", path))
}

pub fn modified_time(path: &Path) -> Result<SystemTime> {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .with_context(|| format!("stat: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_file_and_mtime() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"abc").unwrap();
        assert_eq!(read_file(file.path()).unwrap(), b"abc");
        assert!(modified_time(file.path()).is_ok());
        assert!(modified_time(Path::new("/no/such/file")).is_err());
    }
}
