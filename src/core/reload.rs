use anyhow::Result;
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime};

use crate::utils::file_utils;

/// Polls a file's modification time, at most once per `interval`.
pub struct ReloadWatcher {
    path: PathBuf,
    interval: Duration,
    last_checked: Instant,
    prev_mtime: Option<SystemTime>,
}

impl ReloadWatcher {
    /// The current mtime is the baseline, so the first poll does not
    /// report the load that just happened.
    pub fn new(path: impl Into<PathBuf>, interval: Duration) -> Result<Self> {
        let path = path.into();
        let prev_mtime = Some(file_utils::modified_time(&path)?);
        Ok(Self {
            path,
            interval,
            last_checked: Instant::now(),
            prev_mtime,
        })
    }

    /// `Ok(true)` when the file changed since the last check. A file that
    /// can no longer be stat'ed is an error.
    pub fn poll(&mut self) -> Result<bool> {
        self.poll_at(Instant::now())
    }

    fn poll_at(&mut self, now: Instant) -> Result<bool> {
        if now.duration_since(self.last_checked) < self.interval {
            return Ok(false);
        }
        self.last_checked = now;

        let mtime = file_utils::modified_time(&self.path)?;
        if self.prev_mtime != Some(mtime) {
            self.prev_mtime = Some(mtime);
            return Ok(true);
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn set_mtime(path: &std::path::Path, secs_from_epoch: u64) {
        let file = File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs_from_epoch))
            .unwrap();
    }

    #[test]
    fn test_detects_modification_after_interval() {
        let file = tempfile::NamedTempFile::new().unwrap();
        set_mtime(file.path(), 1_000);
        let mut watcher = ReloadWatcher::new(file.path(), Duration::from_millis(1000)).unwrap();
        let start = watcher.last_checked;

        set_mtime(file.path(), 2_000);
        // too early, not even stat'ed
        assert!(!watcher.poll_at(start + Duration::from_millis(500)).unwrap());
        assert!(watcher.poll_at(start + Duration::from_millis(1000)).unwrap());
        // reported once
        assert!(!watcher.poll_at(start + Duration::from_millis(2500)).unwrap());
    }

    #[test]
    fn test_unchanged_file_is_quiet() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut watcher = ReloadWatcher::new(file.path(), Duration::ZERO).unwrap();
        assert!(!watcher.poll().unwrap());
    }

    #[test]
    fn test_deleted_file_is_an_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();
        let mut watcher = ReloadWatcher::new(&path, Duration::ZERO).unwrap();
        drop(file);
        assert!(watcher.poll().is_err());
    }
}
