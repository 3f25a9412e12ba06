pub const APP_NAME: &str = "foto";

pub const CONFIG_DIR: &str = "foto";
pub const CONFIG_FILE: &str = "config.json";
pub const LOG_ENV_VAR: &str = "FOTO_LOG";

/// Hot-reload checks the file's mtime at most this often.
pub const RELOAD_INTERVAL_MS: u64 = 1000;

/// Idle wait between event-loop iterations when nothing needs drawing.
pub const IDLE_POLL_MS: u64 = 100;

pub const STDIN_PATH: &str = "-";
pub const STDIN_NAME: &str = "stdin";

pub const ESC_RESET: &[u8] = b"\x1b[0m";
pub const ESC_CLEAR_SCREEN: &[u8] = b"\x1b[2J";
pub const ESC_WRAP_OFF: &str = "\x1b[?7l";
pub const ESC_WRAP_ON: &str = "\x1b[?7h";

/// U+2584 LOWER HALF BLOCK
pub const LOWER_HALF_BLOCK: &str = "\u{2584}";
