use lazy_static::lazy_static;
use std::backtrace::Backtrace;
use std::fs::OpenOptions;
use std::io::Write;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::shared::constants;

#[derive(Clone, Default)]
struct LoggerState {
    log_path: Option<PathBuf>,
    /// Mirror warnings and errors to stderr (off while the alternate screen is up).
    echo: bool,
}

lazy_static! {
    static ref LOGGER: Mutex<LoggerState> = Mutex::new(LoggerState::default());
}

fn append_line(path: &Path, line: &str) {
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
        let _ = writeln!(file, "{}", line);
    }
}

/// Start logging to `path`, falling back to `$FOTO_LOG`. Without either,
/// only the stderr echo and the panic hook are active.
pub fn init(path: Option<PathBuf>) {
    let log_path = path.or_else(|| std::env::var_os(constants::LOG_ENV_VAR).map(PathBuf::from));

    if let Some(path) = &log_path {
        if let Ok(mut file) = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
        {
            let _ = writeln!(
                file,
                "=== {} log started: {} ===",
                constants::APP_NAME,
                chrono::Local::now()
            );
        }
    }

    if let Ok(mut state) = LOGGER.lock() {
        state.log_path = log_path.clone();
        state.echo = true;
    }

    panic::set_hook(Box::new(move |info| {
        let backtrace = Backtrace::capture();
        let msg = match info.payload().downcast_ref::<&str>() {
            Some(s) => *s,
            None => match info.payload().downcast_ref::<String>() {
                Some(s) => &s[..],
                None => "Box<Any>",
            },
        };

        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "unknown".to_string());

        // Restore the terminal first so the message is readable
        crate::renderer::display::restore_terminal();

        let error_msg = format!(
            "\nCRITICAL PANIC at {}:\nMessage: {}\nBacktrace:\n{:?}\n",
            location, msg, backtrace
        );
        match &log_path {
            Some(path) => {
                append_line(path, &error_msg);
                eprintln!("{} crashed. See {} for details.", constants::APP_NAME, path.display());
            }
            None => eprintln!("{}", error_msg),
        }
    }));
}

/// Toggle mirroring of warnings and errors to stderr.
pub fn set_echo(echo: bool) {
    if let Ok(mut state) = LOGGER.lock() {
        state.echo = echo;
    }
}

pub fn log(level: &str, msg: &str) {
    let Ok(state) = LOGGER.lock() else {
        return;
    };

    if let Some(path) = &state.log_path {
        let timestamp = chrono::Local::now().format("%H:%M:%S%.3f");
        append_line(path, &format!("[{}][{}] {}", timestamp, level, msg));
    }

    if state.echo && (level == "ERROR" || level == "WARN") {
        eprintln!("{}: {}", constants::APP_NAME, msg);
    }
}

pub fn info(msg: &str) {
    log("INFO", msg);
}

pub fn warn(msg: &str) {
    log("WARN", msg);
}

pub fn error(msg: &str) {
    log("ERROR", msg);
}

pub fn debug(msg: &str) {
    log("DEBUG", msg);
}
