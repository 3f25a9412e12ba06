//! SIGUSR1 / SIGUSR2 handling. Both handlers are always installed so a
//! stray signal never kills the viewer in raw mode; a signal that was not
//! enabled is dropped. Handlers only set flags, the viewer loop picks them
//! up with the `take_*` functions.

use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;

static RESIZE_REQUESTED: AtomicBool = AtomicBool::new(false);
static RELOAD_REQUESTED: AtomicBool = AtomicBool::new(false);
static QUIT_REQUESTED: AtomicBool = AtomicBool::new(false);
static RESIZE_ENABLED: AtomicBool = AtomicBool::new(false);
static RELOAD_ENABLED: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
extern "C" fn on_sigusr1(_: libc::c_int) {
    if RESIZE_ENABLED.load(Ordering::SeqCst) {
        RESIZE_REQUESTED.store(true, Ordering::SeqCst);
    }
}

#[cfg(unix)]
extern "C" fn on_sigusr2(_: libc::c_int) {
    if RELOAD_ENABLED.load(Ordering::SeqCst) {
        RELOAD_REQUESTED.store(true, Ordering::SeqCst);
    }
}

#[cfg(unix)]
fn install(signal: libc::c_int, handler: extern "C" fn(libc::c_int)) -> Result<()> {
    // SAFETY: the handler only touches atomics, which is async-signal-safe.
    let previous = unsafe { libc::signal(signal, handler as libc::sighandler_t) };
    if previous == libc::SIG_ERR {
        return Err(std::io::Error::last_os_error().into());
    }
    Ok(())
}

/// Install both handlers; only the enabled signals raise requests.
#[cfg(unix)]
pub fn install_handlers(resize: bool, reload: bool) -> Result<()> {
    RESIZE_ENABLED.store(resize, Ordering::SeqCst);
    RELOAD_ENABLED.store(reload, Ordering::SeqCst);
    install(libc::SIGUSR1, on_sigusr1)?;
    install(libc::SIGUSR2, on_sigusr2)?;
    Ok(())
}

#[cfg(not(unix))]
pub fn install_handlers(resize: bool, reload: bool) -> Result<()> {
    if resize || reload {
        crate::utils::logger::warn("SIGUSR1/SIGUSR2 are not available on this platform");
    }
    Ok(())
}

/// Ctrl-C outside raw mode.
pub fn install_quit_handler() -> Result<()> {
    ctrlc::set_handler(request_quit)?;
    Ok(())
}

pub fn take_resize_request() -> bool {
    RESIZE_REQUESTED.swap(false, Ordering::SeqCst)
}

pub fn take_reload_request() -> bool {
    RELOAD_REQUESTED.swap(false, Ordering::SeqCst)
}

pub fn request_quit() {
    QUIT_REQUESTED.store(true, Ordering::SeqCst);
}

pub fn quit_requested() -> bool {
    QUIT_REQUESTED.load(Ordering::SeqCst)
}

/// Anything a running render should yield to.
pub fn any_pending() -> bool {
    quit_requested()
        || RESIZE_REQUESTED.load(Ordering::SeqCst)
        || RELOAD_REQUESTED.load(Ordering::SeqCst)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    // One test so the global enable flags are not shared between threads.
    #[test]
    fn test_sigusr_flags_follow_enable_switches() {
        // disabled signals are caught and dropped, not fatal
        install_handlers(false, false).unwrap();
        // SAFETY: raising a signal with a flag-only handler installed.
        unsafe { libc::raise(libc::SIGUSR1) };
        unsafe { libc::raise(libc::SIGUSR2) };
        assert!(!take_resize_request());
        assert!(!take_reload_request());
        assert!(!any_pending());

        install_handlers(true, true).unwrap();
        unsafe { libc::raise(libc::SIGUSR2) };
        assert!(take_reload_request());
        assert!(!take_reload_request());

        unsafe { libc::raise(libc::SIGUSR1) };
        assert!(take_resize_request());
    }
}
