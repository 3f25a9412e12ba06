use serde::Serialize;
use std::env;
use std::io::IsTerminal;

use crate::renderer::BitDepth;

/// What the current terminal can show, as far as the environment tells.
#[derive(Debug, Serialize)]
pub struct TerminalInfo {
    pub os_name: String,
    pub terminal: String,
    pub columns: u16,
    pub rows: u16,
    pub is_tty: bool,
    pub supports_truecolor: bool,
    pub supports_256color: bool,
    pub supports_unicode: bool,
    pub depth: String,
}

impl TerminalInfo {
    pub fn detect() -> Self {
        let (columns, rows) = crossterm::terminal::size().unwrap_or((80, 24));
        let depth = resolve_depth(BitDepth::Auto);

        Self {
            os_name: env::consts::OS.to_string(),
            terminal: detect_terminal(),
            columns,
            rows,
            is_tty: std::io::stdout().is_terminal(),
            supports_truecolor: detect_truecolor(),
            supports_256color: detect_256color(),
            supports_unicode: detect_unicode(),
            depth: depth_name(depth).to_string(),
        }
    }
}

/// Replace `Auto` with the best depth the environment advertises.
pub fn resolve_depth(depth: BitDepth) -> BitDepth {
    if depth != BitDepth::Auto {
        return depth;
    }
    depth_from_env(env::var("COLORTERM").ok().as_deref(), env::var("TERM").ok().as_deref())
}

fn depth_from_env(colorterm: Option<&str>, term: Option<&str>) -> BitDepth {
    if colorterm.is_some_and(|v| v.contains("truecolor") || v.contains("24bit")) {
        BitDepth::TrueColor
    } else if term.is_some_and(|v| v.contains("256color")) {
        BitDepth::Eight
    } else {
        BitDepth::Four
    }
}

pub fn depth_name(depth: BitDepth) -> &'static str {
    match depth {
        BitDepth::Auto => "auto",
        BitDepth::Four => "4",
        BitDepth::Eight => "8",
        BitDepth::TrueColor => "24",
    }
}

fn detect_terminal() -> String {
    if let Ok(term) = env::var("TERM_PROGRAM") {
        return term;
    }
    if let Ok(term) = env::var("TERM") {
        return term;
    }
    "Unknown".to_string()
}

fn detect_truecolor() -> bool {
    env::var("COLORTERM")
        .map(|v| v.contains("truecolor") || v.contains("24bit"))
        .unwrap_or(false)
}

fn detect_256color() -> bool {
    env::var("TERM").map(|v| v.contains("256color")).unwrap_or(false)
}

fn detect_unicode() -> bool {
    ["LC_ALL", "LC_CTYPE", "LANG"]
        .iter()
        .filter_map(|key| env::var(key).ok())
        .find(|v| !v.is_empty())
        .map(|v| v.to_uppercase().contains("UTF-8") || v.to_uppercase().contains("UTF8"))
        .unwrap_or(false)
}
