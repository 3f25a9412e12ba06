pub mod args;
pub mod file_utils;
pub mod logger;
pub mod platform;
pub mod signals;
pub mod terminal_control;
