pub mod reload;
pub mod transform;
pub mod viewer;

pub use transform::Size;
pub use viewer::{run_viewer, ViewOptions};
