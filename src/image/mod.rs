pub mod compose;
pub mod loader;
pub mod surface;

pub use compose::{Compositor, FitMode, ResizeFilter};
pub use loader::ImageSource;
pub use surface::{PixelFormat, Surface};
