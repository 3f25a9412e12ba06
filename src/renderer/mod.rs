pub mod color;
pub mod display;
pub mod quantizer;
pub mod rasterizer;

pub use rasterizer::{BitDepth, RenderOutcome, TerminalRasterizer};
