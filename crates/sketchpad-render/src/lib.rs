//! SketchPad Render Library
//!
//! Software implementation of the core `Surface` trait and the PNG export
//! backend built on it.

mod export;
mod raster;
mod renderer;

pub use export::{PngExporter, encode_png};
pub use raster::{RasterSurface, load_font};
pub use renderer::{MAX_SURFACE_SIZE, RenderError, RenderResult};
