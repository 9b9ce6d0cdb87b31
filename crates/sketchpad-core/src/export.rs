//! Offscreen export abstraction.

use crate::surface::Surface;

/// Produces offscreen surfaces and encodes them into image bytes.
///
/// [`Canvas::export`](crate::Canvas::export) drives the backend: it asks for
/// a surface, paints the document onto it and hands it back for encoding.
pub trait ExportBackend {
    type Surface: Surface;
    type Error;

    /// Create a blank surface of `width` x `height` device pixels.
    fn create_surface(&mut self, width: u32, height: u32) -> Result<Self::Surface, Self::Error>;

    /// Encode a painted surface.
    fn encode(&mut self, surface: Self::Surface) -> Result<Vec<u8>, Self::Error>;
}
