//! PNG export backend.

use crate::raster::RasterSurface;
use crate::renderer::{RenderError, RenderResult};
use ab_glyph::FontArc;
use sketchpad_core::ExportBackend;

/// Encode RGBA8 pixel data to PNG bytes.
pub fn encode_png(rgba_data: &[u8], width: u32, height: u32) -> RenderResult<Vec<u8>> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(rgba_data)?;
        writer.finish()?;
    }
    Ok(png_data)
}

/// Renders exports with [`RasterSurface`] and encodes them as PNG.
#[derive(Clone, Default)]
pub struct PngExporter {
    font: Option<FontArc>,
}

impl std::fmt::Debug for PngExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PngExporter")
            .field("has_font", &self.font.is_some())
            .finish()
    }
}

impl PngExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Font used for stamps; without one, stamps are left out of the image.
    pub fn with_font(mut self, font: FontArc) -> Self {
        self.font = Some(font);
        self
    }
}

impl ExportBackend for PngExporter {
    type Surface = RasterSurface;
    type Error = RenderError;

    fn create_surface(&mut self, width: u32, height: u32) -> RenderResult<RasterSurface> {
        let surface = RasterSurface::new(width, height)?;
        Ok(match &self.font {
            Some(font) => surface.with_font(font.clone()),
            None => surface,
        })
    }

    fn encode(&mut self, surface: RasterSurface) -> RenderResult<Vec<u8>> {
        let (width, height) = (surface.width(), surface.height());
        let bytes = encode_png(surface.data(), width, height)?;
        log::info!("PNG export complete: {} bytes", bytes.len());
        Ok(bytes)
    }
}
