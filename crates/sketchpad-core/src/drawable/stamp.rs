//! Sticker stamp.

use super::DrawableId;
use crate::color::InkColor;
use crate::surface::Surface;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A sticker glyph placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stamp {
    pub(crate) id: DrawableId,
    /// Center of the glyph.
    pub position: Point,
    pub glyph: String,
    pub font_size: f64,
}

impl Stamp {
    pub fn new(position: Point, glyph: impl Into<String>, font_size: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            glyph: glyph.into(),
            font_size,
        }
    }

    pub fn id(&self) -> DrawableId {
        self.id
    }

    /// Move the stamp while it is still being placed.
    pub fn reposition(&mut self, point: Point) {
        self.position = point;
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        surface.fill_text(
            &self.glyph,
            self.position,
            self.font_size,
            InkColor::BLACK.into(),
        );
    }
}
