//! Drawable primitives committed to the canvas document.

mod preview;
mod stamp;
mod stroke;

pub use preview::Preview;
pub use stamp::Stamp;
pub use stroke::Stroke;

use crate::surface::Surface;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for drawables.
pub type DrawableId = Uuid;

/// A committed drawing primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Drawable {
    Stroke(Stroke),
    Stamp(Stamp),
}

impl Drawable {
    pub fn id(&self) -> DrawableId {
        match self {
            Drawable::Stroke(s) => s.id(),
            Drawable::Stamp(s) => s.id(),
        }
    }

    /// Paint this drawable. Never mutates the drawable itself.
    pub fn render(&self, surface: &mut dyn Surface) {
        match self {
            Drawable::Stroke(s) => s.render(surface),
            Drawable::Stamp(s) => s.render(surface),
        }
    }

    /// Follow the pointer while this drawable is the active gesture:
    /// strokes grow a point, stamps move.
    pub fn drag_to(&mut self, point: Point) {
        match self {
            Drawable::Stroke(s) => s.append(point),
            Drawable::Stamp(s) => s.reposition(point),
        }
    }

    pub fn as_stroke(&self) -> Option<&Stroke> {
        match self {
            Drawable::Stroke(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_stamp(&self) -> Option<&Stamp> {
        match self {
            Drawable::Stamp(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Stroke> for Drawable {
    fn from(stroke: Stroke) -> Self {
        Drawable::Stroke(stroke)
    }
}

impl From<Stamp> for Drawable {
    fn from(stamp: Stamp) -> Self {
        Drawable::Stamp(stamp)
    }
}
