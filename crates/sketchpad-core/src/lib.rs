//! SketchPad Core Library
//!
//! Platform-agnostic drawing model for the SketchPad canvas: drawables,
//! the undo/redo history, the pointer state machine and the redraw protocol.

pub mod canvas;
pub mod color;
pub mod config;
pub mod drawable;
pub mod export;
pub mod input;
pub mod surface;
pub mod tools;

pub use canvas::{Canvas, CanvasDocument, CanvasView, PointerState};
pub use color::InkColor;
pub use config::{ConfigError, MarkerPreset, PadConfig};
pub use drawable::{Drawable, DrawableId, Preview, Stamp, Stroke};
pub use export::ExportBackend;
pub use input::PadEvent;
pub use surface::{DisplayList, DrawOp, Surface};
pub use tools::{Tool, ToolError, ToolPalette};

pub use kurbo::Point;
