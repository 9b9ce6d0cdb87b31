//! SketchPad Application
//!
//! Shells around the core canvas: a headless replay runner for native
//! builds and a `<canvas>`-backed handle for the browser.

mod error;
mod replay;
mod shortcuts;

pub use error::{AppError, AppResult};
pub use replay::{ReplayOptions, ReplaySummary, load_script, run as run_replay};
pub use shortcuts::{Shortcut, ShortcutRegistry};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{CanvasExporter, CanvasSurface, SketchPad};
