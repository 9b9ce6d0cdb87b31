//! Drawing surface abstraction.

use crate::color::InkColor;
use kurbo::{Affine, BezPath, Circle, PathEl, Point, Size, Stroke};
use peniko::Color;

/// A 2D drawing target, shaped after an immediate-mode canvas context.
///
/// Drawables only ever touch the surface through this trait. Transform and
/// global alpha are transient paint state; they persist until changed.
pub trait Surface {
    /// Size of the surface in device pixels.
    fn size(&self) -> Size;

    /// Reset the transform and global alpha, then fill everything with `background`.
    fn clear(&mut self, background: Color);

    /// Replace the current transform.
    fn set_transform(&mut self, transform: Affine);

    /// Opacity multiplied into every subsequent paint operation.
    fn set_global_alpha(&mut self, alpha: f64);

    /// Stroke `path` with the given stroke geometry and color.
    fn stroke_path(&mut self, path: &BezPath, stroke: &Stroke, color: Color);

    /// Fill a disc.
    fn fill_circle(&mut self, circle: Circle, color: Color);

    /// Draw `text` centered horizontally and vertically on `center`.
    fn fill_text(&mut self, text: &str, center: Point, font_size: f64, color: Color);
}

/// One recorded paint operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear {
        background: InkColor,
    },
    SetTransform(Affine),
    SetGlobalAlpha(f64),
    StrokePath {
        path: BezPath,
        width: f64,
        color: InkColor,
    },
    FillCircle {
        center: Point,
        radius: f64,
        color: InkColor,
    },
    FillText {
        text: String,
        center: Point,
        font_size: f64,
        color: InkColor,
    },
}

/// Surface that records operations instead of painting them.
#[derive(Debug, Clone)]
pub struct DisplayList {
    size: Size,
    ops: Vec<DrawOp>,
}

impl DisplayList {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: Size::new(width, height),
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Total line segments across all stroked paths.
    pub fn segment_count(&self) -> usize {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::StrokePath { path, .. } => Some(path),
                _ => None,
            })
            .map(|path| {
                path.elements()
                    .iter()
                    .filter(|el| matches!(el, PathEl::LineTo(_)))
                    .count()
            })
            .sum()
    }

    /// Operations that put ink on the surface (strokes, discs, text).
    pub fn paint_ops(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| {
            matches!(
                op,
                DrawOp::StrokePath { .. } | DrawOp::FillCircle { .. } | DrawOp::FillText { .. }
            )
        })
    }
}

impl Surface for DisplayList {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self, background: Color) {
        self.ops.clear();
        self.ops.push(DrawOp::Clear {
            background: background.into(),
        });
    }

    fn set_transform(&mut self, transform: Affine) {
        self.ops.push(DrawOp::SetTransform(transform));
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.ops.push(DrawOp::SetGlobalAlpha(alpha));
    }

    fn stroke_path(&mut self, path: &BezPath, stroke: &Stroke, color: Color) {
        self.ops.push(DrawOp::StrokePath {
            path: path.clone(),
            width: stroke.width,
            color: color.into(),
        });
    }

    fn fill_circle(&mut self, circle: Circle, color: Color) {
        self.ops.push(DrawOp::FillCircle {
            center: circle.center,
            radius: circle.radius,
            color: color.into(),
        });
    }

    fn fill_text(&mut self, text: &str, center: Point, font_size: f64, color: Color) {
        self.ops.push(DrawOp::FillText {
            text: text.to_string(),
            center,
            font_size,
            color: color.into(),
        });
    }
}
