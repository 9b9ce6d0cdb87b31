//! Cursor preview of the selected tool.

use crate::color::InkColor;
use crate::surface::Surface;
use crate::tools::Tool;
use kurbo::{Circle, Point};

/// Translucent indicator of what the next pointer-down would create.
///
/// Lives outside the document: it is never undone, redone or exported.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub position: Point,
    pub tool: Tool,
    /// Global alpha applied while painting the preview.
    pub opacity: f64,
    /// Font size used for sticker previews.
    pub sticker_size: f64,
}

impl Preview {
    pub fn new(position: Point, tool: Tool, opacity: f64, sticker_size: f64) -> Self {
        Self {
            position,
            tool,
            opacity,
            sticker_size,
        }
    }

    pub fn reposition(&mut self, point: Point) {
        self.position = point;
    }

    pub fn retool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    /// Paint at reduced opacity, restoring full opacity afterwards.
    pub fn render(&self, surface: &mut dyn Surface) {
        surface.set_global_alpha(self.opacity);
        match &self.tool {
            Tool::Pen { thickness, color } => {
                surface.fill_circle(Circle::new(self.position, thickness / 2.0), (*color).into());
            }
            Tool::Sticker { glyph } => {
                surface.fill_text(
                    glyph,
                    self.position,
                    self.sticker_size,
                    InkColor::BLACK.into(),
                );
            }
        }
        surface.set_global_alpha(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DisplayList, DrawOp};

    #[test]
    fn test_pen_preview_is_translucent_disc() {
        let tool = Tool::Pen {
            thickness: 10.0,
            color: InkColor::BLACK,
        };
        let preview = Preview::new(Point::new(30.0, 40.0), tool, 0.5, 32.0);
        let mut list = DisplayList::new(256.0, 256.0);
        preview.render(&mut list);
        assert_eq!(
            list.ops(),
            &[
                DrawOp::SetGlobalAlpha(0.5),
                DrawOp::FillCircle {
                    center: Point::new(30.0, 40.0),
                    radius: 5.0,
                    color: InkColor::BLACK,
                },
                DrawOp::SetGlobalAlpha(1.0),
            ]
        );
    }

    #[test]
    fn test_retool_and_reposition() {
        let tool = Tool::Pen {
            thickness: 3.0,
            color: InkColor::BLACK,
        };
        let mut preview = Preview::new(Point::ZERO, tool, 0.5, 32.0);
        preview.retool(Tool::Sticker {
            glyph: "🎈".to_string(),
        });
        preview.reposition(Point::new(5.0, 6.0));

        let mut list = DisplayList::new(256.0, 256.0);
        preview.render(&mut list);
        assert!(list.ops().contains(&DrawOp::FillText {
            text: "🎈".to_string(),
            center: Point::new(5.0, 6.0),
            font_size: 32.0,
            color: InkColor::BLACK,
        }));
    }
}
