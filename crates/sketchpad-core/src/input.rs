//! Input events delivered by the host to the canvas.

use crate::tools::Tool;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// One event from the host, in the order the host observed it.
///
/// Serializable so that a session can be scripted and replayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PadEvent {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    PointerLeave,
    SelectTool { tool: Tool },
    Undo,
    Redo,
    Clear,
}

impl PadEvent {
    pub fn down(point: Point) -> Self {
        PadEvent::PointerDown {
            x: point.x,
            y: point.y,
        }
    }

    pub fn moved(point: Point) -> Self {
        PadEvent::PointerMove {
            x: point.x,
            y: point.y,
        }
    }

    /// Pointer position carried by the event, if any.
    pub fn position(&self) -> Option<Point> {
        match self {
            PadEvent::PointerDown { x, y } | PadEvent::PointerMove { x, y } => {
                Some(Point::new(*x, *y))
            }
            _ => None,
        }
    }

    /// Parse a JSON array of events.
    pub fn script_from_json(json: &str) -> Result<Vec<PadEvent>, serde_json::Error> {
        serde_json::from_str(json)
    }
}
