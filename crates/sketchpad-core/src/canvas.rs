//! Canvas document and pointer state management.

use crate::color::InkColor;
use crate::config::PadConfig;
use crate::drawable::{Drawable, Preview, Stamp, Stroke};
use crate::export::ExportBackend;
use crate::input::PadEvent;
use crate::surface::Surface;
use crate::tools::{Tool, ToolPalette};
use kurbo::{Affine, Point};
use std::fmt;

/// Committed drawables plus the redo buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanvasDocument {
    /// Drawables in z-order (back to front).
    drawables: Vec<Drawable>,
    /// Undone drawables; the last entry is redone first.
    redo_stack: Vec<Drawable>,
}

impl CanvasDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit a new drawable. Redo history does not survive a new commit.
    pub fn push(&mut self, drawable: Drawable) {
        self.redo_stack.clear();
        self.drawables.push(drawable);
    }

    /// Undo the newest drawable.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.drawables.pop() {
            Some(drawable) => {
                self.redo_stack.push(drawable);
                true
            }
            None => false,
        }
    }

    /// Redo the last undone drawable.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.redo_stack.pop() {
            Some(drawable) => {
                self.drawables.push(drawable);
                true
            }
            None => false,
        }
    }

    /// Drop every drawable and the redo history.
    pub fn clear(&mut self) {
        self.drawables.clear();
        self.redo_stack.clear();
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.drawables.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Drawables in paint order.
    pub fn drawables(&self) -> &[Drawable] {
        &self.drawables
    }

    /// Undone drawables, oldest undo first.
    pub fn redo_buffer(&self) -> &[Drawable] {
        &self.redo_stack
    }

    pub(crate) fn newest_mut(&mut self) -> Option<&mut Drawable> {
        self.drawables.last_mut()
    }

    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }

    /// Paint every drawable, oldest first.
    pub fn render(&self, surface: &mut dyn Surface) {
        for drawable in &self.drawables {
            drawable.render(surface);
        }
    }
}

/// Whether a pointer gesture is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerState {
    /// Not drawing; the preview follows the cursor.
    #[default]
    Idle,
    /// A gesture is extending the newest drawable.
    Active,
}

/// Read-only snapshot handed to the redraw routine.
#[derive(Debug, Clone, Copy)]
pub struct CanvasView<'a> {
    pub document: &'a CanvasDocument,
    pub preview: Option<&'a Preview>,
    pub background: InkColor,
}

impl CanvasView<'_> {
    /// Full repaint: background, drawables oldest first, preview on top.
    pub fn paint(&self, surface: &mut dyn Surface) {
        surface.clear(self.background.into());
        self.document.render(surface);
        if let Some(preview) = self.preview {
            preview.render(surface);
        }
    }
}

type ChangeHandler = Box<dyn FnMut(&CanvasView<'_>)>;

/// The drawing controller: document, history, current tool and gesture state.
///
/// Every mutating operation returns whether anything changed, and fires the
/// change handler (if set) synchronously before returning.
pub struct Canvas {
    document: CanvasDocument,
    tool: Tool,
    state: PointerState,
    preview: Option<Preview>,
    config: PadConfig,
    on_change: Option<ChangeHandler>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(PadConfig::default())
    }
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("document", &self.document)
            .field("tool", &self.tool)
            .field("state", &self.state)
            .field("preview", &self.preview)
            .field("has_change_handler", &self.on_change.is_some())
            .finish()
    }
}

impl Canvas {
    /// Create a canvas whose initial tool is the first palette entry.
    pub fn new(config: PadConfig) -> Self {
        let tool = ToolPalette::from_config(&config).default_tool();
        Self {
            document: CanvasDocument::new(),
            tool,
            state: PointerState::Idle,
            preview: None,
            config,
            on_change: None,
        }
    }

    /// Subscribe the redraw routine. Replaces any previous handler.
    pub fn set_change_handler(&mut self, handler: impl FnMut(&CanvasView<'_>) + 'static) {
        self.on_change = Some(Box::new(handler));
    }

    pub fn clear_change_handler(&mut self) {
        self.on_change = None;
    }

    pub fn document(&self) -> &CanvasDocument {
        &self.document
    }

    pub fn tool(&self) -> &Tool {
        &self.tool
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn state(&self) -> PointerState {
        self.state
    }

    pub fn is_drawing(&self) -> bool {
        self.state == PointerState::Active
    }

    pub fn config(&self) -> &PadConfig {
        &self.config
    }

    pub fn can_undo(&self) -> bool {
        self.document.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.document.can_redo()
    }

    pub fn view(&self) -> CanvasView<'_> {
        CanvasView {
            document: &self.document,
            preview: self.preview.as_ref(),
            background: self.config.background,
        }
    }

    /// Repaint the whole canvas onto `surface`.
    pub fn redraw(&self, surface: &mut dyn Surface) {
        self.view().paint(surface);
    }

    fn notify(&mut self) {
        if let Some(handler) = self.on_change.as_mut() {
            let view = CanvasView {
                document: &self.document,
                preview: self.preview.as_ref(),
                background: self.config.background,
            };
            handler(&view);
        }
    }

    /// Freeze the active drawable, if any.
    fn end_gesture(&mut self) -> bool {
        if self.state == PointerState::Active {
            self.state = PointerState::Idle;
            log::debug!("Gesture ended with {} drawables", self.document.len());
            true
        } else {
            false
        }
    }

    /// Start a new drawable at `point` with the current tool.
    pub fn pointer_down(&mut self, point: Point) -> bool {
        self.end_gesture();

        let drawable: Drawable = match &self.tool {
            Tool::Pen { thickness, color } => Stroke::new(point, *thickness, *color).into(),
            Tool::Sticker { glyph } => {
                Stamp::new(point, glyph.clone(), self.config.stamp_font_size).into()
            }
        };
        log::debug!("Gesture started at ({}, {})", point.x, point.y);

        self.document.push(drawable);
        self.preview = None;
        self.state = PointerState::Active;
        self.notify();
        true
    }

    /// Extend the active drawable, or move the preview when idle.
    pub fn pointer_move(&mut self, point: Point) -> bool {
        match self.state {
            PointerState::Active => match self.document.newest_mut() {
                Some(drawable) => drawable.drag_to(point),
                None => {
                    self.state = PointerState::Idle;
                    return false;
                }
            },
            PointerState::Idle => match self.preview.as_mut() {
                Some(preview) => preview.reposition(point),
                None => {
                    self.preview = Some(Preview::new(
                        point,
                        self.tool.clone(),
                        self.config.preview_opacity,
                        self.config.stamp_font_size,
                    ));
                }
            },
        }
        self.notify();
        true
    }

    /// Finish the gesture. The last move already painted the final state,
    /// so no change is signalled.
    pub fn pointer_up(&mut self) -> bool {
        self.end_gesture()
    }

    /// Leaving the surface ends any gesture for good; when idle it hides the
    /// preview.
    pub fn pointer_leave(&mut self) -> bool {
        if self.end_gesture() {
            return true;
        }
        if self.preview.take().is_some() {
            self.notify();
            return true;
        }
        false
    }

    /// Move the newest drawable to the redo buffer.
    pub fn undo(&mut self) -> bool {
        self.end_gesture();
        if !self.document.undo() {
            return false;
        }
        log::debug!("Undo: {} drawables remain", self.document.len());
        self.notify();
        true
    }

    /// Restore the most recently undone drawable.
    pub fn redo(&mut self) -> bool {
        self.end_gesture();
        if !self.document.redo() {
            return false;
        }
        log::debug!("Redo: {} drawables", self.document.len());
        self.notify();
        true
    }

    /// Empty the document and the redo buffer.
    pub fn clear(&mut self) -> bool {
        self.end_gesture();
        self.document.clear();
        log::debug!("Canvas cleared");
        self.notify();
        true
    }

    /// Change the tool for the next gesture. A visible preview is updated
    /// immediately.
    pub fn select_tool(&mut self, tool: Tool) -> bool {
        log::debug!("Tool selected: {:?}", tool);
        self.tool = tool;
        let Some(preview) = self.preview.as_mut() else {
            return false;
        };
        preview.retool(self.tool.clone());
        self.notify();
        true
    }

    /// Dispatch one host event.
    pub fn handle_event(&mut self, event: PadEvent) -> bool {
        match event {
            PadEvent::PointerDown { x, y } => self.pointer_down(Point::new(x, y)),
            PadEvent::PointerMove { x, y } => self.pointer_move(Point::new(x, y)),
            PadEvent::PointerUp => self.pointer_up(),
            PadEvent::PointerLeave => self.pointer_leave(),
            PadEvent::SelectTool { tool } => self.select_tool(tool),
            PadEvent::Undo => self.undo(),
            PadEvent::Redo => self.redo(),
            PadEvent::Clear => self.clear(),
        }
    }

    /// Dispatch events in order; returns how many changed something.
    pub fn replay(&mut self, events: impl IntoIterator<Item = PadEvent>) -> usize {
        events
            .into_iter()
            .map(|event| self.handle_event(event))
            .filter(|changed| *changed)
            .count()
    }

    /// Render the document (never the preview) at `resolution` x `resolution`
    /// and encode it. The native canvas is scaled uniformly to fit.
    pub fn export<B: ExportBackend>(
        &self,
        backend: &mut B,
        resolution: u32,
    ) -> Result<Vec<u8>, B::Error> {
        let mut surface = backend.create_surface(resolution, resolution)?;
        let scale = f64::from(resolution) / f64::from(self.config.canvas_size);

        surface.clear(self.config.background.into());
        surface.set_transform(Affine::scale(scale));
        self.document.render(&mut surface);

        log::info!(
            "Exporting {} drawables at {}x{} (scale {})",
            self.document.len(),
            resolution,
            resolution,
            scale
        );
        backend.encode(surface)
    }
}
