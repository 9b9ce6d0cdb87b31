//! WebAssembly entry point and the `<canvas>` surface.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use kurbo::{Affine, BezPath, Cap, Circle, Join, PathEl, Point, Size, Stroke};
use peniko::Color;
use sketchpad_core::{Canvas, ExportBackend, InkColor, PadConfig, Surface, Tool, ToolPalette};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::shortcuts::ShortcutRegistry;

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

fn css(color: Color) -> String {
    InkColor::from(color).to_hex()
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;
    Ok(ctx)
}

/// Canvas calls only fail on invalid arguments; log instead of aborting a repaint.
fn check(result: Result<(), JsValue>, op: &str) {
    if let Err(e) = result {
        log::warn!("Canvas {} failed: {:?}", op, e);
    }
}

/// [`Surface`] backed by a `CanvasRenderingContext2d`.
#[derive(Debug, Clone)]
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = context_2d(&canvas)?;
        Ok(Self { canvas, ctx })
    }

    pub fn element(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> Size {
        Size::new(f64::from(self.canvas.width()), f64::from(self.canvas.height()))
    }

    fn clear(&mut self, background: Color) {
        check(self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0), "reset transform");
        self.ctx.set_global_alpha(1.0);
        let size = self.size();
        self.ctx.set_fill_style_str(&css(background));
        self.ctx.fill_rect(0.0, 0.0, size.width, size.height);
    }

    fn set_transform(&mut self, transform: Affine) {
        let [a, b, c, d, e, f] = transform.as_coeffs();
        check(self.ctx.set_transform(a, b, c, d, e, f), "set_transform");
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.ctx.set_global_alpha(alpha);
    }

    fn stroke_path(&mut self, path: &BezPath, stroke: &Stroke, color: Color) {
        self.ctx.begin_path();
        for el in path.elements() {
            match *el {
                PathEl::MoveTo(p) => self.ctx.move_to(p.x, p.y),
                PathEl::LineTo(p) => self.ctx.line_to(p.x, p.y),
                PathEl::QuadTo(c, p) => self.ctx.quadratic_curve_to(c.x, c.y, p.x, p.y),
                PathEl::CurveTo(c1, c2, p) => {
                    self.ctx.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y)
                }
                PathEl::ClosePath => self.ctx.close_path(),
            }
        }
        self.ctx.set_line_width(stroke.width);
        self.ctx.set_line_cap(match stroke.start_cap {
            Cap::Butt => "butt",
            Cap::Square => "square",
            Cap::Round => "round",
        });
        self.ctx.set_line_join(match stroke.join {
            Join::Bevel => "bevel",
            Join::Miter => "miter",
            Join::Round => "round",
        });
        self.ctx.set_stroke_style_str(&css(color));
        self.ctx.stroke();
    }

    fn fill_circle(&mut self, circle: Circle, color: Color) {
        self.ctx.begin_path();
        check(
            self.ctx.arc(
                circle.center.x,
                circle.center.y,
                circle.radius,
                0.0,
                std::f64::consts::TAU,
            ),
            "arc",
        );
        self.ctx.set_fill_style_str(&css(color));
        self.ctx.fill();
    }

    fn fill_text(&mut self, text: &str, center: Point, font_size: f64, color: Color) {
        self.ctx.set_font(&format!("{font_size}px sans-serif"));
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        self.ctx.set_fill_style_str(&css(color));
        check(self.ctx.fill_text(text, center.x, center.y), "fill_text");
    }
}

/// Export backend drawing onto a detached `<canvas>` and reading back its PNG data URL.
#[derive(Debug, Clone)]
pub struct CanvasExporter {
    document: web_sys::Document,
}

impl CanvasExporter {
    pub fn new() -> Result<Self, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        Ok(Self { document })
    }
}

impl ExportBackend for CanvasExporter {
    type Surface = CanvasSurface;
    type Error = JsValue;

    fn create_surface(&mut self, width: u32, height: u32) -> Result<CanvasSurface, JsValue> {
        if width == 0 || height == 0 {
            return Err(JsValue::from_str("export size must be positive"));
        }
        let canvas: HtmlCanvasElement = self.document.create_element("canvas")?.dyn_into()?;
        canvas.set_width(width);
        canvas.set_height(height);
        CanvasSurface::new(canvas)
    }

    fn encode(&mut self, surface: CanvasSurface) -> Result<Vec<u8>, JsValue> {
        let url = surface.element().to_data_url_with_type("image/png")?;
        let data = url
            .strip_prefix(PNG_DATA_URL_PREFIX)
            .ok_or_else(|| JsValue::from_str("canvas did not produce a PNG data URL"))?;
        let bytes = STANDARD
            .decode(data)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!("PNG export complete: {} bytes", bytes.len());
        Ok(bytes)
    }
}

/// A sketch pad attached to a `<canvas>` element.
///
/// Pointer coordinates are in canvas pixels, relative to the element's
/// top-left corner.
#[wasm_bindgen]
pub struct SketchPad {
    canvas: Canvas,
    palette: ToolPalette,
}

#[wasm_bindgen]
impl SketchPad {
    /// Attach to the canvas with id `canvas_id`. `config_json` overrides the
    /// default settings.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, config_json: Option<String>) -> Result<SketchPad, JsValue> {
        let config = match config_json {
            Some(json) => PadConfig::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => PadConfig::default(),
        };

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let element: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id '{canvas_id}'")))?
            .dyn_into()?;
        element.set_width(config.canvas_size);
        element.set_height(config.canvas_size);

        let mut surface = CanvasSurface::new(element)?;
        let palette = ToolPalette::from_config(&config);
        let mut canvas = Canvas::new(config);
        canvas.redraw(&mut surface);
        canvas.set_change_handler(move |view| view.paint(&mut surface));

        log::info!("SketchPad attached to #{}", canvas_id);
        Ok(SketchPad { canvas, palette })
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) -> bool {
        self.canvas.pointer_down(Point::new(x, y))
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.canvas.pointer_move(Point::new(x, y))
    }

    pub fn pointer_up(&mut self) -> bool {
        self.canvas.pointer_up()
    }

    pub fn pointer_leave(&mut self) -> bool {
        self.canvas.pointer_leave()
    }

    /// Select a pen. `color` is a CSS hex color.
    pub fn select_pen(&mut self, thickness: f64, color: &str) -> Result<(), JsValue> {
        let color = InkColor::parse_hex(color)
            .ok_or_else(|| JsValue::from_str(&format!("invalid color '{color}'")))?;
        let tool = Tool::pen(thickness, color).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.canvas.select_tool(tool);
        Ok(())
    }

    pub fn select_sticker(&mut self, glyph: &str) -> Result<(), JsValue> {
        let tool = Tool::sticker(glyph).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.canvas.select_tool(tool);
        Ok(())
    }

    /// Select the palette entry at `index`. Returns false for an unknown index.
    pub fn select_palette(&mut self, index: usize) -> bool {
        match self.palette.get(index) {
            Some(tool) => {
                self.canvas.select_tool(tool.clone());
                true
            }
            None => false,
        }
    }

    /// Labels of the palette entries, in order.
    pub fn palette_labels(&self) -> js_sys::Array {
        self.palette
            .entries()
            .iter()
            .map(|e| JsValue::from_str(&e.label))
            .collect()
    }

    /// Add a sticker to the palette and select it.
    pub fn add_custom_sticker(&mut self, text: &str) -> Result<(), JsValue> {
        let tool = self
            .palette
            .add_custom_sticker(text)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.canvas.select_tool(tool);
        Ok(())
    }

    pub fn undo(&mut self) -> bool {
        self.canvas.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.canvas.redo()
    }

    pub fn clear(&mut self) -> bool {
        self.canvas.clear()
    }

    pub fn can_undo(&self) -> bool {
        self.canvas.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.canvas.can_redo()
    }

    /// Run the command bound to a key press. Returns whether the canvas changed.
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool) -> bool {
        match ShortcutRegistry::lookup(key, ctrl, shift) {
            Some(event) => self.canvas.handle_event(event),
            None => false,
        }
    }

    /// Encode the document as PNG; `resolution` defaults to the configured export size.
    pub fn export_png(&self, resolution: Option<u32>) -> Result<Vec<u8>, JsValue> {
        let resolution = resolution.unwrap_or(self.canvas.config().export_size);
        let mut exporter = CanvasExporter::new()?;
        self.canvas.export(&mut exporter, resolution)
    }
}

/// Initialize logging for the WASM build.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&JsValue::from_str(&e.to_string()));
    }
    log::info!("SketchPad (WASM) loaded");
}
