//! Anti-aliased software rasterizer.

use crate::renderer::{MAX_SURFACE_SIZE, RenderError, RenderResult};
use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use kurbo::{Affine, BezPath, Cap, Circle, PathEl, Point, Size, Stroke, Vec2};
use peniko::Color;
use sketchpad_core::Surface;

/// Flattening tolerance in device pixels.
const FLATTEN_TOLERANCE: f64 = 0.1;

/// Load a TrueType/OpenType font for stamp rendering.
pub fn load_font(bytes: Vec<u8>) -> RenderResult<FontArc> {
    FontArc::try_from_vec(bytes).map_err(|e| RenderError::Font(e.to_string()))
}

/// Distance from a point to a line segment (a→b).
fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    (pv - seg * t).hypot()
}

/// How one end of a flattened segment is finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegmentEnd {
    /// Round cap, or a join with the neighbouring segment.
    Round,
    Butt,
    Square,
}

impl From<Cap> for SegmentEnd {
    fn from(cap: Cap) -> Self {
        match cap {
            Cap::Round => SegmentEnd::Round,
            Cap::Butt => SegmentEnd::Butt,
            Cap::Square => SegmentEnd::Square,
        }
    }
}

/// A device-space line segment of a stroked path.
#[derive(Debug, Clone, Copy)]
struct Segment {
    a: Point,
    b: Point,
    start: SegmentEnd,
    end: SegmentEnd,
}

impl Segment {
    /// Coverage of the pixel centered on `p` by a stroke of half width `half`.
    fn coverage(&self, p: Point, half: f64) -> f64 {
        if self.start == SegmentEnd::Round && self.end == SegmentEnd::Round {
            return (half + 0.5 - point_to_segment_dist(p, self.a, self.b)).clamp(0.0, 1.0);
        }
        let seg = self.b - self.a;
        let len = seg.hypot();
        // a flat cap on a zero-length segment has no direction
        if len < f64::EPSILON {
            return 0.0;
        }
        let dir = seg / len;
        let pv = p - self.a;
        let along = pv.dot(dir);
        let across = pv.cross(dir).abs();

        let mut dist = across;
        let mut limit = 1.0f64;
        for (overshoot, end) in [(-along, self.start), (along - len, self.end)] {
            match end {
                SegmentEnd::Round => {
                    if overshoot > 0.0 {
                        dist = overshoot.hypot(across);
                    }
                }
                SegmentEnd::Butt => limit = limit.min((0.5 - overshoot).clamp(0.0, 1.0)),
                SegmentEnd::Square => {
                    limit = limit.min((half + 0.5 - overshoot).clamp(0.0, 1.0));
                }
            }
        }
        (half + 0.5 - dist).clamp(0.0, 1.0) * limit
    }
}

/// Pixel-space box `[x0, x1) x [y0, y1)` clamped to the surface.
#[derive(Debug, Clone, Copy)]
struct PixelBox {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

impl PixelBox {
    fn width(&self) -> usize {
        (self.x1 - self.x0) as usize
    }

    fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    fn pixels(self) -> impl Iterator<Item = (u32, u32)> {
        (self.y0..self.y1).flat_map(move |y| (self.x0..self.x1).map(move |x| (x, y)))
    }
}

/// An RGBA8 pixel buffer implementing [`Surface`].
///
/// Coverage is computed from exact distances to the geometry and combined
/// per pixel by maximum, so segments of one path never double-blend where
/// they overlap. Caps follow the stroke style; joins are always round.
pub struct RasterSurface {
    width: u32,
    height: u32,
    /// Straight (non-premultiplied) RGBA, row-major.
    data: Vec<u8>,
    transform: Affine,
    global_alpha: f64,
    font: Option<FontArc>,
}

impl std::fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("transform", &self.transform)
            .field("global_alpha", &self.global_alpha)
            .field("has_font", &self.font.is_some())
            .finish()
    }
}

impl RasterSurface {
    /// Create a fully transparent surface.
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        if width == 0 || height == 0 || width > MAX_SURFACE_SIZE || height > MAX_SURFACE_SIZE {
            return Err(RenderError::InvalidSize { width, height });
        }
        Ok(Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
            transform: Affine::IDENTITY,
            global_alpha: 1.0,
            font: None,
        })
    }

    /// Use `font` for [`Surface::fill_text`]. Without a font, text is skipped.
    pub fn with_font(mut self, font: FontArc) -> Self {
        self.font = Some(font);
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 rows.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    /// Uniform scale factor of the current transform.
    fn scale(&self) -> f64 {
        self.transform.determinant().abs().sqrt()
    }

    fn clip(&self, x0: f64, y0: f64, x1: f64, y1: f64) -> PixelBox {
        let clamp_x = |v: f64| v.clamp(0.0, f64::from(self.width)) as u32;
        let clamp_y = |v: f64| v.clamp(0.0, f64::from(self.height)) as u32;
        PixelBox {
            x0: clamp_x(x0.floor()),
            y0: clamp_y(y0.floor()),
            x1: clamp_x(x1.ceil()),
            y1: clamp_y(y1.ceil()),
        }
    }

    /// Source-over blend of `color` at `coverage` (0..=1) into one pixel.
    fn blend(&mut self, x: u32, y: u32, color: [f64; 4], coverage: f64) {
        if x >= self.width || y >= self.height {
            return;
        }
        let sa = color[3] * coverage * self.global_alpha;
        if sa <= 0.0 {
            return;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let dst = &mut self.data[i..i + 4];
        let da = f64::from(dst[3]) / 255.0;
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            return;
        }
        for c in 0..3 {
            let dc = f64::from(dst[c]) / 255.0;
            let out = (color[c] * sa + dc * da * (1.0 - sa)) / out_a;
            dst[c] = (out * 255.0).round().clamp(0.0, 255.0) as u8;
        }
        dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }

    /// Flatten `path` into device-space segments. Open polylines get the
    /// stroke's caps at their ends; every other segment end is a round join.
    fn segments(&self, path: &BezPath, stroke: &Stroke) -> Vec<Segment> {
        let mut lines: Vec<(Vec<Point>, bool)> = Vec::new();
        let tolerance = FLATTEN_TOLERANCE / self.scale().max(f64::EPSILON);
        kurbo::flatten(path.iter(), tolerance, |el| match el {
            PathEl::MoveTo(p) => lines.push((vec![self.transform * p], false)),
            PathEl::LineTo(p) => {
                if let Some((line, _)) = lines.last_mut() {
                    line.push(self.transform * p);
                }
            }
            PathEl::ClosePath => {
                if let Some((line, closed)) = lines.last_mut() {
                    if let Some(&first) = line.first() {
                        line.push(first);
                        *closed = true;
                    }
                }
            }
            _ => {}
        });

        let mut segments = Vec::new();
        for (line, closed) in lines {
            let last = line.len().saturating_sub(2);
            for (i, pair) in line.windows(2).enumerate() {
                let start = if i == 0 && !closed {
                    stroke.start_cap.into()
                } else {
                    SegmentEnd::Round
                };
                let end = if i == last && !closed {
                    stroke.end_cap.into()
                } else {
                    SegmentEnd::Round
                };
                segments.push(Segment {
                    a: pair[0],
                    b: pair[1],
                    start,
                    end,
                });
            }
        }
        segments
    }
}

/// Color components as 0..=1 floats.
fn unit_rgba(color: Color) -> [f64; 4] {
    let rgba = color.to_rgba8();
    [
        f64::from(rgba.r) / 255.0,
        f64::from(rgba.g) / 255.0,
        f64::from(rgba.b) / 255.0,
        f64::from(rgba.a) / 255.0,
    ]
}

impl Surface for RasterSurface {
    fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    fn clear(&mut self, background: Color) {
        let rgba = background.to_rgba8();
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&[rgba.r, rgba.g, rgba.b, rgba.a]);
        }
        self.transform = Affine::IDENTITY;
        self.global_alpha = 1.0;
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.global_alpha = alpha.clamp(0.0, 1.0);
    }

    fn stroke_path(&mut self, path: &BezPath, stroke: &Stroke, color: Color) {
        let half = stroke.width * self.scale() / 2.0;
        let segments = self.segments(path, stroke);
        if segments.is_empty() || half <= 0.0 {
            return;
        }

        // square caps reach diagonally past the end point
        let reach = half * std::f64::consts::SQRT_2 + 1.0;
        let (mut x0, mut y0) = (f64::INFINITY, f64::INFINITY);
        let (mut x1, mut y1) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for seg in &segments {
            x0 = x0.min(seg.a.x.min(seg.b.x));
            y0 = y0.min(seg.a.y.min(seg.b.y));
            x1 = x1.max(seg.a.x.max(seg.b.x));
            y1 = y1.max(seg.a.y.max(seg.b.y));
        }
        let area = self.clip(x0 - reach, y0 - reach, x1 + reach, y1 + reach);
        if area.is_empty() {
            return;
        }

        // One row of coverage at a time.
        let rgba = unit_rgba(color);
        let mut row = vec![0.0f32; area.width()];
        for y in area.y0..area.y1 {
            let cy = f64::from(y) + 0.5;
            row.fill(0.0);
            for seg in &segments {
                if cy < seg.a.y.min(seg.b.y) - reach || cy > seg.a.y.max(seg.b.y) + reach {
                    continue;
                }
                let sx0 = (seg.a.x.min(seg.b.x) - reach).floor().max(f64::from(area.x0)) as u32;
                let sx1 = (seg.a.x.max(seg.b.x) + reach).ceil().min(f64::from(area.x1)) as u32;
                for x in sx0..sx1 {
                    let center = Point::new(f64::from(x) + 0.5, cy);
                    let coverage = seg.coverage(center, half) as f32;
                    let cell = &mut row[(x - area.x0) as usize];
                    *cell = cell.max(coverage);
                }
            }
            for (i, &coverage) in row.iter().enumerate() {
                if coverage > 0.0 {
                    self.blend(area.x0 + i as u32, y, rgba, f64::from(coverage));
                }
            }
        }
    }

    fn fill_circle(&mut self, circle: Circle, color: Color) {
        let center = self.transform * circle.center;
        let radius = circle.radius * self.scale();
        if radius <= 0.0 {
            return;
        }
        let reach = radius + 1.0;
        let area = self.clip(center.x - reach, center.y - reach, center.x + reach, center.y + reach);
        let rgba = unit_rgba(color);
        for (x, y) in area.pixels() {
            let offset = Vec2::new(f64::from(x) + 0.5 - center.x, f64::from(y) + 0.5 - center.y);
            let coverage = (radius + 0.5 - offset.hypot()).clamp(0.0, 1.0);
            if coverage > 0.0 {
                self.blend(x, y, rgba, coverage);
            }
        }
    }

    fn fill_text(&mut self, text: &str, center: Point, font_size: f64, color: Color) {
        let Some(font) = self.font.clone() else {
            log::warn!("No font loaded, skipping text {:?}", text);
            return;
        };
        let px = (font_size * self.scale()) as f32;
        if px <= 0.0 {
            return;
        }
        let scaled = font.as_scaled(PxScale::from(px));

        // Lay out along a zero baseline, then center the run on `center`.
        let mut caret = 0.0f32;
        let mut previous = None;
        let mut glyphs = Vec::new();
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            glyphs.push(id.with_scale_and_position(px, ab_glyph::point(caret, 0.0)));
            caret += scaled.h_advance(id);
            previous = Some(id);
        }

        let center = self.transform * center;
        let origin_x = center.x as f32 - caret / 2.0;
        let baseline = center.y as f32 + (scaled.ascent() + scaled.descent()) / 2.0;
        let rgba = unit_rgba(color);

        for mut glyph in glyphs {
            glyph.position.x += origin_x;
            glyph.position.y = baseline;
            let Some(outlined) = font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let x = bounds.min.x as i64 + i64::from(gx);
                let y = bounds.min.y as i64 + i64::from(gy);
                if x >= 0 && y >= 0 {
                    self.blend(x as u32, y as u32, rgba, f64::from(coverage));
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: [u8; 4] = [240, 240, 240, 255];

    fn surface(size: u32) -> RasterSurface {
        let mut surface = RasterSurface::new(size, size).unwrap();
        surface.clear(Color::from_rgba8(240, 240, 240, 255));
        surface
    }

    fn black() -> Color {
        Color::from_rgba8(0, 0, 0, 255)
    }

    fn line(from: (f64, f64), to: (f64, f64)) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(from);
        path.line_to(to);
        path
    }

    #[test]
    fn test_invalid_size() {
        assert!(matches!(
            RasterSurface::new(0, 10),
            Err(RenderError::InvalidSize { width: 0, height: 10 })
        ));
        assert!(RasterSurface::new(MAX_SURFACE_SIZE + 1, 1).is_err());
    }

    #[test]
    fn test_clear_fills_background() {
        let surface = surface(16);
        assert_eq!(surface.pixel(0, 0), Some(BG));
        assert_eq!(surface.pixel(15, 15), Some(BG));
        assert_eq!(surface.pixel(16, 0), None);
    }

    #[test]
    fn test_stroke_covers_segment_and_round_caps() {
        let mut surface = surface(32);
        surface.stroke_path(&line((10.0, 10.0), (20.0, 10.0)), &Stroke::new(3.0), black());

        assert_eq!(surface.pixel(15, 9), Some([0, 0, 0, 255]));
        assert_eq!(surface.pixel(15, 12), Some(BG));
        // round cap reaches past the end point
        assert_eq!(surface.pixel(9, 9), Some([0, 0, 0, 255]));
        assert_eq!(surface.pixel(7, 9), Some(BG));
    }

    #[test]
    fn test_single_point_path_paints_nothing() {
        let mut surface = surface(16);
        let mut path = BezPath::new();
        path.move_to((8.0, 8.0));
        surface.stroke_path(&path, &Stroke::new(5.0), black());
        assert!(surface.data().chunks_exact(4).all(|px| px == BG));
    }

    #[test]
    fn test_butt_caps_stop_at_end_points() {
        let mut surface = surface(32);
        let stroke = Stroke::new(4.0).with_caps(Cap::Butt);
        surface.stroke_path(&line((10.0, 10.0), (20.0, 10.0)), &stroke, black());

        assert_eq!(surface.pixel(10, 10), Some([0, 0, 0, 255]));
        assert_eq!(surface.pixel(19, 9), Some([0, 0, 0, 255]));
        assert_eq!(surface.pixel(8, 10), Some(BG));
        assert_eq!(surface.pixel(21, 10), Some(BG));
    }

    #[test]
    fn test_square_caps_extend_half_width() {
        let mut surface = surface(32);
        let stroke = Stroke::new(4.0).with_caps(Cap::Square);
        surface.stroke_path(&line((10.0, 10.0), (20.0, 10.0)), &stroke, black());

        assert_eq!(surface.pixel(8, 10), Some([0, 0, 0, 255]));
        // square corner, outside what a round cap would cover
        assert_eq!(surface.pixel(8, 8), Some([0, 0, 0, 255]));
        assert_eq!(surface.pixel(21, 11), Some([0, 0, 0, 255]));
        assert_eq!(surface.pixel(6, 10), Some(BG));
    }

    #[test]
    fn test_butt_caps_keep_round_joins() {
        let mut surface = surface(32);
        let mut path = line((5.0, 20.0), (15.0, 20.0));
        path.line_to((15.0, 5.0));
        let stroke = Stroke::new(4.0).with_caps(Cap::Butt);
        surface.stroke_path(&path, &stroke, black());

        // the corner between the two flat segment ends is filled
        assert_eq!(surface.pixel(15, 20), Some([0, 0, 0, 255]));
        // the free ends are flat
        assert_eq!(surface.pixel(3, 20), Some(BG));
        assert_eq!(surface.pixel(15, 3), Some(BG));
    }

    #[test]
    fn test_overlapping_segments_blend_once() {
        let mut surface = surface(32);
        let mut path = line((5.0, 16.0), (25.0, 16.0));
        path.line_to((5.0, 16.0));
        surface.set_global_alpha(0.5);
        surface.stroke_path(&path, &Stroke::new(4.0), black());
        let [r, ..] = surface.pixel(15, 16).unwrap();
        // one half-alpha layer over 240, not two
        assert!((115..=125).contains(&r), "got {r}");
    }

    #[test]
    fn test_transform_scales_geometry_and_width() {
        let mut surface = surface(128);
        surface.set_transform(Affine::scale(4.0));
        surface.stroke_path(&line((10.0, 10.0), (20.0, 10.0)), &Stroke::new(3.0), black());

        assert_eq!(surface.pixel(60, 44), Some([0, 0, 0, 255]));
        assert_eq!(surface.pixel(60, 47), Some(BG));
        assert_eq!(surface.pixel(15, 10), Some(BG));
    }

    #[test]
    fn test_global_alpha_disc() {
        let mut surface = surface(32);
        surface.set_global_alpha(0.5);
        surface.fill_circle(Circle::new((16.0, 16.0), 5.0), black());
        let [r, g, b, a] = surface.pixel(16, 16).unwrap();
        assert!((115..=125).contains(&r));
        assert_eq!((r, g), (g, b));
        assert_eq!(a, 255);
        assert_eq!(surface.pixel(16, 23), Some(BG));
    }

    #[test]
    fn test_clear_resets_paint_state() {
        let mut surface = surface(16);
        surface.set_global_alpha(0.25);
        surface.set_transform(Affine::scale(2.0));
        surface.clear(Color::from_rgba8(255, 255, 255, 255));
        surface.fill_circle(Circle::new((8.0, 8.0), 2.0), black());
        assert_eq!(surface.pixel(8, 8), Some([0, 0, 0, 255]));
        assert_eq!(surface.pixel(12, 8), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_text_without_font_is_skipped() {
        let mut surface = surface(16);
        surface.fill_text("🔥", Point::new(8.0, 8.0), 12.0, black());
        assert!(surface.data().chunks_exact(4).all(|px| px == BG));
    }

    const FONT: &[u8] = include_bytes!("../tests/fixtures/DejaVuSansMono.ttf");

    /// Inclusive box of pixels that differ from the background.
    fn ink_bounds(surface: &RasterSurface) -> Option<(u32, u32, u32, u32)> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for y in 0..surface.height() {
            for x in 0..surface.width() {
                if surface.pixel(x, y) != Some(BG) {
                    bounds = Some(match bounds {
                        None => (x, y, x, y),
                        Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                    });
                }
            }
        }
        bounds
    }

    #[test]
    fn test_text_is_centered_on_point() {
        let font = load_font(FONT.to_vec()).unwrap();
        let mut surface = surface(256).with_font(font);
        surface.fill_text("X", Point::new(128.0, 128.0), 64.0, black());

        let (x0, y0, x1, y1) = ink_bounds(&surface).unwrap();
        let cx = f64::from(x0 + x1) / 2.0;
        let cy = f64::from(y0 + y1) / 2.0;
        assert!((cx - 128.0).abs() <= 3.0, "horizontal center {cx}");
        assert!((cy - 128.0).abs() <= 4.0, "vertical center {cy}");
        // a 64px capital is tens of pixels across, not a speck
        assert!(x1 - x0 > 20 && y1 - y0 > 30);
    }

    #[test]
    fn test_text_follows_transform() {
        let font = load_font(FONT.to_vec()).unwrap();
        let mut surface = surface(256).with_font(font);
        surface.set_transform(Affine::scale(4.0));
        surface.fill_text("X", Point::new(32.0, 32.0), 16.0, black());

        let (x0, y0, x1, y1) = ink_bounds(&surface).unwrap();
        assert!((f64::from(x0 + x1) / 2.0 - 128.0).abs() <= 3.0);
        assert!((f64::from(y0 + y1) / 2.0 - 128.0).abs() <= 4.0);
        assert!(y1 - y0 > 30);
    }

    #[test]
    fn test_invalid_font_bytes() {
        assert!(matches!(load_font(vec![1, 2, 3]), Err(RenderError::Font(_))));
    }

    #[test]
    fn test_segment_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!((point_to_segment_dist(Point::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-9);
        assert!((point_to_segment_dist(Point::new(-4.0, 3.0), a, b) - 5.0).abs() < 1e-9);
        assert!((point_to_segment_dist(Point::new(1.0, 1.0), a, a) - 2f64.sqrt()).abs() < 1e-9);
    }
}
