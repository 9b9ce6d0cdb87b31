//! Freehand stroke.

use super::DrawableId;
use crate::color::InkColor;
use crate::surface::Surface;
use kurbo::{BezPath, Cap, Join, Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A freehand stroke (series of points).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub(crate) id: DrawableId,
    /// Points in the order they were drawn. Never empty.
    pub points: Vec<Point>,
    /// Line width in canvas pixels.
    pub thickness: f64,
    pub color: InkColor,
}

impl Stroke {
    /// Start a stroke at `start`.
    pub fn new(start: Point, thickness: f64, color: InkColor) -> Self {
        Self {
            id: Uuid::new_v4(),
            points: vec![start],
            thickness,
            color,
        }
    }

    pub fn id(&self) -> DrawableId {
        self.id
    }

    /// Add a point to the path.
    pub fn append(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Get the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// One continuous polyline through every point.
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let mut points = self.points.iter();
        if let Some(first) = points.next() {
            path.move_to(*first);
            for point in points {
                path.line_to(*point);
            }
        }
        path
    }

    /// Area covered by ink, including the round caps.
    pub fn bounds(&self) -> Rect {
        let Some(first) = self.points.first() else {
            return Rect::ZERO;
        };
        let rect = self
            .points
            .iter()
            .fold(Rect::from_points(*first, *first), |rect, p| {
                rect.union_pt(*p)
            });
        rect.inflate(self.thickness / 2.0, self.thickness / 2.0)
    }

    /// Stroke geometry: round caps and joins at this stroke's thickness.
    pub fn style(&self) -> kurbo::Stroke {
        kurbo::Stroke::new(self.thickness)
            .with_caps(Cap::Round)
            .with_join(Join::Round)
    }

    /// Paint the stroke. Fewer than two points paint nothing.
    pub fn render(&self, surface: &mut dyn Surface) {
        if self.points.len() < 2 {
            return;
        }
        surface.stroke_path(&self.to_path(), &self.style(), self.color.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DisplayList, DrawOp};

    fn stroke_through(points: &[(f64, f64)]) -> Stroke {
        let mut stroke = Stroke::new(points[0].into(), 3.0, InkColor::BLACK);
        for &p in &points[1..] {
            stroke.append(p.into());
        }
        stroke
    }

    #[test]
    fn test_new_stroke_has_seed_point() {
        let stroke = Stroke::new(Point::new(10.0, 10.0), 3.0, InkColor::BLACK);
        assert_eq!(stroke.points, vec![Point::new(10.0, 10.0)]);
        assert!(!stroke.is_empty());
    }

    #[test]
    fn test_single_point_renders_nothing() {
        let stroke = stroke_through(&[(10.0, 10.0)]);
        let mut list = DisplayList::new(256.0, 256.0);
        stroke.render(&mut list);
        assert!(list.is_empty());
        assert_eq!(list.segment_count(), 0);
    }

    #[test]
    fn test_two_points_render_one_segment() {
        let stroke = stroke_through(&[(10.0, 10.0), (20.0, 10.0)]);
        let mut list = DisplayList::new(256.0, 256.0);
        stroke.render(&mut list);
        assert_eq!(list.segment_count(), 1);
    }

    #[test]
    fn test_render_is_single_path_with_style() {
        let stroke = stroke_through(&[(0.0, 0.0), (5.0, 0.0), (5.0, 5.0), (0.0, 5.0)]);
        let mut list = DisplayList::new(256.0, 256.0);
        stroke.render(&mut list);
        assert_eq!(list.ops().len(), 1);
        match &list.ops()[0] {
            DrawOp::StrokePath { width, color, .. } => {
                assert!((width - 3.0).abs() < f64::EPSILON);
                assert_eq!(*color, InkColor::BLACK);
            }
            other => panic!("unexpected op {other:?}"),
        }
        assert_eq!(list.segment_count(), 3);
    }

    #[test]
    fn test_bounds_include_half_thickness() {
        let stroke = stroke_through(&[(10.0, 10.0), (20.0, 30.0), (15.0, 5.0)]);
        let bounds = stroke.bounds();
        assert!((bounds.x0 - 8.5).abs() < f64::EPSILON);
        assert!((bounds.y0 - 3.5).abs() < f64::EPSILON);
        assert!((bounds.x1 - 21.5).abs() < f64::EPSILON);
        assert!((bounds.y1 - 31.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_style_is_round() {
        let style = stroke_through(&[(0.0, 0.0)]).style();
        assert_eq!(style.join, Join::Round);
        assert_eq!(style.start_cap, Cap::Round);
        assert_eq!(style.end_cap, Cap::Round);
    }

    #[test]
    fn test_render_leaves_stroke_untouched() {
        let stroke = stroke_through(&[(0.0, 0.0), (5.0, 5.0)]);
        let before = stroke.clone();
        let mut list = DisplayList::new(256.0, 256.0);
        stroke.render(&mut list);
        stroke.render(&mut list);
        assert_eq!(stroke, before);
        assert_eq!(list.segment_count(), 2);
    }
}
