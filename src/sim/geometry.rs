//! Points, segments and axis-aligned rectangles
//!
//! Everything here works in screen space: x grows to the right, y grows
//! downward. Equality is tolerance-based (see [`crate::consts::EPSILON`])
//! so values produced by different arithmetic paths still compare equal.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{approx_eq, approx_eq_opt};

/// A 2D point
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn as_dvec2(self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Euclidean distance to another point
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        self.as_dvec2().distance(other.as_dvec2())
    }
}

impl From<DVec2> for Point {
    fn from(v: DVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

/// Tolerance-based: both coordinates within epsilon
impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        approx_eq(self.x, other.x) && approx_eq(self.y, other.y)
    }
}

/// A bounded line segment
///
/// Keeps the slope/intercept form of the infinite line through it.
/// Vertical segments (and single points) have no slope.
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    start: Point,
    end: Point,
    slope: Option<f64>,
    intercept: f64,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        let slope = if start.x == end.x {
            None
        } else {
            Some((end.y - start.y) / (end.x - start.x))
        };
        let intercept = match slope {
            Some(a) => start.y - a * start.x,
            None => 0.0,
        };
        Self {
            start,
            end,
            slope,
            intercept,
        }
    }

    pub fn from_coords(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    #[inline]
    pub fn start(&self) -> Point {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Point {
        self.end
    }

    /// Slope of the line, `None` when vertical
    #[inline]
    pub fn slope(&self) -> Option<f64> {
        self.slope
    }

    /// Y-intercept of the line (0 for vertical lines)
    #[inline]
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn middle(&self) -> Point {
        Point::from((self.start.as_dvec2() + self.end.as_dvec2()) * 0.5)
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// Check whether a point lies on the segment
    ///
    /// The point is treated as a zero-length segment and run through the
    /// same intersection test as any other segment.
    pub fn is_point_on_line(&self, point: Point) -> bool {
        self.is_intersecting(&Segment::new(point, point))
    }

    pub fn is_intersecting(&self, other: &Segment) -> bool {
        self.intersection_with(other).is_some()
    }

    /// Find where this segment meets another
    ///
    /// - `None` if they don't meet
    /// - the shared start if the segments are equal
    /// - for collinear overlapping segments, a shared endpoint
    ///   (`other.start`, then `other.end`, then `self.start`)
    /// - otherwise the single crossing point
    pub fn intersection_with(&self, other: &Segment) -> Option<Point> {
        if approx_eq_opt(self.slope, other.slope) {
            if !approx_eq(self.intercept, other.intercept) {
                return None;
            }
            if self == other {
                return Some(self.start);
            }
            return [other.start, other.end, self.start]
                .into_iter()
                .find(|&p| self.bounds_contain(p) && other.bounds_contain(p));
        }

        let point = Self::endless_intersection(self, other)?;
        (self.bounds_contain(point) && other.bounds_contain(point)).then_some(point)
    }

    /// Intersection point of the two infinite lines (non-parallel only)
    fn endless_intersection(l1: &Segment, l2: &Segment) -> Option<Point> {
        let (x, y) = match (l1.slope, l2.slope) {
            (None, Some(a2)) => {
                let x = l1.start.x;
                (x, a2 * x + l2.intercept)
            }
            (Some(a1), None) => {
                let x = l2.start.x;
                (x, a1 * x + l1.intercept)
            }
            (Some(a1), Some(a2)) => {
                let x = (l2.intercept - l1.intercept) / (a1 - a2);
                (x, a1 * x + l1.intercept)
            }
            (None, None) => return None,
        };
        Some(Point::new(x, y))
    }

    /// Check that a point is inside the segment's bounding box (with tolerance)
    fn bounds_contain(&self, point: Point) -> bool {
        in_range(point.x, self.start.x, self.end.x) && in_range(point.y, self.start.y, self.end.y)
    }

    /// Closest point where this segment enters `rect`, measured from `start`
    ///
    /// Candidates at (effectively) zero distance are skipped: a segment that
    /// starts on a border does not collide with that border again.
    pub fn closest_intersect_start_of_line(&self, rect: &Rect) -> Option<Point> {
        rect.intersection_points(self)
            .into_iter()
            .map(|p| (self.start.distance(p), p))
            .filter(|(d, _)| *d > EPSILON)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, p)| p)
    }
}

/// Order-independent: `(a, b)` equals `(b, a)`
impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        (self.start == other.start && self.end == other.end)
            || (self.start == other.end && self.end == other.start)
    }
}

#[inline]
fn in_range(t: f64, a: f64, b: f64) -> bool {
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    t >= lo - EPSILON && t <= hi + EPSILON
}

/// Rectangle borders, in the order they're reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];
}

/// Rectangle corners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    UpperLeft,
    UpperRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::UpperLeft,
        Corner::UpperRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// Corner number: 0 upper-left, 1 upper-right, 2 bottom-left, 3 bottom-right
    pub fn index(self) -> usize {
        match self {
            Corner::UpperLeft => 0,
            Corner::UpperRight => 1,
            Corner::BottomLeft => 2,
            Corner::BottomRight => 3,
        }
    }
}

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RectDef")]
pub struct Rect {
    upper_left: Point,
    width: f64,
    height: f64,
}

/// Deserialization shape for [`Rect`], normalized on the way in
#[derive(Deserialize)]
struct RectDef {
    upper_left: Point,
    width: f64,
    height: f64,
}

impl From<RectDef> for Rect {
    fn from(def: RectDef) -> Self {
        Rect::new(def.upper_left, def.width, def.height)
    }
}

impl Rect {
    /// Create a rectangle; non-positive dimensions become [`DEFAULT_RECT_SIZE`]
    pub fn new(upper_left: Point, width: f64, height: f64) -> Self {
        let width = if width > 0.0 { width } else { DEFAULT_RECT_SIZE };
        let height = if height > 0.0 { height } else { DEFAULT_RECT_SIZE };
        Self {
            upper_left,
            width,
            height,
        }
    }

    pub fn from_coords(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(Point::new(x, y), width, height)
    }

    #[inline]
    pub fn upper_left(&self) -> Point {
        self.upper_left
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.upper_left.x
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.upper_left.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.upper_left.y
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.upper_left.y + self.height
    }

    /// Same size, moved horizontally so the left edge is at `x`
    pub fn with_left(&self, x: f64) -> Self {
        Self::new(Point::new(x, self.top()), self.width, self.height)
    }

    pub fn corner(&self, corner: Corner) -> Point {
        match corner {
            Corner::UpperLeft => self.upper_left,
            Corner::UpperRight => Point::new(self.right(), self.top()),
            Corner::BottomLeft => Point::new(self.left(), self.bottom()),
            Corner::BottomRight => Point::new(self.right(), self.bottom()),
        }
    }

    pub fn corners(&self) -> [Point; 4] {
        Corner::ALL.map(|c| self.corner(c))
    }

    /// Border segment; borders run clockwise so consecutive ones share an endpoint
    pub fn border(&self, side: Side) -> Segment {
        let (from, to) = match side {
            Side::Top => (Corner::UpperLeft, Corner::UpperRight),
            Side::Right => (Corner::UpperRight, Corner::BottomRight),
            Side::Bottom => (Corner::BottomRight, Corner::BottomLeft),
            Side::Left => (Corner::BottomLeft, Corner::UpperLeft),
        };
        Segment::new(self.corner(from), self.corner(to))
    }

    /// All four borders, indexed top, right, bottom, left
    pub fn borders(&self) -> [Segment; 4] {
        Side::ALL.map(|s| self.border(s))
    }

    /// Intersections of `segment` with each border (top, right, bottom, left order)
    pub fn intersection_points(&self, segment: &Segment) -> Vec<Point> {
        self.borders()
            .iter()
            .filter_map(|border| segment.intersection_with(border))
            .collect()
    }

    pub fn is_point_on_border(&self, side: Side, point: Point) -> bool {
        self.border(side).is_point_on_line(point)
    }

    pub fn is_point_on_borders(&self, point: Point) -> bool {
        Side::ALL.iter().any(|&s| self.is_point_on_border(s, point))
    }

    /// Which corner `point` coincides with, if any
    pub fn point_corner(&self, point: Point) -> Option<Corner> {
        Corner::ALL.into_iter().find(|&c| self.corner(c) == point)
    }

    /// Nudge a point lying on the borders slightly outside the rectangle
    ///
    /// Right is checked before left and top before bottom; each adjusts
    /// only its own axis. Points off the borders are returned unchanged.
    pub fn push_out(&self, point: Point) -> Point {
        let mut out = point;
        if self.is_point_on_border(Side::Right, point) {
            out.x = self.right() + PUSH_OUT;
        } else if self.is_point_on_border(Side::Left, point) {
            out.x = self.left() - PUSH_OUT;
        }
        if self.is_point_on_border(Side::Top, point) {
            out.y = self.top() - PUSH_OUT;
        } else if self.is_point_on_border(Side::Bottom, point) {
            out.y = self.bottom() + PUSH_OUT;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_point_distance_and_tolerance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-12);
        assert_eq!(b, Point::new(3.0 + 0.5e-10, 4.0));
        assert_ne!(b, Point::new(3.0 + 1e-8, 4.0));
    }

    #[test]
    fn test_segment_derived_values() {
        let s = Segment::from_coords(0.0, 1.0, 2.0, 5.0);
        assert_eq!(s.slope(), Some(2.0));
        assert_eq!(s.intercept(), 1.0);
        assert_eq!(s.middle(), Point::new(1.0, 3.0));

        let v = Segment::from_coords(3.0, 0.0, 3.0, 10.0);
        assert_eq!(v.slope(), None);
        assert!((v.length() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_segment_equality_ignores_direction() {
        let a = Segment::from_coords(0.0, 0.0, 4.0, 4.0);
        let b = Segment::from_coords(4.0, 4.0, 0.0, 0.0);
        assert_eq!(a, b);
        assert_ne!(a, Segment::from_coords(0.0, 0.0, 4.0, 5.0));
    }

    #[test]
    fn test_crossing_segments() {
        let a = Segment::from_coords(0.0, 0.0, 10.0, 10.0);
        let b = Segment::from_coords(0.0, 10.0, 10.0, 0.0);
        assert_eq!(a.intersection_with(&b), Some(Point::new(5.0, 5.0)));
    }

    #[test]
    fn test_vertical_and_horizontal_segments() {
        let v = Segment::from_coords(400.0, 296.0, 400.0, 304.0);
        let h = Segment::from_coords(380.0, 300.0, 420.0, 300.0);
        assert_eq!(v.intersection_with(&h), Some(Point::new(400.0, 300.0)));
        assert_eq!(h.intersection_with(&v), Some(Point::new(400.0, 300.0)));
    }

    #[test]
    fn test_segments_that_miss() {
        let a = Segment::from_coords(0.0, 0.0, 1.0, 1.0);
        let b = Segment::from_coords(0.0, 10.0, 10.0, 0.0);
        assert!(a.intersection_with(&b).is_none());

        // parallel, different intercept
        let c = Segment::from_coords(0.0, 1.0, 1.0, 2.0);
        assert!(a.intersection_with(&c).is_none());

        // parallel verticals
        let d = Segment::from_coords(0.0, 0.0, 0.0, 5.0);
        let e = Segment::from_coords(1.0, 0.0, 1.0, 5.0);
        assert!(d.intersection_with(&e).is_none());
    }

    #[test]
    fn test_collinear_overlap_returns_shared_endpoint() {
        let a = Segment::from_coords(0.0, 0.0, 10.0, 0.0);
        let b = Segment::from_coords(5.0, 0.0, 15.0, 0.0);
        assert_eq!(a.intersection_with(&b), Some(Point::new(5.0, 0.0)));
        // neither endpoint of a is inside b except a's end
        assert_eq!(b.intersection_with(&a), Some(Point::new(10.0, 0.0)));

        let disjoint = Segment::from_coords(11.0, 0.0, 15.0, 0.0);
        assert!(a.intersection_with(&disjoint).is_none());
    }

    #[test]
    fn test_identical_segments_return_start() {
        let a = Segment::from_coords(1.0, 1.0, 3.0, 3.0);
        let b = Segment::from_coords(3.0, 3.0, 1.0, 1.0);
        assert_eq!(a.intersection_with(&b), Some(Point::new(1.0, 1.0)));
    }

    #[test]
    fn test_point_on_line() {
        let s = Segment::from_coords(0.0, 0.0, 10.0, 5.0);
        assert!(s.is_point_on_line(Point::new(4.0, 2.0)));
        assert!(s.is_point_on_line(Point::new(10.0, 5.0)));
        assert!(!s.is_point_on_line(Point::new(12.0, 6.0)));
        assert!(!s.is_point_on_line(Point::new(4.0, 2.1)));

        let v = Segment::from_coords(2.0, 0.0, 2.0, 8.0);
        assert!(v.is_point_on_line(Point::new(2.0, 8.0)));
        assert!(!v.is_point_on_line(Point::new(2.0, 8.1)));
    }

    #[test]
    fn test_rect_normalizes_dimensions() {
        let r = Rect::from_coords(0.0, 0.0, -3.0, 0.0);
        assert_eq!(r.width(), DEFAULT_RECT_SIZE);
        assert_eq!(r.height(), DEFAULT_RECT_SIZE);

        let r = Rect::from_coords(0.0, 0.0, 10.0, -1.0);
        assert_eq!(r.width(), 10.0);
        assert_eq!(r.height(), DEFAULT_RECT_SIZE);
    }

    #[test]
    fn test_rect_deserialize_normalizes() {
        let r: Rect =
            serde_json::from_str(r#"{"upper_left":{"x":1.0,"y":2.0},"width":0.0,"height":7.0}"#)
                .unwrap();
        assert_eq!(r.width(), DEFAULT_RECT_SIZE);
        assert_eq!(r.height(), 7.0);
    }

    #[test]
    fn test_intersection_points_order() {
        let r = Rect::from_coords(0.0, 0.0, 10.0, 10.0);
        // Straight down through the middle: top first, then bottom
        let s = Segment::from_coords(5.0, -5.0, 5.0, 15.0);
        let points = r.intersection_points(&s);
        assert_eq!(points, vec![Point::new(5.0, 0.0), Point::new(5.0, 10.0)]);
    }

    #[test]
    fn test_closest_intersect_start_of_line() {
        let r = Rect::from_coords(0.0, 0.0, 10.0, 10.0);
        let s = Segment::from_coords(5.0, 15.0, 5.0, -5.0);
        assert_eq!(s.closest_intersect_start_of_line(&r), Some(Point::new(5.0, 10.0)));

        let miss = Segment::from_coords(20.0, 0.0, 30.0, 0.0);
        assert!(miss.closest_intersect_start_of_line(&r).is_none());
    }

    #[test]
    fn test_closest_intersect_skips_start_on_border() {
        let r = Rect::from_coords(0.0, 0.0, 10.0, 10.0);
        // Starts on the top border, leaves upward: nothing to hit
        let away = Segment::from_coords(5.0, 0.0, 5.0, -4.0);
        assert!(away.closest_intersect_start_of_line(&r).is_none());

        // Starts on the top border, goes through: only the bottom counts
        let through = Segment::from_coords(5.0, 0.0, 5.0, 14.0);
        assert_eq!(
            through.closest_intersect_start_of_line(&r),
            Some(Point::new(5.0, 10.0))
        );
    }

    #[test]
    fn test_point_corner() {
        let r = Rect::from_coords(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.point_corner(Point::new(10.0, 20.0)), Some(Corner::UpperLeft));
        assert_eq!(r.point_corner(Point::new(40.0, 20.0)), Some(Corner::UpperRight));
        assert_eq!(r.point_corner(Point::new(10.0, 60.0)), Some(Corner::BottomLeft));
        assert_eq!(r.point_corner(Point::new(40.0, 60.0)), Some(Corner::BottomRight));
        assert_eq!(r.point_corner(Point::new(25.0, 20.0)), None);
    }

    #[test]
    fn test_push_out() {
        let r = Rect::from_coords(0.0, 0.0, 10.0, 10.0);
        let p = r.push_out(Point::new(5.0, 0.0));
        assert!(p.y < 0.0 && p.y > -1e-9);
        assert_eq!(p.x, 5.0);

        let p = r.push_out(Point::new(10.0, 5.0));
        assert!(p.x > 10.0);

        let corner = r.push_out(Point::new(10.0, 10.0));
        assert!(corner.x > 10.0 && corner.y > 10.0);

        let off = Point::new(50.0, 50.0);
        assert_eq!(r.push_out(off).x, 50.0);
    }

    fn rect_strategy() -> impl Strategy<Value = Rect> {
        (-500.0..500.0f64, -500.0..500.0f64, 0.5..300.0f64, 0.5..300.0f64)
            .prop_map(|(x, y, w, h)| Rect::from_coords(x, y, w, h))
    }

    fn grid_segment() -> impl Strategy<Value = Segment> {
        (-20i32..20, -20i32..20, -20i32..20, -20i32..20).prop_map(|(x1, y1, x2, y2)| {
            Segment::from_coords(x1 as f64, y1 as f64, x2 as f64, y2 as f64)
        })
    }

    proptest! {
        #[test]
        fn prop_rect_borders_form_closed_polygon(r in rect_strategy()) {
            let borders = r.borders();
            for i in 0..4 {
                prop_assert_eq!(borders[i].end(), borders[(i + 1) % 4].start());
            }
            for corner in r.corners() {
                prop_assert!(r.is_point_on_borders(corner));
            }
        }

        #[test]
        fn prop_intersection_symmetric_and_in_range(a in grid_segment(), b in grid_segment()) {
            let ab = a.intersection_with(&b);
            let ba = b.intersection_with(&a);
            prop_assert_eq!(ab.is_some(), ba.is_some());
            if let Some(p) = ab {
                for s in [a, b] {
                    let (x0, x1) = (s.start().x.min(s.end().x), s.start().x.max(s.end().x));
                    let (y0, y1) = (s.start().y.min(s.end().y), s.start().y.max(s.end().y));
                    prop_assert!(p.x >= x0 - 1e-9 && p.x <= x1 + 1e-9);
                    prop_assert!(p.y >= y0 - 1e-9 && p.y <= y1 + 1e-9);
                }
            }
        }
    }
}
