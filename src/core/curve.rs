use serde::{Deserialize, Serialize};

use crate::core::types::{Point, Rect};
use crate::error::{ChartError, ChartResult};

/// Default smoothness applied to line strokes.
pub const DEFAULT_LINE_SMOOTHNESS: f64 = 0.1;
/// Background fills use a flatter curve than their outline.
pub const DEFAULT_FILL_SMOOTHNESS: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    CubicTo {
        control1: Point,
        control2: Point,
        to: Point,
    },
    Close,
}

/// Backend-independent vector path in pixel space.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Straight polyline through `points`.
    #[must_use]
    pub fn polyline(points: &[Point]) -> Self {
        let mut path = Self::new();
        if let Some((first, rest)) = points.split_first() {
            path.move_to(*first);
            for point in rest {
                path.line_to(*point);
            }
        }
        path
    }

    /// Single segment between two points.
    #[must_use]
    pub fn segment(from: Point, to: Point) -> Self {
        Self::polyline(&[from, to])
    }

    pub fn move_to(&mut self, point: Point) {
        self.commands.push(PathCommand::MoveTo(point));
    }

    pub fn line_to(&mut self, point: Point) {
        self.commands.push(PathCommand::LineTo(point));
    }

    pub fn cubic_to(&mut self, control1: Point, control2: Point, to: Point) {
        self.commands.push(PathCommand::CubicTo {
            control1,
            control2,
            to,
        });
    }

    pub fn close(&mut self) {
        self.commands.push(PathCommand::Close);
    }

    /// Appends every command of `other`, keeping its subpaths separate.
    pub fn append(&mut self, other: &Self) {
        self.commands.extend_from_slice(&other.commands);
    }

    #[must_use]
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Last point reached by the path, if any.
    #[must_use]
    pub fn current_point(&self) -> Option<Point> {
        self.commands.iter().rev().find_map(|command| match command {
            PathCommand::MoveTo(point) | PathCommand::LineTo(point) => Some(*point),
            PathCommand::CubicTo { to, .. } => Some(*to),
            PathCommand::Close => None,
        })
    }

    /// Number of `MoveTo` commands.
    #[must_use]
    pub fn subpath_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, PathCommand::MoveTo(_)))
            .count()
    }

    pub fn validate(&self) -> ChartResult<()> {
        let finite = self.commands.iter().all(|command| match command {
            PathCommand::MoveTo(point) | PathCommand::LineTo(point) => point.is_finite(),
            PathCommand::CubicTo {
                control1,
                control2,
                to,
            } => control1.is_finite() && control2.is_finite() && to.is_finite(),
            PathCommand::Close => true,
        });
        if !finite {
            return Err(ChartError::InvalidData(
                "path coordinates must be finite".to_owned(),
            ));
        }
        Ok(())
    }
}

impl From<Rect> for Path {
    fn from(rect: Rect) -> Self {
        let mut path = Self::polyline(&[
            rect.origin(),
            Point::new(rect.max_x(), rect.min_y()),
            Point::new(rect.max_x(), rect.max_y()),
            Point::new(rect.min_x(), rect.max_y()),
        ]);
        path.close();
        path
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CurveStyle {
    Segmented,
    Smooth { smoothness: f64 },
}

impl CurveStyle {
    #[must_use]
    pub fn build(self, points: &[Point]) -> Path {
        match self {
            Self::Segmented => Path::polyline(points),
            Self::Smooth { smoothness } => smooth_curve(points, smoothness),
        }
    }
}

/// Curve through `points` whose control points mirror around each vertex.
///
/// Control points are clamped so the curve never overshoots the vertical
/// range of neighbouring points. Two points produce a straight segment.
#[must_use]
pub fn smooth_curve(points: &[Point], smoothness: f64) -> Path {
    let mut path = Path::new();
    let Some(&first) = points.first() else {
        return path;
    };
    path.move_to(first);
    if points.len() == 2 {
        path.line_to(points[1]);
        return path;
    }

    let mut previous = first;
    let mut carried_control: Option<Point> = None;
    for (index, &current) in points.iter().enumerate().skip(1) {
        let next = points.get(index + 1).copied();
        let control = next.map(|next| control_point(previous, current, next, smoothness));

        path.cubic_to(
            carried_control.unwrap_or(previous),
            control.unwrap_or(current),
            current,
        );

        previous = current;
        carried_control = control.map(|control| antipodal(control, current));
    }
    path
}

/// Curve with horizontal control points; `smoothness` is clamped to `[0, 1]`.
///
/// With `anchor_to_zero` the curve starts from the origin and ends by
/// dropping to `y = 0` under its last point.
#[must_use]
pub fn playful_curve(points: &[Point], smoothness: f64, anchor_to_zero: bool) -> Path {
    let mut path = Path::new();
    let Some(&first) = points.first() else {
        return path;
    };
    if anchor_to_zero {
        path.move_to(Point::ZERO);
        path.line_to(first);
    } else {
        path.move_to(first);
    }

    let percent = smoothness.clamp(0.0, 1.0);
    let mut previous = first;
    for &current in &points[1..] {
        let low = previous.x.min(current.x);
        let high = previous.x.max(current.x);
        let control1 = Point::new(low + (high - low) * percent, previous.y);
        let control2 = Point::new(high + (low - high) * percent, current.y);
        path.cubic_to(control1, control2, current);
        previous = current;
    }

    if anchor_to_zero {
        path.line_to(Point::new(previous.x, 0.0));
    }
    path
}

fn antipodal(point: Point, center: Point) -> Point {
    let diff_y = (point.y - center.y).abs();
    let sign = if point.y < center.y { 1.0 } else { -1.0 };
    Point::new(2.0 * center.x - point.x, center.y + diff_y * sign)
}

fn between(value: f64, a: f64, b: f64) -> bool {
    value >= a.min(b) && value <= a.max(b)
}

fn control_point(p1: Point, p2: Point, p3: Point, smoothness: f64) -> Point {
    let left_mid = p1.midpoint(p2);
    let right_mid = p2.midpoint(p3);
    let mut control = left_mid.midpoint(antipodal(right_mid, p2));

    if between(p1.y, p2.y, control.y) {
        control.y = p1.y;
    } else if between(p2.y, p1.y, control.y) {
        control.y = p2.y;
    }

    let imagined = antipodal(control, p2);
    if between(p2.y, p3.y, imagined.y) {
        control.y = p2.y;
    }
    if between(p3.y, p2.y, imagined.y) {
        let diff_y = (p2.y - p3.y).abs();
        control.y = p2.y + diff_y * if p3.y < p2.y { 1.0 } else { -1.0 };
    }

    control.x += (p2.x - p1.x) * smoothness;
    control
}

#[cfg(test)]
mod tests {
    use super::{CurveStyle, PathCommand, smooth_curve};
    use crate::core::types::Point;

    #[test]
    fn two_points_degenerate_to_a_line() {
        let path = smooth_curve(&[Point::new(0.0, 0.0), Point::new(10.0, 5.0)], 0.1);
        assert_eq!(
            path.commands(),
            &[
                PathCommand::MoveTo(Point::new(0.0, 0.0)),
                PathCommand::LineTo(Point::new(10.0, 5.0)),
            ]
        );
    }

    #[test]
    fn segmented_style_emits_one_line_per_extra_point() {
        let points = [
            Point::new(0.0, 10.0),
            Point::new(5.0, 0.0),
            Point::new(10.0, 10.0),
        ];
        let path = CurveStyle::Segmented.build(&points);
        assert_eq!(path.commands().len(), 3);
        assert_eq!(path.current_point(), Some(Point::new(10.0, 10.0)));
    }
}
