//! Edge curve geometry.
//!
//! Every rendered edge is one of three shapes: a straight segment, a cubic
//! bezier bowed sideways by its lateral offset, or a circular self-loop
//! hanging off the top of its node. [`EdgeCurve`] builds those shapes,
//! measures point distance for hit-testing and emits SVG path commands for
//! Slint `Path` elements.

/// A point in graph coordinates.
pub type Point = (f32, f32);

/// Cubic bezier curve for distance calculations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub p0: Point, // Start point
    pub p1: Point, // Control point 1
    pub p2: Point, // Control point 2
    pub p3: Point, // End point
}

impl CubicBezier {
    /// Degree-elevate a quadratic curve `start -> control -> end`.
    pub fn from_quadratic(start: Point, control: Point, end: Point) -> Self {
        const TWO_THIRDS: f32 = 2.0 / 3.0;
        CubicBezier {
            p0: start,
            p1: (
                start.0 + TWO_THIRDS * (control.0 - start.0),
                start.1 + TWO_THIRDS * (control.1 - start.1),
            ),
            p2: (
                end.0 + TWO_THIRDS * (control.0 - end.0),
                end.1 + TWO_THIRDS * (control.1 - end.1),
            ),
            p3: end,
        }
    }

    /// Evaluate the bezier curve at parameter t (0.0 to 1.0)
    pub fn eval(&self, t: f32) -> Point {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        let x = mt3 * self.p0.0
            + 3.0 * mt2 * t * self.p1.0
            + 3.0 * mt * t2 * self.p2.0
            + t3 * self.p3.0;
        let y = mt3 * self.p0.1
            + 3.0 * mt2 * t * self.p1.1
            + 3.0 * mt * t2 * self.p2.1
            + t3 * self.p3.1;

        (x, y)
    }
}

/// Squared distance from a point to a line segment
fn distance_to_line_segment_sq(point: Point, a: Point, b: Point) -> f32 {
    let ab = (b.0 - a.0, b.1 - a.1);
    let ap = (point.0 - a.0, point.1 - a.1);

    let ab_len_sq = ab.0 * ab.0 + ab.1 * ab.1;

    if ab_len_sq < f32::EPSILON {
        return ap.0 * ap.0 + ap.1 * ap.1;
    }

    // Project onto the line, clamped to the segment
    let t = ((ap.0 * ab.0 + ap.1 * ab.1) / ab_len_sq).clamp(0.0, 1.0);
    let closest = (a.0 + t * ab.0, a.1 + t * ab.1);

    let dx = point.0 - closest.0;
    let dy = point.1 - closest.1;
    dx * dx + dy * dy
}

/// Distance from a point to a line segment.
pub fn distance_to_segment(point: Point, a: Point, b: Point) -> f32 {
    distance_to_line_segment_sq(point, a, b).sqrt()
}

/// Minimum distance from a point to a cubic bezier curve.
///
/// The curve is flattened into `num_samples` segments; 0 falls back to 20.
pub fn distance_to_bezier(point: Point, bezier: &CubicBezier, num_samples: usize) -> f32 {
    let num_samples = if num_samples == 0 { 20 } else { num_samples };

    let mut min_dist_sq = f32::MAX;
    let mut prev_point = bezier.eval(0.0);

    for i in 1..=num_samples {
        let t = i as f32 / num_samples as f32;
        let curr_point = bezier.eval(t);

        let dist_sq = distance_to_line_segment_sq(point, prev_point, curr_point);
        if dist_sq < min_dist_sq {
            min_dist_sq = dist_sq;
        }

        prev_point = curr_point;
    }

    min_dist_sq.sqrt()
}

/// Resolved shape of an edge in graph coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeCurve {
    Straight { from: Point, to: Point },
    Curved(CubicBezier),
    Loop { center: Point, radius: f32 },
}

impl EdgeCurve {
    /// Shape for an edge between two distinct node centers.
    ///
    /// `offset` is the lateral displacement of the curve's midpoint, measured
    /// along the left normal of the canonical direction. When `reversed` is
    /// set the canonical direction runs `to -> from`.
    pub fn lateral(from: Point, to: Point, offset: f32, reversed: bool) -> Self {
        if offset == 0.0 {
            return EdgeCurve::Straight { from, to };
        }

        let (a, b) = if reversed { (to, from) } else { (from, to) };
        let dx = b.0 - a.0;
        let dy = b.1 - a.1;
        let len = (dx * dx + dy * dy).sqrt();
        if len < f32::EPSILON {
            return EdgeCurve::Straight { from, to };
        }

        let normal = (-dy / len, dx / len);
        let mid = ((from.0 + to.0) * 0.5, (from.1 + to.1) * 0.5);
        // A quadratic peaks halfway towards its control point
        let control = (
            mid.0 + normal.0 * 2.0 * offset,
            mid.1 + normal.1 * 2.0 * offset,
        );
        EdgeCurve::Curved(CubicBezier::from_quadratic(from, control, to))
    }

    /// Self-loop drawn as a circle centered on the top of the node outline.
    pub fn self_loop(node_center: Point, bordered_radius: f32, loop_radius: f32) -> Self {
        EdgeCurve::Loop {
            center: (node_center.0, node_center.1 - bordered_radius),
            radius: loop_radius,
        }
    }

    /// Distance from `point` to the drawn curve.
    pub fn distance_to(&self, point: Point, samples: usize) -> f32 {
        match self {
            EdgeCurve::Straight { from, to } => distance_to_segment(point, *from, *to),
            EdgeCurve::Curved(bezier) => distance_to_bezier(point, bezier, samples),
            EdgeCurve::Loop { center, radius } => {
                let dx = point.0 - center.0;
                let dy = point.1 - center.1;
                ((dx * dx + dy * dy).sqrt() - radius).abs()
            }
        }
    }

    /// SVG path commands (e.g. `"M 0 0 C 10 5 20 5 30 0"`).
    pub fn to_path_commands(&self) -> String {
        match self {
            EdgeCurve::Straight { from, to } => {
                format!("M {} {} L {} {}", from.0, from.1, to.0, to.1)
            }
            EdgeCurve::Curved(b) => format!(
                "M {} {} C {} {} {} {} {} {}",
                b.p0.0, b.p0.1, b.p1.0, b.p1.1, b.p2.0, b.p2.1, b.p3.0, b.p3.1
            ),
            EdgeCurve::Loop { center, radius } => {
                let left = center.0 - radius;
                let right = center.0 + radius;
                format!(
                    "M {left} {y} A {r} {r} 0 1 0 {right} {y} A {r} {r} 0 1 0 {left} {y}",
                    y = center.1,
                    r = radius
                )
            }
        }
    }
}
