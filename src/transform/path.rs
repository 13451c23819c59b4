use super::Point;

/// View-space cubic bezier of a connection, flowing from an output terminal to an
/// input terminal. Control points extend horizontally from both ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgePath {
    pub from: Point,
    pub control_from: Point,
    pub control_to: Point,
    pub to: Point,
}

impl EdgePath {
    /// Builds the curve with a horizontal control offset of `control_distance`
    /// view pixels (callers scale it by the zoom factor).
    pub fn between(from: Point, to: Point, control_distance: f64) -> Self {
        Self {
            from,
            control_from: from.offset(control_distance, 0.0),
            control_to: to.offset(-control_distance, 0.0),
            to,
        }
    }

    /// SVG path command, e.g. `M 10 20 C 110 20 40 80 140 80`.
    pub fn to_svg(&self) -> String {
        format!(
            "M {} {} C {} {} {} {} {} {}",
            self.from.x,
            self.from.y,
            self.control_from.x,
            self.control_from.y,
            self.control_to.x,
            self.control_to.y,
            self.to.x,
            self.to.y
        )
    }

    /// Point on the curve at `t` in `[0, 1]`.
    pub fn point_at(&self, t: f64) -> Point {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
        Point::new(
            a * self.from.x + b * self.control_from.x + c * self.control_to.x + d * self.to.x,
            a * self.from.y + b * self.control_from.y + c * self.control_to.y + d * self.to.y,
        )
    }
}
