//! Coordinate pipeline between the three spaces of a diagram.
//!
//! - **View** space: raw pixels of the host surface, origin at its top-left corner.
//! - **Pan** space: pixels of the panning surface after the zoom factor `2^scale`
//!   is applied, origin at the panning surface's own bounding box.
//! - **Node** space: logical, unscaled coordinates of graph elements, offset from
//!   pan space by the translation `(tx, ty)`.
//!
//! Composite conversions are always built from the single-step ones so that the
//! spaces cannot drift apart.

mod layout;
mod path;

pub use layout::TerminalLayout;
pub use path::EdgePath;

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 2D point. Which space it lives in is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Euclidean distance, mostly useful for tolerance checks.
    pub fn distance(self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Top-left corner of the panning surface, in view space, while it is at rest.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PanBox {
    pub left: f64,
    pub top: f64,
}

impl PanBox {
    pub const fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }
}

/// Per-diagram view state: pan translation, zoom exponent and the location of the
/// panning surface. Every conversion goes through this context object.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewTransform {
    translate: Point,
    scale: f64,
    scale_speed: f64,
    pan_box: PanBox,
    drag_offset: Point,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::new(0.001)
    }
}

impl ViewTransform {
    pub fn new(scale_speed: f64) -> Self {
        Self {
            translate: Point::default(),
            scale: 0.0,
            scale_speed,
            pan_box: PanBox::default(),
            drag_offset: Point::default(),
        }
    }

    /// Pan translation `(tx, ty)` between pan and node space.
    pub fn translate(&self) -> Point {
        self.translate
    }

    pub fn set_translate(&mut self, translate: Point) {
        self.translate = translate;
    }

    /// Zoom exponent; the rendered zoom factor is `2^scale`.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    pub fn scale_speed(&self) -> f64 {
        self.scale_speed
    }

    /// `2^scale`.
    pub fn zoom_factor(&self) -> f64 {
        self.scale.exp2()
    }

    /// Updates the resting position of the panning surface (reported by the host).
    pub fn set_pan_box(&mut self, pan_box: PanBox) {
        self.pan_box = pan_box;
    }

    /// Effective bounding box of the panning surface, including any pan drag in flight.
    pub fn pan_box(&self) -> PanBox {
        PanBox::new(
            self.pan_box.left + self.drag_offset.x,
            self.pan_box.top + self.drag_offset.y,
        )
    }

    /// View-space offset accumulated by the current pan drag.
    pub fn drag_offset(&self) -> Point {
        self.drag_offset
    }

    pub fn view_to_pan(&self, p: Point) -> Point {
        let bounds = self.pan_box();
        let inverse = (-self.scale).exp2();
        Point::new((p.x - bounds.left) * inverse, (p.y - bounds.top) * inverse)
    }

    pub fn pan_to_view(&self, p: Point) -> Point {
        let bounds = self.pan_box();
        let factor = self.zoom_factor();
        Point::new(p.x * factor + bounds.left, p.y * factor + bounds.top)
    }

    pub fn pan_to_node(&self, p: Point) -> Point {
        Point::new(p.x - self.translate.x, p.y - self.translate.y)
    }

    pub fn node_to_pan(&self, p: Point) -> Point {
        Point::new(p.x + self.translate.x, p.y + self.translate.y)
    }

    pub fn node_to_view(&self, p: Point) -> Point {
        self.pan_to_view(self.node_to_pan(p))
    }

    pub fn view_to_node(&self, p: Point) -> Point {
        self.pan_to_node(self.view_to_pan(p))
    }

    /// Converts a view-space pointer delta into a node-space delta.
    pub fn view_delta_to_node(&self, dx: f64, dy: f64) -> (f64, f64) {
        let inverse = (-self.scale).exp2();
        (dx * inverse, dy * inverse)
    }

    /// Applies a wheel delta at `cursor` (view space).
    ///
    /// The translation is corrected afterwards so the node-space point that was
    /// under the cursor stays under it.
    pub fn zoom_at(&mut self, delta_y: f64, cursor: Point) {
        let before = self.view_to_pan(cursor);
        self.scale -= delta_y * self.scale_speed;
        let after = self.view_to_pan(cursor);

        self.translate.x += after.x - before.x;
        self.translate.y += after.y - before.y;
    }

    /// Moves the panning surface by a view-space delta during a pan drag.
    pub(crate) fn shift_pan(&mut self, dx: f64, dy: f64) {
        self.drag_offset.x += dx;
        self.drag_offset.y += dy;
    }

    /// Folds the accumulated pan drag into the translation and resets the surface.
    pub(crate) fn commit_pan(&mut self) {
        let (dx, dy) = self.view_delta_to_node(self.drag_offset.x, self.drag_offset.y);
        self.translate.x += dx;
        self.translate.y += dy;
        self.drag_offset = Point::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        a.distance(b) < 1e-9
    }

    #[test]
    fn identity_state_maps_view_to_node_by_pan_box() {
        let mut view = ViewTransform::default();
        view.set_pan_box(PanBox::new(10.0, 20.0));
        assert_eq!(view.view_to_pan(Point::new(15.0, 25.0)), Point::new(5.0, 5.0));
        assert_eq!(view.view_to_node(Point::new(15.0, 25.0)), Point::new(5.0, 5.0));
    }

    #[test]
    fn node_to_view_is_composed() {
        let mut view = ViewTransform::default();
        view.set_pan_box(PanBox::new(3.0, -4.0));
        view.set_scale(1.5);
        view.set_translate(Point::new(12.0, 7.0));
        let p = Point::new(40.0, -8.0);
        assert!(close(view.node_to_view(p), view.pan_to_view(view.node_to_pan(p))));
    }

    #[test]
    fn pan_commit_keeps_nodes_in_place() {
        let mut view = ViewTransform::default();
        view.set_scale(-0.75);
        let node = Point::new(100.0, 50.0);
        view.shift_pan(30.0, -12.0);
        let during = view.node_to_view(node);
        view.commit_pan();
        assert_eq!(view.drag_offset(), Point::default());
        assert!(close(view.node_to_view(node), during));
    }
}
