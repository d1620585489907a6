//! Collision silhouettes.
//!
//! A [`Shape`] is the set of rectangles an element (or a segment's worth of
//! elements on one staff) occupies; the [`Skyline`] is the page's running
//! silhouette of already-placed elements per staff. The layout engine only
//! registers footprints and queries edges here; painting and the full
//! autoplacement pass live in the renderer.

use serde::{Deserialize, Serialize};

use crate::element::ElementKind;
use crate::geom::{Point, Rect};

/// One rectangle of a shape, tagged with the category of the element that
/// produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeElement {
    pub rect: Rect,
    pub kind: Option<ElementKind>,
}

impl ShapeElement {
    pub fn new(rect: Rect, kind: Option<ElementKind>) -> Self {
        ShapeElement { rect, kind }
    }

    /// Whether this rectangle belongs to a chord or rest body.
    pub fn is_chord_rest(&self) -> bool {
        matches!(self.kind, Some(ElementKind::Note) | Some(ElementKind::Rest))
    }
}

/// A collection of tagged rectangles in a common local coordinate system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    elements: Vec<ShapeElement>,
}

impl Shape {
    pub fn new() -> Self {
        Shape::default()
    }

    pub fn add(&mut self, rect: Rect, kind: Option<ElementKind>) {
        self.elements.push(ShapeElement::new(rect, kind));
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[ShapeElement] {
        &self.elements
    }

    pub fn translated(&self, by: Point) -> Shape {
        Shape {
            elements: self
                .elements
                .iter()
                .map(|e| ShapeElement::new(e.rect.translated(by), e.kind))
                .collect(),
        }
    }

    /// First rectangle belonging to a chord/rest body, if any.
    pub fn chord_rest_rect(&self) -> Option<Rect> {
        self.elements
            .iter()
            .find(|e| e.is_chord_rest())
            .map(|e| e.rect)
    }

    /// Leftmost edge of any rectangle whose vertical extent intersects the
    /// band `[top, bottom]`. Returns infinity when nothing intersects, so
    /// the result is a no-op inside min() chains.
    pub fn left_most_edge_at_height(&self, top: f64, bottom: f64) -> f64 {
        self.elements
            .iter()
            .filter(|e| e.rect.intersects_vertically(top, bottom))
            .map(|e| e.rect.left())
            .fold(f64::INFINITY, f64::min)
    }
}

/// Per-staff silhouette of placed elements, split into the region above the
/// staff (north) and below it (south).
#[derive(Debug, Clone, Default)]
pub struct Skyline {
    north: Vec<Vec<Rect>>,
    south: Vec<Vec<Rect>>,
}

impl Skyline {
    pub fn new(staves: usize) -> Self {
        Skyline {
            north: vec![Vec::new(); staves],
            south: vec![Vec::new(); staves],
        }
    }

    /// Register an element's page-space footprint on a staff.
    pub fn add(&mut self, staff: usize, rect: Rect, above: bool) {
        let side = if above { &mut self.north } else { &mut self.south };
        if let Some(row) = side.get_mut(staff) {
            row.push(rect);
        }
    }

    pub fn north(&self, staff: usize) -> &[Rect] {
        self.north.get(staff).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn south(&self, staff: usize) -> &[Rect] {
        self.south.get(staff).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_edge_ignores_rects_outside_band() {
        let mut shape = Shape::new();
        shape.add(Rect::new(5.0, 0.0, 1.0, 1.0), None);
        shape.add(Rect::new(2.0, 10.0, 1.0, 1.0), None);
        assert_eq!(shape.left_most_edge_at_height(-0.5, 0.5), 5.0);
        assert!(shape.left_most_edge_at_height(20.0, 21.0).is_infinite());
    }

    #[test]
    fn chord_rest_rect_skips_other_kinds() {
        let mut shape = Shape::new();
        shape.add(Rect::new(0.0, 0.0, 1.0, 1.0), Some(ElementKind::Accidental));
        shape.add(Rect::new(3.0, 0.0, 1.0, 1.0), Some(ElementKind::Rest));
        assert_eq!(shape.chord_rest_rect(), Some(Rect::new(3.0, 0.0, 1.0, 1.0)));
    }
}
