//! Occupancy model: rectangles considered taken while a plan is applied

use serde::Serialize;

use crate::geometry::Rect;
use crate::model::context::SlideContext;

/// Ordered set of occupied rectangles.
///
/// Mutated only by append (new placement) or full rebuild (after the shape
/// set or shape positions changed). Placement code only ever reads a
/// borrowed snapshot via [`Occupancy::rects`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Occupancy {
    rects: Vec<Rect>,
}

impl Occupancy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from every object of the snapshot that has a usable bbox
    pub fn from_context(context: &SlideContext) -> Self {
        Self {
            rects: context.object_rects(),
        }
    }

    pub fn from_rects(rects: impl IntoIterator<Item = Rect>) -> Self {
        Self {
            rects: rects.into_iter().filter(Rect::is_finite).collect(),
        }
    }

    /// Record a newly placed rectangle
    pub fn push(&mut self, rect: Rect) {
        if rect.is_finite() {
            self.rects.push(rect);
        }
    }

    /// Replace the model with the current shape positions
    pub fn rebuild(&mut self, rects: impl IntoIterator<Item = Rect>) {
        self.rects = rects.into_iter().filter(Rect::is_finite).collect();
    }

    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Total overlap area between `rect` and every occupied rectangle
    pub fn overlap_with(&self, rect: &Rect) -> f64 {
        total_overlap(rect, &self.rects)
    }
}

/// Sum of overlap areas between `rect` and each rectangle in `occupied`
pub fn total_overlap(rect: &Rect, occupied: &[Rect]) -> f64 {
    occupied.iter().map(|other| rect.overlap_area(other)).sum()
}
