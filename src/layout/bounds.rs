//! Bounds checks and sanitizing of placement rectangles

use crate::geometry::{ceil_to_grid, clamp, floor_to_grid, snap_to_grid, Rect, SlideSize};

use super::config::LayoutConfig;

/// Minimum width a plan- or shape-supplied box must have to be used as-is
const REASONABLE_MIN_WIDTH: f64 = 240.0;
/// Slack allowed past the slide edge for supplied boxes
const EDGE_TOLERANCE: f64 = 2.0;

/// Force a rectangle into a usable, grid-aligned box inside the slide margins.
///
/// Enforces the minimum size, snaps every component to the grid, shrinks
/// oversized boxes to the area inside the margins and clamps left/top so the
/// box keeps `margin` from the slide edges.
/// The clamp bounds are themselves grid multiples, so the result is a fixed
/// point: sanitizing twice gives the same rectangle.
pub fn sanitize(rect: Rect, slide: SlideSize, config: &LayoutConfig) -> Rect {
    let margin = config.margin;
    let grid = config.grid;
    let (min_w, min_h) = config.min_size;

    let rect = if rect.is_finite() {
        rect
    } else {
        let top = margin.max(120.0);
        Rect::new(
            margin,
            top,
            slide.width - margin * 2.0,
            (slide.height - top - margin).min(320.0),
        )
    };

    // Never wider or taller than the area inside the margins, unless the minimum size says so
    let max_w = floor_to_grid(slide.width - margin * 2.0, grid);
    let max_h = floor_to_grid(slide.height - margin * 2.0, grid);
    let width = ceil_to_grid(min_w, grid).max(snap_to_grid(rect.width, grid).min(max_w));
    let height = ceil_to_grid(min_h, grid).max(snap_to_grid(rect.height, grid).min(max_h));

    let lo = ceil_to_grid(margin, grid);
    let max_left = lo.max(floor_to_grid(slide.width - width - margin, grid));
    let max_top = lo.max(floor_to_grid(slide.height - height - margin, grid));

    Rect::new(
        clamp(snap_to_grid(rect.left, grid), lo, max_left),
        clamp(snap_to_grid(rect.top, grid), lo, max_top),
        width,
        height,
    )
}

/// A supplied box that is big enough and does not spill off the slide
pub fn is_reasonable_box(rect: &Rect, slide: SlideSize, config: &LayoutConfig) -> bool {
    rect.is_finite()
        && rect.width >= REASONABLE_MIN_WIDTH
        && rect.height >= config.min_size.1
        && rect.right() <= slide.width + EDGE_TOLERANCE
        && rect.bottom() <= slide.height + EDGE_TOLERANCE
}

/// Boxes pinned to the top-left corner are planner defaults, not intent
pub fn looks_like_corner_default(rect: &Rect) -> bool {
    rect.left <= 30.0 && rect.top <= 40.0
}

/// Entirely inside the slide with `margin` kept on every side
pub fn is_in_slide_bounds(rect: &Rect, slide: SlideSize, margin: f64) -> bool {
    rect.left >= margin
        && rect.top >= margin
        && rect.right() <= slide.width - margin
        && rect.bottom() <= slide.height - margin
}
