//! Lint checks for detecting placement defects on a slide.
//!
//! Runs after a plan was applied to check the resulting canvas for
//! mechanical issues: overlapping shapes, shapes spilling off the slide and
//! shapes crowding the slide margin.

use std::fmt;

use serde::Serialize;

use crate::geometry::SlideSize;
use crate::host::ShapeInfo;
use crate::layout::bounds::is_in_slide_bounds;

/// A lint warning about a placement defect
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LintWarning {
    pub category: LintCategory,
    pub message: String,
}

/// Category of lint defect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LintCategory {
    Overlap,
    Bounds,
    Margin,
}

impl fmt::Display for LintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintCategory::Overlap => write!(f, "overlap"),
            LintCategory::Bounds => write!(f, "bounds"),
            LintCategory::Margin => write!(f, "margin"),
        }
    }
}

impl fmt::Display for LintWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.category, self.message)
    }
}

/// Run all lint checks on the current shapes.
pub fn check(shapes: &[ShapeInfo], slide: SlideSize, margin: f64) -> Vec<LintWarning> {
    let mut warnings = Vec::new();
    check_overlaps(shapes, &mut warnings);
    check_bounds(shapes, slide, margin, &mut warnings);
    warnings
}

/// Display name for a shape: its name if it has one, else its id
fn display_name(shape: &ShapeInfo) -> String {
    if shape.name.trim().is_empty() {
        format!("<{}>", shape.id)
    } else {
        format!("\"{}\"", shape.name)
    }
}

fn check_overlaps(shapes: &[ShapeInfo], warnings: &mut Vec<LintWarning>) {
    for (i, a) in shapes.iter().enumerate() {
        for b in &shapes[i + 1..] {
            if !a.bbox.overlaps(&b.bbox) {
                continue;
            }
            let overlap_w = a.bbox.right().min(b.bbox.right()) - a.bbox.left.max(b.bbox.left);
            let overlap_h = a.bbox.bottom().min(b.bbox.bottom()) - a.bbox.top.max(b.bbox.top);
            warnings.push(LintWarning {
                category: LintCategory::Overlap,
                message: format!(
                    "shapes {} and {} overlap by {:.0}x{:.0}pt",
                    display_name(a),
                    display_name(b),
                    overlap_w,
                    overlap_h
                ),
            });
        }
    }
}

fn check_bounds(shapes: &[ShapeInfo], slide: SlideSize, margin: f64, warnings: &mut Vec<LintWarning>) {
    for shape in shapes {
        if !is_in_slide_bounds(&shape.bbox, slide, 0.0) {
            warnings.push(LintWarning {
                category: LintCategory::Bounds,
                message: format!(
                    "shape {} extends outside the {:.0}x{:.0} slide",
                    display_name(shape),
                    slide.width,
                    slide.height
                ),
            });
        } else if !is_in_slide_bounds(&shape.bbox, slide, margin) {
            warnings.push(LintWarning {
                category: LintCategory::Margin,
                message: format!("shape {} is within {:.0}pt of the slide edge", display_name(shape), margin),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    fn shape(id: &str, name: &str, left: f64, top: f64, width: f64, height: f64) -> ShapeInfo {
        ShapeInfo::new(id, name, Rect::new(left, top, width, height))
    }

    #[test]
    fn test_overlap_detected() {
        let shapes = vec![
            shape("1", "a", 100.0, 100.0, 100.0, 50.0),
            shape("2", "b", 180.0, 100.0, 100.0, 50.0),
        ];
        let warnings = check(&shapes, SlideSize::default(), 24.0);
        assert_eq!(warnings.len(), 1);
        insta::assert_snapshot!(warnings[0].to_string(), @r#"[overlap] shapes "a" and "b" overlap by 20x50pt"#);
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let shapes = vec![
            shape("1", "a", 100.0, 100.0, 100.0, 50.0),
            shape("2", "b", 200.0, 100.0, 100.0, 50.0),
        ];
        assert!(check(&shapes, SlideSize::default(), 24.0).is_empty());
    }

    #[test]
    fn test_bounds_and_margin() {
        let shapes = vec![
            shape("1", "", 900.0, 100.0, 100.0, 50.0),
            shape("2", "Title 1", 40.0, 10.0, 880.0, 80.0),
        ];
        let warnings = check(&shapes, SlideSize::default(), 24.0);
        let categories: Vec<_> = warnings.iter().map(|w| w.category).collect();
        assert_eq!(categories, vec![LintCategory::Bounds, LintCategory::Margin]);
        assert!(warnings[0].message.contains("<1>"));
    }
}
