//! Heuristic text measurement
//!
//! Font metrics are not available, so sizes are estimated from character
//! counts: a line holds a fixed number of characters and each line costs a
//! multiple of the font size.

use crate::geometry::{Rect, SlideSize};
use crate::model::payload::normalize_escaped_newlines;

use super::config::TextEstimate;

/// Largest and smallest font size tried when fitting text into a box
const FONT_SIZE_RANGE: (u32, u32) = (30, 12);

/// Font size clamp for subtitle-like boxes
const SUBTITLE_FONT_RANGE: (f64, f64) = (18.0, 26.0);

/// Estimate how many wrapped lines `text` occupies at `chars_per_line`
pub fn count_estimated_lines(text: &str, chars_per_line: usize) -> usize {
    let cpl = chars_per_line.max(1);
    let lines: usize = text
        .lines()
        .map(|line| line.trim().chars().count().max(1).div_ceil(cpl))
        .sum();
    lines.max(1)
}

/// Estimate the box height needed for `text` at `font_size`
pub fn estimate_height(text: &str, font_size: f64, chars_per_line: usize) -> f64 {
    let normalized = normalize_escaped_newlines(text);
    let lines = count_estimated_lines(&normalized, chars_per_line) as f64;
    let line_height = (font_size * 1.35).max(16.0);
    (lines * line_height + 24.0).ceil()
}

/// Truncate long bulleted text so a new box does not overflow the slide.
///
/// Text with at most `max_bullet_lines` non-empty lines is returned as-is
/// (after newline normalization).
pub fn trim_long_bullet_text(text: &str, slide: SlideSize, estimate: &TextEstimate) -> String {
    let normalized = normalize_escaped_newlines(text);
    let lines: Vec<&str> = normalized
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect();
    if lines.len() <= estimate.max_bullet_lines {
        return normalized;
    }

    let keep = if slide.height < estimate.tall_slide_height {
        estimate.kept_lines.0
    } else {
        estimate.kept_lines.1
    };
    let mut kept: Vec<&str> = lines.into_iter().take(keep).collect();
    kept.push("...");
    kept.join("\n")
}

fn fits_in_box(text: &str, width: f64, height: f64, font_size: f64) -> bool {
    let inner_width = (width - 20.0).max(80.0);
    let inner_height = (height - 16.0).max(40.0);
    let chars_per_line = ((inner_width / (font_size * 0.52)).floor() as usize).max(10);
    let needed = count_estimated_lines(text, chars_per_line) as f64 * font_size * 1.28;
    needed <= inner_height
}

/// Largest font size at which `text` is estimated to fit inside `bbox`
pub fn readable_font_size(text: &str, bbox: &Rect) -> f64 {
    let width = bbox.width.max(120.0);
    let height = bbox.height.max(60.0);
    let (largest, smallest) = FONT_SIZE_RANGE;
    (smallest..=largest)
        .rev()
        .map(f64::from)
        .find(|&size| fits_in_box(text, width, height, size))
        .unwrap_or(f64::from(smallest))
}

/// Short one- or two-line text in a compact box near the top of the slide
pub fn is_subtitle_like(text: &str, bbox: &Rect, slide: SlideSize) -> bool {
    let clean = text.trim();
    let lines = clean.lines().filter(|l| !l.trim().is_empty()).count().max(1);
    let near_top = bbox.top < slide.height * 0.55;
    let compact = bbox.height <= 110.0;
    let short = clean.chars().count() <= 180 && lines <= 2;
    near_top && compact && short
}

/// Font size and inner margins chosen for a freshly created text box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextFit {
    pub font_size: f64,
    pub margin_x: f64,
    pub margin_y: f64,
}

/// Choose a readable font size and padding for `text` inside `bbox`
pub fn fit_text(text: &str, bbox: &Rect, slide: SlideSize) -> TextFit {
    let size = readable_font_size(text, bbox);
    if is_subtitle_like(text, bbox, slide) {
        TextFit {
            font_size: size.clamp(SUBTITLE_FONT_RANGE.0, SUBTITLE_FONT_RANGE.1),
            margin_x: 6.0,
            margin_y: 4.0,
        }
    } else {
        TextFit {
            font_size: size,
            margin_x: 10.0,
            margin_y: 8.0,
        }
    }
}
