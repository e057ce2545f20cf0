//! Subtitle reservation under the detected title
//!
//! A short subtitle insert claims the band directly below the title. When
//! lower content sits too close, that content is shifted down to make room;
//! if shifting would push anything off the slide, the subtitle is compressed
//! into the remaining gap instead.
//!
//! This module only computes geometry. Moving shapes is left to the caller,
//! which applies [`ContentShift::moves`] through the host and falls back to
//! the compressed rectangle when the host refuses.

use crate::geometry::{clamp, Rect};
use crate::host::ShapeInfo;
use crate::model::plan::Operation;

use super::config::LayoutConfig;
use super::free_region::SlideFrame;
use super::text::estimate_height;

/// Lower content must be at least this high and wide to count as the body
const PRIMARY_MIN_HEIGHT: f64 = 20.0;
const PRIMARY_MIN_WIDTH: f64 = 120.0;
/// Content starting this close above the body top is shifted with it
const SHIFT_TOLERANCE: f64 = 2.0;

/// Check whether an insert asks for a subtitle with short text
pub fn is_subtitle_intent(op: &Operation, text: &str, config: &LayoutConfig) -> bool {
    let target = op.target.as_deref().unwrap_or_default().to_lowercase();
    let reference = op
        .anchor
        .as_ref()
        .and_then(|a| a.reference.as_deref())
        .unwrap_or_default()
        .to_lowercase();
    let mentions_subtitle = target.contains("subtitle")
        || reference.contains("subtitle")
        || reference.contains("below-title")
        || reference.contains("under-title");

    let len = text.trim().chars().count();
    mentions_subtitle && len > 0 && len <= config.subtitle.max_chars
}

/// Draft subtitle band below the title
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubtitleDraft {
    /// Full-height draft rectangle
    pub rect: Rect,
    /// Top of the first body content below the title, if any
    pub primary_top: Option<f64>,
    /// Free vertical space between the draft top and the body (or slide bottom)
    pub available_gap: f64,
}

impl SubtitleDraft {
    pub fn desired_height(&self) -> f64 {
        self.rect.height
    }
}

/// One shape relocation
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeMove {
    pub id: String,
    pub from: Rect,
    pub to: Rect,
}

/// Downward shift of every shape at or below `start_top`
#[derive(Debug, Clone, PartialEq)]
pub struct ContentShift {
    pub start_top: f64,
    pub delta: f64,
    pub moves: Vec<ShapeMove>,
}

/// Outcome of a subtitle reservation
#[derive(Debug, Clone, PartialEq)]
pub enum SubtitlePlacement {
    /// The draft fits in the existing gap, or there is no lower content
    Fits(Rect),
    /// The draft fits once lower content is shifted; `fallback` is the
    /// compressed rectangle to use if the shift cannot be applied
    Shift {
        bbox: Rect,
        shift: ContentShift,
        fallback: Option<Rect>,
    },
    /// Shifting was rejected; the subtitle is squeezed into the remaining gap
    Compressed(Rect),
}

/// Build the draft band under the title; `None` without a title
pub fn subtitle_draft(
    frame: &SlideFrame,
    text: &str,
    occupied: &[Rect],
    config: &LayoutConfig,
) -> Option<SubtitleDraft> {
    let title = frame.title?;
    let slide = frame.size;
    let margin = config.margin;
    let sub = &config.subtitle;

    let width = (slide.width * sub.width_ratio)
        .floor()
        .max(config.min_desired_width)
        .min(slide.width - margin * 2.0);
    let left = clamp(title.left, margin, margin.max(slide.width - width - margin));
    let top = clamp(title.bottom() + sub.gap, margin, margin.max(slide.height - 100.0 - margin));

    let (min_h, max_h) = sub.height_range;
    let height = estimate_height(text, sub.font_size, config.text.chars_per_line)
        .max(min_h)
        .min(max_h);

    let primary_top = primary_content_top(occupied, title.bottom() + 4.0);
    let available_gap = match primary_top {
        Some(primary) => primary - top,
        None => slide.height - margin - top,
    };

    Some(SubtitleDraft {
        rect: Rect::new(left, top, width, height),
        primary_top,
        available_gap,
    })
}

/// Top of the highest substantial rectangle starting at or below `min_top`
fn primary_content_top(occupied: &[Rect], min_top: f64) -> Option<f64> {
    occupied
        .iter()
        .filter(|r| r.top >= min_top && r.height > PRIMARY_MIN_HEIGHT && r.width > PRIMARY_MIN_WIDTH)
        .map(|r| r.top)
        .min_by(f64::total_cmp)
}

/// Plan moving every shape whose top is at or below `start_top` down by `delta`.
///
/// Returns `None` if any moved shape would end past the slide bottom margin;
/// in that case nothing may be moved.
pub fn plan_content_shift(
    shapes: &[ShapeInfo],
    start_top: f64,
    delta: f64,
    slide_height: f64,
    config: &LayoutConfig,
) -> Option<ContentShift> {
    let delta = delta.ceil().max(0.0);
    let limit = slide_height - config.subtitle.bottom_margin;
    let mut moves = Vec::new();

    for shape in shapes {
        let bbox = shape.bbox;
        if !bbox.is_finite() || bbox.top < start_top - SHIFT_TOLERANCE {
            continue;
        }
        if bbox.bottom() + delta > limit {
            return None;
        }
        moves.push(ShapeMove {
            id: shape.id.clone(),
            from: bbox,
            to: bbox.shifted_down(delta),
        });
    }

    Some(ContentShift {
        start_top,
        delta,
        moves,
    })
}

/// Reserve the subtitle band, returning `None` when no title exists or no
/// usable height remains (the caller then falls back to free-region placement)
pub fn reserve_subtitle(
    frame: &SlideFrame,
    text: &str,
    occupied: &[Rect],
    shapes: &[ShapeInfo],
    config: &LayoutConfig,
) -> Option<SubtitlePlacement> {
    let draft = subtitle_draft(frame, text, occupied, config)?;
    let sub = &config.subtitle;
    let desired = draft.desired_height();

    if draft.available_gap >= desired + sub.buffer {
        return Some(SubtitlePlacement::Fits(draft.rect));
    }

    let Some(primary_top) = draft.primary_top else {
        let compact = desired.min(sub.compact_max_height).max(sub.min_height);
        return Some(SubtitlePlacement::Fits(draft.rect.with_height(compact)));
    };

    let compressed = compressed_rect(&draft, config);
    let delta = (desired + sub.buffer - draft.available_gap.max(0.0)).ceil();

    match plan_content_shift(shapes, primary_top, delta, frame.size.height, config) {
        Some(shift) => Some(SubtitlePlacement::Shift {
            bbox: draft.rect,
            shift,
            fallback: compressed,
        }),
        None => compressed.map(SubtitlePlacement::Compressed),
    }
}

/// Squeeze the draft into the gap minus the buffer; `None` below the minimum height
fn compressed_rect(draft: &SubtitleDraft, config: &LayoutConfig) -> Option<Rect> {
    let sub = &config.subtitle;
    let available = draft.available_gap - sub.buffer;
    if available < sub.min_height {
        return None;
    }
    Some(draft.rect.with_height(draft.desired_height().min(available)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::SlideSize;
    use crate::model::plan::AnchorStrategy;

    fn title() -> Rect {
        Rect::new(40.0, 20.0, 880.0, 80.0)
    }

    fn frame() -> SlideFrame {
        SlideFrame::new(SlideSize::default(), Some(title()))
    }

    fn shape(id: &str, bbox: Rect) -> ShapeInfo {
        ShapeInfo::new(id, id, bbox)
    }

    #[test]
    fn test_subtitle_intent() {
        let config = LayoutConfig::default();
        let op = Operation::insert_text("x").with_anchor(AnchorStrategy::Placeholder, "Subtitle");
        assert!(is_subtitle_intent(&op, "Results for Q3", &config));
        assert!(!is_subtitle_intent(&op, "", &config));
        assert!(!is_subtitle_intent(&op, &"x".repeat(181), &config));

        let op = Operation::insert_text("x").with_anchor(AnchorStrategy::FreeRegion, "below-title");
        assert!(is_subtitle_intent(&op, "Results", &config));

        let op = Operation::insert_text("x").with_anchor(AnchorStrategy::Placeholder, "body");
        assert!(!is_subtitle_intent(&op, "Results", &config));
    }

    #[test]
    fn test_fits_without_lower_content() {
        let config = LayoutConfig::default();
        let text = "Results for the third quarter of the year";
        let placement = reserve_subtitle(&frame(), text, &[title()], &[], &config).unwrap();
        assert_eq!(placement, SubtitlePlacement::Fits(Rect::new(40.0, 110.0, 710.0, 54.0)));
    }

    #[test]
    fn test_no_title_no_reservation() {
        let config = LayoutConfig::default();
        let frame = SlideFrame::new(SlideSize::default(), None);
        assert!(reserve_subtitle(&frame, "Results", &[], &[], &config).is_none());
    }

    #[test]
    fn test_shift_when_body_is_close() {
        let config = LayoutConfig::default();
        let body = Rect::new(40.0, 120.0, 880.0, 300.0);
        let shapes = vec![shape("title", title()), shape("body", body)];
        let placement = reserve_subtitle(&frame(), "Results", &[title(), body], &shapes, &config).unwrap();

        // desired height 54 + buffer 6 against a gap of 10
        let SubtitlePlacement::Shift { bbox, shift, fallback } = placement else {
            panic!("expected a shift, got {:?}", placement);
        };
        assert_eq!(bbox, Rect::new(40.0, 110.0, 710.0, 54.0));
        assert_eq!(shift.delta, 50.0);
        assert_eq!(shift.moves.len(), 1);
        assert_eq!(shift.moves[0].id, "body");
        assert_eq!(shift.moves[0].to.top, 170.0);
        assert_eq!(fallback, None);
    }

    #[test]
    fn test_shift_rejected_then_compressed() {
        let config = LayoutConfig::default();
        let body = Rect::new(40.0, 190.0, 880.0, 330.0);
        let shapes = vec![shape("title", title()), shape("body", body)];
        let text = "A subtitle that is long enough to wrap onto a second line of text here";
        let placement = reserve_subtitle(&frame(), text, &[title(), body], &shapes, &config).unwrap();

        // gap 80 cannot hold 84 + 6 and the body cannot move
        assert_eq!(
            placement,
            SubtitlePlacement::Compressed(Rect::new(40.0, 110.0, 710.0, 74.0))
        );
    }

    #[test]
    fn test_infeasible_compression() {
        let config = LayoutConfig::default();
        let body = Rect::new(40.0, 130.0, 880.0, 380.0);
        let shapes = vec![shape("body", body)];
        assert!(reserve_subtitle(&frame(), "Results", &[title(), body], &shapes, &config).is_none());
    }
}
