//! Title detection on the canvas snapshot

use crate::geometry::{Rect, SlideSize};
use crate::model::context::{is_placeholder_text, SlideContext};

use super::config::TitleDetection;

/// Find the bounding box of the slide title.
///
/// Only objects with authored text qualify. An object is a title if its
/// name mentions "title", or if it sits near the top, spans a good part of
/// the slide width and carries short text. The topmost match wins.
pub fn detect_title(context: &SlideContext, slide: SlideSize, rules: &TitleDetection) -> Option<Rect> {
    context
        .objects
        .iter()
        .filter_map(|obj| {
            let bbox = obj.bbox?;
            let text = obj.text.trim();
            if is_placeholder_text(text) {
                return None;
            }
            let named_title = obj.name.to_lowercase().contains("title");
            let positioned_title = bbox.top < slide.height * rules.max_top_ratio
                && bbox.width > slide.width * rules.min_width_ratio
                && text.chars().count() < rules.max_chars;
            (named_title || positioned_title).then_some(bbox)
        })
        .min_by(|a, b| a.top.total_cmp(&b.top))
}
