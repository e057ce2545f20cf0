//! Insert-safety policy: may an insert overwrite an existing shape's text?
//!
//! The policy only ever says yes for unauthored shapes. Saying no costs a
//! new text box; saying yes wrongly destroys authored content.

use std::collections::HashSet;

use crate::host::ShapeInfo;
use crate::model::context::{is_placeholder_text, SlideContext};

use super::index::{backing_object, display_name, ShapeIndex};
use super::target::first_selected;

/// Placeholder candidates on the lower part of the slide get a boost
const LOWER_HALF_TOP: f64 = 220.0;
const EMPTY_BOOST: f64 = 1.8;
const LOWER_HALF_BOOST: f64 = 1.2;

fn names_title(context: &SlideContext, shape: &ShapeInfo) -> bool {
    let object_name = backing_object(context, shape)
        .map(|obj| obj.name.to_lowercase())
        .unwrap_or_default();
    shape.name.to_lowercase().contains("title") || object_name.contains("title")
}

fn snapshot_text<'a>(context: &'a SlideContext, shape: &ShapeInfo) -> &'a str {
    backing_object(context, shape).map_or("", |obj| obj.text.trim())
}

/// Decide whether an insert may replace the text of `shape`.
///
/// Titles are never overwritten. Empty or placeholder-text shapes are safe.
/// Anything else holds authored text and is refused, however the insert
/// reached it (selection, placeholder anchor or alternative search).
pub fn is_safe_insert_target(shape: &ShapeInfo, context: &SlideContext) -> bool {
    !names_title(context, shape) && is_placeholder_text(snapshot_text(context, shape))
}

fn is_placeholder_like(name: &str, text: &str) -> bool {
    name.contains("placeholder")
        || name.contains("subtitle")
        || name.contains("content")
        || text.to_lowercase().contains("click to add")
}

/// Pick one other shape an insert may write into after its own target was rejected.
///
/// The current selection wins if it is safe and unclaimed. Otherwise the
/// best unclaimed, safe, placeholder-like shape from the snapshot is chosen,
/// ranked by area with boosts for empty text and for sitting lower on the
/// slide.
pub fn alternative_insert_target<'a>(
    index: &'a ShapeIndex,
    context: &SlideContext,
    used: &HashSet<String>,
    excluded: &HashSet<String>,
) -> Option<&'a ShapeInfo> {
    let available = |shape: &ShapeInfo| !used.contains(&shape.id) && !excluded.contains(&shape.id);

    if let Some(selected) = first_selected(index, context) {
        if available(selected) && is_safe_insert_target(selected, context) {
            return Some(selected);
        }
    }

    index
        .iter()
        .filter(|shape| available(shape))
        .filter_map(|shape| {
            let obj = backing_object(context, shape)?;
            let name = display_name(context, shape);
            let text = obj.text.trim();
            if !is_placeholder_like(&name, text) {
                return None;
            }
            if !is_safe_insert_target(shape, context) {
                return None;
            }
            let bbox = obj.bbox.unwrap_or(shape.bbox);
            let mut score = bbox.area();
            if is_placeholder_text(text) {
                score *= EMPTY_BOOST;
            }
            if bbox.top > LOWER_HALF_TOP {
                score *= LOWER_HALF_BOOST;
            }
            Some((score, shape))
        })
        .max_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, shape)| shape)
}
