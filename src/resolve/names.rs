//! Exact-then-fuzzy shape name matching

use std::cmp::Ordering;

use crate::host::ShapeInfo;
use crate::model::context::SlideContext;

use super::index::{backing_object, ShapeIndex};

const RAW_CONTAINS_SCORE: u32 = 80;
const NORMALIZED_CONTAINS_SCORE: u32 = 100;
const SUBTITLE_SCORE: u32 = 60;
const TITLE_SCORE: u32 = 55;

/// Lower-case and collapse every run of non-alphanumeric characters to one space
pub fn normalize_name(value: &str) -> String {
    let lower = value.to_lowercase();
    let mut out = String::with_capacity(lower.len());
    let mut pending_space = false;
    for ch in lower.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(ch);
        } else {
            pending_space = true;
        }
    }
    out
}

/// Live shape name and snapshot object name, both trimmed and lower-cased
fn candidate_names(context: &SlideContext, shape: &ShapeInfo) -> (String, String) {
    let shape_name = shape.name.trim().to_lowercase();
    let object_name = backing_object(context, shape)
        .map(|obj| obj.name.trim().to_lowercase())
        .unwrap_or_default();
    (shape_name, object_name)
}

fn is_exact(name: &str, raw: &str, normalized: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    if name == raw {
        return true;
    }
    let name_normalized = normalize_name(name);
    !name_normalized.is_empty() && name_normalized == normalized
}

/// Find the shape a name reference points to.
///
/// An exact match on either name wins outright. Otherwise each shape is
/// scored on containment and title/subtitle cues; zero-score shapes are
/// never returned and ties go to the shape nearest the top of the slide.
pub fn find_by_name<'a>(index: &'a ShapeIndex, context: &SlideContext, query: &str) -> Option<&'a ShapeInfo> {
    let raw = query.trim().to_lowercase();
    let normalized = normalize_name(query);
    if raw.is_empty() && normalized.is_empty() {
        return None;
    }

    if let Some(exact) = index.iter().find(|shape| {
        let (shape_name, object_name) = candidate_names(context, shape);
        is_exact(&shape_name, &raw, &normalized) || is_exact(&object_name, &raw, &normalized)
    }) {
        return Some(exact);
    }

    let subtitle_query = normalized.contains("subtitle");
    let title_query = normalized.contains("title") && !subtitle_query;

    index
        .iter()
        .filter_map(|shape| {
            let (shape_name, object_name) = candidate_names(context, shape);
            let combined = format!("{} {}", shape_name, object_name).trim().to_string();
            if combined.is_empty() {
                return None;
            }
            let combined_normalized = normalize_name(&combined);

            let mut score = 0;
            if !raw.is_empty() && combined.contains(&raw) {
                score += RAW_CONTAINS_SCORE;
            }
            if !normalized.is_empty() && combined_normalized.contains(&normalized) {
                score += NORMALIZED_CONTAINS_SCORE;
            }
            if subtitle_query && combined_normalized.contains("subtitle") {
                score += SUBTITLE_SCORE;
            }
            if title_query && combined_normalized.contains("title") && !combined_normalized.contains("subtitle") {
                score += TITLE_SCORE;
            }
            (score > 0).then_some((score, shape))
        })
        .min_by(|(score_a, a), (score_b, b)| match score_b.cmp(score_a) {
            Ordering::Equal => a.bbox.top.total_cmp(&b.bbox.top),
            other => other,
        })
        .map(|(_, shape)| shape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Rect, SlideSize};

    fn index() -> ShapeIndex {
        ShapeIndex::new(vec![
            ShapeInfo::new("1", "Title 1", Rect::new(40.0, 20.0, 880.0, 80.0)),
            ShapeInfo::new("2", "Subtitle 2", Rect::new(40.0, 110.0, 880.0, 60.0)),
            ShapeInfo::new("3", "Content Placeholder 3", Rect::new(40.0, 200.0, 880.0, 300.0)),
            ShapeInfo::new("4", "Content Placeholder 4", Rect::new(40.0, 150.0, 400.0, 300.0)),
        ])
    }

    fn ctx() -> SlideContext {
        SlideContext::new(SlideSize::default())
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_name("  Content_Placeholder--2 "), "content placeholder 2");
        assert_eq!(normalize_name("Title"), "title");
        assert_eq!(normalize_name("***"), "");
    }

    #[test]
    fn test_exact_match() {
        let index = index();
        assert_eq!(find_by_name(&index, &ctx(), "title 1").map(|s| s.id.as_str()), Some("1"));
        assert_eq!(find_by_name(&index, &ctx(), "Subtitle_2").map(|s| s.id.as_str()), Some("2"));
    }

    #[test]
    fn test_subtitle_query_never_returns_title() {
        let index = index();
        assert_eq!(find_by_name(&index, &ctx(), "subtitle").map(|s| s.id.as_str()), Some("2"));

        let only_title = ShapeIndex::new(vec![ShapeInfo::new("1", "Title 1", Rect::new(0.0, 0.0, 10.0, 10.0))]);
        assert!(find_by_name(&only_title, &ctx(), "subtitle").is_none());
    }

    #[test]
    fn test_title_query_prefers_title() {
        let index = index();
        assert_eq!(find_by_name(&index, &ctx(), "title").map(|s| s.id.as_str()), Some("1"));
    }

    #[test]
    fn test_ties_prefer_higher_shape() {
        let index = index();
        assert_eq!(find_by_name(&index, &ctx(), "content").map(|s| s.id.as_str()), Some("4"));
    }

    #[test]
    fn test_no_weak_guesses() {
        let index = index();
        assert!(find_by_name(&index, &ctx(), "chart").is_none());
        assert!(find_by_name(&index, &ctx(), "   ").is_none());
    }

    #[test]
    fn test_snapshot_name_is_matched() {
        let index = ShapeIndex::new(vec![ShapeInfo::new("7", "", Rect::new(0.0, 0.0, 10.0, 10.0))]);
        let ctx = ctx().with_object(crate::model::context::SlideObject::new(
            "7",
            "Footer",
            Rect::new(0.0, 0.0, 10.0, 10.0),
        ));
        assert_eq!(find_by_name(&index, &ctx, "footer").map(|s| s.id.as_str()), Some("7"));
    }
}
