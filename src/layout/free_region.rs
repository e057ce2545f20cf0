//! Free-region placement for new content
//!
//! [`place`] walks a fixed precedence: a preferred rectangle (from a
//! resolved shape or a subtitle reservation), a named region requested by
//! the anchor, an explicit plan bbox, and finally a scored candidate search
//! over the slide. Every result is sanitized.

use serde::Serialize;

use crate::geometry::{Rect, SlideSize};
use crate::model::context::SlideContext;

use super::bounds::{is_in_slide_bounds, is_reasonable_box, looks_like_corner_default, sanitize};
use super::config::LayoutConfig;
use super::occupancy::total_overlap;
use super::text::estimate_height;
use super::title::detect_title;

/// Slide dimensions plus the detected title, computed once per plan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideFrame {
    pub size: SlideSize,
    pub title: Option<Rect>,
}

impl SlideFrame {
    pub fn new(size: SlideSize, title: Option<Rect>) -> Self {
        Self { size, title }
    }

    pub fn from_context(context: &SlideContext, config: &LayoutConfig) -> Self {
        let size = context.slide_size();
        Self {
            size,
            title: detect_title(context, size, &config.title),
        }
    }

    /// Vertical position new content should gravitate to
    pub fn preferred_top(&self) -> f64 {
        match self.title {
            Some(title) => (title.bottom() + 18.0).max(80.0).min(self.size.height - 160.0),
            None => (self.size.height * 0.45).floor(),
        }
    }
}

/// Named slide regions a free-region anchor may ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedRegion {
    RightHalf,
    LeftHalf,
}

impl NamedRegion {
    /// Recognise a region name inside an anchor reference ("right-half-of-slide")
    pub fn from_ref(reference: &str) -> Option<Self> {
        let lower = reference.to_lowercase();
        if lower.contains("right-half") {
            Some(NamedRegion::RightHalf)
        } else if lower.contains("left-half") {
            Some(NamedRegion::LeftHalf)
        } else {
            None
        }
    }

    /// Region rectangle before sanitizing
    pub fn rect(self, slide: SlideSize) -> Rect {
        let left_ratio = match self {
            NamedRegion::RightHalf => 0.52,
            NamedRegion::LeftHalf => 0.06,
        };
        Rect::new(
            (slide.width * left_ratio).floor(),
            (slide.height * 0.34).floor(),
            (slide.width * 0.42).floor().max(300.0),
            (slide.height * 0.44).floor().max(180.0),
        )
    }
}

/// Inputs to one placement decision
#[derive(Debug, Clone, Copy, Default)]
pub struct PlacementRequest<'a> {
    /// Text (or text rendering of the payload) used to size the box
    pub text: &'a str,
    /// Rectangle of a resolved shape or a subtitle reservation
    pub preferred: Option<Rect>,
    /// Anchor reference, checked for named regions
    pub anchor_ref: Option<&'a str>,
    /// Bounding box supplied by the plan
    pub explicit_bbox: Option<Rect>,
}

impl<'a> PlacementRequest<'a> {
    pub fn for_text(text: &'a str) -> Self {
        Self {
            text,
            ..Self::default()
        }
    }

    pub fn with_preferred(mut self, preferred: Option<Rect>) -> Self {
        self.preferred = preferred;
        self
    }

    pub fn with_anchor_ref(mut self, anchor_ref: Option<&'a str>) -> Self {
        self.anchor_ref = anchor_ref;
        self
    }

    pub fn with_explicit_bbox(mut self, bbox: Option<Rect>) -> Self {
        self.explicit_bbox = bbox;
        self
    }
}

/// Which rule produced a placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlacementSource {
    Preferred,
    NamedRegion,
    Explicit,
    FreeRegion,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub rect: Rect,
    pub source: PlacementSource,
}

/// Compute a sanitized rectangle for new content
pub fn place(
    frame: &SlideFrame,
    request: &PlacementRequest<'_>,
    occupied: &[Rect],
    config: &LayoutConfig,
) -> Placement {
    let slide = frame.size;
    let finish = |rect: Rect, source| Placement {
        rect: sanitize(rect, slide, config),
        source,
    };

    if let Some(preferred) = request.preferred {
        if is_reasonable_box(&preferred, slide, config) {
            return finish(preferred, PlacementSource::Preferred);
        }
    }

    if let Some(region) = request.anchor_ref.and_then(NamedRegion::from_ref) {
        return finish(region.rect(slide), PlacementSource::NamedRegion);
    }

    if let Some(explicit) = request.explicit_bbox {
        if is_reasonable_box(&explicit, slide, config) && !looks_like_corner_default(&explicit) {
            return finish(explicit, PlacementSource::Explicit);
        }
    }

    if let Some(rect) = best_free_region(frame, request.text, request.preferred.as_ref(), occupied, config) {
        return Placement {
            rect,
            source: PlacementSource::FreeRegion,
        };
    }

    finish(centered_fallback(slide, request.text, config), PlacementSource::Fallback)
}

/// Desired (width, height) of new content on this slide
fn desired_size(slide: SlideSize, text: &str, config: &LayoutConfig) -> (f64, f64) {
    let (min_h, max_h) = config.height_range;
    let estimated = estimate_height(text, config.text.font_size, config.text.chars_per_line);
    let height = estimated.max(min_h).min(max_h);
    let width = (slide.width * config.width_ratio)
        .floor()
        .max(config.min_desired_width)
        .min(slide.width - config.margin * 2.0);
    (width, height)
}

fn candidate_rects(frame: &SlideFrame, text: &str, occupied: &[Rect], config: &LayoutConfig) -> Vec<Rect> {
    let slide = frame.size;
    let margin = config.margin;
    let (width, height) = desired_size(slide, text, config);
    let center_left = ((slide.width - width) / 2.0).floor().max(margin);

    let mut candidates = Vec::new();

    if let Some(title) = frame.title {
        let top = (title.bottom() + config.title_gap).min(slide.height - height - margin);
        candidates.push(Rect::new(center_left, top, width, height));
    }

    candidates.push(Rect::new(
        center_left,
        (slide.height * 0.48).floor(),
        width,
        height.min((slide.height * 0.42).floor()),
    ));

    let mut by_bottom: Vec<&Rect> = occupied.iter().collect();
    by_bottom.sort_by(|a, b| a.bottom().total_cmp(&b.bottom()));
    for rect in by_bottom {
        let top = rect.bottom() + config.stack_gap;
        let h = (slide.height - top - margin).min(height).max(100.0);
        candidates.push(Rect::new(center_left, top, width, h));
    }

    let mut columns = vec![
        center_left,
        margin,
        (slide.width - width - margin).floor().max(margin),
    ];
    columns.extend(
        config
            .sweep_columns
            .iter()
            .map(|ratio| (slide.width * ratio).floor().max(margin)),
    );
    let mut unique_columns: Vec<f64> = Vec::with_capacity(columns.len());
    for x in columns {
        if x.is_finite() && !unique_columns.contains(&x) {
            unique_columns.push(x);
        }
    }

    let stride = config.sweep_stride.max(1.0);
    let y_end = (slide.height - height - margin).floor().max(margin);
    let mut y = margin;
    while y <= y_end {
        for &x in &unique_columns {
            candidates.push(Rect::new(x, y, width, height));
        }
        y += stride;
    }

    candidates
}

/// Search for the lowest-penalty rectangle for `text`.
///
/// Candidates are sanitized before scoring so the returned rectangle is
/// exactly the one that was scored. Any zero-overlap candidate beats every
/// overlapping one; among equals the weighted score decides. Returns `None`
/// when no candidate survives the bounds and minimum-size filter.
pub fn best_free_region(
    frame: &SlideFrame,
    text: &str,
    hint: Option<&Rect>,
    occupied: &[Rect],
    config: &LayoutConfig,
) -> Option<Rect> {
    let slide = frame.size;
    let weights = &config.scoring;
    let (min_w, min_h) = config.candidate_min_size;
    let preferred_top = frame.preferred_top();

    candidate_rects(frame, text, occupied, config)
        .into_iter()
        .map(|raw| sanitize(raw, slide, config))
        .filter(|c| is_in_slide_bounds(c, slide, config.margin))
        .filter(|c| c.width >= min_w && c.height >= min_h)
        .map(|c| {
            let overlap = total_overlap(&c, occupied);
            let center = (c.center_x() - slide.width / 2.0).abs();
            let vertical = (c.top - preferred_top).abs();
            let hint_distance = hint.map_or(0.0, |h| c.distance_to(h));
            let score = weights.overlap * overlap
                + weights.center * center
                + weights.top * vertical
                + weights.hint * hint_distance;
            (overlap > 0.0, score, c)
        })
        .min_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)))
        .map(|(_, _, rect)| rect)
}

/// Centered box sized from the text, used when the search finds nothing
fn centered_fallback(slide: SlideSize, text: &str, config: &LayoutConfig) -> Rect {
    let width = (slide.width - 120.0).max(520.0);
    let height = estimate_height(text, 16.0, config.text.chars_per_line)
        .max(190.0)
        .min(340.0);
    Rect::new(
        ((slide.width - width) / 2.0).floor().max(30.0),
        (((slide.height - height) / 2.0).floor() + 20.0).max(120.0),
        width,
        height,
    )
}
