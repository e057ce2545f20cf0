//! Style binding resolution
//!
//! Plans refer to fonts and colors either literally (`"Calibri"`,
//! `"#1f4e79"`) or through theme tokens (`"theme.body"`, `"theme.text"`).
//! Tokens are mapped onto what the slide actually uses.

use crate::model::context::SlideContext;
use crate::model::plan::StyleBindings;

const TITLE_FONT_WEIGHT: f64 = 0.25;
const TITLE_COLOR_WEIGHT: f64 = 0.4;
const DARKNESS_BONUS: f64 = 0.25;

/// Concrete font and color for a new text box
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedStyle {
    pub font: Option<String>,
    pub color: Option<String>,
}

/// Bindings used for new text boxes when the operation supplied none
pub fn default_bindings() -> StyleBindings {
    StyleBindings {
        font: Some("theme.body".to_string()),
        color: None,
    }
}

/// Resolve font/color bindings against the slide snapshot
pub fn resolve_style_bindings(bindings: &StyleBindings, context: &SlideContext) -> ResolvedStyle {
    let fonts = &context.theme_hints.fonts;
    let colors = &context.theme_hints.colors;

    let font = non_blank(bindings.font.as_deref()).and_then(|raw| {
        let lower = raw.to_lowercase();
        if !lower.starts_with("theme.") {
            return Some(raw.to_string());
        }
        let found = if lower.contains("title") {
            likely_title_font(context)
        } else {
            likely_body_font(context)
        };
        found.or_else(|| fonts.first().cloned())
    });

    let color = non_blank(bindings.color.as_deref()).and_then(|raw| {
        let lower = raw.to_lowercase();
        if !lower.starts_with("theme.") {
            normalize_color(raw)
        } else if lower.contains("text") {
            pick_text_color(colors, context)
        } else {
            pick_accent_color(colors)
        }
    });

    ResolvedStyle { font, color }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn is_title_name(name: &str) -> bool {
    name.to_lowercase().contains("title")
}

fn likely_title_font(context: &SlideContext) -> Option<String> {
    context
        .objects
        .iter()
        .filter(|obj| is_title_name(&obj.name))
        .find_map(|obj| obj.style.known_font())
        .map(str::to_string)
}

/// Pick the entry with the highest score, keeping the first one seen on ties
fn best_scored(scores: Vec<(String, f64)>) -> Option<String> {
    let mut best: Option<(String, f64)> = None;
    for (value, score) in scores {
        if best.as_ref().map_or(true, |(_, s)| score > *s) {
            best = Some((value, score));
        }
    }
    best.map(|(value, _)| value)
}

/// Accumulate weights per value, preserving first-seen order
fn tally(entries: impl Iterator<Item = (String, f64)>) -> Vec<(String, f64)> {
    let mut counts: Vec<(String, f64)> = Vec::new();
    for (value, weight) in entries {
        match counts.iter_mut().find(|(v, _)| *v == value) {
            Some((_, total)) => *total += weight,
            None => counts.push((value, weight)),
        }
    }
    counts
}

fn likely_body_font(context: &SlideContext) -> Option<String> {
    let counts = tally(context.objects.iter().filter_map(|obj| {
        let font = obj.style.known_font()?;
        let weight = if is_title_name(&obj.name) { TITLE_FONT_WEIGHT } else { 1.0 };
        Some((font.to_string(), weight))
    }));
    best_scored(counts)
}

fn likely_body_color(context: &SlideContext) -> Option<String> {
    let counts = tally(context.objects.iter().filter_map(|obj| {
        let color = normalize_color(obj.style.known_color()?)?;
        let weight = if is_title_name(&obj.name) { TITLE_COLOR_WEIGHT } else { 1.0 };
        Some((color, weight))
    }));
    let scored = counts
        .into_iter()
        .map(|(color, score)| {
            let darkness = 1.0 - luminance(&color).min(1.0);
            (color, score + darkness * DARKNESS_BONUS)
        })
        .collect();
    best_scored(scored)
}

fn pick_text_color(colors: &[String], context: &SlideContext) -> Option<String> {
    likely_body_color(context).or_else(|| {
        colors
            .iter()
            .filter_map(|c| normalize_color(c))
            .min_by(|a, b| luminance(a).total_cmp(&luminance(b)))
    })
}

fn pick_accent_color(colors: &[String]) -> Option<String> {
    let candidates: Vec<String> = colors.iter().filter_map(|c| normalize_color(c)).collect();
    candidates
        .iter()
        .find(|c| c.as_str() != "#000000" && c.as_str() != "#FFFFFF")
        .or_else(|| candidates.first())
        .cloned()
}

/// Normalize `#rrggbb` / `rrggbb` to upper-case `#RRGGBB`
pub fn normalize_color(color: &str) -> Option<String> {
    let raw = color.trim();
    let hex = raw.strip_prefix('#').unwrap_or(raw);
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(format!("#{}", hex.to_uppercase()))
    } else {
        None
    }
}

/// Relative luminance in [0, 1]; unparseable colors count as white
fn luminance(color: &str) -> f64 {
    let Some(normalized) = normalize_color(color) else {
        return 1.0;
    };
    let channel = |i: usize| {
        u8::from_str_radix(&normalized[i..i + 2], 16).map_or(1.0, |v| f64::from(v) / 255.0)
    };
    0.2126 * channel(1) + 0.7152 * channel(3) + 0.0722 * channel(5)
}
