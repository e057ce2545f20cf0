//! Snapshot of the slide canvas supplied by the canvas collector

use serde::Deserialize;

use crate::geometry::{deserialize_bbox, Rect, SlideSize};
use crate::model::plan::null_as_default;

/// Literal cue that marks unauthored placeholder boilerplate
const PLACEHOLDER_CUE: &str = "click to add";

/// Check whether text is empty or placeholder boilerplate ("Click to add title")
pub fn is_placeholder_text(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || trimmed.to_lowercase().contains(PLACEHOLDER_CUE)
}

/// Aggregate snapshot of one slide, owned for the duration of one plan application
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideContext {
    #[serde(default, deserialize_with = "null_as_default")]
    pub slide: SlideInfo,
    #[serde(default, deserialize_with = "null_as_default")]
    pub selection: Selection,
    #[serde(default, deserialize_with = "null_as_default")]
    pub theme_hints: ThemeHints,
    #[serde(default, deserialize_with = "null_as_default")]
    pub objects: Vec<SlideObject>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlideInfo {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub size: Option<SlideSize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    #[serde(default, deserialize_with = "null_as_default")]
    pub shape_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThemeHints {
    #[serde(default, deserialize_with = "null_as_default")]
    pub fonts: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub colors: Vec<String>,
}

/// Snapshot of one existing shape
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlideObject {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Collector shape type ("text", "table", "chart", "image", ...)
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "deserialize_bbox")]
    pub bbox: Option<Rect>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub style: ObjectStyle,
}

/// Text style observed on a shape; the collector reports "unknown" for missing values
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObjectStyle {
    #[serde(default)]
    pub font: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub size: Option<serde_json::Value>,
}

impl ObjectStyle {
    /// Font name, ignoring blank and "unknown" values
    pub fn known_font(&self) -> Option<&str> {
        known(self.font.as_deref())
    }

    /// Color value, ignoring blank and "unknown" values
    pub fn known_color(&self) -> Option<&str> {
        known(self.color.as_deref())
    }
}

fn known(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("unknown"))
}

impl SlideObject {
    pub fn new(id: impl Into<String>, name: impl Into<String>, bbox: Rect) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            bbox: Some(bbox),
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.style.font = Some(font.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.style.color = Some(color.into());
        self
    }

    pub fn has_placeholder_text(&self) -> bool {
        is_placeholder_text(&self.text)
    }
}

impl SlideContext {
    /// Create an empty context for a slide of the given size
    pub fn new(size: SlideSize) -> Self {
        Self {
            slide: SlideInfo {
                id: None,
                size: Some(size),
            },
            ..Self::default()
        }
    }

    /// Parse a context from the collector's JSON payload
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_object(mut self, object: SlideObject) -> Self {
        self.objects.push(object);
        self
    }

    pub fn with_selection<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selection.shape_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_theme_hints(mut self, fonts: Vec<String>, colors: Vec<String>) -> Self {
        self.theme_hints = ThemeHints { fonts, colors };
        self
    }

    /// Slide dimensions, falling back to 960x540 when missing or degenerate
    pub fn slide_size(&self) -> SlideSize {
        match self.slide.size {
            Some(size) if size.width > 0.0 && size.height > 0.0 => size,
            _ => SlideSize::default(),
        }
    }

    pub fn object(&self, id: &str) -> Option<&SlideObject> {
        self.objects.iter().find(|obj| obj.id == id)
    }

    /// Currently selected shape ids, skipping blanks
    pub fn selected_ids(&self) -> impl Iterator<Item = &str> {
        self.selection
            .shape_ids
            .iter()
            .map(String::as_str)
            .filter(|id| !id.is_empty())
    }

    /// Bounding boxes of every object with a usable bbox
    pub fn object_rects(&self) -> Vec<Rect> {
        self.objects.iter().filter_map(|obj| obj.bbox).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_collector_payload() {
        let json = r##"{
            "slide": {"id": "256", "size": {"w": 960, "h": 540}},
            "selection": {"shapeIds": ["2", ""]},
            "themeHints": {"fonts": ["Calibri"], "colors": ["#1F1F1F"]},
            "objects": [
                {"id": "2", "name": "Title 1", "type": "text", "bbox": [40, 20, 880, 80],
                 "text": "Quarterly Review", "style": {"font": "Calibri Light", "color": "unknown", "size": 40}},
                {"id": "3", "name": "Picture 2", "type": "image", "bbox": [0, 0, 0]}
            ]
        }"##;

        let ctx = SlideContext::from_json(json).unwrap();
        assert_eq!(ctx.slide_size(), SlideSize::new(960.0, 540.0));
        assert_eq!(ctx.selected_ids().collect::<Vec<_>>(), vec!["2"]);
        assert_eq!(ctx.objects.len(), 2);
        assert_eq!(ctx.objects[0].bbox, Some(Rect::new(40.0, 20.0, 880.0, 80.0)));
        assert_eq!(ctx.objects[0].style.known_font(), Some("Calibri Light"));
        assert_eq!(ctx.objects[0].style.known_color(), None);
        assert_eq!(ctx.objects[1].bbox, None);
        assert_eq!(ctx.object_rects().len(), 1);
    }

    #[test]
    fn test_null_fields_read_as_absent() {
        let json = r#"{
            "slide": null,
            "selection": {"shapeIds": null},
            "themeHints": {"fonts": null, "colors": null},
            "objects": [
                {"id": "2", "name": null, "type": null, "bbox": [40, 140, 880, 300], "text": null, "style": null}
            ]
        }"#;

        let ctx = SlideContext::from_json(json).unwrap();
        assert_eq!(ctx.slide_size(), SlideSize::default());
        assert_eq!(ctx.selected_ids().count(), 0);
        assert_eq!(ctx.objects[0].name, "");
        assert_eq!(ctx.objects[0].text, "");
        assert_eq!(ctx.objects[0].style.known_font(), None);
    }

    #[test]
    fn test_missing_size_falls_back_to_default() {
        let ctx = SlideContext::from_json("{}").unwrap();
        assert_eq!(ctx.slide_size(), SlideSize::default());
    }

    #[test]
    fn test_placeholder_text() {
        assert!(is_placeholder_text(""));
        assert!(is_placeholder_text("   "));
        assert!(is_placeholder_text("Click to add subtitle"));
        assert!(!is_placeholder_text("Revenue grew 12%"));
    }
}
