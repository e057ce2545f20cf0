//! Canvas host interface
//!
//! The engine never touches a document directly. Every read of live shape
//! state and every mutation goes through [`CanvasHost`], and the host
//! declares up front which mutations it supports via [`Capabilities`]. The
//! executor consults the capability set before choosing a fallback tier, so
//! a missing capability is a silent degradation rather than a failed call.

pub mod error;
pub mod memory;

pub use error::HostError;
pub use memory::{MemoryCanvas, MemoryShape, ShapeKind};

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::model::payload::ChartPayload;

/// One kind of mutation a host may support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    SetText,
    SetTable,
    SetChart,
    AddTextBox,
    AddTable,
    AddImage,
    AddChart,
    FetchImage,
    MoveShape,
    DeleteShape,
}

impl Capability {
    pub const ALL: [Capability; 10] = [
        Capability::SetText,
        Capability::SetTable,
        Capability::SetChart,
        Capability::AddTextBox,
        Capability::AddTable,
        Capability::AddImage,
        Capability::AddChart,
        Capability::FetchImage,
        Capability::MoveShape,
        Capability::DeleteShape,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Capability::SetText => "set-text",
            Capability::SetTable => "set-table",
            Capability::SetChart => "set-chart",
            Capability::AddTextBox => "add-text-box",
            Capability::AddTable => "add-table",
            Capability::AddImage => "add-image",
            Capability::AddChart => "add-chart",
            Capability::FetchImage => "fetch-image",
            Capability::MoveShape => "move-shape",
            Capability::DeleteShape => "delete-shape",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Capability::ALL
            .into_iter()
            .find(|cap| cap.as_str() == wanted)
            .ok_or_else(|| format!("unknown capability '{}'", s))
    }
}

/// The set of mutations a host supports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities(HashSet<Capability>);

impl Capabilities {
    pub fn all() -> Self {
        Self(Capability::ALL.into_iter().collect())
    }

    pub fn none() -> Self {
        Self(HashSet::new())
    }

    pub fn without(mut self, capability: Capability) -> Self {
        self.0.remove(&capability);
        self
    }

    pub fn with(mut self, capability: Capability) -> Self {
        self.0.insert(capability);
        self
    }

    pub fn supports(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<Capability> for Capabilities {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Live identity and position of a shape on the slide
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeInfo {
    pub id: String,
    pub name: String,
    pub bbox: Rect,
}

impl ShapeInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>, bbox: Rect) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            bbox,
        }
    }
}

/// Formatting applied to a newly created text box
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub font_size: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub word_wrap: bool,
    /// Inner padding (horizontal, vertical)
    pub margins: (f64, f64),
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 18.0,
            font_name: None,
            color: None,
            word_wrap: true,
            margins: (10.0, 8.0),
        }
    }
}

/// A live slide the engine can read and mutate.
///
/// Required methods cover the minimum every host must offer: reading the
/// shape list, replacing text, deleting shapes and creating text boxes.
/// Structured-content methods default to [`HostError::Unsupported`]; hosts
/// that implement them must also list the capability in
/// [`CanvasHost::capabilities`].
pub trait CanvasHost {
    fn capabilities(&self) -> Capabilities;

    /// Whether a slide is available to edit at all
    fn has_active_slide(&self) -> bool {
        true
    }

    /// Current shapes, in z-order
    fn shapes(&self) -> Vec<ShapeInfo>;

    fn set_text(&mut self, id: &str, text: &str) -> Result<(), HostError>;

    fn delete_shape(&mut self, id: &str) -> Result<(), HostError>;

    /// Create a text box and return its id
    fn add_text_box(&mut self, text: &str, bbox: Rect, style: &TextStyle) -> Result<String, HostError>;

    /// Replace the cell values of an existing table
    fn set_table(&mut self, _id: &str, _rows: &[Vec<String>]) -> Result<(), HostError> {
        Err(HostError::Unsupported(Capability::SetTable))
    }

    /// Update an existing chart in place
    fn set_chart(&mut self, _id: &str, _chart: &ChartPayload) -> Result<(), HostError> {
        Err(HostError::Unsupported(Capability::SetChart))
    }

    fn move_shape(&mut self, _id: &str, _bbox: Rect) -> Result<(), HostError> {
        Err(HostError::Unsupported(Capability::MoveShape))
    }

    fn add_table(&mut self, _rows: &[Vec<String>], _bbox: Rect) -> Result<String, HostError> {
        Err(HostError::Unsupported(Capability::AddTable))
    }

    fn add_image(&mut self, _bytes: &[u8], _bbox: Rect) -> Result<String, HostError> {
        Err(HostError::Unsupported(Capability::AddImage))
    }

    fn add_chart(&mut self, _chart: &ChartPayload, _bbox: Rect) -> Result<String, HostError> {
        Err(HostError::Unsupported(Capability::AddChart))
    }

    /// Download image bytes for a remote URL
    fn fetch_image(&mut self, _url: &str) -> Result<Vec<u8>, HostError> {
        Err(HostError::Unsupported(Capability::FetchImage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_round_trip_names() {
        for cap in Capability::ALL {
            assert_eq!(cap.as_str().parse::<Capability>(), Ok(cap));
        }
        assert!("teleport".parse::<Capability>().is_err());
        assert_eq!(" Add-Chart ".parse::<Capability>(), Ok(Capability::AddChart));
    }

    #[test]
    fn test_capability_set() {
        let caps = Capabilities::all().without(Capability::AddChart);
        assert!(!caps.supports(Capability::AddChart));
        assert!(caps.supports(Capability::AddTable));
        assert!(Capabilities::none().with(Capability::SetText).supports(Capability::SetText));
    }

    #[test]
    fn test_capability_serde_name() {
        let json = serde_json::to_string(&Capability::AddTextBox).unwrap();
        assert_eq!(json, "\"add-text-box\"");
    }
}
