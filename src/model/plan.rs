//! Execution plan types produced by the planning service

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::geometry::{deserialize_bbox, Rect};

/// Maximum number of operations a single plan may carry
pub const MAX_OPERATIONS: usize = 15;

/// A sequence of operations to apply to one slide
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionPlan {
    #[serde(default, deserialize_with = "null_as_default")]
    pub plan_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub requires_confirmation: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub warnings: Vec<String>,
    pub operations: Vec<OperationEntry>,
}

/// One slot of the operation list.
///
/// Entries that are not well-formed operation objects are kept so the plan
/// can still run; they are skipped with a warning.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OperationEntry {
    Valid(Operation),
    Malformed(serde_json::Value),
}

impl ExecutionPlan {
    pub fn new(operations: Vec<Operation>) -> Self {
        Self {
            operations: operations.into_iter().map(OperationEntry::Valid).collect(),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Iterate over the well-formed operations only
    pub fn valid_operations(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter().filter_map(|entry| match entry {
            OperationEntry::Valid(op) => Some(op),
            OperationEntry::Malformed(_) => None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Insert,
    Update,
    Transform,
    Delete,
    #[serde(other)]
    Unsupported,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Insert => write!(f, "insert"),
            OperationKind::Update => write!(f, "update"),
            OperationKind::Transform => write!(f, "transform"),
            OperationKind::Delete => write!(f, "delete"),
            OperationKind::Unsupported => write!(f, "unsupported"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnchorStrategy {
    Placeholder,
    Selection,
    FreeRegion,
    #[serde(other)]
    Unknown,
}

/// Declared intent about which existing shape or region an operation targets
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Anchor {
    #[serde(default)]
    pub strategy: Option<AnchorStrategy>,
    #[serde(default, rename = "ref", deserialize_with = "string_or_number")]
    pub reference: Option<String>,
}

/// Style binding tokens such as `theme.body` or `#1F4E79`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StyleBindings {
    #[serde(default)]
    pub font: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl StyleBindings {
    pub fn is_empty(&self) -> bool {
        blank(self.font.as_deref()) && blank(self.color.as_deref())
    }
}

fn blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Raw content object as emitted by the planner.
///
/// The loosely-typed fields are decided into a [`Payload`](super::Payload)
/// once per operation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContent {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub rows: Option<serde_json::Value>,
    #[serde(default)]
    pub table: Option<serde_json::Value>,
    #[serde(default)]
    pub image: Option<serde_json::Value>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub chart: Option<serde_json::Value>,
    /// Explicit placement requested by the planner
    #[serde(default, deserialize_with = "deserialize_bbox")]
    pub bbox: Option<Rect>,
}

impl RawContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn rows(rows: serde_json::Value) -> Self {
        Self {
            rows: Some(rows),
            ..Self::default()
        }
    }

    pub fn chart(chart: serde_json::Value) -> Self {
        Self {
            chart: Some(chart),
            ..Self::default()
        }
    }

    pub fn image(image: serde_json::Value) -> Self {
        Self {
            image: Some(image),
            ..Self::default()
        }
    }
}

/// One content insertion/update step of a plan
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default, rename = "type")]
    pub kind: Option<OperationKind>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub target: Option<String>,
    #[serde(default)]
    pub anchor: Option<Anchor>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: RawContent,
    #[serde(default, deserialize_with = "null_as_default")]
    pub style_bindings: StyleBindings,
    #[serde(default, deserialize_with = "null_as_default")]
    pub constraints: serde_json::Map<String, serde_json::Value>,
}

impl Operation {
    pub fn new(kind: OperationKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// Insert operation carrying plain text
    pub fn insert_text(text: impl Into<String>) -> Self {
        Self::new(OperationKind::Insert).with_content(RawContent::text(text))
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_anchor(mut self, strategy: AnchorStrategy, reference: impl Into<String>) -> Self {
        self.anchor = Some(Anchor {
            strategy: Some(strategy),
            reference: Some(reference.into()),
        });
        self
    }

    pub fn with_content(mut self, content: RawContent) -> Self {
        self.content = content;
        self
    }

    pub fn with_style(mut self, bindings: StyleBindings) -> Self {
        self.style_bindings = bindings;
        self
    }

    pub fn strategy(&self) -> Option<AnchorStrategy> {
        self.anchor.as_ref().and_then(|a| a.strategy)
    }

    /// Trimmed, non-empty anchor reference
    pub fn anchor_ref(&self) -> Option<&str> {
        self.anchor
            .as_ref()
            .and_then(|a| a.reference.as_deref())
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }

    /// Trimmed, non-empty target reference
    pub fn target_ref(&self) -> Option<&str> {
        self.target.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}

/// Treat an explicit `null` like an absent field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept a string or a bare number (planners sometimes emit shape indexes as numbers)
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(String),
        Number(serde_json::Number),
    }

    let raw: Option<Repr> = Option::deserialize(deserializer)?;
    Ok(raw.map(|repr| match repr {
        Repr::Text(s) => s,
        Repr::Number(n) => n.to_string(),
    }))
}
