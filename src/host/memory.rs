//! In-memory canvas host
//!
//! Holds a plain vector of shapes seeded from a [`SlideContext`]. Used by the
//! command-line tool to simulate a document and by the tests to observe
//! exactly which mutations the engine performed.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::geometry::Rect;
use crate::model::context::SlideContext;
use crate::model::payload::{ChartKind, ChartPayload};

use super::{Capabilities, Capability, CanvasHost, HostError, ShapeInfo, TextStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Text,
    Table,
    Image,
    Chart,
    Other,
}

impl ShapeKind {
    /// Map a collector object type to a shape kind
    pub fn from_object_type(kind: Option<&str>) -> Self {
        match kind.map(str::to_lowercase).as_deref() {
            Some("table") => ShapeKind::Table,
            Some("chart") => ShapeKind::Chart,
            Some("image") | Some("picture") => ShapeKind::Image,
            Some("text") | Some("textbox") | Some("placeholder") | None => ShapeKind::Text,
            Some(_) => ShapeKind::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryShape {
    pub id: String,
    pub name: String,
    pub kind: ShapeKind,
    pub bbox: Rect,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<Vec<Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartKind>,
    /// Size of the embedded image in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_bytes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<TextStyle>,
}

impl MemoryShape {
    fn new(id: String, name: String, kind: ShapeKind, bbox: Rect) -> Self {
        Self {
            id,
            name,
            kind,
            bbox,
            text: String::new(),
            table: None,
            chart: None,
            image_bytes: None,
            style: None,
        }
    }
}

/// A slide held entirely in memory
#[derive(Debug, Clone, Serialize)]
pub struct MemoryCanvas {
    shapes: Vec<MemoryShape>,
    #[serde(skip)]
    capabilities: Capabilities,
    #[serde(skip)]
    locked: HashSet<String>,
    #[serde(skip)]
    remote_images: HashMap<String, Vec<u8>>,
    #[serde(skip)]
    active: bool,
    #[serde(skip)]
    next_id: usize,
}

impl Default for MemoryCanvas {
    fn default() -> Self {
        Self {
            shapes: Vec::new(),
            capabilities: Capabilities::all(),
            locked: HashSet::new(),
            remote_images: HashMap::new(),
            active: true,
            next_id: 1,
        }
    }
}

impl MemoryCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the canvas with every snapshot object that has a bbox
    pub fn from_context(context: &SlideContext) -> Self {
        let shapes = context
            .objects
            .iter()
            .filter_map(|obj| {
                let bbox = obj.bbox?;
                let mut shape = MemoryShape::new(
                    obj.id.clone(),
                    obj.name.clone(),
                    ShapeKind::from_object_type(obj.kind.as_deref()),
                    bbox,
                );
                shape.text = obj.text.clone();
                Some(shape)
            })
            .collect();
        Self {
            shapes,
            ..Self::default()
        }
    }

    /// Remove a capability, simulating a host without that API
    pub fn without(mut self, capability: Capability) -> Self {
        self.capabilities = self.capabilities.without(capability);
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Refuse every write and delete on the shape
    pub fn lock(mut self, id: impl Into<String>) -> Self {
        self.locked.insert(id.into());
        self
    }

    /// Register bytes returned by `fetch_image` for `url`
    pub fn with_remote_image(mut self, url: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.remote_images.insert(url.into(), bytes);
        self
    }

    /// Simulate a host with no slide open
    pub fn no_slide(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn shape(&self, id: &str) -> Option<&MemoryShape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    pub fn shape_list(&self) -> &[MemoryShape] {
        &self.shapes
    }

    fn require(&self, capability: Capability) -> Result<(), HostError> {
        if self.capabilities.supports(capability) {
            Ok(())
        } else {
            Err(HostError::Unsupported(capability))
        }
    }

    fn writable(&mut self, id: &str) -> Result<&mut MemoryShape, HostError> {
        if self.locked.contains(id) {
            return Err(HostError::refused(id, "shape is locked"));
        }
        self.shapes
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| HostError::ShapeNotFound(id.to_string()))
    }

    fn insert(&mut self, kind: ShapeKind, bbox: Rect) -> &mut MemoryShape {
        let mut id = format!("new-{}", self.next_id);
        self.next_id += 1;
        // Snapshot ids may already use the "new-N" form
        while self.shapes.iter().any(|s| s.id == id) {
            id = format!("new-{}", self.next_id);
            self.next_id += 1;
        }
        let name = match kind {
            ShapeKind::Table => "Table",
            ShapeKind::Chart => "Chart",
            ShapeKind::Image => "Picture",
            ShapeKind::Text | ShapeKind::Other => "TextBox",
        };
        let name = format!("{} {}", name, self.shapes.len() + 1);
        self.shapes.push(MemoryShape::new(id, name, kind, bbox));
        let last = self.shapes.len() - 1;
        &mut self.shapes[last]
    }
}

impl CanvasHost for MemoryCanvas {
    fn capabilities(&self) -> Capabilities {
        self.capabilities.clone()
    }

    fn has_active_slide(&self) -> bool {
        self.active
    }

    fn shapes(&self) -> Vec<ShapeInfo> {
        self.shapes
            .iter()
            .map(|s| ShapeInfo::new(s.id.clone(), s.name.clone(), s.bbox))
            .collect()
    }

    fn set_text(&mut self, id: &str, text: &str) -> Result<(), HostError> {
        self.require(Capability::SetText)?;
        let shape = self.writable(id)?;
        match shape.kind {
            ShapeKind::Text | ShapeKind::Other => {
                shape.text = text.to_string();
                Ok(())
            }
            _ => Err(HostError::refused(id, "shape has no text frame")),
        }
    }

    fn delete_shape(&mut self, id: &str) -> Result<(), HostError> {
        self.require(Capability::DeleteShape)?;
        self.writable(id)?;
        self.shapes.retain(|s| s.id != id);
        Ok(())
    }

    fn add_text_box(&mut self, text: &str, bbox: Rect, style: &TextStyle) -> Result<String, HostError> {
        self.require(Capability::AddTextBox)?;
        let shape = self.insert(ShapeKind::Text, bbox);
        shape.text = text.to_string();
        shape.style = Some(style.clone());
        Ok(shape.id.clone())
    }

    fn set_table(&mut self, id: &str, rows: &[Vec<String>]) -> Result<(), HostError> {
        self.require(Capability::SetTable)?;
        let shape = self.writable(id)?;
        if shape.kind != ShapeKind::Table {
            return Err(HostError::refused(id, "shape is not a table"));
        }
        shape.table = Some(rows.to_vec());
        Ok(())
    }

    fn set_chart(&mut self, id: &str, chart: &ChartPayload) -> Result<(), HostError> {
        self.require(Capability::SetChart)?;
        let shape = self.writable(id)?;
        if shape.kind != ShapeKind::Chart {
            return Err(HostError::refused(id, "shape is not a chart"));
        }
        shape.chart = Some(chart.kind());
        Ok(())
    }

    fn move_shape(&mut self, id: &str, bbox: Rect) -> Result<(), HostError> {
        self.require(Capability::MoveShape)?;
        let shape = self.writable(id)?;
        shape.bbox = bbox;
        Ok(())
    }

    fn add_table(&mut self, rows: &[Vec<String>], bbox: Rect) -> Result<String, HostError> {
        self.require(Capability::AddTable)?;
        if rows.is_empty() || rows[0].is_empty() {
            return Err(HostError::invalid("table has no cells"));
        }
        let shape = self.insert(ShapeKind::Table, bbox);
        shape.table = Some(rows.to_vec());
        Ok(shape.id.clone())
    }

    fn add_image(&mut self, bytes: &[u8], bbox: Rect) -> Result<String, HostError> {
        self.require(Capability::AddImage)?;
        if bytes.is_empty() {
            return Err(HostError::invalid("image has no data"));
        }
        let shape = self.insert(ShapeKind::Image, bbox);
        shape.image_bytes = Some(bytes.len());
        Ok(shape.id.clone())
    }

    fn add_chart(&mut self, chart: &ChartPayload, bbox: Rect) -> Result<String, HostError> {
        self.require(Capability::AddChart)?;
        if chart.to_rows().is_none() {
            return Err(HostError::invalid("chart has no data points"));
        }
        let shape = self.insert(ShapeKind::Chart, bbox);
        shape.chart = Some(chart.kind());
        Ok(shape.id.clone())
    }

    fn fetch_image(&mut self, url: &str) -> Result<Vec<u8>, HostError> {
        self.require(Capability::FetchImage)?;
        self.remote_images
            .get(url)
            .cloned()
            .ok_or_else(|| HostError::invalid(format!("could not download {}", url)))
    }
}
