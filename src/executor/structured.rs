//! Structured content tiers: tables, charts and images

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::geometry::Rect;
use crate::host::{Capability, CanvasHost, HostError, ShapeInfo};
use crate::model::payload::{rows_to_text, ChartPayload, ImagePayload, Payload};
use crate::model::plan::OperationKind;

use super::{Applied, ExecutionState, Session, Step};

const TABLE_UPDATE_FAILED: &str = "Table update/transform could not be applied directly.";
const TABLE_ORIGINAL_KEPT: &str = "Transformed to table but original target could not be removed.";
const CHART_UPDATE_FAILED: &str = "Chart update/transform could not be applied directly.";
const CHART_ORIGINAL_KEPT: &str = "Transformed to chart but original target could not be removed.";
const CHART_TABLE_ORIGINAL_KEPT: &str = "Chart transformed to table fallback; original target remains.";
const CHART_TRANSFORM_AS_TABLE: &str = "Chart transform used editable table fallback.";
const IMAGE_INSERT_FAILED: &str = "Image insert failed on this host; falling back to text rendering.";
const CHART_INSERT_FAILED: &str = "Chart insert is unavailable on this host; falling back to table/text rendering.";
const CHART_INSERT_AS_TABLE: &str = "Inserted chart data as an editable table fallback.";
const TABLE_INSERT_FAILED: &str = "Table insert is unavailable on this host; falling back to text rendering.";

/// A structured shape to create
enum NewShape<'p> {
    Table(&'p [Vec<String>]),
    Chart(&'p ChartPayload),
    Image(&'p [u8]),
}

impl NewShape<'_> {
    fn capability(&self) -> Capability {
        match self {
            NewShape::Table(_) => Capability::AddTable,
            NewShape::Chart(_) => Capability::AddChart,
            NewShape::Image(_) => Capability::AddImage,
        }
    }

    fn add(&self, host: &mut dyn CanvasHost, bbox: Rect) -> Result<String, HostError> {
        match self {
            NewShape::Table(rows) => host.add_table(rows, bbox),
            NewShape::Chart(chart) => host.add_chart(chart, bbox),
            NewShape::Image(bytes) => host.add_image(bytes, bbox),
        }
    }
}

impl Session<'_> {
    /// Update or transform an existing table or chart in place.
    ///
    /// Returns `None` (with degradation notes) when the text path should run.
    pub(super) fn structured_update(&mut self, step: &mut Step<'_>) -> Option<Applied> {
        let target = step.target.clone()?;
        match step.payload.clone() {
            Payload::Table(rows) => self.update_table(step, &target, &rows),
            Payload::Chart(chart) => self.update_chart(step, &target, &chart),
            _ => None,
        }
    }

    fn update_table(&mut self, step: &mut Step<'_>, target: &ShapeInfo, rows: &[Vec<String>]) -> Option<Applied> {
        if self.supports(step, Capability::SetTable) {
            match self.host.set_table(&target.id, rows) {
                Ok(()) => return Some(Applied::new(ExecutionState::StructuredUpdate, None)),
                Err(err) => self.tier_failed(step, Capability::SetTable, &err),
            }
        }

        if step.kind == OperationKind::Transform {
            let text = rows_to_text(rows);
            if let Some(rect) = self.insert_shape(step, NewShape::Table(rows), &text, Some(target.bbox)) {
                if !self.remove_shape(step, &target.id) {
                    step.warn(TABLE_ORIGINAL_KEPT);
                }
                return Some(Applied::new(ExecutionState::StructuredUpdate, Some(rect)));
            }
        }

        step.degrade(TABLE_UPDATE_FAILED);
        None
    }

    fn update_chart(&mut self, step: &mut Step<'_>, target: &ShapeInfo, chart: &ChartPayload) -> Option<Applied> {
        if self.supports(step, Capability::SetChart) {
            match self.host.set_chart(&target.id, chart) {
                Ok(()) => return Some(Applied::new(ExecutionState::StructuredUpdate, None)),
                Err(err) => self.tier_failed(step, Capability::SetChart, &err),
            }
        }

        if step.kind == OperationKind::Transform {
            let label = chart_label(chart);
            if let Some(rect) = self.insert_shape(step, NewShape::Chart(chart), &label, Some(target.bbox)) {
                if !self.remove_shape(step, &target.id) {
                    step.warn(CHART_ORIGINAL_KEPT);
                }
                return Some(Applied::new(ExecutionState::StructuredUpdate, Some(rect)));
            }

            if let Some(rows) = chart.to_rows() {
                let text = rows_to_text(&rows);
                if let Some(rect) = self.insert_shape(step, NewShape::Table(&rows), &text, Some(target.bbox)) {
                    step.degrade(CHART_TRANSFORM_AS_TABLE);
                    if !self.remove_shape(step, &target.id) {
                        step.warn(CHART_TABLE_ORIGINAL_KEPT);
                    }
                    return Some(Applied::new(ExecutionState::StructuredUpdate, Some(rect)));
                }
            }
        }

        step.degrade(CHART_UPDATE_FAILED);
        None
    }

    /// Insert a table, chart or image as new content
    pub(super) fn structured_insert(&mut self, step: &mut Step<'_>) -> Option<Applied> {
        let inserted = |rect| Some(Applied::new(ExecutionState::StructuredInsert, Some(rect)));
        match step.payload.clone() {
            Payload::Image(image) => {
                if self.supports(step, Capability::AddImage) {
                    match self.resolve_image(&image) {
                        Ok(bytes) => {
                            let label = if image.alt.is_empty() { "Image" } else { image.alt.as_str() };
                            if let Some(rect) = self.insert_shape(step, NewShape::Image(&bytes), label, None) {
                                return inserted(rect);
                            }
                        }
                        Err(err) => self.tier_failed(step, Capability::AddImage, &err),
                    }
                }
                step.degrade(IMAGE_INSERT_FAILED);
                None
            }
            Payload::Chart(chart) => {
                let label = chart_label(&chart);
                if let Some(rect) = self.insert_shape(step, NewShape::Chart(&chart), &label, None) {
                    return inserted(rect);
                }
                if let Some(rows) = chart.to_rows() {
                    let text = rows_to_text(&rows);
                    if let Some(rect) = self.insert_shape(step, NewShape::Table(&rows), &text, None) {
                        step.degrade(CHART_INSERT_AS_TABLE);
                        return inserted(rect);
                    }
                }
                step.degrade(CHART_INSERT_FAILED);
                None
            }
            Payload::Table(rows) => {
                let text = rows_to_text(&rows);
                if let Some(rect) = self.insert_shape(step, NewShape::Table(&rows), &text, None) {
                    return inserted(rect);
                }
                step.degrade(TABLE_INSERT_FAILED);
                None
            }
            Payload::Text(_) | Payload::Empty => None,
        }
    }

    /// Place and create a structured shape, returning its rectangle
    fn insert_shape(&mut self, step: &mut Step<'_>, shape: NewShape<'_>, text: &str, preferred: Option<Rect>) -> Option<Rect> {
        let capability = shape.capability();
        if !self.supports(step, capability) {
            return None;
        }
        let placement = self.placement(step, text, preferred);
        match shape.add(&mut *self.host, placement.rect) {
            Ok(id) => {
                self.used.insert(id);
                Some(placement.rect)
            }
            Err(err) => {
                self.tier_failed(step, capability, &err);
                None
            }
        }
    }

    /// Image bytes from inline base64, a data URL, or a download through the host
    fn resolve_image(&mut self, image: &ImagePayload) -> Result<Vec<u8>, HostError> {
        if !image.base64.trim().is_empty() {
            return decode_base64(&image.base64);
        }
        let url = image.url.trim();
        if url.is_empty() {
            return Err(HostError::invalid("image has neither data nor url"));
        }
        if url.starts_with("data:") {
            return decode_base64(url);
        }
        if !self.capabilities.supports(Capability::FetchImage) {
            return Err(HostError::Unsupported(Capability::FetchImage));
        }
        self.host.fetch_image(url)
    }
}

fn chart_label(chart: &ChartPayload) -> String {
    format!("Chart: {}", chart.chart_type)
}

/// Decode plain base64 or a `data:...;base64,` URL
fn decode_base64(data: &str) -> Result<Vec<u8>, HostError> {
    let raw = data.trim();
    let encoded = match raw.find(";base64,") {
        Some(pos) if raw.starts_with("data:") => &raw[pos + ";base64,".len()..],
        _ => raw,
    };
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|err| HostError::invalid(format!("image data is not valid base64: {}", err)))?;
    if bytes.is_empty() {
        return Err(HostError::invalid("image data is empty"));
    }
    Ok(bytes)
}
