//! Operation executor
//!
//! Each operation runs through a small state machine: delete, structured
//! update or insert (table, chart, image), and the plain-text path that is
//! both a state of its own and the last fallback for everything else. Host
//! capability gaps degrade to the next tier without a warning; the notes of
//! failed tiers only reach the caller when nothing was applied.

pub mod applier;
mod structured;
mod text;

pub use applier::{ApplyResult, PlanApplier, PlanReport};

use std::collections::HashSet;

use serde::Serialize;

use crate::geometry::Rect;
use crate::host::{Capabilities, Capability, CanvasHost, HostError, ShapeInfo};
use crate::layout::{place, LayoutConfig, Placement, PlacementRequest, SlideFrame};
use crate::model::context::SlideContext;
use crate::model::payload::Payload;
use crate::model::plan::{Operation, OperationEntry, OperationKind};
use crate::resolve::{resolve_target, ShapeIndex};
use crate::sink::{EngineEvent, EventSink};

pub(crate) const SKIPPED_INVALID: &str = "Skipped invalid operation";
pub(crate) const SKIPPED_MISSING_TYPE: &str = "Skipped operation with missing type";
const SKIPPED_DELETE: &str = "Skipped delete: intended target was not found.";
const DELETE_FAILED: &str = "Delete operation failed: target exists but could not be deleted.";

/// Which branch of the executor handled an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionState {
    Delete,
    StructuredUpdate,
    StructuredInsert,
    TextUpdate,
    TextInsert,
    Failed,
}

/// Result of executing one operation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationOutcome {
    pub applied: bool,
    pub warnings: Vec<String>,
    /// Rectangle of newly created content, appended to the occupancy model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupied_bbox: Option<Rect>,
    pub state: ExecutionState,
    /// Shapes were deleted or moved; occupancy must be rebuilt from the host
    #[serde(skip)]
    pub(crate) shapes_changed: bool,
}

impl OperationOutcome {
    pub(crate) fn skipped(warning: &str) -> Self {
        Self {
            applied: false,
            warnings: vec![warning.to_string()],
            occupied_bbox: None,
            state: ExecutionState::Failed,
            shapes_changed: false,
        }
    }
}

/// A successful mutation
#[derive(Debug, Clone, Copy)]
pub(crate) struct Applied {
    state: ExecutionState,
    bbox: Option<Rect>,
}

impl Applied {
    fn new(state: ExecutionState, bbox: Option<Rect>) -> Self {
        Self { state, bbox }
    }
}

#[derive(Debug, Clone)]
enum Note {
    /// Always reported
    Warning(String),
    /// A fallback tier failed; reported only if the operation fails overall
    Degraded(String),
}

/// Per-operation working state
pub(crate) struct Step<'a> {
    index: usize,
    op: &'a Operation,
    kind: OperationKind,
    payload: Payload,
    shapes: ShapeIndex,
    target: Option<ShapeInfo>,
    occupied: &'a [Rect],
    notes: Vec<Note>,
    shapes_changed: bool,
}

impl Step<'_> {
    fn warn(&mut self, message: impl Into<String>) {
        self.notes.push(Note::Warning(message.into()));
    }

    fn degrade(&mut self, message: impl Into<String>) {
        self.notes.push(Note::Degraded(message.into()));
    }

    fn finish(self, applied: Option<Applied>) -> OperationOutcome {
        let succeeded = applied.is_some();
        let warnings = self
            .notes
            .into_iter()
            .filter_map(|note| match note {
                Note::Warning(message) => Some(message),
                Note::Degraded(message) => (!succeeded).then_some(message),
            })
            .collect();
        match applied {
            Some(applied) => OperationOutcome {
                applied: true,
                warnings,
                occupied_bbox: applied.bbox,
                state: applied.state,
                shapes_changed: self.shapes_changed,
            },
            None => OperationOutcome {
                applied: false,
                warnings,
                occupied_bbox: None,
                state: ExecutionState::Failed,
                shapes_changed: self.shapes_changed,
            },
        }
    }
}

/// State shared by every operation of one plan application
pub(crate) struct Session<'a> {
    host: &'a mut dyn CanvasHost,
    context: &'a SlideContext,
    config: &'a LayoutConfig,
    sink: &'a dyn EventSink,
    frame: SlideFrame,
    capabilities: Capabilities,
    /// Shapes claimed by a write or created within this plan
    used: HashSet<String>,
}

impl<'a> Session<'a> {
    pub(crate) fn new(
        host: &'a mut dyn CanvasHost,
        context: &'a SlideContext,
        config: &'a LayoutConfig,
        capabilities: Capabilities,
        sink: &'a dyn EventSink,
    ) -> Self {
        Self {
            frame: SlideFrame::from_context(context, config),
            host,
            context,
            config,
            sink,
            capabilities,
            used: HashSet::new(),
        }
    }

    /// Current shape rectangles on the host
    pub(crate) fn live_rects(&self) -> Vec<Rect> {
        self.host.shapes().into_iter().map(|shape| shape.bbox).collect()
    }

    /// Run one plan entry against the current occupancy snapshot
    pub(crate) fn execute(&mut self, index: usize, entry: &OperationEntry, occupied: &[Rect]) -> OperationOutcome {
        let op = match entry {
            OperationEntry::Valid(op) => op,
            OperationEntry::Malformed(_) => {
                self.sink.event(&EngineEvent::OperationStarted { index, kind: None });
                return OperationOutcome::skipped(SKIPPED_INVALID);
            }
        };
        self.sink.event(&EngineEvent::OperationStarted { index, kind: op.kind });

        let kind = match op.kind {
            None => return OperationOutcome::skipped(SKIPPED_MISSING_TYPE),
            Some(OperationKind::Unsupported) => return OperationOutcome::skipped(SKIPPED_INVALID),
            Some(kind) => kind,
        };

        let shapes = ShapeIndex::from_host(&*self.host);
        let target = resolve_target(&shapes, op, self.context).cloned();
        self.sink.event(&EngineEvent::TargetResolved {
            index,
            shape_id: target.as_ref().map(|shape| shape.id.clone()),
        });

        let mut step = Step {
            index,
            op,
            kind,
            payload: Payload::from_content(&op.content),
            shapes,
            target,
            occupied,
            notes: Vec::new(),
            shapes_changed: false,
        };

        let applied = match kind {
            OperationKind::Delete => self.delete(&mut step),
            OperationKind::Update | OperationKind::Transform => self
                .structured_update(&mut step)
                .or_else(|| self.write_text(&mut step)),
            OperationKind::Insert | OperationKind::Unsupported => self
                .structured_insert(&mut step)
                .or_else(|| self.write_text(&mut step)),
        };
        step.finish(applied)
    }

    fn delete(&mut self, step: &mut Step<'_>) -> Option<Applied> {
        let Some(target) = step.target.clone() else {
            step.warn(SKIPPED_DELETE);
            return None;
        };
        if self.remove_shape(step, &target.id) {
            Some(Applied::new(ExecutionState::Delete, None))
        } else {
            step.warn(DELETE_FAILED);
            None
        }
    }

    /// Delete a shape, returning whether it is gone
    fn remove_shape(&mut self, step: &mut Step<'_>, id: &str) -> bool {
        if !self.supports(step, Capability::DeleteShape) {
            return false;
        }
        match self.host.delete_shape(id) {
            Ok(()) => {
                self.used.remove(id);
                step.shapes_changed = true;
                true
            }
            Err(err) => {
                self.tier_failed(step, Capability::DeleteShape, &err);
                false
            }
        }
    }

    /// Capability check that reports a missing capability as a degraded tier
    fn supports(&self, step: &Step<'_>, capability: Capability) -> bool {
        if self.capabilities.supports(capability) {
            return true;
        }
        self.tier_failed(step, capability, &HostError::Unsupported(capability));
        false
    }

    fn tier_failed(&self, step: &Step<'_>, capability: Capability, err: &HostError) {
        self.sink.event(&EngineEvent::TierDegraded {
            index: step.index,
            tier: capability.as_str(),
            reason: err.to_string(),
        });
    }

    /// Placement for new content sized for `text`
    fn placement(&self, step: &Step<'_>, text: &str, preferred: Option<Rect>) -> Placement {
        let request = PlacementRequest::for_text(text)
            .with_preferred(preferred)
            .with_anchor_ref(step.op.anchor_ref())
            .with_explicit_bbox(step.op.content.bbox);
        let placement = place(&self.frame, &request, step.occupied, self.config);
        self.sink.event(&EngineEvent::PlacementChosen {
            index: step.index,
            rect: placement.rect,
            source: placement.source,
        });
        placement
    }
}

/// Remove duplicates, keeping the first occurrence of each entry
pub(crate) fn dedup_preserving_order(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items.into_iter().filter(|item| seen.insert(item.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::SlideSize;
    use crate::host::MemoryCanvas;
    use crate::model::context::SlideObject;
    use crate::model::plan::{AnchorStrategy, RawContent};
    use crate::sink::NoopSink;

    fn context() -> SlideContext {
        SlideContext::new(SlideSize::default())
            .with_object(SlideObject::new("1", "Title 1", Rect::new(40.0, 20.0, 880.0, 80.0)).with_text("Quarterly Review"))
            .with_object(SlideObject::new("2", "Body", Rect::new(40.0, 300.0, 600.0, 120.0)).with_text("Revenue grew"))
    }

    fn run(canvas: &mut MemoryCanvas, ctx: &SlideContext, op: Operation) -> OperationOutcome {
        let config = LayoutConfig::default();
        let caps = canvas.capabilities();
        let occupied = ctx.object_rects();
        let mut session = Session::new(canvas, ctx, &config, caps, &NoopSink);
        session.execute(0, &OperationEntry::Valid(op), &occupied)
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let ctx = context();
        let mut canvas = MemoryCanvas::from_context(&ctx);
        let config = LayoutConfig::default();
        let caps = canvas.capabilities();
        let mut session = Session::new(&mut canvas, &ctx, &config, caps, &NoopSink);

        let outcome = session.execute(0, &OperationEntry::Malformed(serde_json::json!(42)), &[]);
        assert_eq!(outcome.warnings, vec![SKIPPED_INVALID.to_string()]);
        assert_eq!(outcome.state, ExecutionState::Failed);

        let outcome = session.execute(1, &OperationEntry::Valid(Operation::default()), &[]);
        assert_eq!(outcome.warnings, vec![SKIPPED_MISSING_TYPE.to_string()]);
    }

    #[test]
    fn test_delete() {
        let ctx = context();
        let mut canvas = MemoryCanvas::from_context(&ctx);
        let outcome = run(&mut canvas, &ctx, Operation::new(OperationKind::Delete).with_target("2"));
        assert!(outcome.applied);
        assert_eq!(outcome.state, ExecutionState::Delete);
        assert!(outcome.shapes_changed);
        assert!(canvas.shape("2").is_none());
    }

    #[test]
    fn test_delete_failures() {
        let ctx = context();
        let mut canvas = MemoryCanvas::from_context(&ctx);
        let outcome = run(&mut canvas, &ctx, Operation::new(OperationKind::Delete).with_target("shape-7"));
        assert!(!outcome.applied);
        assert_eq!(outcome.warnings, vec![SKIPPED_DELETE.to_string()]);

        let mut canvas = MemoryCanvas::from_context(&ctx).lock("2");
        let outcome = run(&mut canvas, &ctx, Operation::new(OperationKind::Delete).with_target("2"));
        assert!(!outcome.applied);
        assert_eq!(outcome.warnings, vec![DELETE_FAILED.to_string()]);
        assert!(canvas.shape("2").is_some());
    }

    #[test]
    fn test_update_without_target_mutates_nothing() {
        let ctx = context();
        let mut canvas = MemoryCanvas::from_context(&ctx);
        let before = canvas.shape_list().to_vec();
        let op = Operation::new(OperationKind::Update)
            .with_target("shape-7")
            .with_content(RawContent::text("New"));
        let outcome = run(&mut canvas, &ctx, op);
        assert!(!outcome.applied);
        assert!(outcome.warnings[0].contains("target was not found"));
        assert_eq!(canvas.shape_list(), before.as_slice());
    }

    #[test]
    fn test_insert_placement_avoids_title() {
        let ctx = context();
        let mut canvas = MemoryCanvas::from_context(&ctx);
        let op = Operation::insert_text("A short note").with_anchor(AnchorStrategy::FreeRegion, "");
        let outcome = run(&mut canvas, &ctx, op);
        assert!(outcome.applied);
        assert_eq!(outcome.state, ExecutionState::TextInsert);
        let bbox = outcome.occupied_bbox.unwrap();
        assert_eq!(bbox.overlap_area(&Rect::new(40.0, 20.0, 880.0, 80.0)), 0.0);
    }

    #[test]
    fn test_dedup_preserving_order() {
        let items = ["b", "a", "b", "c", "a"].map(String::from);
        assert_eq!(dedup_preserving_order(items), vec!["b", "a", "c"]);
    }
}
