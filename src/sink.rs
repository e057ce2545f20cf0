//! Engine events and the sinks that receive them
//!
//! The engine does not log on its own. It reports what it is doing as
//! [`EngineEvent`]s into an injected [`EventSink`]; [`NoopSink`] is the
//! default and [`TracingSink`] forwards everything to `tracing`.

use std::sync::Mutex;

use crate::executor::ExecutionState;
use crate::geometry::Rect;
use crate::layout::PlacementSource;
use crate::model::plan::OperationKind;

/// Something worth reporting during plan application
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    PlanStarted {
        plan_id: String,
        operations: usize,
    },
    /// Advisory validation finding that did not stop the plan
    ValidationIssue {
        message: String,
    },
    OperationStarted {
        index: usize,
        kind: Option<OperationKind>,
    },
    TargetResolved {
        index: usize,
        shape_id: Option<String>,
    },
    /// A fallback tier failed or was unavailable and the next one was tried
    TierDegraded {
        index: usize,
        tier: &'static str,
        reason: String,
    },
    PlacementChosen {
        index: usize,
        rect: Rect,
        source: PlacementSource,
    },
    ContentShifted {
        delta: f64,
        shapes: usize,
    },
    OperationFinished {
        index: usize,
        state: ExecutionState,
        applied: bool,
    },
    PlanFinished {
        applied: usize,
        warnings: usize,
    },
}

/// Receiver of engine events
pub trait EventSink {
    fn event(&self, event: &EngineEvent);
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn event(&self, _event: &EngineEvent) {}
}

/// Forwards events to the `tracing` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn event(&self, event: &EngineEvent) {
        match event {
            EngineEvent::PlanStarted { plan_id, operations } => {
                tracing::info!(plan_id = %plan_id, operations, "applying plan");
            }
            EngineEvent::ValidationIssue { message } => {
                tracing::warn!(%message, "plan validation");
            }
            EngineEvent::OperationStarted { index, kind } => {
                tracing::debug!(index, kind = ?kind, "operation started");
            }
            EngineEvent::TargetResolved { index, shape_id } => {
                tracing::debug!(index, shape_id = ?shape_id, "target resolved");
            }
            EngineEvent::TierDegraded { index, tier, reason } => {
                tracing::debug!(index, tier, %reason, "fallback tier failed");
            }
            EngineEvent::PlacementChosen { index, rect, source } => {
                tracing::debug!(
                    index,
                    left = rect.left,
                    top = rect.top,
                    width = rect.width,
                    height = rect.height,
                    source = ?source,
                    "placement chosen"
                );
            }
            EngineEvent::ContentShifted { delta, shapes } => {
                tracing::info!(delta, shapes, "shifted content below title");
            }
            EngineEvent::OperationFinished { index, state, applied } => {
                if *applied {
                    tracing::debug!(index, state = ?state, "operation applied");
                } else {
                    tracing::warn!(index, state = ?state, "operation not applied");
                }
            }
            EngineEvent::PlanFinished { applied, warnings } => {
                tracing::info!(applied, warnings, "plan finished");
            }
        }
    }
}

/// Keeps every event in memory; handy for inspecting a run
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<EngineEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl EventSink for RecordingSink {
    fn event(&self, event: &EngineEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}
