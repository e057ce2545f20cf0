//! Plan applier: runs every operation of a plan in order
//!
//! The applier owns the occupancy model for the duration of one call. Each
//! operation sees an immutable snapshot of it; afterwards the applier either
//! appends the operation's new rectangle or, when shapes were deleted or
//! moved, rebuilds the model from the host's live shape list.

use std::sync::Arc;

use serde::Serialize;

use crate::config::EngineConfig;
use crate::error::ApplyError;
use crate::host::CanvasHost;
use crate::layout::Occupancy;
use crate::model::context::SlideContext;
use crate::model::plan::{ExecutionPlan, MAX_OPERATIONS};
use crate::model::validate::{validate_context, validate_plan};
use crate::sink::{EngineEvent, EventSink, NoopSink};

use super::{dedup_preserving_order, OperationOutcome, Session};

/// Summary returned to the caller of a plan application
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyResult {
    /// Operations that produced a verified mutation
    pub applied_count: usize,
    /// Non-fatal failures, deduplicated in first-seen order
    pub warnings: Vec<String>,
}

impl ApplyResult {
    pub fn from_outcomes(outcomes: &[OperationOutcome]) -> Self {
        Self {
            applied_count: outcomes.iter().filter(|o| o.applied).count(),
            warnings: dedup_preserving_order(outcomes.iter().flat_map(|o| o.warnings.iter().cloned())),
        }
    }
}

/// [`ApplyResult`] plus the outcome of every operation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanReport {
    #[serde(flatten)]
    pub result: ApplyResult,
    pub outcomes: Vec<OperationOutcome>,
}

/// Applies execution plans to a canvas host
pub struct PlanApplier {
    config: EngineConfig,
    sink: Arc<dyn EventSink>,
}

impl Default for PlanApplier {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl PlanApplier {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            sink: Arc::new(NoopSink),
        }
    }

    /// Report engine events to `sink` instead of discarding them
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn apply(
        &self,
        plan: &ExecutionPlan,
        context: &SlideContext,
        host: &mut dyn CanvasHost,
    ) -> Result<ApplyResult, ApplyError> {
        self.apply_detailed(plan, context, host).map(|report| report.result)
    }

    /// Apply `plan` and keep the per-operation outcomes.
    ///
    /// Only an operation count outside 1..=15 and a missing slide are fatal.
    /// Every other failure becomes a warning and the plan continues.
    pub fn apply_detailed(
        &self,
        plan: &ExecutionPlan,
        context: &SlideContext,
        host: &mut dyn CanvasHost,
    ) -> Result<PlanReport, ApplyError> {
        let count = plan.operations.len();
        if count == 0 || count > MAX_OPERATIONS {
            return Err(ApplyError::OperationCount {
                count,
                max: MAX_OPERATIONS,
            });
        }
        if !host.has_active_slide() {
            return Err(ApplyError::NoSlide);
        }

        let sink = self.sink.as_ref();
        let plan_report = validate_plan(plan);
        let context_report = validate_context(context);
        for message in plan_report
            .errors
            .iter()
            .chain(&plan_report.warnings)
            .chain(&context_report.errors)
            .chain(&context_report.warnings)
        {
            sink.event(&EngineEvent::ValidationIssue {
                message: message.clone(),
            });
        }
        sink.event(&EngineEvent::PlanStarted {
            plan_id: plan.plan_id.clone(),
            operations: count,
        });

        let capabilities = self.config.host.restrict(host.capabilities());
        let mut occupancy = Occupancy::from_context(context);
        let mut session = Session::new(host, context, &self.config.layout, capabilities, sink);
        let mut outcomes = Vec::with_capacity(count);

        for (index, entry) in plan.operations.iter().enumerate() {
            let outcome = session.execute(index, entry, occupancy.rects());
            if outcome.shapes_changed {
                occupancy.rebuild(session.live_rects());
            } else if let Some(bbox) = outcome.occupied_bbox {
                occupancy.push(bbox);
            }
            sink.event(&EngineEvent::OperationFinished {
                index,
                state: outcome.state,
                applied: outcome.applied,
            });
            outcomes.push(outcome);
        }

        let result = ApplyResult::from_outcomes(&outcomes);
        sink.event(&EngineEvent::PlanFinished {
            applied: result.applied_count,
            warnings: result.warnings.len(),
        });
        Ok(PlanReport { result, outcomes })
    }
}
