//! Slide Plan - Apply LLM-generated execution plans to a live slide
//!
//! This library takes an [`ExecutionPlan`] (a short list of insert, update,
//! transform and delete operations) plus a [`SlideContext`] snapshot and
//! applies the plan through a [`CanvasHost`]. It resolves which shape each
//! operation refers to, refuses to overwrite authored text on inserts, finds
//! free space for new content, and degrades structured content (tables,
//! charts, images) when the host cannot create it.
//!
//! # Example
//!
//! ```rust
//! use slide_plan::{apply_plan, ExecutionPlan, MemoryCanvas, SlideContext};
//!
//! let context = SlideContext::from_json(r#"{
//!     "slide": {"size": {"w": 960, "h": 540}},
//!     "objects": [{"id": "1", "name": "Title 1", "bbox": [40, 20, 880, 80], "text": "Q3 Review"}]
//! }"#).unwrap();
//! let plan = ExecutionPlan::from_json(r#"{
//!     "planId": "p-1",
//!     "summary": "Add a key takeaway",
//!     "operations": [{"type": "insert", "content": {"text": "Revenue grew 12%"}}]
//! }"#).unwrap();
//!
//! let mut canvas = MemoryCanvas::from_context(&context);
//! let result = apply_plan(&plan, &context, &mut canvas).unwrap();
//! assert_eq!(result.applied_count, 1);
//! assert!(result.warnings.is_empty());
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod geometry;
pub mod host;
pub mod layout;
pub mod lint;
pub mod model;
pub mod resolve;
pub mod sink;
pub mod theme;

pub use config::{EngineConfig, HostConfig};
pub use error::{ApplyError, ConfigError};
pub use executor::{ApplyResult, ExecutionState, OperationOutcome, PlanApplier, PlanReport};
pub use geometry::{Rect, SlideSize};
pub use host::{Capabilities, Capability, CanvasHost, HostError, MemoryCanvas, ShapeInfo, TextStyle};
pub use layout::LayoutConfig;
pub use lint::{LintCategory, LintWarning};
pub use model::{ExecutionPlan, Operation, OperationKind, Payload, SlideContext};
pub use sink::{EngineEvent, EventSink, NoopSink, RecordingSink, TracingSink};

/// Apply a plan with default configuration
///
/// This is the main entry point for the library. Operations run strictly in
/// order; per-operation failures become warnings in the returned
/// [`ApplyResult`].
pub fn apply_plan(
    plan: &ExecutionPlan,
    context: &SlideContext,
    host: &mut dyn CanvasHost,
) -> Result<ApplyResult, ApplyError> {
    apply_plan_with_config(plan, context, host, EngineConfig::default())
}

/// Apply a plan with custom configuration
///
/// # Example
///
/// ```rust
/// use slide_plan::{apply_plan_with_config, Capability, EngineConfig, ExecutionPlan, LayoutConfig};
/// use slide_plan::{MemoryCanvas, SlideContext};
///
/// let context = SlideContext::from_json(r#"{"objects": []}"#).unwrap();
/// let plan = ExecutionPlan::from_json(r#"{
///     "operations": [{"type": "insert", "content": {"rows": [["Region", "Q1"], ["EMEA", 12]]}}]
/// }"#).unwrap();
///
/// let config = EngineConfig::new()
///     .with_layout(LayoutConfig::default().with_margin(32.0))
///     .disable(Capability::AddTable);
///
/// let mut canvas = MemoryCanvas::from_context(&context);
/// let result = apply_plan_with_config(&plan, &context, &mut canvas, config).unwrap();
/// assert_eq!(result.applied_count, 1);
/// assert_eq!(canvas.shape_list()[0].text, "Region | Q1\nEMEA | 12");
/// ```
pub fn apply_plan_with_config(
    plan: &ExecutionPlan,
    context: &SlideContext,
    host: &mut dyn CanvasHost,
    config: EngineConfig,
) -> Result<ApplyResult, ApplyError> {
    PlanApplier::new(config).apply(plan, context, host)
}

/// Parse plan and context JSON, then apply the plan
pub fn apply_plan_json(
    plan_json: &str,
    context_json: &str,
    host: &mut dyn CanvasHost,
    config: EngineConfig,
) -> Result<ApplyResult, ApplyError> {
    let plan = ExecutionPlan::from_json(plan_json).map_err(ApplyError::MalformedPlan)?;
    let context = SlideContext::from_json(context_json).map_err(ApplyError::MalformedContext)?;
    apply_plan_with_config(&plan, &context, host, config)
}
