//! Input model: execution plans, canvas snapshots and content payloads

pub mod context;
pub mod payload;
pub mod plan;
pub mod validate;

pub use context::{is_placeholder_text, SlideContext, SlideObject};
pub use payload::{ChartKind, ChartPayload, ImagePayload, Payload, TableRows};
pub use plan::{
    Anchor, AnchorStrategy, ExecutionPlan, Operation, OperationEntry, OperationKind, RawContent,
    StyleBindings, MAX_OPERATIONS,
};
pub use validate::{validate_context, validate_plan, ValidationReport};
