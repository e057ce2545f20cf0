//! Structural checks and policy warnings for plans and canvas snapshots
//!
//! Validation is advisory: the applier only treats an out-of-range operation
//! count as fatal. Everything reported here is surfaced to callers that want
//! to reject a plan before applying it.

use std::fmt;

use super::context::SlideContext;
use super::plan::{AnchorStrategy, ExecutionPlan, OperationEntry, OperationKind, MAX_OPERATIONS};

/// Maximum number of canvas objects a snapshot may describe
pub const MAX_CONTEXT_OBJECTS: usize = 250;

/// Outcome of validating a plan or a context
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for error in &self.errors {
            writeln!(f, "error: {}", error)?;
        }
        for warning in &self.warnings {
            writeln!(f, "warning: {}", warning)?;
        }
        Ok(())
    }
}

/// Validate plan structure and collect policy warnings
pub fn validate_plan(plan: &ExecutionPlan) -> ValidationReport {
    let mut report = ValidationReport::default();

    if plan.plan_id.trim().is_empty() {
        report.errors.push("planId is required".to_string());
    }
    if plan.summary.trim().is_empty() {
        report.errors.push("summary is required".to_string());
    }

    let count = plan.operations.len();
    if count == 0 || count > MAX_OPERATIONS {
        report.errors.push(format!(
            "operations must contain between 1 and {} entries (got {})",
            MAX_OPERATIONS, count
        ));
    }

    let mut has_delete = false;
    let mut has_free_region = false;

    for (i, entry) in plan.operations.iter().enumerate() {
        let op = match entry {
            OperationEntry::Valid(op) => op,
            OperationEntry::Malformed(_) => {
                report.errors.push(format!("operations[{}] is not an operation object", i));
                continue;
            }
        };

        match op.kind {
            None => report.errors.push(format!("operations[{}].type is required", i)),
            Some(OperationKind::Unsupported) => report
                .errors
                .push(format!("operations[{}].type is not supported", i)),
            Some(OperationKind::Delete) => has_delete = true,
            Some(_) => {}
        }

        if op.target_ref().is_none() {
            report.errors.push(format!("operations[{}].target is required", i));
        }

        match op.anchor.as_ref() {
            None => report.errors.push(format!("operations[{}].anchor is required", i)),
            Some(anchor) => {
                match anchor.strategy {
                    None | Some(AnchorStrategy::Unknown) => report
                        .errors
                        .push(format!("operations[{}].anchor.strategy is invalid", i)),
                    Some(AnchorStrategy::FreeRegion) => has_free_region = true,
                    Some(_) => {}
                }
                if op.anchor_ref().is_none() {
                    report
                        .errors
                        .push(format!("operations[{}].anchor.ref is required", i));
                }
            }
        }
    }

    if has_delete {
        report
            .warnings
            .push("Plan contains delete operations and requires explicit confirmation.".to_string());
    }
    if has_free_region {
        report.warnings.push(
            "Plan uses free-region anchoring; renderer must run collision checks before apply."
                .to_string(),
        );
    }

    report
}

/// Validate a canvas snapshot
pub fn validate_context(context: &SlideContext) -> ValidationReport {
    let mut report = ValidationReport::default();

    if context.objects.len() > MAX_CONTEXT_OBJECTS {
        report.errors.push(format!(
            "context describes {} objects; at most {} are allowed",
            context.objects.len(),
            MAX_CONTEXT_OBJECTS
        ));
    }

    for (i, object) in context.objects.iter().enumerate() {
        if object.id.trim().is_empty() {
            report.errors.push(format!("objects[{}].id must be a non-empty string", i));
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Rect, SlideSize};
    use crate::model::context::SlideObject;
    use crate::model::plan::Operation;

    fn complete_plan(ops: Vec<Operation>) -> ExecutionPlan {
        let mut plan = ExecutionPlan::new(ops);
        plan.plan_id = "plan-1".into();
        plan.summary = "Add a summary box".into();
        plan
    }

    #[test]
    fn test_valid_plan() {
        let plan = complete_plan(vec![Operation::insert_text("hello")
            .with_target("body")
            .with_anchor(AnchorStrategy::Placeholder, "body")]);
        let report = validate_plan(&plan);
        assert!(report.is_valid(), "unexpected errors: {}", report);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_missing_fields_are_errors() {
        let plan = ExecutionPlan::new(vec![Operation::default()]);
        let report = validate_plan(&plan);
        assert!(report.errors.contains(&"planId is required".to_string()));
        assert!(report.errors.contains(&"summary is required".to_string()));
        assert!(report.errors.contains(&"operations[0].type is required".to_string()));
        assert!(report.errors.contains(&"operations[0].target is required".to_string()));
        assert!(report.errors.contains(&"operations[0].anchor is required".to_string()));
    }

    #[test]
    fn test_operation_count_bounds() {
        let report = validate_plan(&complete_plan(vec![]));
        assert!(!report.is_valid());

        let ops = (0..16)
            .map(|i| {
                Operation::insert_text("x")
                    .with_target(i.to_string())
                    .with_anchor(AnchorStrategy::Selection, "s")
            })
            .collect();
        let report = validate_plan(&complete_plan(ops));
        insta::assert_snapshot!(
            report.errors[0],
            @"operations must contain between 1 and 15 entries (got 16)"
        );
    }

    #[test]
    fn test_policy_warnings() {
        let plan = complete_plan(vec![
            Operation::new(OperationKind::Delete)
                .with_target("5")
                .with_anchor(AnchorStrategy::Selection, "5"),
            Operation::insert_text("x")
                .with_target("new")
                .with_anchor(AnchorStrategy::FreeRegion, "right-half"),
        ]);
        let report = validate_plan(&plan);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 2);
        assert!(report.warnings[0].contains("explicit confirmation"));
        assert!(report.warnings[1].contains("collision checks"));
    }

    #[test]
    fn test_context_limits() {
        let mut ctx = SlideContext::new(SlideSize::default());
        for i in 0..251 {
            ctx = ctx.with_object(SlideObject::new(i.to_string(), "", Rect::new(0.0, 0.0, 1.0, 1.0)));
        }
        ctx = ctx.with_object(SlideObject::new(" ", "", Rect::new(0.0, 0.0, 1.0, 1.0)));
        let report = validate_context(&ctx);
        assert_eq!(report.errors.len(), 2);
    }
}
