//! Target resolution: which existing shape an operation refers to

use crate::host::ShapeInfo;
use crate::model::context::SlideContext;
use crate::model::plan::{AnchorStrategy, Operation};

use super::index::ShapeIndex;
use super::names::find_by_name;

/// Resolve the existing shape an operation targets.
///
/// Tiers are tried in a fixed order and the first hit wins:
///
/// 1. placeholder anchors: the anchor ref by name or id, then the explicit
///    target by id or name; never a numeric index
/// 2. the target by id, name, or object index
/// 3. for selection anchors, the first selected shape still on the slide
/// 4. the anchor ref, resolved like the target
pub fn resolve_target<'a>(index: &'a ShapeIndex, op: &Operation, context: &SlideContext) -> Option<&'a ShapeInfo> {
    if op.strategy() == Some(AnchorStrategy::Placeholder) {
        if let Some(shape) = op.anchor_ref().and_then(|r| id_or_name(index, context, r)) {
            return Some(shape);
        }
        return op.target_ref().and_then(|t| id_or_name(index, context, t));
    }

    if let Some(shape) = op.target_ref().and_then(|t| resolve_reference(index, context, t)) {
        return Some(shape);
    }

    if op.strategy() == Some(AnchorStrategy::Selection) {
        if let Some(shape) = first_selected(index, context) {
            return Some(shape);
        }
    }

    op.anchor_ref().and_then(|r| resolve_anchor_ref(index, context, r))
}

/// Anchor refs are names first, then any reference form
fn resolve_anchor_ref<'a>(index: &'a ShapeIndex, context: &SlideContext, reference: &str) -> Option<&'a ShapeInfo> {
    find_by_name(index, context, reference).or_else(|| resolve_reference(index, context, reference))
}

fn id_or_name<'a>(index: &'a ShapeIndex, context: &SlideContext, reference: &str) -> Option<&'a ShapeInfo> {
    index.get(reference).or_else(|| find_by_name(index, context, reference))
}

/// Resolve a reference by id, then name, then object index
pub fn resolve_reference<'a>(index: &'a ShapeIndex, context: &SlideContext, reference: &str) -> Option<&'a ShapeInfo> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }
    index
        .get(reference)
        .or_else(|| find_by_name(index, context, reference))
        .or_else(|| {
            reference
                .parse::<i64>()
                .ok()
                .and_then(|n| resolve_object_index(index, context, n))
        })
}

/// Treat `n` as an index into the snapshot objects.
///
/// Planners disagree on whether indexes are 0- or 1-based, so `n` is tried
/// first and `n - 1` second.
fn resolve_object_index<'a>(index: &'a ShapeIndex, context: &SlideContext, n: i64) -> Option<&'a ShapeInfo> {
    [n, n - 1]
        .into_iter()
        .filter_map(|i| usize::try_from(i).ok())
        .filter_map(|i| context.objects.get(i))
        .filter(|obj| !obj.id.is_empty())
        .find_map(|obj| index.get(&obj.id))
}

/// First selected shape that still exists
pub fn first_selected<'a>(index: &'a ShapeIndex, context: &SlideContext) -> Option<&'a ShapeInfo> {
    context.selected_ids().find_map(|id| index.get(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Rect, SlideSize};
    use crate::model::context::SlideObject;
    use crate::model::plan::OperationKind;

    fn context() -> SlideContext {
        SlideContext::new(SlideSize::default())
            .with_object(SlideObject::new("10", "Title 1", Rect::new(40.0, 20.0, 880.0, 80.0)))
            .with_object(SlideObject::new("11", "Body", Rect::new(40.0, 140.0, 880.0, 300.0)))
            .with_object(SlideObject::new("12", "Notes", Rect::new(40.0, 460.0, 880.0, 40.0)))
            .with_selection(["12"])
    }

    fn index(ctx: &SlideContext) -> ShapeIndex {
        ShapeIndex::new(
            ctx.objects
                .iter()
                .map(|o| ShapeInfo::new(o.id.clone(), o.name.clone(), o.bbox.unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0))))
                .collect(),
        )
    }

    fn resolved(op: &Operation) -> Option<String> {
        let ctx = context();
        let index = index(&ctx);
        resolve_target(&index, op, &ctx).map(|s| s.id.clone())
    }

    #[test]
    fn test_target_by_id_and_name() {
        let op = Operation::new(OperationKind::Update).with_target("11");
        assert_eq!(resolved(&op).as_deref(), Some("11"));

        let op = Operation::new(OperationKind::Update).with_target("notes");
        assert_eq!(resolved(&op).as_deref(), Some("12"));
    }

    #[test]
    fn test_numeric_index_tries_both_bases() {
        // "0" is a 0-based hit
        let op = Operation::new(OperationKind::Update).with_target("0");
        assert_eq!(resolved(&op).as_deref(), Some("10"));
        // "3" is out of range 0-based, so it resolves 1-based
        let op = Operation::new(OperationKind::Update).with_target("3");
        assert_eq!(resolved(&op).as_deref(), Some("12"));
        let op = Operation::new(OperationKind::Update).with_target("9");
        assert_eq!(resolved(&op), None);
    }

    #[test]
    fn test_placeholder_anchor_skips_numeric_fallback() {
        let op = Operation::insert_text("x")
            .with_target("2")
            .with_anchor(AnchorStrategy::Placeholder, "chart area");
        assert_eq!(resolved(&op), None);

        let op = Operation::insert_text("x")
            .with_target("2")
            .with_anchor(AnchorStrategy::FreeRegion, "chart area");
        assert_eq!(resolved(&op).as_deref(), Some("12"));

        let op = Operation::insert_text("x")
            .with_target("Body")
            .with_anchor(AnchorStrategy::Placeholder, "chart area");
        assert_eq!(resolved(&op).as_deref(), Some("11"));
    }

    #[test]
    fn test_placeholder_anchor_ref_is_not_an_index() {
        let ctx = SlideContext::new(SlideSize::default())
            .with_object(SlideObject::new("s-a", "Title", Rect::new(40.0, 20.0, 880.0, 80.0)))
            .with_object(SlideObject::new("s-b", "Body", Rect::new(40.0, 140.0, 880.0, 300.0)))
            .with_object(SlideObject::new("s-c", "Notes", Rect::new(40.0, 460.0, 880.0, 40.0)));
        let index = index(&ctx);

        for reference in ["1", "2", "0"] {
            let op = Operation::new(OperationKind::Update).with_anchor(AnchorStrategy::Placeholder, reference);
            assert_eq!(resolve_target(&index, &op, &ctx).map(|s| s.id.as_str()), None, "ref {}", reference);
        }

        let op = Operation::new(OperationKind::Update).with_anchor(AnchorStrategy::Placeholder, "s-b");
        assert_eq!(resolve_target(&index, &op, &ctx).map(|s| s.id.as_str()), Some("s-b"));
        let op = Operation::new(OperationKind::Update).with_anchor(AnchorStrategy::Placeholder, "notes");
        assert_eq!(resolve_target(&index, &op, &ctx).map(|s| s.id.as_str()), Some("s-c"));

        // The same ref under another strategy still gets index resolution
        let op = Operation::new(OperationKind::Update).with_anchor(AnchorStrategy::FreeRegion, "2");
        assert_eq!(resolve_target(&index, &op, &ctx).map(|s| s.id.as_str()), Some("s-c"));
    }

    #[test]
    fn test_selection_anchor() {
        let op = Operation::insert_text("x")
            .with_target("missing")
            .with_anchor(AnchorStrategy::Selection, "current");
        assert_eq!(resolved(&op).as_deref(), Some("12"));
    }

    #[test]
    fn test_anchor_ref_is_last_resort() {
        let op = Operation::insert_text("x").with_anchor(AnchorStrategy::FreeRegion, "body");
        assert_eq!(resolved(&op).as_deref(), Some("11"));

        let op = Operation::insert_text("x").with_anchor(AnchorStrategy::FreeRegion, "right-half");
        assert_eq!(resolved(&op), None);
    }
}
