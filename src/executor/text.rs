//! Plain-text path: text updates, safe inserts and new text boxes

use std::collections::HashSet;

use crate::geometry::Rect;
use crate::host::{Capability, ShapeInfo, TextStyle};
use crate::layout::subtitle::{is_subtitle_intent, reserve_subtitle, ContentShift, SubtitlePlacement};
use crate::layout::text::{fit_text, trim_long_bullet_text};
use crate::model::plan::OperationKind;
use crate::resolve::{alternative_insert_target, is_safe_insert_target};
use crate::sink::EngineEvent;
use crate::theme::{default_bindings, resolve_style_bindings};

use super::{Applied, ExecutionState, Session, Step};

const NO_TEXT: &str = "Skipped operation without text content";
const SUBTITLE_SHIFTED: &str = "Shifted lower content to reserve subtitle space under the title.";
const SUBTITLE_COMPACT: &str = "Subtitle space was limited; applied compact subtitle placement.";

impl Session<'_> {
    /// Write the payload's text rendering into the slide
    pub(super) fn write_text(&mut self, step: &mut Step<'_>) -> Option<Applied> {
        let text = step.payload.text_fallback();
        if text.trim().is_empty() {
            if step.notes.is_empty() {
                step.warn(NO_TEXT);
            }
            return None;
        }

        match step.kind {
            OperationKind::Update | OperationKind::Transform => self.update_text(step, &text),
            OperationKind::Insert | OperationKind::Delete | OperationKind::Unsupported => {
                self.insert_text(step, &text)
            }
        }
    }

    /// Destructive writes need a resolved target; nothing is guessed
    fn update_text(&mut self, step: &mut Step<'_>, text: &str) -> Option<Applied> {
        let Some(target) = step.target.clone() else {
            step.warn(format!(
                "Skipped {}: intended target was not found. Provide a valid shape id or selection anchor.",
                step.kind
            ));
            return None;
        };
        if self.set_text(step, &target, text) {
            Some(Applied::new(ExecutionState::TextUpdate, None))
        } else {
            step.warn(format!("Failed {}: target exists but is not writable", step.kind));
            None
        }
    }

    fn insert_text(&mut self, step: &mut Step<'_>, text: &str) -> Option<Applied> {
        let mut preferred = None;

        if let Some(target) = step.target.clone() {
            let safe = !self.used.contains(&target.id)
                && is_safe_insert_target(&target, self.context);
            if safe {
                if self.set_text(step, &target, text) {
                    return Some(Applied::new(ExecutionState::TextInsert, None));
                }
                preferred = Some(target.bbox);
            }

            let excluded: HashSet<String> = [target.id.clone()].into_iter().collect();
            let alternative = alternative_insert_target(&step.shapes, self.context, &self.used, &excluded).cloned();
            if let Some(alternative) = alternative {
                if self.set_text(step, &alternative, text) {
                    return Some(Applied::new(ExecutionState::TextInsert, None));
                }
            }
        }

        if is_subtitle_intent(step.op, text, self.config) {
            if let Some(bbox) = self.reserve_subtitle(step, text) {
                preferred = Some(bbox);
            }
        }

        match self.add_text_box(step, text, preferred) {
            Some(rect) => Some(Applied::new(ExecutionState::TextInsert, Some(rect))),
            None => {
                step.warn(format!("Failed to apply {} operation", step.kind));
                None
            }
        }
    }

    /// Replace the text of an existing shape, keeping its formatting
    fn set_text(&mut self, step: &Step<'_>, shape: &ShapeInfo, text: &str) -> bool {
        if !self.supports(step, Capability::SetText) {
            return false;
        }
        match self.host.set_text(&shape.id, text) {
            Ok(()) => {
                self.used.insert(shape.id.clone());
                true
            }
            Err(err) => {
                self.tier_failed(step, Capability::SetText, &err);
                false
            }
        }
    }

    fn add_text_box(&mut self, step: &mut Step<'_>, text: &str, preferred: Option<Rect>) -> Option<Rect> {
        if !self.supports(step, Capability::AddTextBox) {
            return None;
        }
        let slide = self.frame.size;
        let placement = self.placement(step, text, preferred);
        let body = trim_long_bullet_text(text, slide, &self.config.text);
        let fit = fit_text(&body, &placement.rect, slide);

        let bindings = if step.op.style_bindings.is_empty() {
            default_bindings()
        } else {
            step.op.style_bindings.clone()
        };
        let resolved = resolve_style_bindings(&bindings, self.context);
        let style = TextStyle {
            font_size: fit.font_size,
            font_name: resolved.font,
            color: resolved.color,
            word_wrap: true,
            margins: (fit.margin_x, fit.margin_y),
        };

        match self.host.add_text_box(&body, placement.rect, &style) {
            Ok(id) => {
                self.used.insert(id);
                Some(placement.rect)
            }
            Err(err) => {
                self.tier_failed(step, Capability::AddTextBox, &err);
                None
            }
        }
    }

    /// Claim the band under the title, shifting lower content when needed
    fn reserve_subtitle(&mut self, step: &mut Step<'_>, text: &str) -> Option<Rect> {
        let live = self.host.shapes();
        match reserve_subtitle(&self.frame, text, step.occupied, &live, self.config)? {
            SubtitlePlacement::Fits(rect) => Some(rect),
            SubtitlePlacement::Compressed(rect) => {
                step.warn(SUBTITLE_COMPACT);
                Some(rect)
            }
            SubtitlePlacement::Shift { bbox, shift, fallback } => {
                if self.apply_shift(step, &shift) {
                    step.warn(SUBTITLE_SHIFTED);
                    return Some(bbox);
                }
                let rect = fallback?;
                step.warn(SUBTITLE_COMPACT);
                Some(rect)
            }
        }
    }

    /// Move every shape of the shift; on a refused move, undo the moves made so far
    fn apply_shift(&mut self, step: &mut Step<'_>, shift: &ContentShift) -> bool {
        if !self.supports(step, Capability::MoveShape) {
            return false;
        }
        step.shapes_changed = true;

        for (done, planned) in shift.moves.iter().enumerate() {
            if let Err(err) = self.host.move_shape(&planned.id, planned.to) {
                self.tier_failed(step, Capability::MoveShape, &err);
                for undo in shift.moves[..done].iter().rev() {
                    if let Err(err) = self.host.move_shape(&undo.id, undo.from) {
                        self.tier_failed(step, Capability::MoveShape, &err);
                    }
                }
                return false;
            }
        }

        self.sink.event(&EngineEvent::ContentShifted {
            delta: shift.delta,
            shapes: shift.moves.len(),
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::OperationOutcome;
    use crate::geometry::SlideSize;
    use crate::host::{CanvasHost, HostError, MemoryCanvas};
    use crate::layout::LayoutConfig;
    use crate::model::context::{SlideContext, SlideObject};
    use crate::model::plan::{AnchorStrategy, Operation, OperationEntry, StyleBindings};
    use crate::sink::NoopSink;

    const TITLE: Rect = Rect {
        left: 40.0,
        top: 20.0,
        width: 880.0,
        height: 80.0,
    };

    fn context() -> SlideContext {
        SlideContext::new(SlideSize::default())
            .with_object(SlideObject::new("1", "Title 1", TITLE).with_text("Quarterly Review").with_font("Georgia"))
            .with_object(
                SlideObject::new("2", "Content Placeholder 2", Rect::new(40.0, 140.0, 880.0, 300.0))
                    .with_text("Click to add text"),
            )
            .with_object(
                SlideObject::new("3", "Notes", Rect::new(40.0, 460.0, 880.0, 50.0))
                    .with_text("Authored notes")
                    .with_font("Calibri"),
            )
    }

    fn run_all(canvas: &mut MemoryCanvas, ctx: &SlideContext, ops: Vec<Operation>) -> Vec<OperationOutcome> {
        let config = LayoutConfig::default();
        let caps = canvas.capabilities();
        let mut occupied = ctx.object_rects();
        let mut session = Session::new(canvas, ctx, &config, caps, &NoopSink);
        ops.into_iter()
            .enumerate()
            .map(|(i, op)| {
                let outcome = session.execute(i, &OperationEntry::Valid(op), &occupied);
                if let Some(bbox) = outcome.occupied_bbox {
                    occupied.push(bbox);
                }
                outcome
            })
            .collect()
    }

    #[test]
    fn test_update_writes_target() {
        let ctx = context();
        let mut canvas = MemoryCanvas::from_context(&ctx);
        let op = Operation::new(OperationKind::Update)
            .with_target("Notes")
            .with_content(crate::model::plan::RawContent::text("Rewritten"));
        let outcomes = run_all(&mut canvas, &ctx, vec![op]);
        assert_eq!(outcomes[0].state, ExecutionState::TextUpdate);
        assert_eq!(canvas.shape("3").unwrap().text, "Rewritten");
        assert!(canvas.shape("3").unwrap().style.is_none());
    }

    #[test]
    fn test_update_locked_target_fails() {
        let ctx = context();
        let mut canvas = MemoryCanvas::from_context(&ctx).lock("3");
        let op = Operation::new(OperationKind::Transform)
            .with_target("3")
            .with_content(crate::model::plan::RawContent::text("Rewritten"));
        let outcomes = run_all(&mut canvas, &ctx, vec![op]);
        assert!(!outcomes[0].applied);
        assert_eq!(outcomes[0].warnings, vec!["Failed transform: target exists but is not writable"]);
    }

    #[test]
    fn test_insert_into_placeholder_only_once() {
        let ctx = context();
        let mut canvas = MemoryCanvas::from_context(&ctx);
        let op = || Operation::insert_text("Agenda").with_anchor(AnchorStrategy::Placeholder, "Content Placeholder 2");
        let outcomes = run_all(&mut canvas, &ctx, vec![op(), op()]);
        assert!(outcomes.iter().all(|o| o.applied));
        assert_eq!(outcomes[0].occupied_bbox, None);
        assert_eq!(canvas.shape("2").unwrap().text, "Agenda");
        // The placeholder is claimed, so the second insert creates a new box
        assert!(outcomes[1].occupied_bbox.is_some());
        assert_eq!(canvas.shape("new-1").unwrap().text, "Agenda");
    }

    #[test]
    fn test_insert_never_overwrites_authored_text() {
        let ctx = context();
        let mut canvas = MemoryCanvas::from_context(&ctx);
        let op = Operation::insert_text("Extra point").with_target("3");
        let outcomes = run_all(&mut canvas, &ctx, vec![op]);
        assert!(outcomes[0].applied);
        assert_eq!(canvas.shape("3").unwrap().text, "Authored notes");
        // The placeholder was the alternative target
        assert_eq!(canvas.shape("2").unwrap().text, "Extra point");
    }

    #[test]
    fn test_new_text_box_style() {
        let ctx = context();
        let mut canvas = MemoryCanvas::from_context(&ctx);
        let ops = vec![
            Operation::insert_text("Body font"),
            Operation::insert_text("Title font").with_style(StyleBindings {
                font: Some("theme.title".into()),
                color: Some("1f4e79".into()),
            }),
        ];
        run_all(&mut canvas, &ctx, ops);
        let first = canvas.shape("new-1").unwrap().style.clone().unwrap();
        assert_eq!(first.font_name.as_deref(), Some("Calibri"));
        assert!(first.word_wrap);
        let second = canvas.shape("new-2").unwrap().style.clone().unwrap();
        assert_eq!(second.font_name.as_deref(), Some("Georgia"));
        assert_eq!(second.color.as_deref(), Some("#1F4E79"));
    }

    #[test]
    fn test_subtitle_shift_is_reverted_when_a_move_is_refused() {
        let ctx = SlideContext::new(SlideSize::default())
            .with_object(SlideObject::new("1", "Title 1", TITLE).with_text("Quarterly Review"))
            .with_object(SlideObject::new("2", "Body", Rect::new(40.0, 140.0, 880.0, 200.0)).with_text("Authored"))
            .with_object(SlideObject::new("3", "Footer", Rect::new(40.0, 360.0, 400.0, 40.0)).with_text("Authored"));
        let op = Operation::insert_text("Results for the third quarter").with_anchor(AnchorStrategy::Placeholder, "subtitle");

        let mut canvas = MemoryCanvas::from_context(&ctx);
        let outcomes = run_all(&mut canvas, &ctx, vec![op.clone()]);
        assert!(outcomes[0].applied);
        assert!(outcomes[0].shapes_changed);
        assert_eq!(outcomes[0].warnings, vec![SUBTITLE_SHIFTED]);
        assert!(canvas.shape("2").unwrap().bbox.top > 140.0);

        let mut canvas = MemoryCanvas::from_context(&ctx).lock("3");
        let outcomes = run_all(&mut canvas, &ctx, vec![op]);
        assert!(outcomes[0].applied);
        assert_eq!(canvas.shape("2").unwrap().bbox.top, 140.0);
        assert_eq!(canvas.shape("3").unwrap().bbox.top, 360.0);
    }

    #[test]
    fn test_missing_text_box_support_fails_insert() {
        let ctx = context();
        let mut canvas = MemoryCanvas::from_context(&ctx).without(Capability::AddTextBox);
        let outcomes = run_all(&mut canvas, &ctx, vec![Operation::insert_text("Hello")]);
        assert!(!outcomes[0].applied);
        assert_eq!(outcomes[0].warnings, vec!["Failed to apply insert operation"]);
        let err = canvas.add_text_box("x", TITLE, &TextStyle::default()).unwrap_err();
        assert_eq!(err, HostError::Unsupported(Capability::AddTextBox));
    }
}
