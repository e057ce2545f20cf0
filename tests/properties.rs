//! Property tests for placement invariants

use proptest::prelude::*;
use slide_plan::layout::{best_free_region, sanitize, SlideFrame};
use slide_plan::{apply_plan, ExecutionPlan, LayoutConfig, MemoryCanvas, Operation, Rect, SlideContext, SlideSize};

const WORDS: [&str; 8] = ["sales", "grew", "in", "every", "region", "margin", "held", "flat"];

fn text(word_count: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(0..WORDS.len(), word_count..=word_count)
        .prop_map(|picks| picks.into_iter().map(|i| WORDS[i]).collect::<Vec<_>>().join(" "))
}

proptest! {
    #[test]
    fn sanitize_is_idempotent(
        left in -500.0f64..1500.0,
        top in -500.0f64..1000.0,
        width in 0.0f64..1200.0,
        height in 0.0f64..800.0,
        slide_w in 640.0f64..1600.0,
        slide_h in 360.0f64..1000.0,
    ) {
        let config = LayoutConfig::default();
        let slide = SlideSize::new(slide_w.round(), slide_h.round());
        let once = sanitize(Rect::new(left, top, width, height), slide, &config);
        let twice = sanitize(once, slide, &config);
        prop_assert_eq!(once, twice);
        prop_assert!(once.width >= config.min_size.0);
        prop_assert!(once.height >= config.min_size.1);
    }

    #[test]
    fn free_region_avoids_small_obstacles(
        left in 24.0f64..200.0,
        top in 24.0f64..150.0,
        width in 10.0f64..200.0,
        height in 10.0f64..100.0,
        words in 1usize..40,
    ) {
        // The band starting near mid-slide is always free of an obstacle this high up
        let config = LayoutConfig::default();
        let frame = SlideFrame::new(SlideSize::default(), None);
        let obstacle = Rect::new(left, top, width, height);
        let body = WORDS.iter().cycle().take(words).copied().collect::<Vec<_>>().join(" ");
        let rect = best_free_region(&frame, &body, None, &[obstacle], &config).unwrap();
        prop_assert_eq!(rect.overlap_area(&obstacle), 0.0);
    }

    #[test]
    fn sequential_inserts_never_overlap(first in text(30), second in text(40)) {
        let context = SlideContext::from_json(
            r#"{"objects": [{"id": "1", "name": "Title 1", "bbox": [40, 20, 880, 80], "text": "Outlook"}]}"#,
        )
        .unwrap();
        let plan = ExecutionPlan::new(vec![Operation::insert_text(first), Operation::insert_text(second)]);
        let mut canvas = MemoryCanvas::from_context(&context);
        let result = apply_plan(&plan, &context, &mut canvas).unwrap();
        prop_assert_eq!(result.applied_count, 2);

        let shapes = canvas.shape_list();
        for (i, a) in shapes.iter().enumerate() {
            for b in &shapes[i + 1..] {
                prop_assert!(!a.bbox.overlaps(&b.bbox), "{:?} overlaps {:?}", a.bbox, b.bbox);
            }
        }
    }
}
