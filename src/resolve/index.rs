//! Lookup table over the live shapes of the slide

use std::collections::HashMap;

use crate::host::{CanvasHost, ShapeInfo};
use crate::model::context::{SlideContext, SlideObject};

/// Live shapes by id, in host order.
///
/// Rebuilt from the host before each operation so deletions and inserts
/// made earlier in the plan are visible to target resolution.
#[derive(Debug, Clone, Default)]
pub struct ShapeIndex {
    shapes: Vec<ShapeInfo>,
    by_id: HashMap<String, usize>,
}

impl ShapeIndex {
    pub fn new(shapes: Vec<ShapeInfo>) -> Self {
        let mut by_id = HashMap::with_capacity(shapes.len());
        for (i, shape) in shapes.iter().enumerate() {
            by_id.entry(shape.id.clone()).or_insert(i);
        }
        Self { shapes, by_id }
    }

    pub fn from_host(host: &dyn CanvasHost) -> Self {
        Self::new(host.shapes())
    }

    pub fn get(&self, id: &str) -> Option<&ShapeInfo> {
        self.by_id.get(id).map(|&i| &self.shapes[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShapeInfo> {
        self.shapes.iter()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

/// Snapshot object backing a live shape, if the shape existed when the snapshot was taken
pub fn backing_object<'a>(context: &'a SlideContext, shape: &ShapeInfo) -> Option<&'a SlideObject> {
    context.object(&shape.id)
}

/// Lower-cased display name: the snapshot name if present, else the live name
pub fn display_name(context: &SlideContext, shape: &ShapeInfo) -> String {
    backing_object(context, shape)
        .map(|obj| obj.name.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(&shape.name)
        .to_lowercase()
}
