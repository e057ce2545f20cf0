//! Geometry primitives shared by the layout and resolution code

use serde::{Deserialize, Deserializer, Serialize};

/// An axis-aligned rectangle in slide coordinates (device-independent units)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Check that every component is a finite number
    pub fn is_finite(&self) -> bool {
        self.left.is_finite() && self.top.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Build a rectangle from a `[left, top, width, height]` slice.
    ///
    /// Returns `None` unless there are exactly four finite values.
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        match values {
            [left, top, width, height] => {
                Some(Self::new(*left, *top, *width, *height)).filter(Rect::is_finite)
            }
            _ => None,
        }
    }

    /// Area of the intersection with another rectangle (0 when disjoint)
    pub fn overlap_area(&self, other: &Rect) -> f64 {
        let x = (self.right().min(other.right()) - self.left.max(other.left)).max(0.0);
        let y = (self.bottom().min(other.bottom()) - self.top.max(other.top)).max(0.0);
        x * y
    }

    /// Check whether the interiors of two rectangles intersect
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.right() <= other.left
            || self.left >= other.right()
            || self.bottom() <= other.top
            || self.top >= other.bottom())
    }

    /// Euclidean gap between two rectangles (0 when they touch or overlap)
    pub fn distance_to(&self, other: &Rect) -> f64 {
        let dx = if self.right() < other.left {
            other.left - self.right()
        } else if other.right() < self.left {
            self.left - other.right()
        } else {
            0.0
        };
        let dy = if self.bottom() < other.top {
            other.top - self.bottom()
        } else if other.bottom() < self.top {
            self.top - other.bottom()
        } else {
            0.0
        };
        (dx * dx + dy * dy).sqrt()
    }

    /// Same rectangle moved down by `delta`
    pub fn shifted_down(&self, delta: f64) -> Rect {
        Rect::new(self.left, self.top + delta, self.width, self.height)
    }

    pub fn with_height(&self, height: f64) -> Rect {
        Rect::new(self.left, self.top, self.width, height)
    }
}

/// Dimensions of the slide being edited
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlideSize {
    #[serde(rename = "w")]
    pub width: f64,
    #[serde(rename = "h")]
    pub height: f64,
}

impl SlideSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for SlideSize {
    fn default() -> Self {
        Self::new(960.0, 540.0)
    }
}

/// Round to the nearest multiple of `grid`
pub fn snap_to_grid(value: f64, grid: f64) -> f64 {
    let grid = grid.max(1.0);
    (value / grid).round() * grid
}

/// Round down to a multiple of `grid`
pub fn floor_to_grid(value: f64, grid: f64) -> f64 {
    let grid = grid.max(1.0);
    (value / grid).floor() * grid
}

/// Round up to a multiple of `grid`
pub fn ceil_to_grid(value: f64, grid: f64) -> f64 {
    let grid = grid.max(1.0);
    (value / grid).ceil() * grid
}

/// Clamp without panicking when `max < min`; `max` wins in that case.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BboxRepr {
    Array(Vec<f64>),
    Object {
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    },
}

/// Deserialize an optional bounding box given either as `[l, t, w, h]` or as
/// a `{left, top, width, height}` object. Malformed boxes become `None`.
pub(crate) fn deserialize_bbox<'de, D>(deserializer: D) -> Result<Option<Rect>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BboxRepr> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|repr| match repr {
        BboxRepr::Array(values) => Rect::from_slice(&values),
        BboxRepr::Object {
            left,
            top,
            width,
            height,
        } => Some(Rect::new(left, top, width, height)).filter(Rect::is_finite),
    }))
}
