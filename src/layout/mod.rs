//! Layout engine for placing new content on a slide
//!
//! This module turns content plus the current occupancy into sanitized
//! rectangles: free-region search, subtitle reservation under the title,
//! and the text estimates both rely on.

pub mod bounds;
pub mod config;
pub mod free_region;
pub mod occupancy;
pub mod subtitle;
pub mod text;
pub mod title;

pub use bounds::sanitize;
pub use config::{LayoutConfig, ScoringWeights, SubtitleConfig, TextEstimate, TitleDetection};
pub use free_region::{best_free_region, place, NamedRegion, Placement, PlacementRequest, PlacementSource, SlideFrame};
pub use occupancy::Occupancy;
pub use subtitle::{is_subtitle_intent, reserve_subtitle, ContentShift, ShapeMove, SubtitlePlacement};
pub use title::detect_title;
