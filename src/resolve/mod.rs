//! Mapping operations onto existing shapes
//!
//! Target resolution decides which shape an operation refers to; the
//! insert-safety policy decides whether an insert may overwrite it.

pub mod index;
pub mod names;
pub mod safety;
pub mod target;

pub use index::ShapeIndex;
pub use names::{find_by_name, normalize_name};
pub use safety::{alternative_insert_target, is_safe_insert_target};
pub use target::{resolve_reference, resolve_target};
