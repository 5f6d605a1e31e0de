//! Data structures shared across Ripple crates.

pub mod collections;
pub mod identifiers;

pub use collections::{FxHashMap, FxHashSet};
pub use identifiers::FunctionId;
