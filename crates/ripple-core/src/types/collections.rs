//! Re-exports of performance-oriented collection types.

pub use rustc_hash::{FxHashMap, FxHashSet};
pub use smallvec::SmallVec;
pub use std::collections::{BTreeMap, BTreeSet};

/// SmallVec sized for short traversal paths, kept inline up to 8 entries.
pub type SmallVec8<T> = SmallVec<[T; 8]>;
