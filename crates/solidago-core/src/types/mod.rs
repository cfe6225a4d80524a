//! Value types shared by every pipeline phase.

pub mod collections;
pub mod scale;
pub mod score;

pub use collections::{FxHashMap, FxHashSet, NameIndex};
pub use scale::Scale;
pub use score::{squash, Score};
