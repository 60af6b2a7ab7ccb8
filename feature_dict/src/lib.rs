//! Feature name dictionary mapping names to compact identifiers, optionally
//! backed by a precomputed perfect hash function.

mod dictionary;
mod escape;
pub mod perfect_hash;

pub use dictionary::{DictionaryError, FeatureDictionary, UNKNOWN_FEATURE};
pub use escape::{escape, unescape};
pub use perfect_hash::{DisplacementHash, PerfectHash, PerfectHashError};

/// Compact identifier assigned to a feature name. Identifier `0` is reserved.
pub type FeatureId = usize;
