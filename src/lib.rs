//! Feature dictionary and weight-vector persistence for linear models.
//!
//! [`FeatureDictionary`] maps feature names to compact identifiers, either by
//! growing a table or through a precomputed perfect hash. [`WeightCodec`]
//! reads and writes dense weight vectors keyed by those identifiers.

pub use feature_dict::{
    DictionaryError, DisplacementHash, FeatureDictionary, FeatureId, PerfectHash,
    PerfectHashError, UNKNOWN_FEATURE, escape, unescape,
};
pub use weight_codec::{
    CodecConfig, ErrorClass, MAGIC, SparseVector, Weight, WeightCodec, WeightFormat,
    WeightsError, init_sparse_vector, largest_features, sanity_check,
};
