//! Persistence of dense feature weight vectors in text and binary form.
//!
//! Text files hold one `name value` pair per line and are keyed through a
//! [`FeatureDictionary`]. Binary files start with the [`MAGIC`] marker and
//! store the raw vector for hash-backed dictionaries.

mod binary;
mod codec;
mod config;
mod diagnostics;
mod error;
mod format;
mod sparse;
mod stream;
mod text;

pub use codec::WeightCodec;
pub use config::CodecConfig;
pub use diagnostics::{largest_features, sanity_check};
pub use error::{ErrorClass, WeightsError};
pub use format::{MAGIC, WeightFormat};
pub use sparse::{SparseVector, init_sparse_vector};
pub use stream::{WeightSink, open_reader};

pub use feature_dict::{FeatureDictionary, FeatureId};

/// Scalar type stored in weight vectors.
pub type Weight = f64;
