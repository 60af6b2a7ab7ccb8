use std::fmt;

use feature_dict::FeatureDictionary;

/// Marker opening every binary weight file.
pub const MAGIC: &[u8; 5] = b"_PHWf";

/// On-disk representation of a weight vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeightFormat {
    Text,
    Binary,
}

impl WeightFormat {
    /// Decides the format from the leading bytes of a file.
    pub fn detect(probe: &[u8]) -> Self {
        if probe == MAGIC.as_slice() {
            WeightFormat::Binary
        } else {
            WeightFormat::Text
        }
    }

    /// Output format implied by the dictionary mode.
    pub fn for_dictionary(dict: &FeatureDictionary) -> Self {
        if dict.using_perfect_hash() {
            WeightFormat::Binary
        } else {
            WeightFormat::Text
        }
    }
}

impl fmt::Display for WeightFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightFormat::Text => f.write_str("text"),
            WeightFormat::Binary => f.write_str("binary"),
        }
    }
}
