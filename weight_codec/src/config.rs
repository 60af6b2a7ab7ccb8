use serde::{Deserialize, Serialize};

/// Tunables for [`WeightCodec`](crate::WeightCodec) logging and diagnostics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Entries between progress ticks while reading text weights; 0 disables.
    pub progress_interval: usize,
    /// Entries between progress summaries while reading text weights; 0 disables.
    pub summary_interval: usize,
    /// Number of features reported by `show_largest_features`.
    pub top_features: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            progress_interval: 50_000,
            summary_interval: 2_000_000,
            top_features: 10,
        }
    }
}
