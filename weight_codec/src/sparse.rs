use std::collections::BTreeMap;

use feature_dict::FeatureId;

use crate::Weight;

/// Map from feature identifier to non-zero weight, ordered by identifier.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SparseVector {
    values: BTreeMap<FeatureId, Weight>,
}

impl SparseVector {
    /// Empty vector; every id reads as zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` at `id`, replacing any previous entry.
    pub fn set_value(&mut self, id: FeatureId, value: Weight) {
        self.values.insert(id, value);
    }

    /// Returns the stored value for `id`, or zero when absent.
    pub fn value(&self, id: FeatureId) -> Weight {
        self.values.get(&id).copied().unwrap_or(0.0)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(id, value)` pairs in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (FeatureId, Weight)> + '_ {
        self.values.iter().map(|(&id, &value)| (id, value))
    }
}

impl FromIterator<(FeatureId, Weight)> for SparseVector {
    fn from_iter<I: IntoIterator<Item = (FeatureId, Weight)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Builds the sparse view of `dense`, skipping index 0 and zero weights.
pub fn init_sparse_vector(dense: &[Weight]) -> SparseVector {
    dense
        .iter()
        .enumerate()
        .skip(1)
        .filter(|&(_, &value)| value != 0.0)
        .map(|(id, &value)| (id, value))
        .collect()
}
