//! Invariant checks and reporting helpers for loaded weight vectors.

use std::cmp::Ordering;

use feature_dict::FeatureId;

use crate::Weight;
use crate::error::WeightsError;

/// Fails on the first NaN or infinite weight.
pub fn sanity_check(weights: &[Weight]) -> Result<(), WeightsError> {
    match weights.iter().position(|value| !value.is_finite()) {
        Some(index) => Err(WeightsError::NonFinite {
            index,
            value: weights[index],
        }),
        None => Ok(()),
    }
}

/// Returns up to `limit` features with the largest absolute weight, largest
/// first. Ties keep identifier order; the reserved identifier 0 is skipped.
pub fn largest_features(weights: &[Weight], limit: usize) -> Vec<(FeatureId, Weight)> {
    let mut ids: Vec<FeatureId> = (1..weights.len()).collect();
    ids.sort_by(|&a, &b| {
        weights[b]
            .abs()
            .partial_cmp(&weights[a].abs())
            .unwrap_or(Ordering::Equal)
    });
    ids.truncate(limit);
    ids.into_iter().map(|id| (id, weights[id])).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanity_check_flags_non_finite_values() {
        assert!(sanity_check(&[0.0, 1.0, -1e300]).is_ok());
        let err = sanity_check(&[0.0, 1.0, Weight::INFINITY]).unwrap_err();
        assert!(matches!(err, WeightsError::NonFinite { index: 2, .. }));
        let err = sanity_check(&[Weight::NAN]).unwrap_err();
        assert!(matches!(err, WeightsError::NonFinite { index: 0, .. }));
    }

    #[test]
    fn largest_features_orders_by_magnitude() {
        let top = largest_features(&[0.0, 3.0, -5.0, 1.0], 10);
        assert_eq!(top, vec![(2, -5.0), (1, 3.0), (3, 1.0)]);
    }

    #[test]
    fn largest_features_is_stable_and_bounded() {
        let weights = [9.0, 1.0, -2.0, 2.0, 0.5, 2.0];
        assert_eq!(largest_features(&weights, 3), vec![(2, -2.0), (3, 2.0), (5, 2.0)]);
        assert!(largest_features(&weights, 0).is_empty());
        assert!(largest_features(&[], 10).is_empty());
    }
}
