//! Raw weight vectors for hash-backed dictionaries.
//!
//! Layout after the [`MAGIC`] marker: the key count as a native-endian `u64`,
//! then that many native-endian `f64` values in identifier order from 0.

use std::io::{self, Read, Write};

use bytemuck::{cast_slice, cast_slice_mut};
use feature_dict::FeatureDictionary;

use crate::Weight;
use crate::error::WeightsError;
use crate::format::MAGIC;

/// Reads the payload following an already consumed marker.
pub(crate) fn read_weights<R: Read>(
    mut reader: R,
    dict: &FeatureDictionary,
) -> Result<Vec<Weight>, WeightsError> {
    let mut count = [0u8; 8];
    read_section(&mut reader, &mut count, "key count")?;
    let found = u64::from_ne_bytes(count);
    let expected = dict.num_feats();
    if found != expected as u64 {
        return Err(WeightsError::KeyCountMismatch { expected, found });
    }

    let mut weights = vec![0.0; expected];
    read_section(&mut reader, cast_slice_mut(weights.as_mut_slice()), "weights")?;
    Ok(weights)
}

/// Rejects vectors too short to cover the dictionary's key space.
pub(crate) fn check_capacity(
    dict: &FeatureDictionary,
    weights: &[Weight],
) -> Result<usize, WeightsError> {
    let keys = dict.num_feats();
    if keys > weights.len() {
        return Err(WeightsError::VectorTooShort {
            keys,
            len: weights.len(),
        });
    }
    Ok(keys)
}

/// Writes marker, key count and weights, returning the number of keys written.
pub(crate) fn write_weights<W: Write>(
    mut out: W,
    dict: &FeatureDictionary,
    weights: &[Weight],
) -> Result<usize, WeightsError> {
    let keys = check_capacity(dict, weights)?;
    out.write_all(MAGIC)?;
    out.write_all(&(keys as u64).to_ne_bytes())?;
    out.write_all(cast_slice(&weights[..keys]))?;
    Ok(keys)
}

fn read_section<R: Read>(
    reader: &mut R,
    buf: &mut [u8],
    section: &'static str,
) -> Result<(), WeightsError> {
    reader.read_exact(buf).map_err(|err| match err.kind() {
        io::ErrorKind::UnexpectedEof => WeightsError::ShortRead { section },
        _ => WeightsError::Io(err),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_dict::DisplacementHash;

    fn hashed(keys: usize) -> FeatureDictionary {
        FeatureDictionary::with_perfect_hash(
            DisplacementHash::from_parts(3, vec![(1, 1)], keys).unwrap(),
        )
    }

    fn payload(keys: u64, weights: &[Weight]) -> Vec<u8> {
        let mut bytes = keys.to_ne_bytes().to_vec();
        bytes.extend_from_slice(cast_slice(weights));
        bytes
    }

    #[test]
    fn writer_emits_marker_count_and_values() {
        let dict = hashed(3);
        let mut out = Vec::new();
        let keys = write_weights(&mut out, &dict, &[0.0, 1.5, -2.0, 9.0]).unwrap();
        assert_eq!(keys, 3);
        assert_eq!(&out[..5], MAGIC);
        assert_eq!(&out[5..], payload(3, &[0.0, 1.5, -2.0]).as_slice());
    }

    #[test]
    fn reader_restores_exact_vector() {
        let dict = hashed(4);
        let values = [0.0, -0.0, 1e-300, 42.0];
        let weights = read_weights(payload(4, &values).as_slice(), &dict).unwrap();
        assert_eq!(weights.len(), 4);
        for (restored, original) in weights.iter().zip(values) {
            assert_eq!(restored.to_bits(), original.to_bits());
        }
    }

    #[test]
    fn key_count_must_match_dictionary() {
        let dict = hashed(4);
        let err = read_weights(payload(5, &[0.0; 5]).as_slice(), &dict).unwrap_err();
        assert!(matches!(
            err,
            WeightsError::KeyCountMismatch {
                expected: 4,
                found: 5
            }
        ));
    }

    #[test]
    fn truncated_payloads_are_reported() {
        let dict = hashed(4);
        let err = read_weights(payload(4, &[1.0, 2.0]).as_slice(), &dict).unwrap_err();
        assert!(matches!(err, WeightsError::ShortRead { section: "weights" }));

        let err = read_weights(&[1u8, 2, 3][..], &dict).unwrap_err();
        assert!(matches!(err, WeightsError::ShortRead { section: "key count" }));
    }

    #[test]
    fn short_vectors_cannot_be_written() {
        let dict = hashed(4);
        let mut out = Vec::new();
        let err = write_weights(&mut out, &dict, &[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, WeightsError::VectorTooShort { keys: 4, len: 2 }));
        assert!(out.is_empty());
    }
}
