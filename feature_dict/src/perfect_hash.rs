//! Read-only perfect hash oracles consumed by hash-backed dictionaries.

use std::fmt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use bincode::{deserialize, serialize};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use xxhash_rust::xxh3::xxh3_128_with_seed;

use crate::FeatureId;

const MAGIC: &[u8; 4] = b"PHFD";
const VERSION: u8 = 1;

/// Errors that may occur while reading or writing perfect hash parameters.
#[derive(Debug, Error)]
pub enum PerfectHashError {
    /// Raised when filesystem access fails.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Raised when the parameter payload cannot be encoded or decoded.
    #[error("bincode error: {0}")]
    Bincode(#[from] Box<bincode::ErrorKind>),
    /// Raised when the file does not start with the expected header.
    #[error("missing perfect hash header")]
    BadMagic,
    /// Raised when the header advertises an unknown layout.
    #[error("unsupported perfect hash version {0}")]
    UnsupportedVersion(u8),
    /// A perfect hash must cover at least one key.
    #[error("perfect hash must cover at least one key")]
    NoKeys,
    /// The displacement table is empty.
    #[error("perfect hash has no displacement buckets")]
    NoBuckets,
    /// Key counts are limited to the 32-bit range of the displacement arithmetic.
    #[error("perfect hash key count {0} exceeds the 32-bit range")]
    TooManyKeys(usize),
}

/// Total function from feature names onto `0..number_of_keys()`.
///
/// Implementations are built offline from a closed key set; names outside that
/// set still map to some identifier in range.
pub trait PerfectHash: fmt::Debug + Send + Sync {
    /// Size of the key set the function was built for.
    fn number_of_keys(&self) -> usize;

    /// Identifier assigned to `key`.
    fn index(&self, key: &str) -> FeatureId;
}

/// Hash-and-displace perfect hash function described by a seed and one
/// displacement pair per bucket.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DisplacementHash {
    seed: u64,
    displacements: Vec<(u32, u32)>,
    num_keys: u32,
}

impl DisplacementHash {
    /// Wraps precomputed parameters, validating that they describe a usable function.
    pub fn from_parts(
        seed: u64,
        displacements: Vec<(u32, u32)>,
        num_keys: usize,
    ) -> Result<Self, PerfectHashError> {
        let num_keys =
            u32::try_from(num_keys).map_err(|_| PerfectHashError::TooManyKeys(num_keys))?;
        let function = Self {
            seed,
            displacements,
            num_keys,
        };
        function.validate()?;
        Ok(function)
    }

    /// Reads parameters from a `PHFD` file.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, PerfectHashError> {
        let mut bytes = Vec::new();
        File::open(path.as_ref())?.read_to_end(&mut bytes)?;
        let payload = bytes
            .strip_prefix(MAGIC.as_slice())
            .ok_or(PerfectHashError::BadMagic)?;
        let (&version, payload) = payload.split_first().ok_or(PerfectHashError::BadMagic)?;
        if version != VERSION {
            return Err(PerfectHashError::UnsupportedVersion(version));
        }
        let function: Self = deserialize(payload)?;
        function.validate()?;
        Ok(function)
    }

    /// Writes the parameters using the `PHFD` layout.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<(), PerfectHashError> {
        let payload = serialize(self)?;
        let mut file = File::create(path.as_ref())?;
        file.write_all(MAGIC)?;
        file.write_all(&[VERSION])?;
        file.write_all(&payload)?;
        Ok(())
    }

    fn validate(&self) -> Result<(), PerfectHashError> {
        if self.num_keys == 0 {
            return Err(PerfectHashError::NoKeys);
        }
        if self.displacements.is_empty() {
            return Err(PerfectHashError::NoBuckets);
        }
        Ok(())
    }
}

impl PerfectHash for DisplacementHash {
    fn number_of_keys(&self) -> usize {
        self.num_keys as usize
    }

    fn index(&self, key: &str) -> FeatureId {
        let hash = xxh3_128_with_seed(key.as_bytes(), self.seed);
        let bucket = ((hash >> 64) as u32 as usize) % self.displacements.len();
        let f1 = (hash >> 32) as u32;
        let f2 = hash as u32;
        let (d1, d2) = self.displacements[bucket];
        let mixed = d2.wrapping_add(f1.wrapping_mul(d1)).wrapping_add(f2);
        (mixed % self.num_keys) as FeatureId
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn sample() -> DisplacementHash {
        DisplacementHash::from_parts(7, vec![(1, 0), (3, 5), (0, 2)], 16).unwrap()
    }

    #[test]
    fn indices_stay_within_key_range() {
        let function = sample();
        for key in ["alpha", "beta", "LanguageModel", "", "naïve"] {
            assert!(function.index(key) < function.number_of_keys());
        }
        assert_eq!(function.index("alpha"), function.index("alpha"));
    }

    #[test]
    fn parameters_round_trip_via_disk() {
        let function = sample();
        let file = NamedTempFile::new().unwrap();
        function.write(file.path()).unwrap();
        let restored = DisplacementHash::read(file.path()).unwrap();
        assert_eq!(restored, function);
        assert_eq!(restored.index("gamma"), function.index("gamma"));
    }

    #[test]
    fn missing_header_is_rejected() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"not a hash").unwrap();
        let err = DisplacementHash::read(file.path()).unwrap_err();
        assert!(matches!(err, PerfectHashError::BadMagic));
    }

    #[test]
    fn degenerate_parameters_are_rejected() {
        assert!(matches!(
            DisplacementHash::from_parts(0, vec![(0, 0)], 0),
            Err(PerfectHashError::NoKeys)
        ));
        assert!(matches!(
            DisplacementHash::from_parts(0, Vec::new(), 4),
            Err(PerfectHashError::NoBuckets)
        ));
    }
}
