use thiserror::Error;

use crate::Weight;

/// Errors raised while loading, saving or validating weight vectors.
///
/// None of these are recoverable: a failed load or save leaves no usable
/// partial result.
#[derive(Debug, Error)]
pub enum WeightsError {
    /// Filesystem or stream access failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Text lines must not start with a space.
    #[error("line {line}: weights file lines may not start with whitespace: {text:?}")]
    LeadingWhitespace { line: usize, text: String },
    /// A text line encoded a NaN weight.
    #[error("line {line}: feature {feature} has weight NaN")]
    NanWeight { line: usize, feature: String },
    /// A weight vector holds NaN or an infinity.
    #[error("weight {value} at index {index} is not finite")]
    NonFinite { index: usize, value: Weight },
    /// The binary key count disagrees with the dictionary.
    #[error("hash function reports {expected} keys but weights file contains {found}")]
    KeyCountMismatch { expected: usize, found: u64 },
    /// A binary file ended early.
    #[error("binary weights file truncated while reading {section}")]
    ShortRead { section: &'static str },
    /// A binary write was asked for more keys than the vector holds.
    #[error("cannot write {keys} keys from a weight vector of length {len}")]
    VectorTooShort { keys: usize, len: usize },
}

/// Coarse classification of [`WeightsError`] values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    /// Programming or configuration error, such as mismatched key sets.
    Precondition,
    /// Malformed data or failed I/O.
    Format,
}

impl WeightsError {
    /// Separates caller mistakes from malformed input.
    pub fn class(&self) -> ErrorClass {
        match self {
            WeightsError::KeyCountMismatch { .. } | WeightsError::VectorTooShort { .. } => {
                ErrorClass::Precondition
            }
            WeightsError::Io(_)
            | WeightsError::LeadingWhitespace { .. }
            | WeightsError::NanWeight { .. }
            | WeightsError::NonFinite { .. }
            | WeightsError::ShortRead { .. } => ErrorClass::Format,
        }
    }
}
