//! Shared error type for the crate.
//!
//! Every fallible constructor and `decode` call in this crate returns
//! [`Error`], so callers deal with a single `Result` type regardless of
//! which decoder or encoder they are using.

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Error)]
pub enum Error {
    /// An input sequence did not have the expected length.
    #[error("expected a sequence of length {expected}, got {got}")]
    IncorrectLength {
        /// Length that was expected.
        expected: usize,
        /// Length that was received.
        got: usize,
    },
    /// A matrix that was expected to be binary (entries in `{0, 1}`)
    /// contained some other value.
    #[error("matrix is not binary")]
    NonBinaryMatrix,
    /// [`info_bits`](crate::decoder::Decoder::info_bits) was called on a
    /// decoder that was not configured with an information bit index.
    #[error("decoder cannot tell which bits are information bits")]
    InfoBitsUnavailable,
    /// A parameter required by a decoder was missing or out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// A parity-check or QC block-structure description was internally
    /// inconsistent.
    #[error("inconsistent matrix description: {0}")]
    InconsistentMatrixFile(String),
    /// The MWBF-NL decoder excluded every bit in the current iteration
    /// without finding a flip that avoids a previously-visited flip set.
    #[error("weighted bit-flipping decoder is stuck in a loop")]
    LoopStuck,
    /// The square submatrix formed by the last columns of a parity check
    /// matrix is not invertible, so the generic systematic encoder cannot
    /// be built.
    #[error("the square matrix formed by the last columns of the parity check is not invertible")]
    SubmatrixNotInvertible,
    /// The parity check matrix has more rows than columns.
    #[error("the parity check matrix has more rows than columns")]
    ParityOverdetermined,
    /// The parity check matrix does not have full rank.
    #[error("the parity check matrix does not have full rank")]
    NotFullRank,
}

/// Convenience alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
