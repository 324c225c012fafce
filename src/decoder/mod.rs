//! Decoder families and their shared contract.
//!
//! All four decoder families ([`spa`], [`gallager`], [`wbf`], [`ppbf`])
//! implement the [`Decoder`] trait and return a uniform [`DecodeOutcome`].
//! `success` is always defined solely by a zero syndrome on the returned
//! estimate, never by message convergence. [`DecoderKind`] is a tagged
//! selector that builds a boxed decoder for a chosen algorithm.

pub mod dispatch;
pub mod gallager;
pub mod ppbf;
pub mod spa;
pub mod wbf;

pub use dispatch::DecoderKind;

use crate::error::{Error, Result};
use crate::sparse::SparseMatrix;

/// Per-variable-node satisfied-minus-unsatisfied diagnostic, or a
/// per-variable reliability profile, depending on which decoder family
/// produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostics {
    /// No diagnostic was computed for this decode.
    None,
    /// SPA/Min-Sum: count of satisfied minus unsatisfied neighboring checks
    /// per variable, higher is better.
    VnodeValidity(Vec<i64>),
    /// WBF family: the per-check or per-edge reliability weights used
    /// throughout the decode.
    ReliabilityProfile(Vec<f64>),
}

/// Outcome of a single [`Decoder::decode`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeOutcome {
    /// Hard decision on each variable.
    pub estimate: Vec<u8>,
    /// Posterior LLR per variable, when the decoder produces one.
    pub llr: Option<Vec<f64>>,
    /// Whether the returned estimate satisfies the parity check (syndrome
    /// all-zero).
    pub success: bool,
    /// Number of iterations completed, 1-based (0 only when `max_iter == 0`
    /// is explicitly honored by the decoder, as PPBF does).
    pub iterations: usize,
    /// `H * estimate mod 2`.
    pub syndrome: Vec<u8>,
    /// Decoder-family-specific diagnostic.
    pub diagnostics: Diagnostics,
}

/// Common contract implemented by every decoder family.
///
/// `input` is a length-n array; a positive value favors bit 0, a negative
/// value favors bit 1 (see [`crate::channel`]). Soft decoders use it
/// directly as a log-likelihood ratio; hard decoders slice it to a hard bit
/// by sign.
pub trait Decoder {
    /// Runs up to `max_iter` iterations of this decoder's algorithm,
    /// terminating early once the syndrome of the current estimate is
    /// zero.
    ///
    /// # Errors
    /// Returns [`Error::IncorrectLength`] if `input.len()` does not match
    /// the number of variables, or a decoder-specific validation error
    /// (`InvalidParameter`, `LoopStuck`) before or during iteration.
    fn decode(&mut self, input: &[f64], max_iter: usize) -> Result<DecodeOutcome>;

    /// Extracts the information bits from a decoded estimate, using the
    /// mask configured at construction.
    ///
    /// # Errors
    /// Returns [`Error::InfoBitsUnavailable`] if no info-bit mask was
    /// configured.
    fn info_bits(&self, estimate: &[u8]) -> Result<Vec<u8>>;

    /// Number of variable-nodes (columns of H).
    fn num_vars(&self) -> usize;

    /// Number of check-nodes (rows of H).
    fn num_checks(&self) -> usize;
}

/// `estimate[j] = 1 if llr[j] < 0 else 0`.
pub(crate) fn hard_decision(llr: &[f64]) -> Vec<u8> {
    llr.iter().map(|&v| u8::from(v < 0.0)).collect()
}

/// `H * estimate mod 2`.
pub(crate) fn syndrome(h: &SparseMatrix, estimate: &[u8]) -> Vec<u8> {
    (0..h.num_rows())
        .map(|i| h.iter_row(i).fold(0u8, |acc, &j| acc ^ estimate[j]))
        .collect()
}

pub(crate) fn is_zero(syndrome: &[u8]) -> bool {
    syndrome.iter().all(|&s| s == 0)
}

/// Selects `estimate[j]` for every `j` where `mask[j]` is set.
///
/// # Errors
/// Returns [`Error::InfoBitsUnavailable`] if `mask` is `None`.
pub(crate) fn info_bits_from_mask(estimate: &[u8], mask: Option<&[bool]>) -> Result<Vec<u8>> {
    let mask = mask.ok_or(Error::InfoBitsUnavailable)?;
    Ok(estimate
        .iter()
        .zip(mask)
        .filter_map(|(&b, &m)| m.then_some(b))
        .collect())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn hard_decision_sign_convention() {
        assert_eq!(hard_decision(&[1.0, -1.0, 0.0]), vec![0, 1, 0]);
    }

    #[test]
    fn info_bits_requires_mask() {
        assert_eq!(
            info_bits_from_mask(&[1, 0, 1], None),
            Err(Error::InfoBitsUnavailable)
        );
        assert_eq!(
            info_bits_from_mask(&[1, 0, 1], Some(&[true, false, true])),
            Ok(vec![1, 1])
        );
    }
}
