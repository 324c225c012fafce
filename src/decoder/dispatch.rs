//! Tagged decoder selector.
//!
//! Picks a decoder implementation from a runtime configuration value
//! instead of a compile-time type choice, so a caller can select an
//! algorithm (and its parameters) from data.

use crate::decoder::gallager::GallagerDecoder;
use crate::decoder::ppbf::PpbfDecoder;
use crate::decoder::spa::{Kernel, SpaDecoder};
use crate::decoder::wbf::{WbfDecoder, WbfVariant};
use crate::decoder::Decoder;
use crate::rand::{Rng, SeedableRng};
use crate::sparse::SparseMatrix;

/// Chooses a decoder algorithm and carries the parameters needed to build
/// it.
#[derive(Debug, Clone, PartialEq)]
pub enum DecoderKind {
    /// Log-domain Sum-Product or Min-Sum.
    LogSpa {
        /// Which check-to-variable update kernel to run.
        kernel: Kernel,
    },
    /// Hard-decision majority-vote bit-flipping.
    GallagerBf,
    /// Weighted bit-flipping family (WBF, MWBF, MWBF-NL).
    Wbf {
        /// Which member of the family to run.
        variant: WbfVariant,
        /// Overrides the default `1 / mean(d_v)` confidence coefficient used
        /// by `Mwbf`/`MwbfNoLoops`; ignored by plain `Wbf`.
        confidence_coefficient: Option<f64>,
        /// Seed for the tie-breaking RNG.
        seed: u64,
    },
    /// Probabilistic parallel bit-flipping.
    Ppbf {
        /// Per-energy-level flip probability, validated against `h`'s
        /// maximum variable degree at decode time.
        p_vector: Option<Vec<f64>>,
        /// Per-variable expected bit, `None` where there is no prior.
        prior: Option<Vec<i8>>,
        /// Seed for the flip-decision RNG.
        seed: u64,
    },
}

impl DecoderKind {
    /// Builds the decoder this value describes for parity check matrix `h`.
    ///
    /// Always succeeds: per-decoder parameter validation (e.g. PPBF's
    /// `p_vector`) happens at `decode` time instead, since it depends on
    /// `h`'s maximum variable degree and must be reachable as a decode-time
    /// error rather than a construction-time one.
    pub fn build(self, h: SparseMatrix) -> Box<dyn Decoder> {
        match self {
            DecoderKind::LogSpa { kernel } => Box::new(SpaDecoder::new(h, kernel)),
            DecoderKind::GallagerBf => Box::new(GallagerDecoder::new(h)),
            DecoderKind::Wbf {
                variant,
                confidence_coefficient,
                seed,
            } => Box::new(WbfDecoder::new(
                h,
                variant,
                confidence_coefficient,
                Rng::seed_from_u64(seed),
            )),
            DecoderKind::Ppbf {
                p_vector,
                prior,
                seed,
            } => Box::new(PpbfDecoder::new(h, p_vector, prior, Rng::seed_from_u64(seed))),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn hamming74() -> SparseMatrix {
        let mut h = SparseMatrix::new(3, 7);
        h.insert_row(0, [3, 4, 5, 6].into_iter());
        h.insert_row(1, [1, 2, 5, 6].into_iter());
        h.insert_row(2, [0, 2, 4, 6].into_iter());
        h
    }

    #[test]
    fn builds_each_family() {
        let kinds = vec![
            DecoderKind::LogSpa { kernel: Kernel::Spa },
            DecoderKind::LogSpa {
                kernel: Kernel::MinSum,
            },
            DecoderKind::GallagerBf,
            DecoderKind::Wbf {
                variant: WbfVariant::Wbf,
                confidence_coefficient: None,
                seed: 0,
            },
            DecoderKind::Wbf {
                variant: WbfVariant::Mwbf,
                confidence_coefficient: Some(0.5),
                seed: 1,
            },
            DecoderKind::Wbf {
                variant: WbfVariant::MwbfNoLoops,
                confidence_coefficient: None,
                seed: 2,
            },
            DecoderKind::Ppbf {
                p_vector: None,
                prior: None,
                seed: 3,
            },
        ];
        for kind in kinds {
            let decoder = kind.build(hamming74());
            assert_eq!(decoder.num_vars(), 7);
            assert_eq!(decoder.num_checks(), 3);
        }
    }

    #[test]
    fn gallager_bf_decodes_single_bit_error() {
        let mut decoder = DecoderKind::GallagerBf.build(hamming74());
        let mut received = vec![1.0; 7];
        received[2] = -1.0;
        let outcome = decoder.decode(&received, 20).unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.estimate, vec![0u8; 7]);
    }
}
