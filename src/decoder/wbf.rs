//! Weighted bit-flipping decoder family: WBF, MWBF, and MWBF with loop
//! avoidance (MWBF-NL).

use std::collections::{BTreeSet, HashSet};

use crate::decoder::{info_bits_from_mask, is_zero, syndrome, DecodeOutcome, Decoder, Diagnostics};
use crate::error::{Error, Result};
use crate::rand::Rng;
use crate::sparse::SparseMatrix;
use crate::util::SortedRandomSel;

/// Which member of the weighted bit-flipping family to run.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum WbfVariant {
    /// Per-check reliability weight shared by every incident edge.
    Wbf,
    /// Per-edge leave-one-out reliability weight, with a confidence
    /// penalty subtracted from the flip metric.
    Mwbf,
    /// [`WbfVariant::Mwbf`] with a loop-avoidance flip-set history in place
    /// of random tie-breaking.
    MwbfNoLoops,
}

/// Soft-input, hard-output bit-flipping decoder using per-check or
/// per-edge reliability weights derived from the channel LLR magnitudes.
pub struct WbfDecoder {
    h: SparseMatrix,
    variant: WbfVariant,
    confidence_coefficient: Option<f64>,
    info_mask: Option<Vec<bool>>,
    rng: Rng,
}

impl std::fmt::Debug for WbfDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WbfDecoder")
            .field("variant", &self.variant)
            .field("confidence_coefficient", &self.confidence_coefficient)
            .finish_non_exhaustive()
    }
}

impl WbfDecoder {
    /// Builds a decoder for parity check matrix `h` running `variant`.
    ///
    /// `confidence_coefficient` overrides the default `1 / mean(d_v))` used
    /// by the `Mwbf`/`MwbfNoLoops` flip metric; ignored by plain `Wbf`.
    pub fn new(
        h: SparseMatrix,
        variant: WbfVariant,
        confidence_coefficient: Option<f64>,
        rng: Rng,
    ) -> WbfDecoder {
        WbfDecoder {
            h,
            variant,
            confidence_coefficient,
            info_mask: None,
            rng,
        }
    }

    /// Configures the mask used by [`Decoder::info_bits`].
    #[must_use]
    pub fn with_info_mask(mut self, mask: Vec<bool>) -> WbfDecoder {
        self.info_mask = Some(mask);
        self
    }

    fn mean_var_degree(&self) -> f64 {
        let n = self.h.num_cols();
        let total: usize = (0..n).map(|j| self.h.col_weight(j)).sum();
        total as f64 / n as f64
    }

    /// Per-check reliability `w_i = min_{j in N(i)} |llr[j]|` (WBF), or the
    /// per-edge leave-one-out reliability `w_{i,j} = min_{j' in N(i)\{j}}
    /// |llr[j']|` (MWBF/MWBF-NL), indexed by `(check, position-in-row)`.
    fn reliability(&self, abs_llr: &[f64]) -> Vec<Vec<f64>> {
        (0..self.h.num_rows())
            .map(|i| {
                let neighbors: Vec<usize> = self.h.iter_row(i).copied().collect();
                match self.variant {
                    WbfVariant::Wbf => {
                        let w = neighbors
                            .iter()
                            .map(|&j| abs_llr[j])
                            .fold(f64::INFINITY, f64::min);
                        vec![w; neighbors.len()]
                    }
                    WbfVariant::Mwbf | WbfVariant::MwbfNoLoops => {
                        let (mut min1, mut idx1, mut min2) =
                            (f64::INFINITY, usize::MAX, f64::INFINITY);
                        for (pos, &j) in neighbors.iter().enumerate() {
                            let v = abs_llr[j];
                            if v < min1 {
                                min2 = min1;
                                min1 = v;
                                idx1 = pos;
                            } else if v < min2 {
                                min2 = v;
                            }
                        }
                        (0..neighbors.len())
                            .map(|pos| if pos == idx1 { min2 } else { min1 })
                            .collect()
                    }
                }
            })
            .collect()
    }
}

impl Decoder for WbfDecoder {
    fn decode(&mut self, input: &[f64], max_iter: usize) -> Result<DecodeOutcome> {
        let n = self.h.num_cols();
        if input.len() != n {
            return Err(Error::IncorrectLength {
                expected: n,
                got: input.len(),
            });
        }

        let abs_llr: Vec<f64> = input.iter().map(|v| v.abs()).collect();
        let reliability = self.reliability(&abs_llr);
        let flat_reliability: Vec<f64> = reliability.iter().flatten().copied().collect();
        let alpha = match self.variant {
            WbfVariant::Wbf => 0.0,
            WbfVariant::Mwbf | WbfVariant::MwbfNoLoops => self
                .confidence_coefficient
                .unwrap_or_else(|| 1.0 / self.mean_var_degree()),
        };

        let mut x: Vec<u8> = input.iter().map(|&v| u8::from(v < 0.0)).collect();
        let mut synd = syndrome(&self.h, &x);
        let max_iter = max_iter.max(1);
        let mut iterations = 0;

        let mut flipped_set: BTreeSet<usize> = BTreeSet::new();
        let mut visited: HashSet<Vec<usize>> = HashSet::new();
        visited.insert(Vec::new());

        loop {
            iterations += 1;
            if is_zero(&synd) {
                break;
            }

            let mut energy = vec![0.0; n];
            for i in 0..self.h.num_rows() {
                let sign = if synd[i] != 0 { 1.0 } else { -1.0 };
                for (pos, &j) in self.h.iter_row(i).enumerate() {
                    energy[j] += sign * reliability[i][pos];
                }
            }
            for j in 0..n {
                energy[j] -= alpha * abs_llr[j];
            }

            match self.variant {
                WbfVariant::Wbf | WbfVariant::Mwbf => {
                    let indexed: Vec<(usize, f64)> = energy.iter().copied().enumerate().collect();
                    let (best_j, _) = indexed
                        .sort_by_random_min(
                            |a, b| b.1.partial_cmp(&a.1).expect("energy is finite"),
                            &mut self.rng,
                        )
                        .expect("at least one variable");
                    x[best_j] ^= 1;
                }
                WbfVariant::MwbfNoLoops => {
                    let mut candidates: Vec<usize> = (0..n).collect();
                    candidates.sort_by(|&a, &b| {
                        energy[b]
                            .partial_cmp(&energy[a])
                            .expect("energy is finite")
                    });
                    let chosen = candidates.into_iter().find_map(|j| {
                        let mut candidate = flipped_set.clone();
                        if !candidate.insert(j) {
                            candidate.remove(&j);
                        }
                        let key: Vec<usize> = candidate.iter().copied().collect();
                        (!visited.contains(&key)).then_some((j, candidate, key))
                    });
                    let (j, new_set, key) = chosen.ok_or(Error::LoopStuck)?;
                    x[j] ^= 1;
                    flipped_set = new_set;
                    visited.insert(key);
                }
            }

            synd = syndrome(&self.h, &x);
            if iterations >= max_iter {
                break;
            }
        }

        Ok(DecodeOutcome {
            success: is_zero(&synd),
            estimate: x,
            llr: None,
            iterations,
            syndrome: synd,
            diagnostics: Diagnostics::ReliabilityProfile(flat_reliability),
        })
    }

    fn info_bits(&self, estimate: &[u8]) -> Result<Vec<u8>> {
        info_bits_from_mask(estimate, self.info_mask.as_deref())
    }

    fn num_vars(&self) -> usize {
        self.h.num_cols()
    }

    fn num_checks(&self) -> usize {
        self.h.num_rows()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::rand::SeedableRng;

    fn hamming74() -> SparseMatrix {
        let mut h = SparseMatrix::new(3, 7);
        h.insert_row(0, [3, 4, 5, 6].into_iter());
        h.insert_row(1, [1, 2, 5, 6].into_iter());
        h.insert_row(2, [0, 2, 4, 6].into_iter());
        h
    }

    #[test]
    fn wbf_corrects_single_bit_flip() {
        let h = hamming74();
        let mut received = vec![4.0; 7];
        received[3] = -4.0;
        let mut decoder = WbfDecoder::new(h, WbfVariant::Wbf, None, Rng::seed_from_u64(0));
        let outcome = decoder.decode(&received, 20).unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.estimate, vec![0u8; 7]);
    }

    #[test]
    fn mwbf_corrects_single_bit_flip() {
        let h = hamming74();
        let mut received = vec![4.0; 7];
        received[0] = -4.0;
        let mut decoder = WbfDecoder::new(h, WbfVariant::Mwbf, None, Rng::seed_from_u64(0));
        let outcome = decoder.decode(&received, 20).unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.estimate, vec![0u8; 7]);
    }

    #[test]
    fn mwbf_no_loops_corrects_single_bit_flip() {
        let h = hamming74();
        let mut received = vec![4.0; 7];
        received[6] = -4.0;
        let mut decoder =
            WbfDecoder::new(h, WbfVariant::MwbfNoLoops, None, Rng::seed_from_u64(0));
        let outcome = decoder.decode(&received, 20).unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.estimate, vec![0u8; 7]);
    }
}
