//! Gallager hard-decision bit-flipping decoder.

use crate::decoder::{info_bits_from_mask, is_zero, syndrome, DecodeOutcome, Decoder, Diagnostics};
use crate::error::{Error, Result};
use crate::sparse::SparseMatrix;

/// Hard-input majority-vote bit-flipping decoder.
///
/// At each iteration, flips the single variable incident to the most
/// unsatisfied checks; ties are broken by lowest index. Known to oscillate
/// on cycles, so it relies entirely on the `max_iter` bound for
/// termination.
#[derive(Debug, Clone)]
pub struct GallagerDecoder {
    h: SparseMatrix,
    info_mask: Option<Vec<bool>>,
}

impl GallagerDecoder {
    /// Builds a decoder for parity check matrix `h`.
    pub fn new(h: SparseMatrix) -> GallagerDecoder {
        GallagerDecoder { h, info_mask: None }
    }

    /// Configures the mask used by [`Decoder::info_bits`].
    #[must_use]
    pub fn with_info_mask(mut self, mask: Vec<bool>) -> GallagerDecoder {
        self.info_mask = Some(mask);
        self
    }
}

impl Decoder for GallagerDecoder {
    fn decode(&mut self, input: &[f64], max_iter: usize) -> Result<DecodeOutcome> {
        let n = self.h.num_cols();
        if input.len() != n {
            return Err(Error::IncorrectLength {
                expected: n,
                got: input.len(),
            });
        }

        let mut x: Vec<u8> = input.iter().map(|&v| u8::from(v < 0.0)).collect();
        let mut synd = syndrome(&self.h, &x);
        let max_iter = max_iter.max(1);
        let mut iterations = 0;

        loop {
            iterations += 1;
            if is_zero(&synd) {
                break;
            }

            let (best_j, _) = (0..n)
                .map(|j| {
                    let score = self.h.iter_col(j).filter(|&&i| synd[i] != 0).count();
                    (j, score)
                })
                .max_by(|(aj, ascore), (bj, bscore)| ascore.cmp(bscore).then(bj.cmp(aj)))
                .expect("parity check matrix has at least one column");
            x[best_j] ^= 1;
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
            diagnostics: Diagnostics::None,
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

    fn hamming74() -> SparseMatrix {
        let mut h = SparseMatrix::new(3, 7);
        h.insert_row(0, [3, 4, 5, 6].into_iter());
        h.insert_row(1, [1, 2, 5, 6].into_iter());
        h.insert_row(2, [0, 2, 4, 6].into_iter());
        h
    }

    #[test]
    fn corrects_single_bit_flip() {
        let h = hamming74();
        // All-zero codeword with one bit flipped.
        let mut received = vec![1.0; 7];
        received[2] = -1.0;
        let mut decoder = GallagerDecoder::new(h);
        let outcome = decoder.decode(&received, 20).unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.estimate, vec![0u8; 7]);
    }

    #[test]
    fn already_valid_codeword_succeeds_in_one_iteration() {
        let h = hamming74();
        let mut decoder = GallagerDecoder::new(h);
        let outcome = decoder.decode(&vec![1.0; 7], 20).unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.iterations, 1);
    }
}
