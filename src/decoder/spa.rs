//! Log-domain Sum-Product and Min-Sum decoding.

use crate::decoder::{hard_decision, info_bits_from_mask, is_zero, syndrome, DecodeOutcome, Decoder, Diagnostics};
use crate::error::{Error, Result};
use crate::graph::TannerGraph;
use crate::sparse::SparseMatrix;

const EPS: f64 = 1000.0 * f64::EPSILON;

/// Check-to-variable update kernel.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Kernel {
    /// Exact sum-product algorithm.
    Spa,
    /// Min-sum approximation: replaces the `phi`-domain sum with the
    /// minimum magnitude among the check's other incident messages.
    MinSum,
}

/// `phi(x) = -log(tanh(x/2))`.
///
/// Clamped away from 0 so that the result never overflows to infinity; this
/// is an involution on `(0, infinity)` up to that clamp.
pub fn phi(x: f64) -> f64 {
    let x = x.max(EPS);
    let t = (0.5 * x).tanh().max(EPS);
    -t.ln()
}

/// Soft iterative decoder implementing both the Sum-Product Algorithm and
/// its Min-Sum approximation over a fixed parity check matrix.
pub struct SpaDecoder {
    h: SparseMatrix,
    graph: TannerGraph,
    kernel: Kernel,
    info_mask: Option<Vec<bool>>,
    channel_models: Option<Vec<Box<dyn Fn(f64) -> f64>>>,
    q: Vec<f64>,
    r: Vec<f64>,
}

impl std::fmt::Debug for SpaDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpaDecoder")
            .field("kernel", &self.kernel)
            .field("info_mask", &self.info_mask)
            .field("num_vars", &self.h.num_cols())
            .field("num_checks", &self.h.num_rows())
            .finish_non_exhaustive()
    }
}

impl SpaDecoder {
    /// Builds a decoder for parity check matrix `h` using `kernel`.
    pub fn new(h: SparseMatrix, kernel: Kernel) -> SpaDecoder {
        let graph = TannerGraph::new(&h);
        let num_edges = graph.num_edges();
        SpaDecoder {
            h,
            graph,
            kernel,
            info_mask: None,
            channel_models: None,
            q: vec![0.0; num_edges],
            r: vec![0.0; num_edges],
        }
    }

    /// Configures the mask used by [`Decoder::info_bits`].
    #[must_use]
    pub fn with_info_mask(mut self, mask: Vec<bool>) -> SpaDecoder {
        self.info_mask = Some(mask);
        self
    }

    /// Installs a per-variable-node channel model, used to convert
    /// `decode`'s raw input samples to LLRs. Without this, `decode`'s input
    /// is used directly as the channel LLR.
    #[must_use]
    pub fn with_channel_models(mut self, models: Vec<Box<dyn Fn(f64) -> f64>>) -> SpaDecoder {
        self.channel_models = Some(models);
        self
    }

    fn check_to_variable_update(&mut self) {
        for i in 0..self.graph.num_checks() {
            let edges = self.graph.row_edges(i);
            let mut sign_prod = 1i32;
            for &e in edges {
                if self.q[e] < 0.0 {
                    sign_prod = -sign_prod;
                }
            }
            match self.kernel {
                Kernel::Spa => {
                    let total: f64 = edges.iter().map(|&e| phi(self.q[e].abs())).sum();
                    for &e in edges {
                        let sign = if self.q[e] < 0.0 { -sign_prod } else { sign_prod };
                        let loo = total - phi(self.q[e].abs());
                        self.r[e] = f64::from(sign) * phi(loo);
                    }
                }
                Kernel::MinSum => {
                    // Leave-one-out minimum via the two-smallest-values trick.
                    let (mut min1, mut idx1, mut min2) = (f64::INFINITY, usize::MAX, f64::INFINITY);
                    for (pos, &e) in edges.iter().enumerate() {
                        let mag = self.q[e].abs();
                        if mag < min1 {
                            min2 = min1;
                            min1 = mag;
                            idx1 = pos;
                        } else if mag < min2 {
                            min2 = mag;
                        }
                    }
                    for (pos, &e) in edges.iter().enumerate() {
                        let sign = if self.q[e] < 0.0 { -sign_prod } else { sign_prod };
                        let loo = if pos == idx1 { min2 } else { min1 };
                        self.r[e] = f64::from(sign) * loo;
                    }
                }
            }
        }
    }
}

impl Decoder for SpaDecoder {
    fn decode(&mut self, input: &[f64], max_iter: usize) -> Result<DecodeOutcome> {
        let n = self.h.num_cols();
        if input.len() != n {
            return Err(Error::IncorrectLength {
                expected: n,
                got: input.len(),
            });
        }

        let channel_llr: Vec<f64> = match &self.channel_models {
            Some(models) => input.iter().zip(models).map(|(&y, f)| f(y)).collect(),
            None => input.to_vec(),
        };

        self.r.iter_mut().for_each(|v| *v = 0.0);
        for e in 0..self.graph.num_edges() {
            self.q[e] = channel_llr[self.graph.edge_col(e)];
        }

        let max_iter = max_iter.max(1);
        let mut llr = channel_llr.clone();
        let mut estimate = hard_decision(&llr);
        let mut synd = syndrome(&self.h, &estimate);
        let mut iterations = 0;

        loop {
            iterations += 1;

            self.check_to_variable_update();

            let r_loo = self.graph.leave_one_out_sum(&self.r);
            for j in 0..n {
                let total: f64 = self.graph.col_edges(j).iter().map(|&e| self.r[e]).sum();
                llr[j] = channel_llr[j] + total;
            }
            for e in 0..self.graph.num_edges() {
                self.q[e] = channel_llr[self.graph.edge_col(e)] + r_loo[e];
            }

            estimate = hard_decision(&llr);
            synd = syndrome(&self.h, &estimate);

            if is_zero(&synd) || iterations >= max_iter {
                break;
            }
        }

        let vnode_validity = (0..n)
            .map(|j| {
                self.h
                    .iter_col(j)
                    .map(|&i| if synd[i] == 0 { 1 } else { -1 })
                    .sum()
            })
            .collect();

        Ok(DecodeOutcome {
            success: is_zero(&synd),
            estimate,
            llr: Some(llr),
            iterations,
            syndrome: synd,
            diagnostics: Diagnostics::VnodeValidity(vnode_validity),
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
    use crate::encoder::generic::Encoder;
    use num_traits::{One, Zero};
    use proptest::prelude::*;

    fn hamming74() -> SparseMatrix {
        let mut h = SparseMatrix::new(3, 7);
        h.insert_row(0, [3, 4, 5, 6].into_iter());
        h.insert_row(1, [1, 2, 5, 6].into_iter());
        h.insert_row(2, [0, 2, 4, 6].into_iter());
        h
    }

    #[test]
    fn phi_is_an_involution() {
        for j in 1..30 {
            let x = j as f64;
            assert!((phi(phi(x)) - x).abs() < 1e-6, "x = {x}");
        }
    }

    fn noiseless_llr(codeword: &[u8]) -> Vec<f64> {
        codeword.iter().map(|&b| if b == 0 { 5.0 } else { -5.0 }).collect()
    }

    #[test]
    fn noiseless_spa_decodes_in_one_iteration() {
        let h = hamming74();
        let encoder = Encoder::from_h(&h).unwrap();
        let message = ndarray::arr1(&[
            crate::gf2::GF2::one(),
            crate::gf2::GF2::zero(),
            crate::gf2::GF2::one(),
            crate::gf2::GF2::one(),
        ]);
        let codeword: Vec<u8> = encoder
            .encode(&message)
            .iter()
            .map(|&b| u8::from(b == crate::gf2::GF2::one()))
            .collect();

        let llr = noiseless_llr(&codeword);
        let mut decoder = SpaDecoder::new(h, Kernel::Spa);
        let outcome = decoder.decode(&llr, 20).unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.iterations, 1);
        assert_eq!(outcome.estimate, codeword);
    }

    #[test]
    fn min_sum_matches_spa_on_noiseless_input() {
        let h = hamming74();
        let encoder = Encoder::from_h(&h).unwrap();
        let message = ndarray::arr1(&[
            crate::gf2::GF2::zero(),
            crate::gf2::GF2::one(),
            crate::gf2::GF2::zero(),
            crate::gf2::GF2::one(),
        ]);
        let codeword: Vec<u8> = encoder
            .encode(&message)
            .iter()
            .map(|&b| u8::from(b == crate::gf2::GF2::one()))
            .collect();

        let llr = noiseless_llr(&codeword);
        let mut decoder = SpaDecoder::new(h, Kernel::MinSum);
        let outcome = decoder.decode(&llr, 20).unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.estimate, codeword);
    }

    #[test]
    fn rejects_wrong_length_input() {
        let mut decoder = SpaDecoder::new(hamming74(), Kernel::Spa);
        let err = decoder.decode(&[0.0; 3], 10).unwrap_err();
        assert_eq!(
            err,
            Error::IncorrectLength {
                expected: 7,
                got: 3
            }
        );
    }

    #[test]
    fn info_bits_unavailable_without_mask() {
        let decoder = SpaDecoder::new(hamming74(), Kernel::Spa);
        assert_eq!(
            decoder.info_bits(&[0; 7]),
            Err(Error::InfoBitsUnavailable)
        );
    }

    proptest! {
        #[test]
        fn phi_is_an_involution_over_random_inputs(x in 0.1f64..50.0) {
            prop_assert!((phi(phi(x)) - x).abs() < 1e-6);
        }

        #[test]
        fn success_implies_zero_syndrome(bits in proptest::collection::vec(any::<bool>(), 4)) {
            let h = hamming74();
            let encoder = Encoder::from_h(&h).unwrap();
            let message = ndarray::arr1(&bits.iter().map(|&b| {
                if b { crate::gf2::GF2::one() } else { crate::gf2::GF2::zero() }
            }).collect::<Vec<_>>());
            let codeword: Vec<u8> = encoder
                .encode(&message)
                .iter()
                .map(|&b| u8::from(b == crate::gf2::GF2::one()))
                .collect();
            let llr = noiseless_llr(&codeword);

            let mut decoder = SpaDecoder::new(h, Kernel::Spa);
            let outcome = decoder.decode(&llr, 20).unwrap();
            prop_assert_eq!(outcome.success, is_zero(&outcome.syndrome));
            prop_assert!(outcome.success);
            prop_assert_eq!(&outcome.estimate, &codeword);
        }
    }
}
