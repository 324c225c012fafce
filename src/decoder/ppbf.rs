//! Probabilistic parallel bit-flipping decoder (PPBF).

use crate::channel::bsc_llr;
use crate::decoder::{info_bits_from_mask, is_zero, syndrome, DecodeOutcome, Decoder, Diagnostics};
use crate::error::{Error, Result};
use crate::rand::Rng;
use crate::sparse::SparseMatrix;
use rand::Rng as _;

/// Randomized, fully parallel bit-flipping decoder. Every variable flips
/// independently each iteration with a probability drawn from `p_vector`,
/// indexed by an "energy" combining the variable's unsatisfied-check
/// count, whether it has already been flipped, and whether it disagrees
/// with an optional prior.
pub struct PpbfDecoder {
    h: SparseMatrix,
    p_vector: Option<Vec<f64>>,
    prior: Option<Vec<i8>>,
    info_mask: Option<Vec<bool>>,
    rng: Rng,
}

impl std::fmt::Debug for PpbfDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PpbfDecoder")
            .field("p_vector", &self.p_vector)
            .field("prior", &self.prior)
            .finish_non_exhaustive()
    }
}

impl PpbfDecoder {
    /// Builds a decoder for parity check matrix `h`.
    ///
    /// `p_vector[e]` is the Bernoulli flip probability for energy level
    /// `e`, validated at `decode` time against this matrix's maximum
    /// variable degree. `prior[j] == -1` means no prior for variable `j`;
    /// `0`/`1` is the expected bit value.
    pub fn new(
        h: SparseMatrix,
        p_vector: Option<Vec<f64>>,
        prior: Option<Vec<i8>>,
        rng: Rng,
    ) -> PpbfDecoder {
        PpbfDecoder {
            h,
            p_vector,
            prior,
            info_mask: None,
            rng,
        }
    }

    /// Configures the mask used by [`Decoder::info_bits`].
    #[must_use]
    pub fn with_info_mask(mut self, mask: Vec<bool>) -> PpbfDecoder {
        self.info_mask = Some(mask);
        self
    }

    fn max_var_degree(&self) -> usize {
        (0..self.h.num_cols())
            .map(|j| self.h.col_weight(j))
            .max()
            .unwrap_or(0)
    }

    fn validated_p_vector(&self) -> Result<&[f64]> {
        let use_priors = usize::from(self.prior.is_some());
        let expected_len = self.max_var_degree() + 2 + use_priors;
        let p_vector = self.p_vector.as_deref().ok_or_else(|| {
            Error::InvalidParameter("PPBF decoding requires a p_vector".to_string())
        })?;
        if p_vector.len() != expected_len {
            return Err(Error::InvalidParameter(format!(
                "p_vector must have length {expected_len}, got {}",
                p_vector.len()
            )));
        }
        if p_vector.iter().any(|&p| !(0.0..=1.0).contains(&p)) {
            return Err(Error::InvalidParameter(
                "p_vector entries must lie in [0, 1]".to_string(),
            ));
        }
        Ok(p_vector)
    }
}

impl Decoder for PpbfDecoder {
    fn decode(&mut self, input: &[f64], max_iter: usize) -> Result<DecodeOutcome> {
        let n = self.h.num_cols();
        if input.len() != n {
            return Err(Error::IncorrectLength {
                expected: n,
                got: input.len(),
            });
        }
        let d_v_max = self.max_var_degree();
        let p_vector = self.validated_p_vector()?.to_vec();

        let original: Vec<u8> = input.iter().map(|&v| u8::from(v < 0.0)).collect();
        let mut x = original.clone();
        let mut synd = syndrome(&self.h, &x);

        if max_iter == 0 {
            return Ok(DecodeOutcome {
                success: is_zero(&synd),
                estimate: x,
                llr: None,
                iterations: 0,
                syndrome: synd,
                diagnostics: Diagnostics::None,
            });
        }

        let mut energy = vec![0usize; n];
        let mut iterations = 0;

        loop {
            iterations += 1;
            if is_zero(&synd) {
                break;
            }

            for j in 0..n {
                let d_v = self.h.col_weight(j).max(1);
                let unsatisfied = self.h.iter_col(j).filter(|&&i| synd[i] != 0).count();
                let unsatisfied = ((unsatisfied * d_v_max) as f64 / d_v as f64).round() as usize;
                let flipped = usize::from(x[j] != original[j]);
                let prior_disagree = match &self.prior {
                    Some(prior) if prior[j] >= 0 => usize::from((prior[j] as u8) != x[j]),
                    _ => 0,
                };
                energy[j] = unsatisfied + flipped + prior_disagree;
            }

            for j in 0..n {
                if self.rng.gen_bool(p_vector[energy[j]]) {
                    x[j] ^= 1;
                }
            }

            synd = syndrome(&self.h, &x);
            if iterations >= max_iter {
                break;
            }
        }

        let success = is_zero(&synd);
        let llr = (0..n)
            .map(|j| {
                let p = p_vector[energy[j]].clamp(1e-6, 1.0 - 1e-6);
                bsc_llr(p)(x[j])
            })
            .collect();

        Ok(DecodeOutcome {
            success,
            estimate: x,
            llr: Some(llr),
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
