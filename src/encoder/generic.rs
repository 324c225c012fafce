//! LDPC systematic encoder.
//!
//! This module implements a systematic encoder for LDPC (n, k) codes in which
//! the parity check matrix H has size (n-k) x n (i.e., has maximum rank), and
//! the square matrix formed by the last n-k columns of H is invertible. For
//! these codes, the encoder uses the first k symbols of the codeword as
//! systematic.
//!
//! The encoder works by splitting the parity check matrix as H = [H0 H1],
//! where H1 is square, and computing G0 = H1^{-1}H0. The dense matrix G0
//! is multiplied by the k message bits (as a column vector on the right) to
//! obtain the n-k parity check bits.

use crate::{error::Result, gf2::GF2, linalg, sparse::SparseMatrix};
use ndarray::{s, Array1, Array2, ArrayBase, Data, Ix1};
use num_traits::One;

/// LDPC systematic encoder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Encoder {
    gen_matrix: Array2<GF2>,
}

impl Encoder {
    /// Creates the systematic encoder corresponding to a parity check matrix.
    ///
    /// # Errors
    /// Returns [`crate::error::Error::SubmatrixNotInvertible`] if the square
    /// submatrix formed by the last `h.num_rows()` columns of `h` is not
    /// invertible.
    pub fn from_h(h: &SparseMatrix) -> Result<Encoder> {
        let n = h.num_rows();
        let m = h.num_cols();

        // If H = [H0 H1] with H0 n x (m-n) and H1 n x n, then
        // A = [H1 H0].
        let mut a = Array2::zeros((n, m));
        for (j, k) in h.iter_all() {
            let t = if k < m - n { k + n } else { k - (m - n) };
            a[[j, t]] = GF2::one();
        }

        linalg::gauss_reduction(&mut a)?;

        let gen_matrix = a.slice(s![.., n..]).to_owned();
        Ok(Encoder { gen_matrix })
    }

    /// Encodes a message into a codeword.
    pub fn encode<S>(&self, message: &ArrayBase<S, Ix1>) -> Array1<GF2>
    where
        S: Data<Elem = GF2>,
    {
        let parity = self.gen_matrix.dot(message);
        ndarray::concatenate(ndarray::Axis(0), &[message.view(), parity.view()]).unwrap()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use num_traits::Zero;
    use proptest::prelude::*;

    fn hamming74() -> SparseMatrix {
        let mut h = SparseMatrix::new(3, 7);
        h.insert_row(0, [3, 4, 5, 6].into_iter());
        h.insert_row(1, [1, 2, 5, 6].into_iter());
        h.insert_row(2, [0, 2, 4, 6].into_iter());
        h
    }

    fn to_bit(b: bool) -> GF2 {
        if b {
            GF2::one()
        } else {
            GF2::zero()
        }
    }

    proptest! {
        #[test]
        fn encode_is_systematic_and_satisfies_parity(bits in proptest::collection::vec(any::<bool>(), 4)) {
            let h = hamming74();
            let encoder = Encoder::from_h(&h).unwrap();
            let message = ndarray::Array1::from_vec(bits.iter().map(|&b| to_bit(b)).collect());
            let codeword = encoder.encode(&message);

            prop_assert_eq!(codeword.slice(s![..4]).to_owned(), message);
            for i in 0..h.num_rows() {
                let parity = h
                    .iter_row(i)
                    .fold(GF2::zero(), |acc, &j| acc + codeword[j]);
                prop_assert_eq!(parity, GF2::zero());
            }
        }
    }

    #[test]
    fn encode() {
        let alist = "12 4
3 9 
3 3 3 3 3 3 3 3 3 3 3 3 
9 9 9 9 
1 2 3 
1 3 4 
2 3 4 
2 3 4 
1 2 4 
1 2 3 
1 3 4 
1 2 4 
1 2 3 
2 3 4 
1 2 4 
1 3 4 
1 2 5 6 7 8 9 11 12 
1 3 4 5 6 8 9 10 11 
1 2 3 4 6 7 9 10 12 
2 3 4 5 7 8 10 11 12 
";
        let h = SparseMatrix::from_alist(alist).unwrap();
        let encoder = Encoder::from_h(&h).unwrap();
        let i = GF2::one();
        let o = GF2::zero();

        let message = [i, o, i, i, o, o, i, o];
        let codeword = encoder.encode(&ndarray::arr1(&message));
        let expected = [i, o, i, i, o, o, i, o, i, o, o, i];
        assert_eq!(&codeword.as_slice().unwrap(), &expected);

        let message = [o, i, o, o, i, i, i, o];
        let codeword = encoder.encode(&ndarray::arr1(&message));
        let expected = [o, i, o, o, i, i, i, o, i, o, i, o];
        assert_eq!(&codeword.as_slice().unwrap(), &expected);
    }
}
