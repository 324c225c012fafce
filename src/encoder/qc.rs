//! Quasi-cyclic (QC) systematic encoder.
//!
//! A QC parity check matrix is described by a block grid of `z x z` blocks:
//! entry `-1` is the all-zero block, entry `s` in `0..z` is the identity
//! matrix cyclically shifted so that block-row `t` hits block-column `(t +
//! s) mod z`. Encoding exploits this structure to run in `O(n * z)` instead
//! of inverting a dense `k x (n - k)` submatrix, following the efficient
//! encoding recursion for IEEE 802.11n LDPC codes (shift the message blocks
//! into each parity check, then solve the parity blocks by a short forward
//! recursion instead of a general matrix inversion).

use crate::error::{Error, Result};
use crate::sparse::SparseMatrix;

/// Block-grid description of a quasi-cyclic parity check matrix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QcBlockStructure {
    block_rows: usize,
    block_cols: usize,
    z: usize,
    blocks: Vec<Vec<i64>>,
}

impl QcBlockStructure {
    /// Builds a block structure from a `block_rows x block_cols` grid of
    /// entries in `-1..z` (`-1` is the all-zero block, `s` is the identity
    /// shifted by `s`).
    ///
    /// # Errors
    /// Returns [`Error::InconsistentMatrixFile`] if `blocks`'s shape does not
    /// match `block_rows`/`block_cols`, if any entry falls outside
    /// `-1..z`, or if `block_rows < 3` or `block_cols <= block_rows` (the
    /// parity recursion needs at least one message block-column and a
    /// distinct "second" and "last" parity row).
    pub fn new(
        block_rows: usize,
        block_cols: usize,
        z: usize,
        blocks: Vec<Vec<i64>>,
    ) -> Result<QcBlockStructure> {
        if block_rows < 3 {
            return Err(Error::InconsistentMatrixFile(
                "a QC block structure needs at least 3 block rows".to_string(),
            ));
        }
        if block_cols <= block_rows {
            return Err(Error::InconsistentMatrixFile(
                "a QC block structure needs more block columns than block rows".to_string(),
            ));
        }
        if blocks.len() != block_rows || blocks.iter().any(|row| row.len() != block_cols) {
            return Err(Error::InconsistentMatrixFile(
                "block grid shape does not match block_rows/block_cols".to_string(),
            ));
        }
        if blocks
            .iter()
            .flatten()
            .any(|&v| v < -1 || v >= z as i64)
        {
            return Err(Error::InconsistentMatrixFile(format!(
                "block entries must lie in -1..{z}"
            )));
        }
        Ok(QcBlockStructure {
            block_rows,
            block_cols,
            z,
            blocks,
        })
    }

    /// Block size.
    pub fn z(&self) -> usize {
        self.z
    }

    /// Number of rows of the expanded parity check matrix.
    pub fn m(&self) -> usize {
        self.block_rows * self.z
    }

    /// Number of columns of the expanded parity check matrix.
    pub fn n(&self) -> usize {
        self.block_cols * self.z
    }

    /// Number of information bits (`n - m`).
    pub fn k(&self) -> usize {
        self.n() - self.m()
    }

    /// Expands the block grid into the full sparse parity check matrix.
    pub fn to_sparse_matrix(&self) -> SparseMatrix {
        let mut h = SparseMatrix::new(self.m(), self.n());
        for br in 0..self.block_rows {
            for bc in 0..self.block_cols {
                let shift = self.blocks[br][bc];
                if shift < 0 {
                    continue;
                }
                let shift = shift as usize;
                for t in 0..self.z {
                    h.insert(br * self.z + t, bc * self.z + (t + shift) % self.z);
                }
            }
        }
        h
    }
}

/// Systematic encoder for a quasi-cyclic parity check matrix, exploiting its
/// block-cyclic structure instead of a dense matrix inversion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QcEncoder {
    structure: QcBlockStructure,
}

impl QcEncoder {
    /// Builds the encoder for a given block structure.
    pub fn new(structure: QcBlockStructure) -> QcEncoder {
        QcEncoder { structure }
    }

    /// Number of information bits.
    pub fn k(&self) -> usize {
        self.structure.k()
    }

    /// Codeword length.
    pub fn n(&self) -> usize {
        self.structure.n()
    }

    /// The parity check matrix this encoder's codewords satisfy.
    pub fn parity_check_matrix(&self) -> SparseMatrix {
        self.structure.to_sparse_matrix()
    }

    /// Encodes `information_bits` into a systematic codeword
    /// (`[information_bits, parity]`).
    ///
    /// # Errors
    /// Returns [`Error::IncorrectLength`] if `information_bits.len() !=
    /// self.k()`.
    pub fn encode(&self, information_bits: &[u8]) -> Result<Vec<u8>> {
        let z = self.structure.z;
        let k = self.k();
        if information_bits.len() != k {
            return Err(Error::IncorrectLength {
                expected: k,
                got: information_bits.len(),
            });
        }

        let m_blocks = self.structure.block_rows;
        let k_blocks = self.structure.block_cols - m_blocks;
        let bit_blocks: Vec<&[u8]> = (0..k_blocks).map(|j| &information_bits[j * z..(j + 1) * z]).collect();

        // Each row block's XOR of its shifted message-block contributions
        // (lambda_i in the efficient-encoding article).
        let mut shifted = vec![vec![0u8; z]; m_blocks];
        for (i, row) in shifted.iter_mut().enumerate() {
            for (j, &block) in bit_blocks.iter().enumerate() {
                let shift = self.structure.blocks[i][j];
                if shift < 0 {
                    continue;
                }
                let shift = shift as usize;
                for t in 0..z {
                    row[t] ^= block[(t + shift) % z];
                }
            }
        }

        let mut parity = vec![vec![0u8; z]; m_blocks];
        for row in &shifted {
            for t in 0..z {
                parity[0][t] ^= row[t];
            }
        }
        for t in 0..z {
            parity[1][t] = shifted[0][t] ^ parity[0][(t + 1) % z];
        }
        let last = m_blocks - 1;
        for t in 0..z {
            parity[last][t] = shifted[last][t] ^ parity[0][(t + 1) % z];
        }
        for idx in 1..m_blocks.saturating_sub(2) {
            let special = self.structure.blocks[idx][k_blocks] >= 0;
            for t in 0..z {
                parity[idx + 1][t] = parity[idx][t] ^ shifted[idx][t];
                if special {
                    parity[idx + 1][t] ^= parity[0][t];
                }
            }
        }

        let mut codeword = information_bits.to_vec();
        for block in parity {
            codeword.extend(block);
        }
        Ok(codeword)
    }
}
