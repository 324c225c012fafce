//! Systematic encoders.
//!
//! [`generic::Encoder`] inverts a dense submatrix of an arbitrary full-rank
//! parity check matrix; [`qc::QcEncoder`] exploits a quasi-cyclic matrix's
//! block-cyclic structure to avoid that inversion entirely.

pub mod generic;
pub mod qc;
