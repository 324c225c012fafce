//! Tanner graph substrate shared by every message-passing decoder.
//!
//! The bipartite graph associated to a parity check matrix has one edge per
//! non-zero entry of H. Each edge is given a single canonical id, assigned
//! once at construction in row-major order; [`TannerGraph::row_edges`] and
//! [`TannerGraph::col_edges`] are parallel index arrays addressing the same
//! edge-indexed message buffers from the check-node side and the
//! variable-node side respectively. This is simpler than (and equivalent
//! to) maintaining two separate message buffers linked by an explicit
//! permutation.

use crate::sparse::SparseMatrix;

/// Edge-indexed view of a parity check matrix's bipartite graph.
#[derive(Debug, Clone)]
pub struct TannerGraph {
    row_edges: Vec<Vec<usize>>,
    col_edges: Vec<Vec<usize>>,
    edge_row: Vec<usize>,
    edge_col: Vec<usize>,
}

impl TannerGraph {
    /// Builds the graph associated to `h`, assigning edge ids in row-major
    /// order.
    pub fn new(h: &SparseMatrix) -> TannerGraph {
        let num_checks = h.num_rows();
        let num_vars = h.num_cols();
        let mut row_edges = vec![Vec::new(); num_checks];
        let mut col_edges = vec![Vec::new(); num_vars];
        let mut edge_row = Vec::new();
        let mut edge_col = Vec::new();
        let mut next_id = 0;
        for i in 0..num_checks {
            for &j in h.iter_row(i) {
                row_edges[i].push(next_id);
                col_edges[j].push(next_id);
                edge_row.push(i);
                edge_col.push(j);
                next_id += 1;
            }
        }
        TannerGraph {
            row_edges,
            col_edges,
            edge_row,
            edge_col,
        }
    }

    /// Number of check-nodes.
    pub fn num_checks(&self) -> usize {
        self.row_edges.len()
    }

    /// Number of variable-nodes.
    pub fn num_vars(&self) -> usize {
        self.col_edges.len()
    }

    /// Number of edges (non-zero entries of H).
    pub fn num_edges(&self) -> usize {
        self.edge_row.len()
    }

    /// Edge ids incident to check `i`, in the row's canonical neighbor
    /// order.
    pub fn row_edges(&self, i: usize) -> &[usize] {
        &self.row_edges[i]
    }

    /// Edge ids incident to variable `j`, in the column's canonical
    /// neighbor order.
    pub fn col_edges(&self, j: usize) -> &[usize] {
        &self.col_edges[j]
    }

    /// The check-node endpoint of edge `e`.
    pub fn edge_row(&self, e: usize) -> usize {
        self.edge_row[e]
    }

    /// The variable-node endpoint of edge `e`.
    pub fn edge_col(&self, e: usize) -> usize {
        self.edge_col[e]
    }

    /// Given one value per edge, returns one value per edge holding the sum
    /// over that edge's variable-node neighborhood, excluding the edge
    /// itself: `out[e] = (sum of values[e'] for e' in col_edges(j)) -
    /// values[e]`, where `j` is the variable incident to `e`.
    ///
    /// This is the two-pass total-then-subtract trick used by the
    /// variable-node update: computing the full sum once and then
    /// recovering every leave-one-out value in O(1) avoids the O(d^2)
    /// direct approach.
    pub fn leave_one_out_sum(&self, values: &[f64]) -> Vec<f64> {
        let mut out = vec![0.0; values.len()];
        for edges in &self.col_edges {
            let total: f64 = edges.iter().map(|&e| values[e]).sum();
            for &e in edges {
                out[e] = total - values[e];
            }
        }
        out
    }
}
