//! Sparse matrix utilities for the symmetric system solve
//!
//! Frame stiffness matrices are banded once the equations are ordered by
//! reverse Cuthill-McKee, so a skyline (profile) Cholesky factorization stays
//! close to the band and avoids the dense n² storage.

use std::collections::VecDeque;

use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::{CooMatrix, CsrMatrix};
use thiserror::Error;

/// A pivot that shrinks below this fraction of its original value marks a singular matrix
pub const PIVOT_TOLERANCE: f64 = 1e-12;

/// Why a skyline factorization stopped
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum FactorizationError {
    #[error("zero pivot at equation {0}")]
    ZeroPivot(usize),
    #[error("matrix not positive definite at equation {0}")]
    NotPositiveDefinite(usize),
}

/// Sparse matrix builder using COO format
/// More efficient for incremental assembly
pub struct SparseMatrixBuilder {
    size: usize,
    entries: Vec<(usize, usize, f64)>,
}

impl SparseMatrixBuilder {
    /// Create a new sparse matrix builder
    pub fn new(size: usize) -> Self {
        // Two-node frame elements: 12 coupled dofs per row is typical
        let estimated_nnz = size * 24;
        Self {
            size,
            entries: Vec::with_capacity(estimated_nnz),
        }
    }

    /// Add a value to the matrix (accumulates if already exists)
    #[inline]
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        if value.abs() > 1e-15 {
            self.entries.push((row, col, value));
        }
    }

    /// Convert to CSR format for efficient solves
    pub fn to_csr(&self) -> CsrMatrix<f64> {
        let mut coo = CooMatrix::new(self.size, self.size);

        for &(row, col, val) in &self.entries {
            coo.push(row, col, val);
        }

        CsrMatrix::from(&coo)
    }

    /// Convert to dense matrix
    pub fn to_dense(&self) -> DMatrix<f64> {
        let mut mat = DMatrix::zeros(self.size, self.size);

        for &(row, col, val) in &self.entries {
            mat[(row, col)] += val;
        }

        mat
    }

    /// Get estimated non-zero count
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }
}

/// Skyline Cholesky solver for symmetric positive definite matrices
///
/// Only the lower profile of each row is stored: from the first non-zero
/// column up to the diagonal.
pub struct SparseCholeskySolver {
    size: usize,
    skyline: Vec<Vec<f64>>,
    // Distance from the diagonal to the first non-zero column of each row
    heights: Vec<usize>,
}

impl SparseCholeskySolver {
    /// Create solver from CSR matrix
    pub fn new(csr: &CsrMatrix<f64>) -> Self {
        let size = csr.nrows();

        let mut heights = vec![0usize; size];
        for (row, col, _val) in csr.triplet_iter() {
            if col < row {
                heights[row] = heights[row].max(row - col);
            }
        }

        let mut skyline: Vec<Vec<f64>> = heights.iter().map(|&h| vec![0.0; h + 1]).collect();

        for (row, col, &val) in csr.triplet_iter() {
            if col <= row {
                let idx = col - (row - heights[row]);
                skyline[row][idx] += val;
            }
        }

        Self {
            size,
            skyline,
            heights,
        }
    }

    /// Factorize in place (L·Lᵀ within the skyline profile)
    pub fn factorize(&mut self) -> Result<(), FactorizationError> {
        for i in 0..self.size {
            let hi = self.heights[i];
            let start_i = i - hi;

            for j in start_i..i {
                let hj = self.heights[j];
                let start_j = j - hj;

                let start = start_i.max(start_j);
                let mut sum = 0.0;
                for k in start..j {
                    sum += self.get(i, k) * self.get(j, k);
                }

                let diag_j = self.skyline[j][hj];
                if diag_j.abs() < 1e-15 {
                    return Err(FactorizationError::ZeroPivot(j));
                }

                let idx = j - start_i;
                self.skyline[i][idx] = (self.skyline[i][idx] - sum) / diag_j;
            }

            let mut sum = 0.0;
            for j in start_i..i {
                let val = self.get(i, j);
                sum += val * val;
            }

            let pivot = self.skyline[i][hi];
            let diag = pivot - sum;
            if diag <= PIVOT_TOLERANCE * pivot.abs() {
                return Err(FactorizationError::NotPositiveDefinite(i));
            }
            self.skyline[i][hi] = diag.sqrt();
        }

        Ok(())
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> f64 {
        if col > row {
            return self.get(col, row);
        }
        let start = row - self.heights[row];
        if col < start {
            return 0.0;
        }
        self.skyline[row][col - start]
    }

    /// Solve L * L^T * x = b with the factorized profile
    pub fn solve(&self, b: &DVector<f64>) -> DVector<f64> {
        let mut x = b.clone();

        // Forward substitution: L * y = b
        for i in 0..self.size {
            let start = i - self.heights[i];

            let mut sum = 0.0;
            for j in start..i {
                sum += self.get(i, j) * x[j];
            }

            x[i] = (x[i] - sum) / self.get(i, i);
        }

        // Backward substitution: L^T * x = y
        for i in (0..self.size).rev() {
            x[i] /= self.get(i, i);

            let start = i - self.heights[i];
            for j in start..i {
                x[j] -= self.get(i, j) * x[i];
            }
        }

        x
    }

    /// Number of stored profile entries
    pub fn profile_len(&self) -> usize {
        self.skyline.iter().map(Vec::len).sum()
    }
}

/// Sparse matrix-vector multiplication
#[inline]
pub(crate) fn sparse_matvec(csr: &CsrMatrix<f64>, x: &DVector<f64>) -> DVector<f64> {
    let n = csr.nrows();
    let mut y = DVector::zeros(n);

    let row_offsets = csr.row_offsets();
    let col_indices = csr.col_indices();
    let values = csr.values();

    for row in 0..n {
        let mut sum = 0.0;
        for idx in row_offsets[row]..row_offsets[row + 1] {
            sum += values[idx] * x[col_indices[idx]];
        }
        y[row] = sum;
    }

    y
}

/// Bandwidth reduction using Reverse Cuthill-McKee algorithm
///
/// `adjacency[i]` lists the vertices connected to vertex `i`. Returns a
/// permutation: position `k` of the result holds the vertex numbered `k`.
pub fn reverse_cuthill_mckee(adjacency: &[Vec<usize>]) -> Vec<usize> {
    let n = adjacency.len();
    if n == 0 {
        return vec![];
    }

    let degrees: Vec<usize> = adjacency.iter().map(Vec::len).collect();

    let mut adj: Vec<Vec<usize>> = adjacency.to_vec();
    for neighbors in &mut adj {
        neighbors.sort_by_key(|&i| (degrees[i], i));
        neighbors.dedup();
    }

    let mut visited = vec![false; n];
    let mut result = Vec::with_capacity(n);
    let mut queue = VecDeque::new();

    while result.len() < n {
        // Each component starts from its unvisited vertex of minimum degree
        let Some(start) = (0..n).filter(|&i| !visited[i]).min_by_key(|&i| degrees[i]) else {
            break;
        };
        queue.push_back(start);
        visited[start] = true;

        while let Some(vertex) = queue.pop_front() {
            result.push(vertex);

            for &neighbor in &adj[vertex] {
                if !visited[neighbor] {
                    visited[neighbor] = true;
                    queue.push_back(neighbor);
                }
            }
        }
    }

    result.reverse();
    result
}
