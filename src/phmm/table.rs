//!
//! Table definitions
//!
//! ## ProfileTable
//!
//! Dense 2D grid of `(n_events + 1)` rows and `(n_kmers + 1) * N_STATES`
//! columns, stored row by row in a single `Vec`.
//!
//! Row 0 holds no event. Block 0 is the start block, which only carries the
//! boundary score in its Match column. Block `b >= 1` holds k-mer `b - 1`.
//!
use super::state::{ProfileState, N_STATES};
use crate::prob::Prob;
use itertools::Itertools;

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileTable<T> {
    n_rows: usize,
    n_cols: usize,
    data: Vec<T>,
}

impl<T: Copy> ProfileTable<T> {
    pub fn new(n_rows: usize, n_cols: usize, value: T) -> Self {
        ProfileTable {
            n_rows,
            n_cols,
            data: vec![value; n_rows * n_cols],
        }
    }
    ///
    /// Table for `n_events` events and `n_kmers` k-mers
    ///
    pub fn for_profile(n_events: usize, n_kmers: usize, value: T) -> Self {
        ProfileTable::new(n_events + 1, (n_kmers + 1) * N_STATES, value)
    }
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }
    /// The number of k-mer blocks (start block excluded)
    pub fn n_kmers(&self) -> usize {
        self.n_cols / N_STATES - 1
    }
    pub fn get(&self, row: usize, col: usize) -> T {
        self.data[row * self.n_cols + col]
    }
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        self.data[row * self.n_cols + col] = value;
    }
    pub fn row(&self, row: usize) -> &[T] {
        &self.data[row * self.n_cols..(row + 1) * self.n_cols]
    }
}

///
/// Column of `state` in the block `block`
///
pub fn cell(block: usize, state: ProfileState) -> usize {
    block * N_STATES + state.index()
}

///
/// Block and state of the column
///
pub fn block_and_state(col: usize) -> (usize, ProfileState) {
    (col / N_STATES, ProfileState::from_index(col))
}

impl std::fmt::Display for ProfileTable<Prob> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for row in 0..self.n_rows {
            let values = self
                .row(row)
                .iter()
                .map(|p| format!("{:.3}", p.to_log_value()))
                .join("\t");
            writeln!(f, "{}\t{}", row, values)?;
        }
        Ok(())
    }
}
