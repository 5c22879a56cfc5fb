//! Error types of the profile HMM.

use thiserror::Error;

/// Errors raised before any grid is allocated.
///
/// An infeasible alignment is not an error: it is reported as a `-inf`
/// score or an empty alignment.
#[derive(Debug, Error)]
pub enum PhmmError {
    /// A transition probability is NaN, negative, greater than one,
    /// or the derived probabilities do not form a distribution.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Event range, strand or sequence length do not fit together.
    #[error("dimension mismatch: {0}")]
    Dimension(String),

    /// The emission model returned NaN.
    #[error("emission model returned NaN at event {event_idx} k-mer {kmer_idx}")]
    NanEmission { event_idx: usize, kmer_idx: usize },

    /// The emission model returned a log-density of `+inf`.
    #[error("emission model returned +inf at event {event_idx} k-mer {kmer_idx}")]
    InfiniteEmission { event_idx: usize, kmer_idx: usize },

    /// Failure while writing an alignment report
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PhmmError>;
