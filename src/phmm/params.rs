//!
//! Transition parameters of the profile HMM
//!
use crate::error::{PhmmError, Result};
use crate::prob::Prob;
use serde::{Deserialize, Serialize};

///
/// Transition parameters shared by every k-mer block of a read strand.
///
/// Stored as plain probabilities so that they can be validated before
/// any log transform.
///
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionParameters {
    /// Match -> Match of the same k-mer (additional event from the k-mer)
    pub p_stay: f64,
    /// Match -> KmerSkip (no event observed from the next k-mer)
    pub p_skip: f64,
    /// KmerSkip -> KmerSkip
    pub p_skip_self: f64,
    /// Match -> BadEvent
    pub p_bad: f64,
    /// BadEvent -> BadEvent
    pub p_bad_self: f64,
}

impl TransitionParameters {
    pub fn new(
        p_stay: f64,
        p_skip: f64,
        p_skip_self: f64,
        p_bad: f64,
        p_bad_self: f64,
    ) -> TransitionParameters {
        TransitionParameters {
            p_stay,
            p_skip,
            p_skip_self,
            p_bad,
            p_bad_self,
        }
    }
    ///
    /// Parameters where every event is matched to its own k-mer:
    /// no stays, no skips and no bad events.
    ///
    pub fn strict() -> TransitionParameters {
        TransitionParameters::new(0.0, 0.0, 0.0, 0.0, 0.0)
    }
    ///
    /// Probability of leaving Match for the next k-mer Match
    /// `1 - p_stay - p_skip - p_bad`
    ///
    pub fn p_mm_next(&self) -> f64 {
        1.0 - self.p_stay - self.p_skip - self.p_bad
    }
    ///
    /// Check that every probability is in `[0, 1]` and the transitions
    /// out of Match form a distribution.
    ///
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("p_stay", self.p_stay),
            ("p_skip", self.p_skip),
            ("p_skip_self", self.p_skip_self),
            ("p_bad", self.p_bad),
            ("p_bad_self", self.p_bad_self),
        ];
        for (name, value) in named.iter() {
            Prob::try_from_prob(*value).map_err(|_| {
                PhmmError::InvalidParameter(format!("{}={} is not a probability", name, value))
            })?;
        }
        if self.p_mm_next() < 0.0 {
            return Err(PhmmError::InvalidParameter(format!(
                "p_stay + p_skip + p_bad = {} exceeds 1",
                self.p_stay + self.p_skip + self.p_bad
            )));
        }
        Ok(())
    }
}

impl Default for TransitionParameters {
    fn default() -> Self {
        TransitionParameters::new(0.4, 0.0025, 0.3, 0.001, 0.001)
    }
}

impl std::fmt::Display for TransitionParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "p_stay: {}", self.p_stay)?;
        writeln!(f, "p_skip: {}", self.p_skip)?;
        writeln!(f, "p_skip_self: {}", self.p_skip_self)?;
        writeln!(f, "p_bad: {}", self.p_bad)?;
        writeln!(f, "p_bad_self: {}", self.p_bad_self)
    }
}
