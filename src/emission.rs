//!
//! Emission models of the profile HMM
//!
//! * `EmissionModel` trait: log-probability of an event given a k-mer
//! * `GaussianPoreModel`: per k-mer Gaussian current levels, scaled per read
//! * `TableEmission`: precomputed emission matrix
//! * `EmissionTable`: emissions of a whole grid, computed before the fill
//!
use crate::error::{PhmmError, Result};
use crate::events::{HmmInputData, ScalingParameters};
use crate::prob::Prob;
use crate::seq::KmerSequence;
use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

/// Log-probability of emitting any event from the BadEvent state
pub const BAD_EVENT_PENALTY: f64 = 0.0;

///
/// Emission of events from k-mers.
///
/// `lp_match` is the log-probability (density) of the event at `event_idx`
/// given that the pore holds `kmer`, the `kmer_idx`-th k-mer of the sequence.
///
pub trait EmissionModel: Sync {
    /// k-mer size of the model
    fn k(&self) -> usize;
    fn lp_match(&self, data: &HmmInputData, event_idx: usize, kmer_idx: usize, kmer: &[u8]) -> Prob;
    fn lp_bad_event(&self, _data: &HmmInputData, _event_idx: usize) -> Prob {
        Prob::from_log_prob(BAD_EVENT_PENALTY)
    }
}

//
// Gaussian pore model
//

///
/// rank of a base in `ACGT` order, or `None` for any other byte
///
const fn base_rank_table() -> [u8; 256] {
    let mut table = [u8::MAX; 256];
    table[b'A' as usize] = 0;
    table[b'C' as usize] = 1;
    table[b'G' as usize] = 2;
    table[b'T' as usize] = 3;
    table[b'a' as usize] = 0;
    table[b'c' as usize] = 1;
    table[b'g' as usize] = 2;
    table[b't' as usize] = 3;
    table
}

static BASE_RANK: [u8; 256] = base_rank_table();

///
/// Lexicographic rank of the k-mer over `ACGT`.
/// `None` if the k-mer contains any other base.
///
pub fn kmer_rank(kmer: &[u8]) -> Option<usize> {
    kmer.iter().try_fold(0usize, |rank, &b| {
        let r = BASE_RANK[b as usize];
        if r == u8::MAX {
            None
        } else {
            Some(rank * 4 + r as usize)
        }
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GaussianParameters {
    pub mean: f64,
    pub stdv: f64,
}

impl GaussianParameters {
    pub fn log_pdf(&self, x: f64) -> f64 {
        let z = (x - self.mean) / self.stdv;
        -0.5 * z * z - self.stdv.ln() - 0.5 * (2.0 * std::f64::consts::PI).ln()
    }
    ///
    /// Parameters after applying the scaling of a read strand
    ///
    pub fn scaled(&self, scalings: &ScalingParameters) -> GaussianParameters {
        GaussianParameters {
            mean: self.mean * scalings.scale + scalings.shift,
            stdv: self.stdv * scalings.var,
        }
    }
}

///
/// Pore model with one Gaussian current level for each k-mer.
///
/// `levels[kmer_rank(kmer)]` is the level of the k-mer.
///
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GaussianPoreModel {
    k: usize,
    levels: Vec<GaussianParameters>,
}

impl GaussianPoreModel {
    pub fn new(k: usize, levels: Vec<GaussianParameters>) -> Result<Self> {
        if k == 0 || 4usize.checked_pow(k as u32) != Some(levels.len()) {
            return Err(PhmmError::Dimension(format!(
                "pore model of k={} needs 4^k levels, got {}",
                k,
                levels.len()
            )));
        }
        if levels
            .iter()
            .any(|g| g.stdv.is_nan() || g.stdv <= 0.0 || g.mean.is_nan())
        {
            return Err(PhmmError::InvalidParameter(
                "pore model level with non-positive stdv".to_string(),
            ));
        }
        Ok(GaussianPoreModel { k, levels })
    }
    ///
    /// Random pore model with levels uniform in `[60, 120)` pA
    ///
    pub fn random(k: usize, seed: u64) -> Result<Self> {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let n = 4usize
            .checked_pow(k as u32)
            .ok_or_else(|| PhmmError::Dimension(format!("k={} is too large", k)))?;
        let levels = (0..n)
            .map(|_| GaussianParameters {
                mean: rng.gen_range(60.0..120.0),
                stdv: rng.gen_range(1.0..2.0),
            })
            .collect();
        GaussianPoreModel::new(k, levels)
    }
    pub fn level(&self, kmer: &[u8]) -> Option<&GaussianParameters> {
        kmer_rank(kmer).map(|rank| &self.levels[rank])
    }
}

impl EmissionModel for GaussianPoreModel {
    fn k(&self) -> usize {
        self.k
    }
    fn lp_match(&self, data: &HmmInputData, event_idx: usize, _kmer_idx: usize, kmer: &[u8]) -> Prob {
        match self.level(kmer) {
            Some(g) => {
                let level = data.read.drift_corrected_level(event_idx, data.strand);
                Prob::from_log_prob(g.scaled(data.scalings()).log_pdf(level))
            }
            None => Prob::zero(),
        }
    }
}

//
// Precomputed emissions
//

///
/// Emission matrix given directly as `lp[event_idx][kmer_idx]`.
///
/// Entries out of the matrix are impossible.
///
#[derive(Clone, Debug)]
pub struct TableEmission {
    pub k: usize,
    pub lp: Vec<Vec<Prob>>,
    pub lp_bad: Prob,
}

impl TableEmission {
    pub fn new(k: usize, lp: Vec<Vec<Prob>>) -> Self {
        TableEmission {
            k,
            lp,
            lp_bad: Prob::from_log_prob(BAD_EVENT_PENALTY),
        }
    }
    ///
    /// Matrix from log values
    ///
    pub fn from_log_values(k: usize, lp: Vec<Vec<f64>>) -> Self {
        let lp = lp
            .into_iter()
            .map(|row| row.into_iter().map(Prob::from_log_prob).collect())
            .collect();
        TableEmission::new(k, lp)
    }
}

impl EmissionModel for TableEmission {
    fn k(&self) -> usize {
        self.k
    }
    fn lp_match(&self, _data: &HmmInputData, event_idx: usize, kmer_idx: usize, _kmer: &[u8]) -> Prob {
        self.lp
            .get(event_idx)
            .and_then(|row| row.get(kmer_idx))
            .copied()
            .unwrap_or_else(Prob::zero)
    }
    fn lp_bad_event(&self, _data: &HmmInputData, _event_idx: usize) -> Prob {
        self.lp_bad
    }
}

///
/// Emissions of every (row, k-mer) of a grid.
///
/// `lp_match` is stored row by row with `n_kmers` entries per row.
/// Row 0 holds no event and is never read.
///
#[derive(Clone, Debug)]
pub struct EmissionTable {
    n_kmers: usize,
    lp_match: Vec<Prob>,
    lp_bad: Vec<Prob>,
}

///
/// Only finite log values and `p=0` can enter the grid
///
fn check_emission(lp: Prob, event_idx: usize, kmer_idx: usize) -> Result<Prob> {
    if lp.is_nan() {
        Err(PhmmError::NanEmission {
            event_idx,
            kmer_idx,
        })
    } else if lp.to_log_value() == f64::INFINITY {
        Err(PhmmError::InfiniteEmission {
            event_idx,
            kmer_idx,
        })
    } else {
        Ok(lp)
    }
}

impl EmissionTable {
    ///
    /// Evaluate the emission model on every event of `data` against every
    /// k-mer of `sequence`. NaN and `+inf` emissions are rejected.
    /// The bad event emission of a row is reported with `kmer_idx = n_kmers`.
    ///
    pub fn build<S: KmerSequence, E: EmissionModel>(
        sequence: &S,
        data: &HmmInputData,
        model: &E,
    ) -> Result<EmissionTable> {
        let k = model.k();
        let n_kmers = sequence.n_kmers(k);
        let n_rows = data.n_events() + 1;
        let mut lp_match = vec![Prob::zero(); n_rows * n_kmers];
        let mut lp_bad = vec![Prob::zero(); n_rows];
        for row in 1..n_rows {
            let event_idx = data.event_idx(row);
            for kmer_idx in 0..n_kmers {
                let kmer = sequence.kmer(kmer_idx, k, data.rc);
                let lp = model.lp_match(data, event_idx, kmer_idx, kmer);
                lp_match[row * n_kmers + kmer_idx] = check_emission(lp, event_idx, kmer_idx)?;
            }
            let lp = model.lp_bad_event(data, event_idx);
            lp_bad[row] = check_emission(lp, event_idx, n_kmers)?;
        }
        Ok(EmissionTable {
            n_kmers,
            lp_match,
            lp_bad,
        })
    }
    pub fn n_kmers(&self) -> usize {
        self.n_kmers
    }
    pub fn lp_match(&self, row: usize, kmer_idx: usize) -> Prob {
        self.lp_match[row * self.n_kmers + kmer_idx]
    }
    pub fn lp_bad(&self, row: usize) -> Prob {
        self.lp_bad[row]
    }
}
