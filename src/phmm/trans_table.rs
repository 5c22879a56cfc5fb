//!
//! Transition probabilities into each k-mer block
//!
use super::params::TransitionParameters;
use crate::error::Result;
use crate::prob::Prob;
use log::debug;

///
/// Transitions into the block of a k-mer, in log space.
///
/// `*_self` stays in the same k-mer, `*_next` moves from the previous k-mer.
///
#[derive(Debug, Copy, PartialEq, Clone)]
pub struct BlockTransitions {
    /// M -> M (same k-mer)
    pub lp_mm_self: Prob,
    /// M -> B
    pub lp_mb: Prob,
    /// M -> K
    pub lp_mk: Prob,
    /// M -> M (next k-mer)
    pub lp_mm_next: Prob,
    /// B -> B
    pub lp_bb: Prob,
    /// B -> K
    pub lp_bk: Prob,
    /// B -> M (next k-mer)
    pub lp_bm_next: Prob,
    /// B -> M (same k-mer)
    pub lp_bm_self: Prob,
    /// K -> K
    pub lp_kk: Prob,
    /// K -> M
    pub lp_km: Prob,
}

impl BlockTransitions {
    ///
    /// Derive the block transitions from the parameters.
    /// The parameters are validated before taking logs.
    ///
    pub fn from_params(params: &TransitionParameters) -> Result<Self> {
        params.validate()?;
        let p_mk = params.p_skip;
        let p_mb = params.p_bad;
        let p_mm_self = params.p_stay;
        let p_mm_next = params.p_mm_next();

        let p_bb = params.p_bad_self;
        let p_b_out = (1.0 - p_bb) / 3.0;

        let p_kk = params.p_skip_self;
        let p_km = 1.0 - p_kk;

        Ok(BlockTransitions {
            lp_mm_self: Prob::try_from_prob(p_mm_self)?,
            lp_mb: Prob::try_from_prob(p_mb)?,
            lp_mk: Prob::try_from_prob(p_mk)?,
            lp_mm_next: Prob::try_from_prob(p_mm_next)?,
            lp_bb: Prob::try_from_prob(p_bb)?,
            lp_bk: Prob::try_from_prob(p_b_out)?,
            lp_bm_next: Prob::try_from_prob(p_b_out)?,
            lp_bm_self: Prob::try_from_prob(p_b_out)?,
            lp_kk: Prob::try_from_prob(p_kk)?,
            lp_km: Prob::try_from_prob(p_km)?,
        })
    }
    /// sum of outgoing probabilities from Match
    /// `mm_self + mb + mk + mm_next`
    pub fn sum_from_m(&self) -> Prob {
        self.lp_mm_self + self.lp_mb + self.lp_mk + self.lp_mm_next
    }
    /// sum of outgoing probabilities from BadEvent
    /// `bb + bk + bm_next + bm_self`
    pub fn sum_from_b(&self) -> Prob {
        self.lp_bb + self.lp_bk + self.lp_bm_next + self.lp_bm_self
    }
    /// sum of outgoing probabilities from KmerSkip
    /// `kk + km`
    pub fn sum_from_k(&self) -> Prob {
        self.lp_kk + self.lp_km
    }
}

impl std::fmt::Display for BlockTransitions {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "mm_self:{}\t", self.lp_mm_self.to_value())?;
        write!(f, "mb:{}\t", self.lp_mb.to_value())?;
        write!(f, "mk:{}\t", self.lp_mk.to_value())?;
        write!(f, "mm_next:{}\t", self.lp_mm_next.to_value())?;
        write!(f, "bb:{}\t", self.lp_bb.to_value())?;
        write!(f, "bk:{}\t", self.lp_bk.to_value())?;
        write!(f, "bm_next:{}\t", self.lp_bm_next.to_value())?;
        write!(f, "bm_self:{}\t", self.lp_bm_self.to_value())?;
        write!(f, "kk:{}\t", self.lp_kk.to_value())?;
        write!(f, "km:{}", self.lp_km.to_value())
    }
}

///
/// Transitions of every k-mer block of a read strand.
///
/// All blocks share the parameters of the strand, but are kept per block
/// so that the fill can look them up by k-mer index.
///
pub fn calculate_transitions(
    n_kmers: usize,
    params: &TransitionParameters,
) -> Result<Vec<BlockTransitions>> {
    let block = BlockTransitions::from_params(params)?;
    debug!("block transitions {}", block);
    Ok(vec![block; n_kmers])
}
