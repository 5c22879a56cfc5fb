//!
//! States, movements and flags of the profile HMM
//!
use crate::prob::Prob;
use serde::{Deserialize, Serialize};

/// Number of states stored per block (one block per k-mer)
pub const N_STATES: usize = 3;

/// Number of movement types
pub const N_MOVEMENTS: usize = 6;

///
/// States of the profile HMM.
///
/// `KmerSkip`, `BadEvent` and `Match` are stored in every block of the grid.
/// `PreSoft` is the boundary state before the first k-mer and is never stored.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileState {
    KmerSkip,
    BadEvent,
    Match,
    PreSoft,
}

impl ProfileState {
    /// States that own a cell in each block, in column order.
    pub const STORED: [ProfileState; N_STATES] = [
        ProfileState::KmerSkip,
        ProfileState::BadEvent,
        ProfileState::Match,
    ];
    ///
    /// Column offset of the state inside a block.
    ///
    /// `PreSoft` lives outside of the blocks and is mapped after them.
    ///
    pub fn index(self) -> usize {
        match self {
            ProfileState::KmerSkip => 0,
            ProfileState::BadEvent => 1,
            ProfileState::Match => 2,
            ProfileState::PreSoft => 4,
        }
    }
    ///
    /// State of the column offset in a block (`i % N_STATES`)
    ///
    pub fn from_index(i: usize) -> ProfileState {
        ProfileState::STORED[i % N_STATES]
    }
    ///
    /// One-letter symbol used in alignments
    ///
    pub fn to_char(self) -> char {
        match self {
            ProfileState::KmerSkip => 'K',
            ProfileState::BadEvent => 'B',
            ProfileState::Match => 'M',
            ProfileState::PreSoft => 'S',
        }
    }
    ///
    /// Does the state consume an event?
    ///
    pub fn is_emittable(self) -> bool {
        matches!(self, ProfileState::BadEvent | ProfileState::Match)
    }
}

impl std::fmt::Display for ProfileState {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

///
/// The ways a cell is reached from its predecessors.
///
/// The order is the tie-break order of Viterbi: among equally good
/// movements the one declared first wins.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MovementType {
    /// stay in the same block, from Match
    FromSameM,
    /// move from the previous block, from Match
    FromPrevM,
    /// stay in the same block, from BadEvent
    FromSameB,
    /// move from the previous block, from BadEvent
    FromPrevB,
    /// move from the previous block, from KmerSkip
    FromPrevK,
    /// enter from the boundary state
    FromSoft,
}

impl MovementType {
    pub const ALL: [MovementType; N_MOVEMENTS] = [
        MovementType::FromSameM,
        MovementType::FromPrevM,
        MovementType::FromSameB,
        MovementType::FromPrevB,
        MovementType::FromPrevK,
        MovementType::FromSoft,
    ];
    pub fn index(self) -> usize {
        self as usize
    }
    ///
    /// Block offset and state of the predecessor cell.
    /// `None` for `FromSoft`, whose predecessor is outside the k-mer blocks.
    ///
    pub fn source(self) -> Option<(usize, ProfileState)> {
        match self {
            MovementType::FromSameM => Some((0, ProfileState::Match)),
            MovementType::FromPrevM => Some((1, ProfileState::Match)),
            MovementType::FromSameB => Some((0, ProfileState::BadEvent)),
            MovementType::FromPrevB => Some((1, ProfileState::BadEvent)),
            MovementType::FromPrevK => Some((1, ProfileState::KmerSkip)),
            MovementType::FromSoft => None,
        }
    }
}

impl Default for MovementType {
    fn default() -> Self {
        MovementType::FromSameM
    }
}

///
/// Candidate scores of a cell, one per movement type.
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdateScores([Prob; N_MOVEMENTS]);

impl UpdateScores {
    ///
    /// all movements are impossible (p=0)
    ///
    pub fn impossible() -> Self {
        UpdateScores([Prob::zero(); N_MOVEMENTS])
    }
    pub fn iter(&self) -> impl Iterator<Item = (MovementType, Prob)> + '_ {
        (0..N_MOVEMENTS).map(move |i| (MovementType::ALL[i], self.0[i]))
    }
}

impl std::ops::Index<MovementType> for UpdateScores {
    type Output = Prob;
    fn index(&self, m: MovementType) -> &Prob {
        &self.0[m.index()]
    }
}

impl std::ops::IndexMut<MovementType> for UpdateScores {
    fn index_mut(&mut self, m: MovementType) -> &mut Prob {
        &mut self.0[m.index()]
    }
}

///
/// Flags to modify the behaviour of the HMM. Combine with `|`.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HmmAlignmentFlags(u32);

/// allow events to go unmatched before the aligning region
pub const HAF_ALLOW_PRE_CLIP: HmmAlignmentFlags = HmmAlignmentFlags(1);

/// allow events to go unmatched after the aligning region
pub const HAF_ALLOW_POST_CLIP: HmmAlignmentFlags = HmmAlignmentFlags(2);

impl HmmAlignmentFlags {
    /// no clipping at either end
    pub fn none() -> Self {
        HmmAlignmentFlags(0)
    }
    pub fn bits(self) -> u32 {
        self.0
    }
    pub fn contains(self, other: HmmAlignmentFlags) -> bool {
        self.0 & other.0 == other.0
    }
    pub fn allow_pre_clip(self) -> bool {
        self.contains(HAF_ALLOW_PRE_CLIP)
    }
    pub fn allow_post_clip(self) -> bool {
        self.contains(HAF_ALLOW_POST_CLIP)
    }
}

impl std::ops::BitOr for HmmAlignmentFlags {
    type Output = Self;
    fn bitor(self, other: Self) -> Self {
        HmmAlignmentFlags(self.0 | other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_symbols_and_columns() {
        let s: String = ProfileState::STORED.iter().map(|s| s.to_char()).collect();
        assert_eq!(s, "KBM");
        assert_eq!(ProfileState::PreSoft.to_char(), 'S');
        for (i, &state) in ProfileState::STORED.iter().enumerate() {
            assert_eq!(state.index(), i);
            assert_eq!(ProfileState::from_index(i + 3), state);
        }
        assert!(!ProfileState::KmerSkip.is_emittable());
        assert!(ProfileState::BadEvent.is_emittable());
    }
    #[test]
    fn movement_order() {
        for (i, m) in MovementType::ALL.iter().enumerate() {
            assert_eq!(m.index(), i);
        }
        assert!(MovementType::FromSameM < MovementType::FromSoft);
        assert_eq!(MovementType::FromSoft.source(), None);
        assert_eq!(
            MovementType::FromPrevK.source(),
            Some((1, ProfileState::KmerSkip))
        );
    }
    #[test]
    fn update_scores_index() {
        let mut s = UpdateScores::impossible();
        s[MovementType::FromPrevB] = Prob::one();
        assert!(s[MovementType::FromSameM].is_zero());
        assert!(s[MovementType::FromPrevB].is_one());
        assert_eq!(s.iter().filter(|(_, p)| !p.is_zero()).count(), 1);
    }
    #[test]
    fn flags_combine() {
        let f = HmmAlignmentFlags::none();
        assert!(!f.allow_pre_clip() && !f.allow_post_clip());
        let f = HAF_ALLOW_PRE_CLIP | HAF_ALLOW_POST_CLIP;
        assert_eq!(f.bits(), 3);
        assert!(f.allow_pre_clip() && f.allow_post_clip());
        assert!(HAF_ALLOW_POST_CLIP.allow_post_clip());
        assert!(!HAF_ALLOW_POST_CLIP.allow_pre_clip());
    }
}
