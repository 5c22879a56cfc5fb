//!
//! Viterbi algorithm definitions
//!
//! `V[row, (block, state)]` = the best score of a path that emits the first
//! `row` events and is in `state` of k-mer `block - 1`. The movement that
//! achieved it is kept for the backtrace.
//!
use super::fill::{profile_hmm_fill_generic, FillInput, PHMMOutput};
use super::forward::profile_hmm_forward_initialize;
use super::state::{HmmAlignmentFlags, MovementType, UpdateScores};
use super::table::ProfileTable;
use crate::emission::EmissionModel;
use crate::error::Result;
use crate::events::HmmInputData;
use crate::prob::Prob;
use crate::seq::KmerSequence;

///
/// Viterbi table, backpointers and the best end cell
///
#[derive(Debug, Clone)]
pub struct ViterbiOutput {
    pub table: ProfileTable<Prob>,
    pub backtrack: ProfileTable<MovementType>,
    end: Prob,
    end_cell: Option<(usize, usize)>,
}

impl ViterbiOutput {
    pub fn new(n_events: usize, n_kmers: usize, flags: HmmAlignmentFlags) -> Self {
        let mut output = ViterbiOutput {
            table: ProfileTable::for_profile(n_events, n_kmers, Prob::zero()),
            backtrack: ProfileTable::for_profile(n_events, n_kmers, MovementType::default()),
            end: Prob::zero(),
            end_cell: None,
        };
        profile_hmm_viterbi_initialize(&mut output.table, flags);
        output
    }
    ///
    /// `(row, col)` where the best path ends, or `None` if every path is
    /// impossible.
    ///
    pub fn end_cell(&self) -> Option<(usize, usize)> {
        self.end_cell
    }
    pub fn get_backtrack(&self, row: usize, col: usize) -> MovementType {
        self.backtrack.get(row, col)
    }
}

impl PHMMOutput for ViterbiOutput {
    fn n_rows(&self) -> usize {
        self.table.n_rows()
    }
    fn n_cols(&self) -> usize {
        self.table.n_cols()
    }
    fn get(&self, row: usize, col: usize) -> Prob {
        self.table.get(row, col)
    }
    ///
    /// keep the maximum candidate. On ties the movement declared first in
    /// `MovementType` wins.
    ///
    fn update_cell(&mut self, row: usize, col: usize, scores: &UpdateScores, lp_emission: Prob) {
        let mut best = MovementType::FromSameM;
        let mut max = scores[best];
        for (movement, score) in scores.iter().skip(1) {
            if score > max {
                max = score;
                best = movement;
            }
        }
        self.table.set(row, col, max * lp_emission);
        self.backtrack.set(row, col, best);
    }
    ///
    /// keep the first strictly greater end candidate
    ///
    fn update_end(&mut self, value: Prob, row: usize, col: usize) {
        if value > self.end {
            self.end = value;
            self.end_cell = Some((row, col));
        }
    }
    fn end(&self) -> Prob {
        self.end
    }
}

///
/// Same boundary as Forward: the start Match at row 0, and on every row
/// with pre-clipping.
///
pub fn profile_hmm_viterbi_initialize(table: &mut ProfileTable<Prob>, flags: HmmAlignmentFlags) {
    profile_hmm_forward_initialize(table, flags);
}

///
/// Run the Viterbi algorithm and return the filled output.
///
pub fn profile_hmm_viterbi<S: KmerSequence, E: EmissionModel>(
    sequence: &S,
    data: &HmmInputData,
    model: &E,
    flags: HmmAlignmentFlags,
) -> Result<ViterbiOutput> {
    let input = FillInput::prepare(sequence, data, model)?;
    let mut output = ViterbiOutput::new(input.n_events, input.n_kmers, flags);
    profile_hmm_fill_generic(&input, flags, &mut output);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phmm::state::ProfileState;
    use crate::phmm::table::cell;

    #[test]
    fn viterbi_tie_prefers_first_movement() {
        let mut o = ViterbiOutput::new(2, 2, HmmAlignmentFlags::none());
        let mut scores = UpdateScores::impossible();
        scores[MovementType::FromPrevK] = Prob::from_prob(0.5);
        scores[MovementType::FromPrevM] = Prob::from_prob(0.5);
        scores[MovementType::FromSoft] = Prob::from_prob(0.5);
        let col = cell(2, ProfileState::Match);
        o.update_cell(1, col, &scores, Prob::one());
        assert_eq!(o.get_backtrack(1, col), MovementType::FromPrevM);
        assert_abs_diff_eq!(o.get(1, col), Prob::from_prob(0.5));
    }
    #[test]
    fn viterbi_end_keeps_first_best() {
        let mut o = ViterbiOutput::new(2, 1, HmmAlignmentFlags::none());
        assert_eq!(o.end_cell(), None);
        o.update_end(Prob::zero(), 1, 0);
        assert_eq!(o.end_cell(), None);
        o.update_end(Prob::from_prob(0.2), 1, 5);
        o.update_end(Prob::from_prob(0.2), 2, 5);
        assert_eq!(o.end_cell(), Some((1, 5)));
        o.update_end(Prob::from_prob(0.3), 2, 4);
        assert_eq!(o.end_cell(), Some((2, 4)));
    }
}
