//!
//! Best alignment of events to k-mers by Viterbi backtrace
//!
use super::fill::PHMMOutput;
use super::state::{HmmAlignmentFlags, MovementType, ProfileState};
use super::table::{block_and_state, cell};
use super::viterbi::{profile_hmm_viterbi, ViterbiOutput};
use crate::emission::EmissionModel;
use crate::error::Result;
use crate::events::HmmInputData;
use crate::prob::Prob;
use crate::seq::KmerSequence;
use log::warn;
use serde::{Deserialize, Serialize};

///
/// One step of an alignment.
///
/// `event_idx` is the event consumed at the row of the step. A KmerSkip step
/// consumes no event and carries the index of the event of its row.
///
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HmmAlignmentState {
    pub event_idx: usize,
    pub kmer_idx: usize,
    /// Viterbi score of the path up to this step
    pub l_fm: Prob,
    /// `M`, `B` or `K`
    pub state: char,
}

///
/// A backtraced step with the movement that entered it
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TracebackStep {
    pub row: usize,
    pub event_idx: usize,
    pub kmer_idx: usize,
    pub state: ProfileState,
    pub movement: MovementType,
    pub l_fm: Prob,
}

impl TracebackStep {
    pub fn to_alignment_state(&self) -> HmmAlignmentState {
        HmmAlignmentState {
            event_idx: self.event_idx,
            kmer_idx: self.kmer_idx,
            l_fm: self.l_fm,
            state: self.state.to_char(),
        }
    }
}

///
/// Follow the backpointers from the best end cell to the entry from the
/// boundary state.
///
/// Returns the steps in increasing order, or an empty vec if no alignment
/// is possible.
///
pub fn profile_hmm_backtrace(output: &ViterbiOutput, data: &HmmInputData) -> Vec<TracebackStep> {
    let (mut row, mut col) = match output.end_cell() {
        Some(end) => end,
        None => {
            warn!(
                "no possible alignment for read={} strand={}",
                data.read.read_name, data.strand
            );
            return Vec::new();
        }
    };

    let mut steps = Vec::new();
    loop {
        let (block, state) = block_and_state(col);
        if row == 0 || block == 0 {
            break;
        }
        let movement = output.get_backtrack(row, col);
        steps.push(TracebackStep {
            row,
            event_idx: data.event_idx(row),
            kmer_idx: block - 1,
            state,
            movement,
            l_fm: output.get(row, col),
        });
        let (offset, prev_state) = match movement.source() {
            Some(source) => source,
            None => break,
        };
        if state != ProfileState::KmerSkip {
            row -= 1;
        }
        col = cell(block - offset, prev_state);
    }
    steps.reverse();
    steps
}

///
/// Viterbi steps of `data` against `sequence`
///
pub fn profile_hmm_traceback<S: KmerSequence, E: EmissionModel>(
    sequence: &S,
    data: &HmmInputData,
    model: &E,
    flags: HmmAlignmentFlags,
) -> Result<Vec<TracebackStep>> {
    let output = profile_hmm_viterbi(sequence, data, model, flags)?;
    Ok(profile_hmm_backtrace(&output, data))
}

///
/// The best alignment of the events of `data` to the k-mers of `sequence`.
///
/// Empty if no alignment is possible.
///
pub fn profile_hmm_align<S: KmerSequence, E: EmissionModel>(
    sequence: &S,
    data: &HmmInputData,
    model: &E,
    flags: HmmAlignmentFlags,
) -> Result<Vec<HmmAlignmentState>> {
    let steps = profile_hmm_traceback(sequence, data, model, flags)?;
    Ok(steps.iter().map(|s| s.to_alignment_state()).collect())
}
