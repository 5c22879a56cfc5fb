//!
//! Generic fill of the profile HMM grid
//!
//! The recurrence is shared by Forward and Viterbi. They differ only in how
//! the candidate scores of a cell are combined, which is the job of the
//! `PHMMOutput` implementation.
//!
use super::state::{HmmAlignmentFlags, MovementType, ProfileState, UpdateScores};
use super::table::cell;
use super::trans_table::{calculate_transitions, BlockTransitions};
use crate::emission::{EmissionModel, EmissionTable};
use crate::error::{PhmmError, Result};
use crate::events::HmmInputData;
use crate::prob::Prob;
use crate::seq::KmerSequence;
use log::debug;

/// Transition from the boundary state into the first k-mer
pub const LP_START: f64 = 0.0;

/// Transition from the last k-mer into the end
pub const LP_END: f64 = 0.0;

///
/// Storage and combine rule of a DP over the profile grid.
///
/// * `get(row, col)`: score of a cell
/// * `update_cell(row, col, scores, lp_emission)`: combine the candidates
///   and multiply the emission of the cell
/// * `update_end(value, row, col)`: a candidate of the final score
/// * `end()`: the final score
///
pub trait PHMMOutput {
    fn n_rows(&self) -> usize;
    fn n_cols(&self) -> usize;
    fn get(&self, row: usize, col: usize) -> Prob;
    fn update_cell(&mut self, row: usize, col: usize, scores: &UpdateScores, lp_emission: Prob);
    fn update_end(&mut self, value: Prob, row: usize, col: usize);
    fn end(&self) -> Prob;
}

///
/// Everything the fill needs for a (sequence, read) pair
///
#[derive(Clone, Debug)]
pub struct FillInput {
    pub transitions: Vec<BlockTransitions>,
    pub emissions: EmissionTable,
    pub n_events: usize,
    pub n_kmers: usize,
}

impl FillInput {
    ///
    /// Validate the inputs, derive the transitions of the strand and
    /// evaluate the emissions of every cell.
    ///
    pub fn prepare<S: KmerSequence, E: EmissionModel>(
        sequence: &S,
        data: &HmmInputData,
        model: &E,
    ) -> Result<FillInput> {
        data.validate()?;
        let k = model.k();
        let n_kmers = sequence.n_kmers(k);
        if n_kmers == 0 {
            return Err(PhmmError::Dimension(format!(
                "sequence of length {} has no {}-mer",
                sequence.len(),
                k
            )));
        }
        let n_events = data.n_events();
        let transitions = calculate_transitions(n_kmers, data.parameters())?;
        let emissions = EmissionTable::build(sequence, data, model)?;
        debug!(
            "fill input read={} strand={} n_events={} n_kmers={}",
            data.read.read_name, data.strand, n_events, n_kmers
        );
        Ok(FillInput {
            transitions,
            emissions,
            n_events,
            n_kmers,
        })
    }
}

///
/// Fill the grid block by block (outer) and row by row (inner), then
/// terminate. The output must already be initialized.
///
/// Returns the final score.
///
pub fn profile_hmm_fill_generic<O: PHMMOutput>(
    input: &FillInput,
    flags: HmmAlignmentFlags,
    output: &mut O,
) -> Prob {
    let n_rows = output.n_rows();
    let lp_start = Prob::from_log_prob(LP_START);
    let start_m = cell(0, ProfileState::Match);

    for block in 1..=input.n_kmers {
        let kmer_idx = block - 1;
        let bt = &input.transitions[kmer_idx];
        let first = block == 1;
        let curr_m = cell(block, ProfileState::Match);
        let curr_b = cell(block, ProfileState::BadEvent);
        let curr_k = cell(block, ProfileState::KmerSkip);
        let prev_m = cell(block - 1, ProfileState::Match);
        let prev_b = cell(block - 1, ProfileState::BadEvent);
        let prev_k = cell(block - 1, ProfileState::KmerSkip);

        for row in 1..n_rows {
            // Match
            let mut scores = UpdateScores::impossible();
            scores[MovementType::FromSameM] = bt.lp_mm_self * output.get(row - 1, curr_m);
            scores[MovementType::FromSameB] = bt.lp_bm_self * output.get(row - 1, curr_b);
            if first {
                scores[MovementType::FromSoft] = lp_start * output.get(row - 1, start_m);
            } else {
                scores[MovementType::FromPrevM] = bt.lp_mm_next * output.get(row - 1, prev_m);
                scores[MovementType::FromPrevB] = bt.lp_bm_next * output.get(row - 1, prev_b);
                scores[MovementType::FromPrevK] = bt.lp_km * output.get(row - 1, prev_k);
            }
            output.update_cell(row, curr_m, &scores, input.emissions.lp_match(row, kmer_idx));

            // BadEvent
            let mut scores = UpdateScores::impossible();
            scores[MovementType::FromSameM] = bt.lp_mb * output.get(row - 1, curr_m);
            scores[MovementType::FromSameB] = bt.lp_bb * output.get(row - 1, curr_b);
            output.update_cell(row, curr_b, &scores, input.emissions.lp_bad(row));

            // KmerSkip (silent)
            let mut scores = UpdateScores::impossible();
            if !first {
                scores[MovementType::FromPrevM] = bt.lp_mk * output.get(row, prev_m);
                scores[MovementType::FromPrevB] = bt.lp_bk * output.get(row, prev_b);
                scores[MovementType::FromPrevK] = bt.lp_kk * output.get(row, prev_k);
            }
            output.update_cell(row, curr_k, &scores, Prob::one());
        }
    }

    profile_hmm_terminate(input.n_kmers, flags, output)
}

///
/// Offer the last k-mer block to the end state.
///
/// Only the last row is offered unless post-clipping is allowed, in which
/// case every row that consumed an event is.
///
pub fn profile_hmm_terminate<O: PHMMOutput>(
    n_kmers: usize,
    flags: HmmAlignmentFlags,
    output: &mut O,
) -> Prob {
    let lp_end = Prob::from_log_prob(LP_END);
    let last_row = output.n_rows() - 1;
    let first_row = if flags.allow_post_clip() { 1 } else { last_row };
    for row in first_row..=last_row {
        for &state in &[
            ProfileState::Match,
            ProfileState::BadEvent,
            ProfileState::KmerSkip,
        ] {
            let col = cell(n_kmers, state);
            let value = lp_end * output.get(row, col);
            output.update_end(value, row, col);
        }
    }
    output.end()
}
