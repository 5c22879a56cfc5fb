//!
//! Forward algorithm definitions
//!
//! `F[row, (block, state)]` = P(emits the first `row` events and is in
//! `state` of k-mer `block - 1`), summed over every path.
//!
use super::fill::{profile_hmm_fill_generic, FillInput, PHMMOutput, LP_END};
use super::state::{HmmAlignmentFlags, ProfileState, UpdateScores};
use super::table::{cell, ProfileTable};
use crate::emission::EmissionModel;
use crate::error::Result;
use crate::events::HmmInputData;
use crate::prob::Prob;
use crate::seq::KmerSequence;
use log::{debug, info};
use rayon::prelude::*;

///
/// Forward table with the summed end score
///
#[derive(Debug, Clone)]
pub struct ForwardOutput {
    pub table: ProfileTable<Prob>,
    end: Prob,
}

impl ForwardOutput {
    ///
    /// Allocate and initialize the table for `n_events` and `n_kmers`
    ///
    pub fn new(n_events: usize, n_kmers: usize, flags: HmmAlignmentFlags) -> Self {
        let mut output = ForwardOutput {
            table: ProfileTable::for_profile(n_events, n_kmers, Prob::zero()),
            end: Prob::zero(),
        };
        profile_hmm_forward_initialize(&mut output.table, flags);
        output
    }
}

impl PHMMOutput for ForwardOutput {
    fn n_rows(&self) -> usize {
        self.table.n_rows()
    }
    fn n_cols(&self) -> usize {
        self.table.n_cols()
    }
    fn get(&self, row: usize, col: usize) -> Prob {
        self.table.get(row, col)
    }
    fn update_cell(&mut self, row: usize, col: usize, scores: &UpdateScores, lp_emission: Prob) {
        let sum: Prob = scores.iter().map(|(_, p)| p).sum();
        self.table.set(row, col, sum * lp_emission);
    }
    fn update_end(&mut self, value: Prob, _row: usize, _col: usize) {
        self.end += value;
    }
    fn end(&self) -> Prob {
        self.end
    }
}

///
/// Set the boundary of the grid.
///
/// Every cell is impossible except the start Match at row 0. With
/// pre-clipping the start Match is certain on every row, so any number of
/// leading events may be skipped for free.
///
pub fn profile_hmm_forward_initialize(table: &mut ProfileTable<Prob>, flags: HmmAlignmentFlags) {
    let start_m = cell(0, ProfileState::Match);
    table.set(0, start_m, Prob::one());
    if flags.allow_pre_clip() {
        for row in 1..table.n_rows() {
            table.set(row, start_m, Prob::one());
        }
    }
}

///
/// Sum of the end transitions of the last k-mer block at `row`.
///
pub fn profile_hmm_forward_terminate(table: &ProfileTable<Prob>, row: usize) -> Prob {
    let lp_end = Prob::from_log_prob(LP_END);
    let last = table.n_kmers();
    [
        ProfileState::Match,
        ProfileState::BadEvent,
        ProfileState::KmerSkip,
    ]
    .iter()
    .map(|&state| lp_end * table.get(row, cell(last, state)))
    .sum()
}

///
/// Run the Forward algorithm and return the filled output.
///
pub fn profile_hmm_forward<S: KmerSequence, E: EmissionModel>(
    sequence: &S,
    data: &HmmInputData,
    model: &E,
    flags: HmmAlignmentFlags,
) -> Result<ForwardOutput> {
    let input = FillInput::prepare(sequence, data, model)?;
    let mut output = ForwardOutput::new(input.n_events, input.n_kmers, flags);
    profile_hmm_fill_generic(&input, flags, &mut output);
    Ok(output)
}

///
/// Log-likelihood of the events of `data` given `sequence`, summed over
/// every alignment.
///
/// `-inf` if no alignment is possible.
///
pub fn profile_hmm_score<S: KmerSequence, E: EmissionModel>(
    sequence: &S,
    data: &HmmInputData,
    model: &E,
    flags: HmmAlignmentFlags,
) -> Result<Prob> {
    let output = profile_hmm_forward(sequence, data, model, flags)?;
    debug!(
        "score read={} strand={} lp={}",
        data.read.read_name,
        data.strand,
        output.end().to_log_value()
    );
    Ok(output.end())
}

///
/// Product of the scores of the reads against the same sequence.
///
/// Reads are scored in parallel, and summed in the order of `data` so that
/// the result does not depend on scheduling.
///
pub fn profile_hmm_score_set<S, E>(
    sequence: &S,
    data: &[HmmInputData],
    model: &E,
    flags: HmmAlignmentFlags,
) -> Result<Prob>
where
    S: KmerSequence + Sync,
    E: EmissionModel,
{
    let scores: Vec<Prob> = data
        .par_iter()
        .map(|d| profile_hmm_score(sequence, d, model, flags))
        .collect::<Result<Vec<Prob>>>()?;
    let total: Prob = scores.iter().product();
    info!(
        "scored {} reads lp={}",
        scores.len(),
        total.to_log_value()
    );
    Ok(total)
}
