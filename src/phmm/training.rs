//!
//! Training statistics collected from Viterbi alignments
//!
use super::align::{profile_hmm_traceback, TracebackStep};
use super::state::{HmmAlignmentFlags, MovementType, ProfileState, N_MOVEMENTS, N_STATES};
use crate::emission::EmissionModel;
use crate::error::Result;
use crate::events::HmmInputData;
use crate::seq::KmerSequence;
use derive_new::new;
use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Steps at each end of an alignment excluded from transition statistics
pub const TRAINING_EDGE_TRIM: usize = 5;

///
/// A k-mer to k-mer step of an alignment.
///
/// For a KmerSkip step `to_kmer` is the k-mer right after `from_kmer`.
///
#[derive(new, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KmerTransitionObservation {
    pub from_kmer: Vec<u8>,
    pub to_kmer: Vec<u8>,
    /// `M` or `K`
    pub state: char,
}

///
/// Receiver of the observations of an alignment
///
pub trait TrainingAccumulator {
    fn add_movement(&mut self, movement: MovementType);
    fn add_state(&mut self, state: ProfileState);
    fn add_state_transition(&mut self, from: ProfileState, to: ProfileState);
    fn add_kmer_transition(&mut self, observation: KmerTransitionObservation);
}

///
/// Counts of the observations of one or more alignments
///
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingStats {
    /// count of each movement, indexed by `MovementType::index`
    pub movements: [usize; N_MOVEMENTS],
    /// `state_transitions[from][to]`, indexed by `ProfileState::index`
    pub state_transitions: [[usize; N_STATES]; N_STATES],
    pub n_matches: usize,
    pub n_bad: usize,
    pub n_skipped: usize,
    pub kmer_transitions: Vec<KmerTransitionObservation>,
}

impl TrainingStats {
    pub fn n_movement(&self, movement: MovementType) -> usize {
        self.movements[movement.index()]
    }
    pub fn n_state_transition(&self, from: ProfileState, to: ProfileState) -> usize {
        self.state_transitions[from.index()][to.index()]
    }
    /// number of steps seen
    pub fn n_steps(&self) -> usize {
        self.movements.iter().sum()
    }
    ///
    /// Add the counts of `other`. Observations of `other` are appended.
    ///
    pub fn merge(&mut self, other: TrainingStats) {
        for (a, b) in self.movements.iter_mut().zip(other.movements.iter()) {
            *a += b;
        }
        for (ra, rb) in self
            .state_transitions
            .iter_mut()
            .zip(other.state_transitions.iter())
        {
            for (a, b) in ra.iter_mut().zip(rb.iter()) {
                *a += b;
            }
        }
        self.n_matches += other.n_matches;
        self.n_bad += other.n_bad;
        self.n_skipped += other.n_skipped;
        self.kmer_transitions.extend(other.kmer_transitions);
    }
}

impl TrainingAccumulator for TrainingStats {
    fn add_movement(&mut self, movement: MovementType) {
        self.movements[movement.index()] += 1;
    }
    fn add_state(&mut self, state: ProfileState) {
        match state {
            ProfileState::Match => self.n_matches += 1,
            ProfileState::BadEvent => self.n_bad += 1,
            ProfileState::KmerSkip => self.n_skipped += 1,
            ProfileState::PreSoft => {}
        }
    }
    fn add_state_transition(&mut self, from: ProfileState, to: ProfileState) {
        self.state_transitions[from.index()][to.index()] += 1;
    }
    fn add_kmer_transition(&mut self, observation: KmerTransitionObservation) {
        self.kmer_transitions.push(observation);
    }
}

///
/// Feed the steps of an alignment into the accumulator.
///
/// Every step contributes its movement and state. State and k-mer
/// transitions are recorded only away from the ends of the alignment.
///
pub fn accumulate_steps<S, A>(sequence: &S, steps: &[TracebackStep], k: usize, rc: bool, acc: &mut A)
where
    S: KmerSequence,
    A: TrainingAccumulator,
{
    let n = steps.len();
    let mut prev_state = ProfileState::Match;
    for (pi, step) in steps.iter().enumerate() {
        acc.add_movement(step.movement);
        if pi > TRAINING_EDGE_TRIM && pi + TRAINING_EDGE_TRIM < n {
            if step.state != ProfileState::BadEvent {
                let from = steps[pi - 1].kmer_idx;
                let to = if step.state == ProfileState::KmerSkip {
                    from + 1
                } else {
                    step.kmer_idx
                };
                acc.add_kmer_transition(KmerTransitionObservation::new(
                    sequence.kmer(from, k, rc).to_vec(),
                    sequence.kmer(to, k, rc).to_vec(),
                    step.state.to_char(),
                ));
            }
            acc.add_state_transition(prev_state, step.state);
            prev_state = step.state;
        }
        acc.add_state(step.state);
    }
}

///
/// Align `data` to `sequence` by Viterbi and add the observations of the
/// alignment to `acc`.
///
pub fn profile_hmm_update_training<S, E, A>(
    sequence: &S,
    data: &HmmInputData,
    model: &E,
    flags: HmmAlignmentFlags,
    acc: &mut A,
) -> Result<()>
where
    S: KmerSequence,
    E: EmissionModel,
    A: TrainingAccumulator,
{
    let steps = profile_hmm_traceback(sequence, data, model, flags)?;
    accumulate_steps(sequence, &steps, model.k(), data.rc, acc);
    Ok(())
}

///
/// Training statistics of many reads against the same sequence.
///
/// Reads are aligned in parallel and merged in the order of `data`.
///
pub fn collect_training<S, E>(
    sequence: &S,
    data: &[HmmInputData],
    model: &E,
    flags: HmmAlignmentFlags,
) -> Result<TrainingStats>
where
    S: KmerSequence + Sync,
    E: EmissionModel,
{
    let per_read = data
        .par_iter()
        .map(|d| {
            let mut stats = TrainingStats::default();
            profile_hmm_update_training(sequence, d, model, flags, &mut stats)?;
            Ok(stats)
        })
        .collect::<Result<Vec<TrainingStats>>>()?;
    let stats = per_read
        .into_iter()
        .fold(TrainingStats::default(), |mut acc, s| {
            acc.merge(s);
            acc
        });
    info!(
        "training over {} reads: {} steps M={} B={} K={}",
        data.len(),
        stats.n_steps(),
        stats.n_matches,
        stats.n_bad,
        stats.n_skipped
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prob::Prob;
    use crate::seq::HmmInputSequence;

    fn step(kmer_idx: usize, state: ProfileState, movement: MovementType) -> TracebackStep {
        TracebackStep {
            row: 0,
            event_idx: 0,
            kmer_idx,
            state,
            movement,
            l_fm: Prob::one(),
        }
    }

    #[test]
    fn accumulate_trims_edges() {
        use MovementType::*;
        use ProfileState::*;
        let seq = HmmInputSequence::new(b"ACGTACGTACGTAC");
        // 14 steps, transitions are recorded at pi = 6, 7, 8
        let mut steps = vec![step(0, Match, FromSoft)];
        for i in 1..=5 {
            steps.push(step(i, Match, FromPrevM));
        }
        steps.push(step(6, KmerSkip, FromPrevM)); // 6
        steps.push(step(7, Match, FromPrevK)); // 7
        steps.push(step(7, BadEvent, FromSameM)); // 8
        for i in 8..=12 {
            steps.push(step(i, Match, FromPrevB));
        }
        assert_eq!(steps.len(), 14);

        let mut stats = TrainingStats::default();
        accumulate_steps(&seq, &steps, 1, false, &mut stats);
        assert_eq!(stats.n_steps(), 14);
        assert_eq!(stats.n_matches, 12);
        assert_eq!(stats.n_skipped, 1);
        assert_eq!(stats.n_bad, 1);
        assert_eq!(stats.n_movement(FromSoft), 1);
        assert_eq!(stats.n_movement(FromPrevB), 5);

        assert_eq!(stats.n_state_transition(Match, KmerSkip), 1);
        assert_eq!(stats.n_state_transition(KmerSkip, Match), 1);
        assert_eq!(stats.n_state_transition(Match, BadEvent), 1);
        let total: usize = stats.state_transitions.iter().flatten().sum();
        assert_eq!(total, 3);

        // skip: from kmer 5 to kmer 6, match: from kmer 6 to kmer 7
        assert_eq!(
            stats.kmer_transitions,
            vec![
                KmerTransitionObservation::new(b"C".to_vec(), b"G".to_vec(), 'K'),
                KmerTransitionObservation::new(b"G".to_vec(), b"T".to_vec(), 'M'),
            ]
        );
    }
    #[test]
    fn merge_adds_counts() {
        let mut a = TrainingStats::default();
        a.add_movement(MovementType::FromSameM);
        a.add_state(ProfileState::Match);
        a.add_state_transition(ProfileState::Match, ProfileState::Match);
        let mut b = a.clone();
        b.add_kmer_transition(KmerTransitionObservation::new(
            b"A".to_vec(),
            b"C".to_vec(),
            'M',
        ));
        a.merge(b);
        assert_eq!(a.n_movement(MovementType::FromSameM), 2);
        assert_eq!(a.n_matches, 2);
        assert_eq!(
            a.n_state_transition(ProfileState::Match, ProfileState::Match),
            2
        );
        assert_eq!(a.kmer_transitions.len(), 1);
    }
}
