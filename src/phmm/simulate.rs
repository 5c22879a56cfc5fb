//!
//! Simulation of nanopore events by walking the profile HMM
//!
use super::params::TransitionParameters;
use super::state::ProfileState;
use crate::emission::{EmissionModel, GaussianPoreModel};
use crate::error::{PhmmError, Result};
use crate::events::{Event, ScalingParameters, SquiggleRead};
use crate::seq::KmerSequence;
use rand::prelude::*;

/// Range of the current level of events emitted from BadEvent
const BAD_EVENT_LEVEL: std::ops::Range<f64> = 40.0..140.0;

/// Range of the duration of an event in seconds
const EVENT_DURATION: std::ops::Range<f64> = 0.002..0.02;

///
/// States visited while simulating, with the k-mer index of each state.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct History(Vec<(ProfileState, usize)>);

impl History {
    pub fn new() -> Self {
        History(Vec::new())
    }
    pub fn push(&mut self, state: ProfileState, kmer_idx: usize) {
        self.0.push((state, kmer_idx));
    }
    pub fn states(&self) -> &[(ProfileState, usize)] {
        &self.0
    }
    /// number of events emitted (Match and BadEvent visits)
    pub fn n_events(&self) -> usize {
        self.0.iter().filter(|(s, _)| s.is_emittable()).count()
    }
    pub fn n_visits(&self, state: ProfileState) -> usize {
        self.0.iter().filter(|(s, _)| *s == state).count()
    }
}

///
/// pick randomly from the choices with its own probability.
///
pub fn pick_with_prob<R: Rng, T: Copy>(rng: &mut R, choices: &[(T, f64)]) -> Result<T> {
    choices
        .choose_weighted(rng, |item| item.1)
        .map(|item| item.0)
        .map_err(|e| PhmmError::InvalidParameter(format!("cannot pick transition: {}", e)))
}

///
/// Next (state, k-mer) from the current one, according to the transition
/// parameters. A k-mer index equal to the number of k-mers ends the walk.
///
fn next_state<R: Rng>(
    rng: &mut R,
    state: ProfileState,
    kmer_idx: usize,
    params: &TransitionParameters,
) -> Result<(ProfileState, usize)> {
    let p_b_out = (1.0 - params.p_bad_self) / 3.0;
    let i = kmer_idx;
    match state {
        ProfileState::Match => pick_with_prob(
            rng,
            &[
                ((ProfileState::Match, i), params.p_stay),
                ((ProfileState::BadEvent, i), params.p_bad),
                ((ProfileState::KmerSkip, i + 1), params.p_skip),
                ((ProfileState::Match, i + 1), params.p_mm_next()),
            ],
        ),
        ProfileState::BadEvent => pick_with_prob(
            rng,
            &[
                ((ProfileState::BadEvent, i), params.p_bad_self),
                ((ProfileState::KmerSkip, i + 1), p_b_out),
                ((ProfileState::Match, i + 1), p_b_out),
                ((ProfileState::Match, i), p_b_out),
            ],
        ),
        ProfileState::KmerSkip => pick_with_prob(
            rng,
            &[
                ((ProfileState::KmerSkip, i + 1), params.p_skip_self),
                ((ProfileState::Match, i + 1), 1.0 - params.p_skip_self),
            ],
        ),
        ProfileState::PreSoft => Ok((ProfileState::Match, 0)),
    }
}

///
/// Simulate the template events of a read sequenced from `sequence`.
///
/// The walk starts at Match of the first k-mer and ends when it leaves the
/// last k-mer. Match events are drawn around the model level of the k-mer
/// (uniform within one stdv), BadEvent events uniformly in a wide range.
///
pub fn simulate_read<R: Rng, S: KmerSequence>(
    rng: &mut R,
    read_name: &str,
    sequence: &S,
    model: &GaussianPoreModel,
    params: &TransitionParameters,
) -> Result<(SquiggleRead, History)> {
    params.validate()?;
    let k = model.k();
    let n_kmers = sequence.n_kmers(k);
    if n_kmers == 0 {
        return Err(PhmmError::Dimension(format!(
            "sequence of length {} has no {}-mer",
            sequence.len(),
            k
        )));
    }
    let scalings = ScalingParameters::default();

    let mut history = History::new();
    let mut events = Vec::new();
    let mut time = 0.0;
    let (mut state, mut kmer_idx) = (ProfileState::Match, 0);

    while kmer_idx < n_kmers {
        history.push(state, kmer_idx);
        let level = match state {
            ProfileState::Match => {
                let kmer = sequence.kmer(kmer_idx, k, false);
                let g = model
                    .level(kmer)
                    .ok_or_else(|| {
                        PhmmError::InvalidParameter(format!(
                            "k-mer {} has no level",
                            String::from_utf8_lossy(kmer)
                        ))
                    })?
                    .scaled(&scalings);
                Some((g.mean + rng.gen_range(-g.stdv..g.stdv), g.stdv))
            }
            ProfileState::BadEvent => Some((rng.gen_range(BAD_EVENT_LEVEL), 1.0)),
            _ => None,
        };
        if let Some((mean, stdv)) = level {
            let duration = rng.gen_range(EVENT_DURATION);
            events.push(Event::new(mean, stdv, time, duration));
            time += duration;
        }
        let (s, i) = next_state(rng, state, kmer_idx, params)?;
        state = s;
        kmer_idx = i;
    }

    let mut read = SquiggleRead::from_template_events(read_name, events);
    read.parameters = [*params; 2];
    Ok((read, history))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Strand;
    use crate::seq::HmmInputSequence;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn strict_walk_emits_one_event_per_kmer() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        let model = GaussianPoreModel::random(3, 0).unwrap();
        let seq = HmmInputSequence::new(b"ACGTTGCAAC");
        let params = TransitionParameters::strict();
        let (read, history) = simulate_read(&mut rng, "r0", &seq, &model, &params).unwrap();
        assert_eq!(read.n_events(Strand::Template), 8);
        assert_eq!(history.n_events(), 8);
        assert_eq!(history.n_visits(ProfileState::Match), 8);
        for (i, (state, kmer_idx)) in history.states().iter().enumerate() {
            assert_eq!(*state, ProfileState::Match);
            assert_eq!(*kmer_idx, i);
            let g = model.level(seq.kmer(i, 3, false)).unwrap();
            let mean = read.events(Strand::Template)[i].mean;
            assert!((mean - g.mean).abs() <= g.stdv);
        }
    }
    #[test]
    fn default_walk_is_monotone() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let model = GaussianPoreModel::random(3, 1).unwrap();
        let seq = HmmInputSequence::new(&crate::random_seq::generate(200, 5));
        let params = TransitionParameters::default();
        let (read, history) = simulate_read(&mut rng, "r1", &seq, &model, &params).unwrap();
        assert_eq!(read.n_events(Strand::Template), history.n_events());
        assert!(history.n_events() >= history.n_visits(ProfileState::Match));
        let kmers: Vec<usize> = history.states().iter().map(|(_, i)| *i).collect();
        assert!(kmers.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*kmers.last().unwrap(), seq.n_kmers(3) - 1);
        let times: Vec<f64> = read.events(Strand::Template).iter().map(|e| e.start_time).collect();
        assert!(times.windows(2).all(|w| w[0] < w[1]));
    }
    #[test]
    fn invalid_parameters() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        let model = GaussianPoreModel::random(3, 0).unwrap();
        let seq = HmmInputSequence::new(b"ACGTTGCAAC");
        let params = TransitionParameters::new(0.9, 0.5, 0.0, 0.0, 0.0);
        assert!(simulate_read(&mut rng, "r", &seq, &model, &params).is_err());
        let short = HmmInputSequence::new(b"AC");
        assert!(simulate_read(&mut rng, "r", &short, &model, &TransitionParameters::default()).is_err());
    }
}
