//!
//! Mock reads and models for testing
//!
use crate::emission::{GaussianPoreModel, TableEmission};
use crate::error::Result;
use crate::events::{Event, SquiggleRead};
use crate::phmm::params::TransitionParameters;
use crate::phmm::simulate::{simulate_read, History};
use crate::random_seq;
use crate::seq::HmmInputSequence;
use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;

///
/// Read whose template events have the given levels, 10ms each
///
pub fn mock_read_from_levels(name: &str, levels: &[f64]) -> SquiggleRead {
    let events = levels
        .iter()
        .enumerate()
        .map(|(i, &level)| Event::new(level, 1.0, i as f64 * 0.01, 0.01))
        .collect();
    SquiggleRead::from_template_events(name, events)
}

///
/// Read of `n_events` events with the given transition parameters.
/// Levels are irrelevant, for use with `TableEmission`.
///
pub fn mock_read(n_events: usize, params: TransitionParameters) -> SquiggleRead {
    let mut read = mock_read_from_levels("mock", &vec![100.0; n_events]);
    read.parameters = [params; 2];
    read
}

///
/// Emissions that favor the diagonal: event `i` matches k-mer `i` with
/// `lp_hit` and any other k-mer with `lp_miss`.
///
pub fn mock_diagonal_emission(k: usize, n_events: usize, n_kmers: usize, lp_hit: f64, lp_miss: f64) -> TableEmission {
    let lp = (0..n_events)
        .map(|i| {
            (0..n_kmers)
                .map(|j| if i == j { lp_hit } else { lp_miss })
                .collect()
        })
        .collect();
    TableEmission::from_log_values(k, lp)
}

///
/// A simulated dataset
///
/// * random sequence of `length` bases
/// * random k-mer pore model
/// * a read simulated from the sequence with `params`
///
/// Fails if `k` is not a valid pore model size or the sequence is shorter than `k`.
///
pub struct MockDataset {
    pub sequence: HmmInputSequence,
    pub model: GaussianPoreModel,
    pub read: SquiggleRead,
    pub history: History,
}

pub fn mock_dataset(length: usize, k: usize, seed: u64, params: TransitionParameters) -> Result<MockDataset> {
    let sequence = HmmInputSequence::new(&random_seq::generate(length, seed));
    let model = GaussianPoreModel::random(k, seed + 1)?;
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed + 2);
    let (read, history) = simulate_read(&mut rng, &format!("read{}", seed), &sequence, &model, &params)?;
    Ok(MockDataset {
        sequence,
        model,
        read,
        history,
    })
}

///
/// Several reads simulated from the same sequence and pore model
///
pub fn mock_reads(
    length: usize,
    k: usize,
    n_reads: usize,
    seed: u64,
    params: TransitionParameters,
) -> Result<(HmmInputSequence, GaussianPoreModel, Vec<SquiggleRead>)> {
    let sequence = HmmInputSequence::new(&random_seq::generate(length, seed));
    let model = GaussianPoreModel::random(k, seed + 1)?;
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed + 2);
    let reads = (0..n_reads)
        .map(|i| {
            simulate_read(&mut rng, &format!("read{}", i), &sequence, &model, &params).map(|(read, _)| read)
        })
        .collect::<Result<Vec<_>>>()?;
    Ok((sequence, model, reads))
}
