use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nanophmm::common::Strand;
use nanophmm::events::HmmInputData;
use nanophmm::mocks::{mock_dataset, mock_reads};
use nanophmm::phmm::align::profile_hmm_align;
use nanophmm::phmm::forward::{profile_hmm_score, profile_hmm_score_set};
use nanophmm::phmm::{HmmAlignmentFlags, TransitionParameters, HAF_ALLOW_POST_CLIP, HAF_ALLOW_PRE_CLIP};

fn criterion_benchmark(c: &mut Criterion) {
    let d = mock_dataset(200, 5, 0, TransitionParameters::default()).unwrap();
    let data = HmmInputData::all_events(&d.read, Strand::Template, false).unwrap();
    let flags = HAF_ALLOW_PRE_CLIP | HAF_ALLOW_POST_CLIP;

    c.bench_function("score 200bp", |b| {
        b.iter(|| profile_hmm_score(&d.sequence, black_box(&data), &d.model, flags).unwrap())
    });
    c.bench_function("align 200bp", |b| {
        b.iter(|| {
            profile_hmm_align(&d.sequence, black_box(&data), &d.model, HmmAlignmentFlags::none())
                .unwrap()
        })
    });

    let (sequence, model, reads) = mock_reads(200, 5, 16, 1, TransitionParameters::default()).unwrap();
    let data: Vec<HmmInputData> = reads
        .iter()
        .map(|r| HmmInputData::all_events(r, Strand::Template, false).unwrap())
        .collect();
    c.bench_function("score_set 16 reads", |b| {
        b.iter(|| profile_hmm_score_set(&sequence, black_box(&data), &model, flags).unwrap())
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
