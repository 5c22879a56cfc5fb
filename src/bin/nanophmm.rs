use clap::{Parser, Subcommand};
use log::info;
use nanophmm::{
    common::Strand,
    emission::EmissionModel,
    events::HmmInputData,
    mocks::mock_reads,
    phmm::{
        align::profile_hmm_align,
        forward::{profile_hmm_score, profile_hmm_score_set},
        output::{print_alignment, AlignmentSummary},
        training::collect_training,
        HmmAlignmentFlags, TransitionParameters, HAF_ALLOW_POST_CLIP, HAF_ALLOW_PRE_CLIP,
    },
    prob::Prob,
    seq::KmerSequence,
};
use serde::Serialize;

#[derive(Parser, Debug)]
#[clap(author, about, version)]
struct Opts {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Simulate reads from a random sequence and align them back
    Simulate {
        /// Length of the random sequence
        #[clap(short = 'l', default_value_t = 200)]
        length: usize,
        /// k of the pore model
        #[clap(short = 'k', default_value_t = 5)]
        k: usize,
        /// Number of simulated reads
        #[clap(short = 'n', default_value_t = 4)]
        n_reads: usize,
        /// Seed of the random generators
        #[clap(short = 's', default_value_t = 0)]
        seed: u64,
        /// Probability of staying in the same k-mer
        #[clap(long, default_value_t = 0.4)]
        p_stay: f64,
        /// Probability of skipping a k-mer
        #[clap(long, default_value_t = 0.0025)]
        p_skip: f64,
        /// Probability of skipping again after a skip
        #[clap(long, default_value_t = 0.3)]
        p_skip_self: f64,
        /// Probability of a bad event
        #[clap(long, default_value_t = 0.001)]
        p_bad: f64,
        /// Probability of another bad event after a bad event
        #[clap(long, default_value_t = 0.001)]
        p_bad_self: f64,
        /// Allow events before the aligned region
        #[clap(long)]
        pre_clip: bool,
        /// Allow events after the aligned region
        #[clap(long)]
        post_clip: bool,
        /// Write the alignment of the first read to stderr
        #[clap(long)]
        print_alignment: bool,
        /// Output JSON of the simulated reads
        #[clap(short = 'o', long)]
        read_output: Option<std::path::PathBuf>,
    },
}

#[derive(Serialize, Debug)]
struct ReadReport {
    read_name: String,
    n_events: usize,
    score: Prob,
    alignment: AlignmentSummary,
}

#[derive(Serialize, Debug)]
struct SimulateReport {
    params: TransitionParameters,
    flags: HmmAlignmentFlags,
    n_kmers: usize,
    total_score: Prob,
    reads: Vec<ReadReport>,
    training: nanophmm::phmm::training::TrainingStats,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let opts: Opts = Opts::parse();
    println!("# started_at={}", chrono::Local::now());
    println!("# n_threads={}", rayon::current_num_threads());
    println!("# opts={:?}", opts);
    match &opts.command {
        Commands::Simulate {
            length,
            k,
            n_reads,
            seed,
            p_stay,
            p_skip,
            p_skip_self,
            p_bad,
            p_bad_self,
            pre_clip,
            post_clip,
            print_alignment: show_alignment,
            read_output,
        } => {
            let params = TransitionParameters::new(*p_stay, *p_skip, *p_skip_self, *p_bad, *p_bad_self);
            params.validate()?;
            let mut flags = HmmAlignmentFlags::none();
            if *pre_clip {
                flags = flags | HAF_ALLOW_PRE_CLIP;
            }
            if *post_clip {
                flags = flags | HAF_ALLOW_POST_CLIP;
            }

            let (sequence, model, reads) = mock_reads(*length, *k, *n_reads, *seed, params)?;
            info!("simulated {} reads from {}bp", reads.len(), sequence.len());
            if let Some(path) = read_output {
                let file = std::fs::File::create(path)?;
                serde_json::to_writer(std::io::BufWriter::new(file), &reads)?;
            }

            let data = reads
                .iter()
                .map(|read| HmmInputData::all_events(read, Strand::Template, false))
                .collect::<Result<Vec<_>, _>>()?;

            let mut read_reports = Vec::new();
            for (i, d) in data.iter().enumerate() {
                let score = profile_hmm_score(&sequence, d, &model, flags)?;
                let alignment = profile_hmm_align(&sequence, d, &model, flags)?;
                let summary = if i == 0 && *show_alignment {
                    print_alignment("simulated", 0, i, &sequence, model.k(), d, &alignment)?
                } else {
                    AlignmentSummary::from_alignment(d, &alignment)
                };
                read_reports.push(ReadReport {
                    read_name: d.read.read_name.clone(),
                    n_events: d.n_events(),
                    score,
                    alignment: summary,
                });
            }

            let total_score = profile_hmm_score_set(&sequence, &data, &model, flags)?;
            let training = collect_training(&sequence, &data, &model, flags)?;
            let report = SimulateReport {
                params,
                flags,
                n_kmers: sequence.n_kmers(model.k()),
                total_score,
                reads: read_reports,
                training,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    println!("# finished_at={}", chrono::Local::now());
    Ok(())
}
