//!
//! Profile hidden Markov model (PHMM) aligning nanopore events to a sequence
//!
//! * Infer
//!     `forward` scores a read against a sequence, `viterbi` and `align`
//!     find the best path of events through the k-mers
//! * Train
//!     `training` collects transition statistics from best paths
//! * Sample
//!     `simulate` emits events from the model
//!
//! # Model
//!
//! Each k-mer of the sequence has three states: Match (an event from the
//! k-mer), BadEvent (an event from no k-mer) and KmerSkip (no event from
//! the k-mer). A boundary state enters the first k-mer.
//!
//! ```text
//! M_i -> M_i, M_i+1, B_i, K_i+1
//! B_i -> B_i, M_i, M_i+1, K_i+1
//! K_i -> K_i+1, M_i+1
//! S   -> M_0
//! ```
//!
pub mod align;
pub mod fill;
pub mod forward;
pub mod output;
pub mod params;
pub mod simulate;
pub mod state;
pub mod table;
pub mod training;
pub mod trans_table;
pub mod viterbi;


// re-export
pub use params::TransitionParameters;
pub use state::{HmmAlignmentFlags, HAF_ALLOW_POST_CLIP, HAF_ALLOW_PRE_CLIP};
