//!
//! globally-available parts
//!
pub use crate::common::Strand;
pub use crate::emission::{EmissionModel, GaussianPoreModel};
pub use crate::error::{PhmmError, Result};
pub use crate::events::{Event, HmmInputData, SquiggleRead};
pub use crate::phmm::align::{profile_hmm_align, HmmAlignmentState};
pub use crate::phmm::forward::{profile_hmm_score, profile_hmm_score_set};
pub use crate::phmm::params::TransitionParameters;
pub use crate::phmm::state::{HmmAlignmentFlags, HAF_ALLOW_POST_CLIP, HAF_ALLOW_PRE_CLIP};
pub use crate::phmm::training::{profile_hmm_update_training, TrainingStats};
pub use crate::prob::Prob;
pub use crate::seq::{HmmInputSequence, KmerSequence};
