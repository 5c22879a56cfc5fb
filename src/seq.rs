//!
//! Sequence accessor used by the profile HMM
//!
//! The HMM never looks at bases directly. It asks for the k-mer at
//! a position, on the strand the read was sequenced from.
//!
use crate::common::{reverse_complement, sequence_to_string, Sequence};

///
/// Accessor of k-mers of a candidate sequence.
///
/// * `len(&self) -> usize`
///     Number of bases in the sequence.
///
/// * `kmer(&self, i, k, rc) -> &[u8]`
///     The `i`-th k-mer. If `rc` is set, the sequence is traversed as the
///     reverse complement so that `kmer(i, k, true)` is the reverse
///     complement of the k-mer at the mirrored position.
///
pub trait KmerSequence {
    fn len(&self) -> usize;
    fn kmer(&self, i: usize, k: usize, rc: bool) -> &[u8];
    ///
    /// The number of k-mers `len - k + 1`, or 0 if the sequence is shorter than k.
    ///
    fn n_kmers(&self, k: usize) -> usize {
        if k == 0 || self.len() < k {
            0
        } else {
            self.len() - k + 1
        }
    }
}

///
/// A candidate sequence together with its reverse complement
///
#[derive(Clone, Debug, PartialEq)]
pub struct HmmInputSequence {
    seq: Sequence,
    rc_seq: Sequence,
}

impl HmmInputSequence {
    pub fn new(seq: &[u8]) -> Self {
        HmmInputSequence {
            seq: seq.to_vec(),
            rc_seq: reverse_complement(seq),
        }
    }
    pub fn seq(&self) -> &[u8] {
        &self.seq
    }
    pub fn rc_seq(&self) -> &[u8] {
        &self.rc_seq
    }
}

impl KmerSequence for HmmInputSequence {
    fn len(&self) -> usize {
        self.seq.len()
    }
    fn kmer(&self, i: usize, k: usize, rc: bool) -> &[u8] {
        if rc {
            let start = self.rc_seq.len() - i - k;
            &self.rc_seq[start..start + k]
        } else {
            &self.seq[i..i + k]
        }
    }
}

impl std::fmt::Display for HmmInputSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", sequence_to_string(&self.seq))
    }
}
