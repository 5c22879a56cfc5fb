//!
//! Common type aliases and constants shared by the whole crate
//!
use std::str::FromStr;

/// Type of DNA sequence
pub type Sequence = Vec<u8>;

/// Convert Sequence(Vec<u8>) into &str
/// useful in displaying
pub fn sequence_to_string(seq: &[u8]) -> &str {
    std::str::from_utf8(seq).unwrap_or("<non-utf8>")
}

///
/// Array of valid DNA bases
///
pub const VALID_BASES: [u8; 4] = [b'A', b'C', b'G', b'T'];

///
/// Complement of a base. Non ACGT bases are kept as it is.
///
pub fn complement(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'C' => b'G',
        b'G' => b'C',
        b'T' => b'A',
        b'a' => b't',
        b'c' => b'g',
        b'g' => b'c',
        b't' => b'a',
        other => other,
    }
}

///
/// Reverse complement of the sequence
///
pub fn reverse_complement(seq: &[u8]) -> Sequence {
    seq.iter().rev().map(|&b| complement(b)).collect()
}

///
/// Strand of a nanopore read.
///
/// A 2D read has a template strand and a complement strand,
/// and each strand has its own events and scalings.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Strand {
    Template,
    Complement,
}

impl Strand {
    /// index used for per-strand arrays
    pub fn index(self) -> usize {
        match self {
            Strand::Template => 0,
            Strand::Complement => 1,
        }
    }
    /// one-letter symbol (`t` or `c`)
    pub fn symbol(self) -> char {
        match self {
            Strand::Template => 't',
            Strand::Complement => 'c',
        }
    }
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

///
/// Error (unit type) in from_str of Strand
///
#[derive(Clone, Debug)]
pub struct StrandParseError;

impl FromStr for Strand {
    type Err = StrandParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "t" | "template" => Ok(Strand::Template),
            "c" | "complement" => Ok(Strand::Complement),
            _ => Err(StrandParseError),
        }
    }
}

//
// tests
//
