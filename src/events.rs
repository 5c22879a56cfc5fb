//!
//! Nanopore read events and per-read input of the HMM
//!
use crate::common::Strand;
use crate::error::{PhmmError, Result};
use crate::phmm::params::TransitionParameters;
use derive_new::new;
use serde::{Deserialize, Serialize};

///
/// One segmented measurement of the pore current.
///
#[derive(new, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// mean current level (pA)
    pub mean: f64,
    /// standard deviation of the current in the event
    pub stdv: f64,
    /// start time in seconds
    pub start_time: f64,
    /// duration in seconds
    pub duration: f64,
}

///
/// Per-strand scaling of the pore model onto the read.
///
/// `level = mean * scale + shift + drift * (t - t0)`,
/// `stdv = stdv * var`
///
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScalingParameters {
    pub shift: f64,
    pub scale: f64,
    pub drift: f64,
    pub var: f64,
}

impl Default for ScalingParameters {
    fn default() -> Self {
        ScalingParameters {
            shift: 0.0,
            scale: 1.0,
            drift: 0.0,
            var: 1.0,
        }
    }
}

///
/// Events of a nanopore read, for each strand.
///
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SquiggleRead {
    pub read_name: String,
    /// events[strand.index()]
    pub events: [Vec<Event>; 2],
    /// scalings[strand.index()]
    pub scalings: [ScalingParameters; 2],
    /// transition parameters of the HMM, trained per strand
    pub parameters: [TransitionParameters; 2],
}

impl SquiggleRead {
    ///
    /// Read with template events only
    ///
    pub fn from_template_events(read_name: &str, events: Vec<Event>) -> Self {
        SquiggleRead {
            read_name: read_name.to_string(),
            events: [events, Vec::new()],
            scalings: [ScalingParameters::default(); 2],
            parameters: [TransitionParameters::default(); 2],
        }
    }
    pub fn events(&self, strand: Strand) -> &[Event] {
        &self.events[strand.index()]
    }
    pub fn n_events(&self, strand: Strand) -> usize {
        self.events[strand.index()].len()
    }
    ///
    /// Event level with the linear drift of the strand removed.
    ///
    pub fn drift_corrected_level(&self, event_idx: usize, strand: Strand) -> f64 {
        let events = self.events(strand);
        let drift = self.scalings[strand.index()].drift;
        let t = events[event_idx].start_time - events[0].start_time;
        events[event_idx].mean - drift * t
    }
    pub fn duration(&self, event_idx: usize, strand: Strand) -> f64 {
        self.events(strand)[event_idx].duration
    }
}

///
/// A range of events of one strand of a read, given to the HMM.
///
/// The range can be traversed backwards (`event_stride == -1`) when
/// `event_stop_idx < event_start_idx`.
///
#[derive(Clone, Copy, Debug)]
pub struct HmmInputData<'a> {
    pub read: &'a SquiggleRead,
    pub strand: Strand,
    pub event_start_idx: usize,
    pub event_stop_idx: usize,
    pub event_stride: isize,
    /// the read comes from the reverse complement of the sequence
    pub rc: bool,
}

impl<'a> HmmInputData<'a> {
    ///
    /// Constructor with the stride derived from the direction of the range
    ///
    pub fn new(
        read: &'a SquiggleRead,
        strand: Strand,
        event_start_idx: usize,
        event_stop_idx: usize,
        rc: bool,
    ) -> Self {
        let event_stride = if event_stop_idx >= event_start_idx {
            1
        } else {
            -1
        };
        HmmInputData {
            read,
            strand,
            event_start_idx,
            event_stop_idx,
            event_stride,
            rc,
        }
    }
    ///
    /// All events of the strand in forward order
    ///
    pub fn all_events(read: &'a SquiggleRead, strand: Strand, rc: bool) -> Result<Self> {
        let n = read.n_events(strand);
        if n == 0 {
            return Err(PhmmError::Dimension(format!(
                "read {} has no events on strand {}",
                read.read_name, strand
            )));
        }
        Ok(HmmInputData::new(read, strand, 0, n - 1, rc))
    }
    ///
    /// Number of events in the range (inclusive on both ends)
    ///
    pub fn n_events(&self) -> usize {
        if self.event_stop_idx >= self.event_start_idx {
            self.event_stop_idx - self.event_start_idx + 1
        } else {
            self.event_start_idx - self.event_stop_idx + 1
        }
    }
    ///
    /// Index of the event consumed at `row` of the DP grid (`row >= 1`)
    ///
    pub fn event_idx(&self, row: usize) -> usize {
        debug_assert!(row >= 1);
        (self.event_start_idx as isize + (row as isize - 1) * self.event_stride) as usize
    }
    pub fn parameters(&self) -> &TransitionParameters {
        &self.read.parameters[self.strand.index()]
    }
    pub fn scalings(&self) -> &ScalingParameters {
        &self.read.scalings[self.strand.index()]
    }
    ///
    /// Check the event range against the events of the read
    ///
    pub fn validate(&self) -> Result<()> {
        let n = self.read.n_events(self.strand);
        if n == 0 {
            return Err(PhmmError::Dimension(format!(
                "read {} has no events on strand {}",
                self.read.read_name, self.strand
            )));
        }
        if self.event_start_idx >= n || self.event_stop_idx >= n {
            return Err(PhmmError::Dimension(format!(
                "event range {}..={} is out of {} events",
                self.event_start_idx, self.event_stop_idx, n
            )));
        }
        let expected = match self.event_stop_idx.cmp(&self.event_start_idx) {
            std::cmp::Ordering::Greater => Some(1),
            std::cmp::Ordering::Less => Some(-1),
            std::cmp::Ordering::Equal => None,
        };
        let ok = match expected {
            Some(stride) => self.event_stride == stride,
            None => self.event_stride == 1 || self.event_stride == -1,
        };
        if !ok {
            return Err(PhmmError::Dimension(format!(
                "event stride {} does not match range {}..={}",
                self.event_stride, self.event_start_idx, self.event_stop_idx
            )));
        }
        Ok(())
    }
}
