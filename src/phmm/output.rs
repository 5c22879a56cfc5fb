//!
//! Text report of an alignment
//!
//! ```text
//! DEBUG   name  read_id  rc  strand  state  event_idx  kmer_idx  kmer  duration  level  l_fm
//! ...
//! SUMMARY seq_id  read_id  strand  lp  mean_lp  num_events  n_matches  n_skips  n_bad  total_duration
//! SUMMARY ...
//! ```
//!
use super::align::HmmAlignmentState;
use crate::common::sequence_to_string;
use crate::error::Result;
use crate::events::HmmInputData;
use crate::seq::KmerSequence;
use serde::{Deserialize, Serialize};
use std::io::Write;

///
/// Aggregates of an alignment
///
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignmentSummary {
    /// score of the whole alignment (`l_fm` of the last step)
    pub lp: f64,
    /// `lp / num_events`
    pub mean_lp: f64,
    /// number of events consumed (Match or BadEvent steps)
    pub num_events: usize,
    pub n_matches: usize,
    pub n_skips: usize,
    pub n_bad: usize,
    /// duration of the consumed events in seconds
    pub total_duration: f64,
}

impl AlignmentSummary {
    pub fn from_alignment(data: &HmmInputData, alignment: &[HmmAlignmentState]) -> Self {
        let mut s = AlignmentSummary::default();
        for a in alignment {
            match a.state {
                'M' => s.n_matches += 1,
                'B' => s.n_bad += 1,
                'K' => s.n_skips += 1,
                _ => {}
            }
            if a.state != 'K' {
                s.total_duration += data.read.duration(a.event_idx, data.strand);
            }
        }
        s.num_events = s.n_matches + s.n_bad;
        s.lp = alignment
            .last()
            .map(|a| a.l_fm.to_log_value())
            .unwrap_or(f64::NEG_INFINITY);
        s.mean_lp = if s.num_events > 0 {
            s.lp / s.num_events as f64
        } else {
            f64::NEG_INFINITY
        };
        s
    }
}

///
/// Write the steps of the alignment and its summary
///
#[allow(clippy::too_many_arguments)]
pub fn write_alignment<W: Write, S: KmerSequence>(
    writer: &mut W,
    name: &str,
    seq_id: usize,
    read_id: usize,
    sequence: &S,
    k: usize,
    data: &HmmInputData,
    alignment: &[HmmAlignmentState],
) -> Result<AlignmentSummary> {
    let strand = data.strand.symbol();
    for a in alignment {
        let kmer = sequence.kmer(a.kmer_idx, k, data.rc);
        writeln!(
            writer,
            "DEBUG\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{:.4}\t{:.2}\t{:.2}",
            name,
            read_id,
            data.rc as u8,
            strand,
            a.state,
            a.event_idx,
            a.kmer_idx,
            sequence_to_string(kmer),
            data.read.duration(a.event_idx, data.strand),
            data.read.drift_corrected_level(a.event_idx, data.strand),
            a.l_fm.to_log_value(),
        )?;
    }

    let summary = AlignmentSummary::from_alignment(data, alignment);
    writeln!(
        writer,
        "SUMMARY\tseq_id\tread_id\tstrand\tlp\tmean_lp\tnum_events\tn_matches\tn_skips\tn_bad\ttotal_duration"
    )?;
    writeln!(
        writer,
        "SUMMARY\t{}\t{}\t{}\t{:.2}\t{:.2}\t{}\t{}\t{}\t{}\t{:.2}",
        seq_id,
        read_id,
        strand,
        summary.lp,
        summary.mean_lp,
        summary.num_events,
        summary.n_matches,
        summary.n_skips,
        summary.n_bad,
        summary.total_duration,
    )?;
    Ok(summary)
}

///
/// `write_alignment` to stderr
///
#[allow(clippy::too_many_arguments)]
pub fn print_alignment<S: KmerSequence>(
    name: &str,
    seq_id: usize,
    read_id: usize,
    sequence: &S,
    k: usize,
    data: &HmmInputData,
    alignment: &[HmmAlignmentState],
) -> Result<AlignmentSummary> {
    let stderr = std::io::stderr();
    let mut handle = stderr.lock();
    write_alignment(
        &mut handle,
        name,
        seq_id,
        read_id,
        sequence,
        k,
        data,
        alignment,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Strand;
    use crate::events::{Event, SquiggleRead};
    use crate::prob::Prob;
    use crate::seq::HmmInputSequence;

    #[test]
    fn report_rows_and_summary() {
        let read = SquiggleRead::from_template_events(
            "read0",
            vec![
                Event::new(80.0, 1.0, 0.0, 0.5),
                Event::new(90.0, 1.0, 0.5, 0.25),
            ],
        );
        let data = HmmInputData::all_events(&read, Strand::Template, false).unwrap();
        let seq = HmmInputSequence::new(b"ACGT");
        let alignment = vec![
            HmmAlignmentState {
                event_idx: 0,
                kmer_idx: 0,
                l_fm: Prob::from_log_prob(-1.0),
                state: 'M',
            },
            HmmAlignmentState {
                event_idx: 1,
                kmer_idx: 1,
                l_fm: Prob::from_log_prob(-1.5),
                state: 'K',
            },
            HmmAlignmentState {
                event_idx: 1,
                kmer_idx: 2,
                l_fm: Prob::from_log_prob(-3.0),
                state: 'M',
            },
        ];
        let mut buf: Vec<u8> = Vec::new();
        let s = write_alignment(&mut buf, "contig", 0, 7, &seq, 2, &data, &alignment).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("DEBUG\tcontig\t7\t0\tt\tM\t0\t0\tAC\t"));
        assert!(lines[1].contains("\tK\t1\t1\tCG\t"));
        assert!(lines[3].starts_with("SUMMARY\tseq_id"));
        assert_eq!(s.num_events, 2);
        assert_eq!(s.n_matches, 2);
        assert_eq!(s.n_skips, 1);
        assert_eq!(s.n_bad, 0);
        assert_abs_diff_eq!(s.lp, -3.0);
        assert_abs_diff_eq!(s.mean_lp, -1.5);
        assert_abs_diff_eq!(s.total_duration, 0.75);
        assert_eq!(lines[4], "SUMMARY\t0\t7\tt\t-3.00\t-1.50\t2\t2\t1\t0\t0.75");
    }
}
