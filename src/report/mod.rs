//! Output for the `align` command.
//!
//! - [`text`]: free-text stanza per alignment with an optional 60-column
//!   display of the aligned rows
//! - [`sam`]: SAM header and records
//! - [`AlignmentSummary`]: flat, 1-based record for JSON/TSV output

use std::borrow::Cow;

use serde::Serialize;

use crate::align::trace::{self, AlignmentTrace};
use crate::align::AlignmentResult;
use crate::core::sequence::SequenceRecord;

pub mod sam;
pub mod text;

/// Query orientation that produced an alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strand {
    Forward,
    Reverse,
}

impl Strand {
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Forward => '+',
            Self::Reverse => '-',
        }
    }
}

/// One query aligned against one target, with everything the formatters
/// need.
#[derive(Debug, Clone)]
pub struct AlignedPair<'a> {
    pub target: &'a SequenceRecord,
    pub query: &'a SequenceRecord,
    pub strand: Strand,
    /// Query bases in the orientation that was aligned
    pub query_bases: Cow<'a, [u8]>,
    pub result: AlignmentResult,
    pub trace: AlignmentTrace,
}

impl<'a> AlignedPair<'a> {
    pub fn new(
        target: &'a SequenceRecord,
        query: &'a SequenceRecord,
        strand: Strand,
        query_bases: Cow<'a, [u8]>,
        result: AlignmentResult,
    ) -> Self {
        let trace = trace::from_result(&query_bases, &target.sequence, &result);
        Self {
            target,
            query,
            strand,
            query_bases,
            result,
            trace,
        }
    }

    #[must_use]
    pub fn summary(&self) -> AlignmentSummary {
        AlignmentSummary {
            target: self.target.id.clone(),
            query: self.query.id.clone(),
            strand: self.strand,
            score: self.result.score,
            secondary_score: self.result.secondary_score,
            target_begin: self.result.ref_begin + 1,
            target_end: self.result.ref_end + 1,
            query_begin: self.result.query_begin + 1,
            query_end: self.result.query_end + 1,
            cigar: self.trace.cigar.clone(),
        }
    }
}

/// Machine-readable view of an [`AlignedPair`]. Coordinates are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlignmentSummary {
    pub target: String,
    pub query: String,
    pub strand: Strand,
    pub score: i32,
    pub secondary_score: i32,
    pub target_begin: usize,
    pub target_end: usize,
    pub query_begin: usize,
    pub query_end: usize,
    pub cigar: String,
}

impl AlignmentSummary {
    pub const TSV_HEADER: &'static str = "target\tquery\tstrand\tscore\tsecondary_score\ttarget_begin\ttarget_end\tquery_begin\tquery_end\tcigar";

    #[must_use]
    pub fn to_tsv(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.target,
            self.query,
            self.strand.symbol(),
            self.score,
            self.secondary_score,
            self.target_begin,
            self.target_end,
            self.query_begin,
            self.query_end,
            if self.cigar.is_empty() { "*" } else { &self.cigar }
        )
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::align::{AlignParams, AlignmentEngine, SmithWaterman};
    use crate::core::matrix::ScoringMatrix;

    /// Align `query` (forward) against `target` with default DNA scoring.
    pub(crate) fn align_forward(target: &SequenceRecord, query: &SequenceRecord) -> AlignmentResult {
        let matrix = ScoringMatrix::dna(2, 2);
        let alphabet = matrix.alphabet();
        let profile = SmithWaterman.prepare_profile(&alphabet.encode(&query.sequence), &matrix);
        SmithWaterman.align(
            &profile,
            &alphabet.encode(&target.sequence),
            &AlignParams::new(3, 1, query.len()),
        )
    }

    #[test]
    fn test_summary_is_one_based() {
        let target = SequenceRecord::new("t1", b"GGGGACGTACGTGGGG");
        let query = SequenceRecord::new("q1", b"ACGTACGT");
        let result = align_forward(&target, &query);
        let pair = AlignedPair::new(
            &target,
            &query,
            Strand::Forward,
            Cow::Borrowed(query.sequence.as_slice()),
            result,
        );

        let summary = pair.summary();
        assert_eq!(summary.score, 16);
        assert_eq!((summary.target_begin, summary.target_end), (5, 12));
        assert_eq!((summary.query_begin, summary.query_end), (1, 8));
        assert_eq!(summary.cigar, "8M");
        assert_eq!(summary.to_tsv(), "t1\tq1\t+\t16\t0\t5\t12\t1\t8\t8M");
    }

    #[test]
    fn test_unaligned_summary_uses_star_cigar() {
        let target = SequenceRecord::new("t1", b"AAAA");
        let query = SequenceRecord::new("q1", b"CCCC");
        let result = align_forward(&target, &query);
        let pair = AlignedPair::new(
            &target,
            &query,
            Strand::Reverse,
            Cow::Borrowed(query.sequence.as_slice()),
            result,
        );
        assert!(pair.summary().to_tsv().ends_with("\t-\t0\t0\t1\t1\t1\t1\t*"));
    }
}
