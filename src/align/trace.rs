//! Rebuild a readable alignment from an engine result.

use serde::Serialize;

use crate::align::{cigar_string, AlignmentResult, CigarKind, CigarOp};

/// Indicator for identical aligned symbols.
pub const MATCH_MARKER: u8 = b'|';
/// Indicator for differing aligned symbols.
pub const MISMATCH_MARKER: u8 = b'*';
/// Indicator under a gap column.
pub const GAP_MARKER: u8 = b' ';
/// Gap character in the query and reference rows.
pub const GAP: u8 = b'-';

/// CIGAR string plus the three display rows of an alignment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AlignmentTrace {
    pub cigar: String,
    pub query_row: String,
    pub indicator_row: String,
    pub reference_row: String,
}

impl AlignmentTrace {
    /// Number of display columns.
    #[must_use]
    pub fn columns(&self) -> usize {
        self.indicator_row.len()
    }

    /// Columns where the two sequences differ or one has a gap.
    #[must_use]
    pub fn edit_distance(&self) -> usize {
        self.indicator_row
            .bytes()
            .filter(|&b| b != MATCH_MARKER)
            .count()
    }
}

/// Build the trace for `result`, aligning `query` against `reference`.
#[must_use]
pub fn from_result(query: &[u8], reference: &[u8], result: &AlignmentResult) -> AlignmentTrace {
    reconstruct(
        query,
        reference,
        result.query_begin,
        result.ref_begin,
        &result.cigar,
    )
}

/// Walk `ops` from the begin offsets, emitting the CIGAR string and rows.
///
/// `M` runs consume both sequences, `I` only the query, `D` only the
/// reference. Other operations appear in the CIGAR string but do not extend
/// the rows. A cursor that runs off the end of its sequence stops
/// contributing characters.
#[must_use]
pub fn reconstruct(
    query: &[u8],
    reference: &[u8],
    query_begin: usize,
    ref_begin: usize,
    ops: &[CigarOp],
) -> AlignmentTrace {
    let columns: usize = ops
        .iter()
        .filter(|op| {
            matches!(
                op.kind,
                CigarKind::Match | CigarKind::Insertion | CigarKind::Deletion
            )
        })
        .map(|op| op.len as usize)
        .sum();

    let mut q_row = Vec::with_capacity(columns);
    let mut a_row = Vec::with_capacity(columns);
    let mut r_row = Vec::with_capacity(columns);
    let mut q_off = query_begin;
    let mut r_off = ref_begin;

    for op in ops {
        let n = op.len as usize;
        match op.kind {
            CigarKind::Match => {
                let k = n
                    .min(query.len().saturating_sub(q_off))
                    .min(reference.len().saturating_sub(r_off));
                let q = window(query, q_off, k);
                let r = window(reference, r_off, k);
                q_row.extend_from_slice(q);
                r_row.extend_from_slice(r);
                a_row.extend(q.iter().zip(r).map(|(a, b)| {
                    if a == b {
                        MATCH_MARKER
                    } else {
                        MISMATCH_MARKER
                    }
                }));
                q_off += n;
                r_off += n;
            }
            CigarKind::Insertion => {
                let q = window(query, q_off, n);
                q_row.extend_from_slice(q);
                a_row.extend(std::iter::repeat(GAP_MARKER).take(q.len()));
                r_row.extend(std::iter::repeat(GAP).take(q.len()));
                q_off += n;
            }
            CigarKind::Deletion => {
                let r = window(reference, r_off, n);
                q_row.extend(std::iter::repeat(GAP).take(r.len()));
                a_row.extend(std::iter::repeat(GAP_MARKER).take(r.len()));
                r_row.extend_from_slice(r);
                r_off += n;
            }
            _ => {}
        }
    }

    AlignmentTrace {
        cigar: cigar_string(ops),
        query_row: String::from_utf8_lossy(&q_row).into_owned(),
        indicator_row: String::from_utf8_lossy(&a_row).into_owned(),
        reference_row: String::from_utf8_lossy(&r_row).into_owned(),
    }
}

/// `seq[start..start + len]`, clipped to the sequence bounds.
fn window(seq: &[u8], start: usize, len: usize) -> &[u8] {
    let start = start.min(seq.len());
    let end = start.saturating_add(len).min(seq.len());
    &seq[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::{AlignParams, AlignmentEngine, SmithWaterman};
    use crate::core::matrix::ScoringMatrix;

    fn op(len: u32, kind: CigarKind) -> CigarOp {
        CigarOp::new(len, kind)
    }

    #[test]
    fn test_match_run_with_mismatch() {
        let trace = reconstruct(b"ACGT", b"ACCT", 0, 0, &[op(4, CigarKind::Match)]);
        assert_eq!(trace.cigar, "4M");
        assert_eq!(trace.query_row, "ACGT");
        assert_eq!(trace.indicator_row, "||*|");
        assert_eq!(trace.reference_row, "ACCT");
        assert_eq!(trace.edit_distance(), 1);
    }

    #[test]
    fn test_insertion_and_deletion() {
        let ops = [
            op(2, CigarKind::Match),
            op(1, CigarKind::Insertion),
            op(2, CigarKind::Match),
            op(2, CigarKind::Deletion),
            op(1, CigarKind::Match),
        ];
        let trace = reconstruct(b"ACTGTA", b"ACGTCCA", 0, 0, &ops);
        assert_eq!(trace.cigar, "2M1I2M2D1M");
        assert_eq!(trace.query_row, "ACTGT--A");
        assert_eq!(trace.indicator_row, "|| ||  |");
        assert_eq!(trace.reference_row, "AC-GTCCA");
    }

    #[test]
    fn test_begin_offsets() {
        let trace = reconstruct(b"TTACG", b"GGGACG", 2, 3, &[op(3, CigarKind::Match)]);
        assert_eq!(trace.query_row, "ACG");
        assert_eq!(trace.reference_row, "ACG");
        assert_eq!(trace.indicator_row, "|||");
    }

    #[test]
    fn test_other_ops_only_affect_cigar() {
        let ops = [
            op(2, CigarKind::SoftClip),
            op(3, CigarKind::Match),
            op(4, CigarKind::Skip),
            op(1, CigarKind::HardClip),
        ];
        let trace = reconstruct(b"ACGTA", b"ACGTA", 0, 0, &ops);
        assert_eq!(trace.cigar, "2S3M4N1H");
        assert_eq!(trace.columns(), 3);
        assert_eq!(trace.query_row, "ACG");
    }

    #[test]
    fn test_empty_ops() {
        let trace = reconstruct(b"ACGT", b"ACGT", 0, 0, &[]);
        assert_eq!(trace, AlignmentTrace::default());
    }

    #[test]
    fn test_overrun_is_clipped() {
        let trace = reconstruct(b"AC", b"ACGT", 0, 0, &[op(4, CigarKind::Match)]);
        assert_eq!(trace.query_row, "AC");
        assert_eq!(trace.reference_row, "AC");
        assert_eq!(trace.indicator_row, "||");
    }

    #[test]
    fn test_overrun_keeps_rows_equal_length() {
        let cases: [(&[u8], &[u8], usize, usize); 4] = [
            (b"AC", b"ACGT", 0, 0),
            (b"ACGT", b"AC", 0, 0),
            (b"ACGTA", b"GGACG", 3, 1),
            (b"A", b"", 0, 0),
        ];
        for (query, reference, q_begin, r_begin) in cases {
            let trace = reconstruct(query, reference, q_begin, r_begin, &[op(4, CigarKind::Match)]);
            assert_eq!(trace.query_row.len(), trace.reference_row.len());
            assert_eq!(trace.indicator_row.len(), trace.reference_row.len());
        }
    }

    #[test]
    fn test_run_lengths_equal_row_lengths_for_engine_output() {
        let matrix = ScoringMatrix::dna(2, 2);
        let alphabet = matrix.alphabet();
        let engine = SmithWaterman;
        let pairs: [(&[u8], &[u8]); 4] = [
            (b"ACGT", b"ACGT"),
            (b"AAAACCCCAGGGGTTTT", b"AAAACCCCGGGGTTTT"),
            (b"AAAACCCCGGGGTTTT", b"AAAACCCCAGGGGTTTT"),
            (b"GATTACAGATTACA", b"TTGATTACCAGATTTACATT"),
        ];

        for (query, reference) in pairs {
            let profile = engine.prepare_profile(&alphabet.encode(query), &matrix);
            let result = engine.align(
                &profile,
                &alphabet.encode(reference),
                &AlignParams::new(3, 1, query.len()),
            );
            let trace = from_result(query, reference, &result);
            let total: u32 = result.cigar.iter().map(|op| op.len).sum();
            assert_eq!(total as usize, trace.query_row.len());
            assert_eq!(trace.query_row.len(), trace.indicator_row.len());
            assert_eq!(trace.indicator_row.len(), trace.reference_row.len());
        }
    }
}
