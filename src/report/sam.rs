//! SAM output.

use std::io::{self, Write};

use crate::core::sequence::SequenceRecord;
use crate::report::{AlignedPair, Strand};

/// Highest mapping quality emitted
pub const MAX_MAPQ: u8 = 254;

/// Record written for a query with no alignment to the target
const UNMAPPED_FIELDS: &str = "4\t*\t0\t255\t*\t*\t0\t0\t*\t*";

/// Write `@HD` and one `@SQ` line per target.
///
/// # Errors
///
/// Returns any error from `out`.
pub fn write_header<W: Write>(out: &mut W, targets: &[SequenceRecord]) -> io::Result<()> {
    writeln!(out, "@HD\tVN:1.4\tSO:queryname")?;
    for target in targets {
        writeln!(out, "@SQ\tSN:{}\tLN:{}", target.id, target.len())?;
    }
    Ok(())
}

/// Mapping quality from the primary and secondary scores.
///
/// `trunc(trunc(-4.343 * ln(1 - |s - s2| / s)) + 4.99)`, capped at
/// [`MAX_MAPQ`]. A secondary score of zero makes the logarithm infinite,
/// which also maps to the cap.
#[must_use]
pub fn mapping_quality(score: i32, secondary_score: i32) -> u8 {
    if score <= 0 {
        return 0;
    }
    let ratio = 1.0 - f64::from((score - secondary_score).abs()) / f64::from(score);
    let raw = -4.343 * ratio.ln();
    if !raw.is_finite() {
        return MAX_MAPQ;
    }

    let mapq = (raw.trunc() + 4.99).trunc();
    if mapq >= f64::from(MAX_MAPQ) {
        MAX_MAPQ
    } else {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // within 0..254
        let mapq = mapq.max(0.0) as u8;
        mapq
    }
}

/// Write one SAM record for an alignment.
///
/// # Errors
///
/// Returns any error from `out`.
pub fn write_record<W: Write>(out: &mut W, pair: &AlignedPair<'_>) -> io::Result<()> {
    let result = &pair.result;
    write!(out, "{}\t", pair.query.id)?;

    if !result.is_aligned() {
        return writeln!(out, "{UNMAPPED_FIELDS}");
    }

    let flag = match pair.strand {
        Strand::Forward => 0,
        Strand::Reverse => 16,
    };
    let mapq = mapping_quality(result.score, result.secondary_score);
    let bases = clipped(&pair.query_bases, result.query_begin, result.query_end);

    write!(
        out,
        "{flag}\t{}\t{}\t{mapq}\t{}\t*\t0\t0\t{}\t",
        pair.target.id,
        result.ref_begin + 1,
        pair.trace.cigar,
        String::from_utf8_lossy(bases)
    )?;

    match &pair.query.quality {
        Some(quality) => {
            let aligned: Vec<u8> = match pair.strand {
                Strand::Forward => clipped(quality, result.query_begin, result.query_end).to_vec(),
                Strand::Reverse => {
                    let reversed: Vec<u8> = quality.iter().rev().copied().collect();
                    clipped(&reversed, result.query_begin, result.query_end).to_vec()
                }
            };
            write!(out, "{}", String::from_utf8_lossy(&aligned))?;
        }
        None => write!(out, "*")?,
    }

    write!(
        out,
        "\tAS:i:{}\tNM:i:{}",
        result.score,
        pair.trace.edit_distance()
    )?;
    if result.secondary_score > 0 {
        write!(out, "\tZS:i:{}", result.secondary_score)?;
    }
    writeln!(out)
}

/// `seq[begin..=end]`, clipped to the sequence bounds.
fn clipped(seq: &[u8], begin: usize, end: usize) -> &[u8] {
    let start = begin.min(seq.len());
    let stop = end.saturating_add(1).min(seq.len()).max(start);
    &seq[start..stop]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sequence::reverse_complement;
    use crate::report::tests::align_forward;
    use std::borrow::Cow;

    fn render(pair: &AlignedPair<'_>) -> String {
        let mut out = Vec::new();
        write_record(&mut out, pair).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_mapping_quality() {
        // No secondary hit: infinite log caps the value
        assert_eq!(mapping_quality(20, 0), 254);
        // Equal scores: ln(1) == 0
        assert_eq!(mapping_quality(20, 20), 4);
        // -4.343 * ln(0.5) = 3.01 -> 3 + 4.99 -> 7
        assert_eq!(mapping_quality(20, 10), 7);
        // -4.343 * ln(0.1) = 10.0 -> 10 + 4.99 -> 14
        assert_eq!(mapping_quality(20, 2), 14);
        // -4.343 * ln(0.9) = 0.46 -> 0 + 4.99 -> 4
        assert_eq!(mapping_quality(20, 18), 4);
        assert_eq!(mapping_quality(0, 0), 0);
    }

    #[test]
    fn test_header() {
        let targets = vec![
            SequenceRecord::new("chr1", b"ACGTACGT"),
            SequenceRecord::new("chr2", b"AC"),
        ];
        let mut out = Vec::new();
        write_header(&mut out, &targets).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "@HD\tVN:1.4\tSO:queryname\n@SQ\tSN:chr1\tLN:8\n@SQ\tSN:chr2\tLN:2\n"
        );
    }

    #[test]
    fn test_unmapped_record() {
        let target = SequenceRecord::new("chr1", b"AAAA");
        let query = SequenceRecord::new("read1", b"CCCC");
        let pair = AlignedPair::new(
            &target,
            &query,
            Strand::Forward,
            Cow::Borrowed(query.sequence.as_slice()),
            align_forward(&target, &query),
        );
        assert_eq!(render(&pair), "read1\t4\t*\t0\t255\t*\t*\t0\t0\t*\t*\n");
    }

    #[test]
    fn test_forward_record() {
        let target = SequenceRecord::new("chr1", b"TTTTACGTACGTTTTT");
        let query = SequenceRecord::new("read1", b"GGACGTACGTGG").with_quality(b"!!ABCDEFGH##");
        let pair = AlignedPair::new(
            &target,
            &query,
            Strand::Forward,
            Cow::Borrowed(query.sequence.as_slice()),
            align_forward(&target, &query),
        );
        assert_eq!(
            render(&pair),
            "read1\t0\tchr1\t5\t254\t8M\t*\t0\t0\tACGTACGT\tABCDEFGH\tAS:i:16\tNM:i:0\n"
        );
    }

    #[test]
    fn test_reverse_record_reverses_quality() {
        let target = SequenceRecord::new("chr1", b"ACGGT");
        // Reverse complement of AACCGT is ACGGTT
        let query = SequenceRecord::new("read1", b"AACCGT").with_quality(b"123456");
        let rc = reverse_complement(&query.sequence);
        let rc_query = SequenceRecord::new("read1", rc.clone());
        let result = align_forward(&target, &rc_query);

        let pair = AlignedPair::new(&target, &query, Strand::Reverse, Cow::Owned(rc), result);
        assert_eq!(
            render(&pair),
            "read1\t16\tchr1\t1\t254\t5M\t*\t0\t0\tACGGT\t65432\tAS:i:10\tNM:i:0\n"
        );
    }

    #[test]
    fn test_secondary_score_tag_and_edit_distance() {
        let copy = b"ACGTACGTAC";
        let mut reference = copy.to_vec();
        reference.extend_from_slice(&[b'G'; 40]);
        reference.extend_from_slice(b"ACGTTCGTAC");
        let target = SequenceRecord::new("t", reference);
        let query = SequenceRecord::new("q", &copy[..]);

        let pair = AlignedPair::new(
            &target,
            &query,
            Strand::Forward,
            Cow::Borrowed(query.sequence.as_slice()),
            align_forward(&target, &query),
        );
        let record = render(&pair);
        assert!(record.ends_with("\tAS:i:20\tNM:i:0\tZS:i:16\n"), "{record}");
        // -4.343 * ln(0.8) = 0.97 -> 0 + 4.99 -> 4
        assert!(record.starts_with("q\t0\tt\t1\t4\t10M\t"));
    }
}
