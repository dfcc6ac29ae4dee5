//! Free-text alignment report.

use std::io::{self, Write};

use crate::align::trace::GAP;
use crate::report::AlignedPair;

/// Display columns per block
pub const BLOCK_WIDTH: usize = 60;

/// Write the stanza for one alignment. With `show_path`, the aligned rows
/// follow in blocks of [`BLOCK_WIDTH`] columns.
///
/// # Errors
///
/// Returns any error from `out`.
pub fn write_stanza<W: Write>(out: &mut W, pair: &AlignedPair<'_>, show_path: bool) -> io::Result<()> {
    let result = &pair.result;

    writeln!(out, "target_name: {}", pair.target.id)?;
    writeln!(out, "query_name: {}", pair.query.id)?;
    write!(out, "optimal_alignment_score: {}\t", result.score)?;
    if result.secondary_score > 0 {
        write!(out, "suboptimal_alignment_score: {}\t", result.secondary_score)?;
    }
    writeln!(
        out,
        "strand: {}\ttarget_begin: {}\ttarget_end: {}\tquery_begin: {}\tquery_end: {}\n",
        pair.strand.symbol(),
        result.ref_begin + 1,
        result.ref_end + 1,
        result.query_begin + 1,
        result.query_end + 1
    )?;

    if show_path && !result.cigar.is_empty() {
        write_blocks(out, pair)?;
    }
    Ok(())
}

fn write_blocks<W: Write>(out: &mut W, pair: &AlignedPair<'_>) -> io::Result<()> {
    let trace = &pair.trace;
    let reference = trace.reference_row.as_bytes();
    let indicator = trace.indicator_row.as_bytes();
    let query = trace.query_row.as_bytes();

    let mut ref_start = pair.result.ref_begin + 1;
    let mut query_start = pair.result.query_begin + 1;

    for offset in (0..query.len()).step_by(BLOCK_WIDTH) {
        let r = block(reference, offset);
        let a = block(indicator, offset);
        let q = block(query, offset);

        let ref_end = ref_start + residues(r) - 1;
        let query_end = query_start + residues(q) - 1;

        writeln!(out, "Target:{ref_start:>8}\t{}\t{ref_end}", String::from_utf8_lossy(r))?;
        writeln!(out, "{:15}\t{}", "", String::from_utf8_lossy(a))?;
        writeln!(out, "Query:{query_start:>9}\t{}\t{query_end}\n", String::from_utf8_lossy(q))?;

        ref_start = ref_end + 1;
        query_start = query_end + 1;
    }
    Ok(())
}

fn block(row: &[u8], offset: usize) -> &[u8] {
    let start = offset.min(row.len());
    let end = (offset + BLOCK_WIDTH).min(row.len());
    &row[start..end]
}

/// Non-gap columns in a block
fn residues(block: &[u8]) -> usize {
    block.iter().filter(|&&b| b != GAP).count()
}
