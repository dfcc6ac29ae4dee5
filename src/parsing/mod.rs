//! Readers for query reads and reference templates.
//!
//! Both inputs may be FASTA or FASTQ, optionally gzip/bgzip compressed:
//!
//! - Compression is chosen by extension (`.gz`, `.gzip`, `.bgz`)
//! - Format is chosen by the first byte: `>` is FASTA, anything else is
//!   parsed as FASTQ
//!
//! ## Example
//!
//! ```rust,no_run
//! use ir_classifier::parsing::open_sequences;
//! use std::path::Path;
//!
//! for record in open_sequences(Path::new("reads.fq.gz")).unwrap() {
//!     let record = record.unwrap();
//!     println!("{}\t{}", record.id, record.sequence.len());
//! }
//! ```

use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use thiserror::Error;

use crate::core::sequence::SequenceRecord;

pub mod fasta;
pub mod fastq;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid sequence file: {0}")]
    InputFormat(String),

    #[error("Truncated FASTQ record '{id}': input ends before its 4 lines")]
    TruncatedRecord { id: String },
}

/// Sequence file layout, detected from the first byte of the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceFormat {
    Fasta,
    Fastq,
}

impl SequenceFormat {
    #[must_use]
    pub fn detect(first_byte: Option<u8>) -> Self {
        match first_byte {
            Some(b'>') => Self::Fasta,
            _ => Self::Fastq,
        }
    }
}

/// Check if the path has a gzip/bgzip extension
#[must_use]
pub fn is_gzipped(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(OsStr::to_str)
            .map(str::to_lowercase)
            .as_deref(),
        Some("gz" | "gzip" | "bgz")
    )
}

/// Streaming reader over FASTA or FASTQ records.
pub enum SequenceReader {
    Fasta(fasta::FastaReader<Box<dyn BufRead>>),
    Fastq(fastq::FastqReader<Box<dyn BufRead>>),
}

impl SequenceReader {
    /// Wrap an already-decompressed stream, detecting its format.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Io` if the stream cannot be read.
    pub fn new<R: BufRead + 'static>(reader: R) -> Result<Self, ParseError> {
        let mut reader: Box<dyn BufRead> = Box::new(reader);
        let first = reader.fill_buf()?.first().copied();

        Ok(match SequenceFormat::detect(first) {
            SequenceFormat::Fasta => Self::Fasta(fasta::FastaReader::new(reader)),
            SequenceFormat::Fastq => Self::Fastq(fastq::FastqReader::new(reader)),
        })
    }

    #[must_use]
    pub fn format(&self) -> SequenceFormat {
        match self {
            Self::Fasta(_) => SequenceFormat::Fasta,
            Self::Fastq(_) => SequenceFormat::Fastq,
        }
    }
}

impl Iterator for SequenceReader {
    type Item = Result<SequenceRecord, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Fasta(reader) => reader.read_record().transpose(),
            Self::Fastq(reader) => reader.read_record().transpose(),
        }
    }
}

/// Open a sequence file for streaming.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be opened or read.
pub fn open_sequences(path: &Path) -> Result<SequenceReader, ParseError> {
    let file = File::open(path)?;
    if is_gzipped(path) {
        SequenceReader::new(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        SequenceReader::new(BufReader::new(file))
    }
}

/// Read every record of a sequence file into memory.
///
/// # Errors
///
/// Returns the first `ParseError` encountered.
pub fn read_sequences(path: &Path) -> Result<Vec<SequenceRecord>, ParseError> {
    open_sequences(path)?.collect()
}
