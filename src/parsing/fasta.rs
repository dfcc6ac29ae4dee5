//! FASTA records via noodles.

use std::io::{self, BufRead};

use noodles::fasta;

use crate::core::sequence::SequenceRecord;
use crate::parsing::ParseError;

/// Streaming FASTA reader yielding [`SequenceRecord`]s.
pub struct FastaReader<R: BufRead> {
    inner: fasta::io::Reader<R>,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            inner: fasta::io::Reader::new(reader),
        }
    }

    /// Read the next record, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InputFormat` if a definition line is malformed,
    /// or `ParseError::Io` on read failure.
    pub fn read_record(&mut self) -> Result<Option<SequenceRecord>, ParseError> {
        let Some(result) = self.inner.records().next() else {
            return Ok(None);
        };

        let record = result.map_err(|e| match e.kind() {
            io::ErrorKind::InvalidData => {
                ParseError::InputFormat(format!("Failed to parse FASTA record: {e}"))
            }
            _ => ParseError::Io(e),
        })?;

        let id = String::from_utf8_lossy(record.name()).to_string();
        if id.is_empty() {
            return Err(ParseError::InputFormat(
                "FASTA record has an empty name".to_string(),
            ));
        }

        Ok(Some(SequenceRecord::new(
            id,
            record.sequence().as_ref().to_vec(),
        )))
    }
}
