//! Four-line FASTQ records.

use std::io::{self, BufRead};

use noodles::fastq;

use crate::core::sequence::SequenceRecord;
use crate::parsing::ParseError;

/// Streaming FASTQ reader yielding [`SequenceRecord`]s with qualities.
pub struct FastqReader<R: BufRead> {
    inner: fastq::io::Reader<R>,
    record: fastq::Record,
}

impl<R: BufRead> FastqReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            inner: fastq::io::Reader::new(reader),
            record: fastq::Record::default(),
        }
    }

    /// Read the next record, or `None` at end of input.
    ///
    /// Blank lines between records are skipped.
    ///
    /// # Errors
    ///
    /// - `ParseError::TruncatedRecord` if input ends inside a record
    /// - `ParseError::InputFormat` for a bad header or separator line, or a
    ///   quality string whose length differs from the sequence
    pub fn read_record(&mut self) -> Result<Option<SequenceRecord>, ParseError> {
        skip_blank_lines(self.inner.get_mut())?;

        match self.inner.read_record(&mut self.record) {
            Ok(0) => return Ok(None),
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                return Err(ParseError::TruncatedRecord { id: self.id() });
            }
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                return Err(ParseError::InputFormat(format!("FASTQ record: {e}")));
            }
            Err(e) => return Err(ParseError::Io(e)),
        }

        let id = self.id();
        let sequence = self.record.sequence();
        let quality = self.record.quality_scores();

        // Input that stops right after the separator leaves the quality empty
        if quality.is_empty() && !sequence.is_empty() {
            return Err(ParseError::TruncatedRecord { id });
        }
        if quality.len() != sequence.len() {
            return Err(ParseError::InputFormat(format!(
                "FASTQ record '{id}': {} quality values for {} bases",
                quality.len(),
                sequence.len()
            )));
        }

        Ok(Some(
            SequenceRecord::new(id, sequence.to_vec()).with_quality(quality.to_vec()),
        ))
    }

    /// First whitespace-delimited token of the current record's name.
    fn id(&self) -> String {
        let name: &[u8] = self.record.name().as_ref();
        String::from_utf8_lossy(name)
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string()
    }
}

fn skip_blank_lines<R: BufRead>(reader: &mut R) -> io::Result<()> {
    loop {
        let skip = reader
            .fill_buf()?
            .iter()
            .take_while(|&&b| b == b'\n' || b == b'\r')
            .count();
        if skip == 0 {
            return Ok(());
        }
        reader.consume(skip);
    }
}
