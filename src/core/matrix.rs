//! Substitution scoring matrices.
//!
//! A matrix is either built from uniform match/mismatch scores over an
//! alphabet, or parsed from a weight-matrix file in the NCBI layout:
//!
//! ```text
//! # comment lines are skipped
//!    A  C  G  T  N
//! A  2 -3 -3 -3  0
//! C -3  2 -3 -3  0
//! G -3 -3  2 -3  0
//! T -3 -3 -3  2  0
//! N  0  0  0  0  0
//! ```
//!
//! The header row defines the alphabet; its last symbol is the fallback for
//! unrecognized input.

use std::path::Path;

use thiserror::Error;

use crate::core::alphabet::Alphabet;

#[derive(Error, Debug)]
pub enum MatrixError {
    #[error("IO error reading scoring matrix: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed scoring matrix: {0}")]
    Malformed(String),
}

/// A square, flattened substitution matrix over an [`Alphabet`].
///
/// Immutable once built; shared read-only by every alignment in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringMatrix {
    alphabet: Alphabet,
    scores: Vec<i8>,
}

impl ScoringMatrix {
    /// Uniform matrix: `match_score` on the diagonal, `-mismatch_penalty`
    /// elsewhere, and zero on the fallback symbol's row and column.
    #[must_use]
    pub fn uniform(alphabet: Alphabet, match_score: i8, mismatch_penalty: i8) -> Self {
        let n = alphabet.len();
        let mut scores = vec![0i8; n * n];
        for i in 0..n {
            if alphabet.is_fallback(i) {
                continue;
            }
            for j in 0..n {
                if alphabet.is_fallback(j) {
                    continue;
                }
                scores[i * n + j] = if i == j {
                    match_score
                } else {
                    mismatch_penalty.saturating_neg()
                };
            }
        }
        Self { alphabet, scores }
    }

    /// Uniform matrix over the nucleotide alphabet.
    #[must_use]
    pub fn dna(match_score: i8, mismatch_penalty: i8) -> Self {
        Self::uniform(Alphabet::dna(), match_score, mismatch_penalty)
    }

    /// Load a weight-matrix file.
    ///
    /// # Errors
    ///
    /// Returns `MatrixError::Io` if the file cannot be read or
    /// `MatrixError::Malformed` if its contents are inconsistent.
    pub fn from_file(path: &Path) -> Result<Self, MatrixError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse weight-matrix text.
    ///
    /// # Errors
    ///
    /// Returns `MatrixError::Malformed` when the header is missing or repeats
    /// a symbol, a row label disagrees with the header, the row or column
    /// counts differ from the header, or a score is not an 8-bit integer.
    pub fn parse(text: &str) -> Result<Self, MatrixError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));

        let (_, header) = lines
            .next()
            .ok_or_else(|| MatrixError::Malformed("no header row found".to_string()))?;

        let mut header_symbols = Vec::new();
        for token in header.split_whitespace() {
            match token.as_bytes() {
                [symbol] => header_symbols.push(*symbol),
                _ => {
                    return Err(MatrixError::Malformed(format!(
                        "header entry '{token}' is not a single symbol"
                    )))
                }
            }
        }
        let alphabet = Alphabet::new(&header_symbols)?;
        let n = alphabet.len();

        let mut scores = Vec::with_capacity(n * n);
        let mut rows = 0usize;
        for (line_num, line) in lines {
            if rows == n {
                return Err(MatrixError::Malformed(format!(
                    "line {line_num}: more rows than the {n} header symbols"
                )));
            }

            let mut fields = line.split_whitespace();
            let label = fields.next().unwrap_or_default();
            let expected = char::from(header_symbols[rows]);
            if !label.eq_ignore_ascii_case(&expected.to_string()) {
                return Err(MatrixError::Malformed(format!(
                    "line {line_num}: row label '{label}' does not match header symbol '{expected}'"
                )));
            }

            let row_start = scores.len();
            for field in fields {
                let value: i8 = field.parse().map_err(|_| {
                    MatrixError::Malformed(format!(
                        "line {line_num}: score '{field}' is not an integer in [-128, 127]"
                    ))
                })?;
                scores.push(value);
            }

            let columns = scores.len() - row_start;
            if columns != n {
                return Err(MatrixError::Malformed(format!(
                    "line {line_num}: row '{label}' has {columns} scores, expected {n}"
                )));
            }
            rows += 1;
        }

        if rows != n {
            return Err(MatrixError::Malformed(format!(
                "found {rows} rows, expected {n}"
            )));
        }

        Ok(Self { alphabet, scores })
    }

    #[must_use]
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Number of symbols along each side.
    #[must_use]
    pub fn size(&self) -> usize {
        self.alphabet.len()
    }

    /// Score for aligning encoded symbol `a` against encoded symbol `b`.
    #[must_use]
    pub fn score(&self, a: u8, b: u8) -> i8 {
        self.scores[usize::from(a) * self.size() + usize::from(b)]
    }

    /// Flattened row-major scores.
    #[must_use]
    pub fn as_slice(&self) -> &[i8] {
        &self.scores
    }
}
