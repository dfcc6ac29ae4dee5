//! Core data types for read classification.
//!
//! - [`Alphabet`]: symbol <-> index mapping with a fallback symbol
//! - [`ScoringMatrix`]: substitution scores over an alphabet
//! - [`Category`]: the four read-support categories of control templates
//! - [`SequenceRecord`]: a named sequence from FASTA/FASTQ
//!
//! ## Template naming
//!
//! Control templates carry their category in their name, optionally followed
//! by a numeric suffix:
//!
//! | Template name | Category |
//! |---------------|----------|
//! | `splice_junction_positive_1` | splice junction, positive control |
//! | `splice_junction_negative_3` | splice junction, negative control |
//! | `intron_retention_positive`  | intron retention, positive control |
//! | `intron_retention_negative_12` | intron retention, negative control |

pub mod alphabet;
pub mod category;
pub mod matrix;
pub mod sequence;

pub use alphabet::Alphabet;
pub use category::{Category, CategoryError};
pub use matrix::{MatrixError, ScoringMatrix};
pub use sequence::SequenceRecord;
