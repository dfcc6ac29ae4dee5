//! Read classification against a panel of labeled control templates.
//!
//! A read is aligned to every template; the best score per [`Category`] is
//! kept, and the read is credited to the top category only when that score
//! clears the minimum and is not tied with the runner-up.
//!
//! ## Example
//!
//! ```rust,no_run
//! use ir_classifier::align::SmithWaterman;
//! use ir_classifier::classify::{CategoryTally, Classifier, ClassifierConfig, TemplatePanel};
//! use ir_classifier::core::ScoringMatrix;
//! use ir_classifier::parsing::open_sequences;
//! use std::path::Path;
//!
//! let matrix = ScoringMatrix::dna(2, 2);
//! let panel = TemplatePanel::load(Path::new("templates.fa"), matrix.alphabet()).unwrap();
//! let engine = SmithWaterman;
//! let classifier = Classifier::new(&engine, &matrix, &panel, ClassifierConfig::default());
//!
//! let mut tally = CategoryTally::default();
//! let reads = open_sequences(Path::new("reads.fq")).unwrap();
//! let summary = classifier.classify_all(reads, &mut tally).unwrap();
//! println!("{} reads, {} IR+", summary.processed, tally.evidence().len());
//! ```
//!
//! [`Category`]: crate::core::Category

use thiserror::Error;

use crate::align::EngineError;
use crate::config::ConfigError;
use crate::core::{CategoryError, MatrixError};
use crate::parsing::ParseError;

pub mod decision;
pub mod engine;
pub mod panel;
pub mod tally;

pub use decision::{decide, Decision, RejectReason, ScorePanel};
pub use engine::{Classifier, ClassifierConfig, RunSummary};
pub use panel::{Template, TemplatePanel};
pub use tally::CategoryTally;

/// Anything that can stop a classification run.
#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Matrix(#[from] MatrixError),

    #[error(transparent)]
    Category(#[from] CategoryError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
