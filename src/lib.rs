//! # ir-classifier
//!
//! A library for measuring intron retention from sequencing reads using
//! labeled control templates.
//!
//! A control panel holds template sequences for four categories: positive
//! and negative splice-junction controls, and positive and negative
//! intron-retention controls. Each read is locally aligned against every
//! template and credited to the category whose best template scored highest,
//! as long as that score clears a minimum and is not tied with another
//! category.
//!
//! ## Features
//!
//! - **Affine-gap Smith-Waterman**: Local alignment with full traceback and a
//!   secondary-hit score
//! - **Custom scoring**: Uniform match/mismatch or a weight-matrix file
//! - **Fail-fast panels**: Template names are validated before any alignment
//! - **Deterministic parallelism**: Batched scoring on a rayon pool gives the
//!   same tally as a sequential run
//! - **Reports**: Free-text alignment stanzas and SAM records
//!
//! ## Example
//!
//! ```rust,no_run
//! use ir_classifier::{Category, CategoryTally, Classifier, ClassifierConfig};
//! use ir_classifier::{ScoringMatrix, SmithWaterman, TemplatePanel};
//! use ir_classifier::parsing::open_sequences;
//! use std::path::Path;
//!
//! let matrix = ScoringMatrix::dna(2, 2);
//! let panel = TemplatePanel::load(Path::new("templates.fa"), matrix.alphabet()).unwrap();
//! let classifier = Classifier::new(&SmithWaterman, &matrix, &panel, ClassifierConfig::default());
//!
//! let mut tally = CategoryTally::new();
//! let reads = open_sequences(Path::new("reads.fq.gz")).unwrap();
//! classifier.classify_all(reads, &mut tally).unwrap();
//!
//! for category in Category::ALL {
//!     println!("{category}: {}", tally.count(category));
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Alphabets, scoring matrices, categories and sequence records
//! - [`align`]: Alignment engine interface, Smith-Waterman and trace rebuilding
//! - [`classify`]: Template panel, decision rule, tally and classifier
//! - [`parsing`]: FASTA/FASTQ readers
//! - [`report`]: Text and SAM alignment reports
//! - [`config`]: Scoring configuration
//! - [`cli`]: Command-line interface implementation

pub mod align;
pub mod classify;
pub mod cli;
pub mod config;
pub mod core;
pub mod parsing;
pub mod report;

// Re-export commonly used types for convenience
pub use align::{AlignmentEngine, AlignmentResult, SmithWaterman};
pub use classify::{CategoryTally, Classifier, ClassifierConfig, ClassifyError, TemplatePanel};
pub use config::AlignmentConfig;
pub use core::{Alphabet, Category, ScoringMatrix, SequenceRecord};
