//! Command-line interface for ir-classifier.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **classify**: Count reads supporting each control-template category
//! - **align**: Report local alignments of every query against every target
//!
//! ## Usage
//!
//! ```text
//! # Classify reads against a control panel
//! ir-classifier classify reads.fq.gz templates.fa --min-score 40
//!
//! # Same, on 8 threads, writing the intron-retention read ids to a file
//! ir-classifier classify reads.fq.gz templates.fa --threads 8 --evidence ir_reads.txt
//!
//! # JSON output for scripting
//! ir-classifier classify reads.fq templates.fa --format json
//!
//! # SAM output with both strands considered
//! ir-classifier align targets.fa reads.fq --path --sam --header --best
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::AlignmentConfig;

pub mod align;
pub mod classify;

#[derive(Parser)]
#[command(name = "ir-classifier")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Classify reads against splice-junction and intron-retention control templates")]
#[command(
    long_about = "ir-classifier aligns sequencing reads to a panel of labeled control templates with a local (Smith-Waterman) aligner.\n\nTemplate names carry their category:\n- splice_junction_positive[_N]\n- splice_junction_negative[_N]\n- intron_retention_positive[_N]\n- intron_retention_negative[_N]\n\nEach read is credited to the category of its best-scoring template when that score is above the minimum and not tied with another category."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify reads against a template panel
    Classify(classify::ClassifyArgs),

    /// Align queries against targets and report each alignment
    Align(align::AlignArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Scoring options shared by all commands
#[derive(clap::Args, Debug, Default)]
pub struct ScoringArgs {
    /// JSON config file; command-line options override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Score for a matching base [default: 2]
    #[arg(short = 'm', long = "match")]
    pub match_score: Option<i32>,

    /// Penalty for a mismatching base, as a positive number [default: 2]
    #[arg(short = 'x', long = "mismatch")]
    pub mismatch_penalty: Option<i32>,

    /// Gap open penalty, as a positive number [default: 3]
    #[arg(short = 'o', long)]
    pub gap_open: Option<i32>,

    /// Gap extension penalty, as a positive number [default: 1]
    #[arg(short = 'e', long)]
    pub gap_extend: Option<i32>,

    /// Weight-matrix file; replaces --match and --mismatch
    #[arg(long)]
    pub matrix: Option<PathBuf>,

    /// Alignment engine (native, ssw) [default: native]
    #[arg(long)]
    pub engine: Option<String>,
}

impl ScoringArgs {
    /// Defaults, overlaid with the config file, overlaid with flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed.
    pub fn load_config(&self) -> anyhow::Result<AlignmentConfig> {
        let mut config = match &self.config {
            Some(path) => AlignmentConfig::from_file(path)
                .with_context(|| format!("Failed to load config file {}", path.display()))?,
            None => AlignmentConfig::default(),
        };

        if let Some(value) = self.match_score {
            config.match_score = value;
        }
        if let Some(value) = self.mismatch_penalty {
            config.mismatch_penalty = value;
        }
        if let Some(value) = self.gap_open {
            config.gap_open = value;
        }
        if let Some(value) = self.gap_extend {
            config.gap_extend = value;
        }
        if let Some(path) = &self.matrix {
            config.matrix = Some(path.clone());
        }
        if let Some(engine) = &self.engine {
            config.engine.clone_from(engine);
        }

        Ok(config)
    }
}
