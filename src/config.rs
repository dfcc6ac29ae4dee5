//! Scoring and run configuration.
//!
//! Values come from three layers, later layers winning: built-in defaults,
//! an optional JSON file (`--config`), then command-line flags.
//!
//! ```json
//! {
//!   "match_score": 2,
//!   "mismatch_penalty": 2,
//!   "gap_open": 3,
//!   "gap_extend": 1,
//!   "min_score": 0,
//!   "matrix": null,
//!   "engine": "native",
//!   "threads": 1,
//!   "batch_size": 1024
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::align::{EngineError, EngineKind};
use crate::classify::engine::{ClassifierConfig, DEFAULT_BATCH_SIZE};
use crate::core::matrix::{MatrixError, ScoringMatrix};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub const DEFAULT_MATCH_SCORE: i32 = 2;
pub const DEFAULT_MISMATCH_PENALTY: i32 = 2;
pub const DEFAULT_GAP_OPEN: i32 = 3;
pub const DEFAULT_GAP_EXTEND: i32 = 1;

/// Alignment scoring and classification settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlignmentConfig {
    pub match_score: i32,
    pub mismatch_penalty: i32,
    pub gap_open: i32,
    pub gap_extend: i32,
    /// Reads whose best score does not exceed this are not credited
    pub min_score: i32,
    /// Weight-matrix file; replaces `match_score`/`mismatch_penalty`
    pub matrix: Option<PathBuf>,
    pub engine: String,
    /// Worker threads for classification (0 = all cores)
    pub threads: usize,
    pub batch_size: usize,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            match_score: DEFAULT_MATCH_SCORE,
            mismatch_penalty: DEFAULT_MISMATCH_PENALTY,
            gap_open: DEFAULT_GAP_OPEN,
            gap_extend: DEFAULT_GAP_EXTEND,
            min_score: 0,
            matrix: None,
            engine: EngineKind::default().to_string(),
            threads: 1,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl AlignmentConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read, or
    /// `ConfigError::Parse` for malformed JSON or unknown fields.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Check that the configuration can drive an alignment run.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidConfig` describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("match_score", self.match_score),
            ("mismatch_penalty", self.mismatch_penalty),
            ("gap_open", self.gap_open),
            ("gap_extend", self.gap_extend),
        ] {
            if !(1..=i32::from(i8::MAX)).contains(&value) {
                return Err(ConfigError::InvalidConfig(format!(
                    "{name} must be between 1 and {}, got {value}",
                    i8::MAX
                )));
            }
        }

        if self.batch_size == 0 {
            return Err(ConfigError::InvalidConfig(
                "batch_size must be at least 1".to_string(),
            ));
        }

        if let Some(matrix) = &self.matrix {
            if !matrix.is_file() {
                return Err(ConfigError::InvalidConfig(format!(
                    "Weight matrix file not found: {}",
                    matrix.display()
                )));
            }
        }

        Ok(())
    }

    /// Resolve the configured engine name.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Unavailable` for an unknown engine.
    pub fn engine_kind(&self) -> Result<EngineKind, EngineError> {
        self.engine.parse()
    }

    /// Substitution matrix: the weight-matrix file if one is set, otherwise
    /// uniform DNA scores.
    ///
    /// # Errors
    ///
    /// Returns `MatrixError` if the weight-matrix file is unreadable or
    /// malformed.
    pub fn build_matrix(&self) -> Result<ScoringMatrix, MatrixError> {
        match &self.matrix {
            Some(path) => ScoringMatrix::from_file(path),
            None => Ok(ScoringMatrix::dna(
                clamp_i8(self.match_score),
                clamp_i8(self.mismatch_penalty),
            )),
        }
    }

    #[must_use]
    pub fn classifier_config(&self) -> ClassifierConfig {
        ClassifierConfig {
            min_score: self.min_score,
            gap_open: self.gap_open,
            gap_extend: self.gap_extend,
            batch_size: self.batch_size,
        }
    }
}

#[allow(clippy::cast_possible_truncation)] // clamped to the i8 range first
fn clamp_i8(value: i32) -> i8 {
    value.clamp(i32::from(i8::MIN), i32::from(i8::MAX)) as i8
}
