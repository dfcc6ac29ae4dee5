//! Pairwise local alignment.
//!
//! The classifier talks to an alignment engine only through
//! [`AlignmentEngine`]: build a [`Profile`](AlignmentEngine::Profile) for a
//! query once, then align it against any number of references. Profiles are
//! plain owned values, so they are released when they go out of scope on
//! every exit path.
//!
//! - [`SmithWaterman`]: the bundled affine-gap local aligner
//! - [`AlignmentResult`]: scores, coordinates and CIGAR of one alignment
//! - [`trace::reconstruct`]: CIGAR string and display rows from a result

use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::core::matrix::ScoringMatrix;

pub mod smith_waterman;
pub mod trace;

pub use smith_waterman::SmithWaterman;
pub use trace::AlignmentTrace;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Alignment engine '{0}' is not available (supported: native, ssw)")]
    Unavailable(String),
}

/// CIGAR operation kinds, in the order of their SAM numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CigarKind {
    /// Alignment match (sequence match or mismatch)
    Match,
    /// Insertion to the reference (consumes query)
    Insertion,
    /// Deletion from the reference (consumes reference)
    Deletion,
    /// Skipped region
    Skip,
    SoftClip,
    HardClip,
    Padding,
    /// Sequence match (`=`)
    SequenceMatch,
    /// Sequence mismatch (`X`)
    SequenceMismatch,
}

impl CigarKind {
    /// SAM letter for this operation.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::Match => 'M',
            Self::Insertion => 'I',
            Self::Deletion => 'D',
            Self::Skip => 'N',
            Self::SoftClip => 'S',
            Self::HardClip => 'H',
            Self::Padding => 'P',
            Self::SequenceMatch => '=',
            Self::SequenceMismatch => 'X',
        }
    }

    /// Kind for a SAM numeric code. Codes above 8 collapse to `M`.
    #[must_use]
    pub const fn from_code(code: u32) -> Self {
        match code {
            1 => Self::Insertion,
            2 => Self::Deletion,
            3 => Self::Skip,
            4 => Self::SoftClip,
            5 => Self::HardClip,
            6 => Self::Padding,
            7 => Self::SequenceMatch,
            8 => Self::SequenceMismatch,
            _ => Self::Match,
        }
    }
}

/// One run of a CIGAR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CigarOp {
    pub len: u32,
    pub kind: CigarKind,
}

impl CigarOp {
    #[must_use]
    pub const fn new(len: u32, kind: CigarKind) -> Self {
        Self { len, kind }
    }

    /// Decode the packed `len << 4 | code` form used by SSW-style engines.
    #[must_use]
    pub const fn from_packed(packed: u32) -> Self {
        Self {
            len: packed >> 4,
            kind: CigarKind::from_code(packed & 0xf),
        }
    }
}

/// Render a CIGAR as `<len><letter>` runs.
#[must_use]
pub fn cigar_string(ops: &[CigarOp]) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(ops.len() * 4);
    for op in ops {
        // Writing to a String cannot fail
        let _ = write!(out, "{}{}", op.len, op.kind.letter());
    }
    out
}

/// Result of aligning one query profile against one reference.
///
/// Coordinates are 0-based and inclusive. A `score` of zero means no
/// alignment was found; coordinates are then zero and `cigar` is empty.
/// Score-only alignments leave the begin coordinates at zero and `cigar`
/// empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlignmentResult {
    pub score: i32,
    /// Best score outside the masked window around `ref_end`
    pub secondary_score: i32,
    pub ref_begin: usize,
    pub ref_end: usize,
    pub query_begin: usize,
    pub query_end: usize,
    pub cigar: Vec<CigarOp>,
}

impl AlignmentResult {
    #[must_use]
    pub fn unaligned() -> Self {
        Self {
            score: 0,
            secondary_score: 0,
            ref_begin: 0,
            ref_end: 0,
            query_begin: 0,
            query_end: 0,
            cigar: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_aligned(&self) -> bool {
        self.score > 0
    }
}

/// Gap penalties and masking for one alignment call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignParams {
    /// Cost of the first position of a gap
    pub gap_open: i32,
    /// Cost of each further position of a gap
    pub gap_extend: i32,
    /// Half-width of the window around the primary end that is excluded
    /// when searching for the secondary score
    pub mask_len: usize,
    /// Recover begin coordinates and the CIGAR. Without it only the scores
    /// and end coordinates are filled in.
    pub traceback: bool,
}

impl AlignParams {
    #[must_use]
    pub fn new(gap_open: i32, gap_extend: i32, query_len: usize) -> Self {
        Self {
            gap_open,
            gap_extend,
            mask_len: mask_length(query_len),
            traceback: true,
        }
    }

    /// Same penalties, but skip the traceback.
    #[must_use]
    pub fn score_only(self) -> Self {
        Self {
            traceback: false,
            ..self
        }
    }
}

/// Mask length for a query: half its length for queries over 30 bases,
/// otherwise 15.
#[must_use]
pub fn mask_length(query_len: usize) -> usize {
    if query_len > 30 {
        query_len / 2
    } else {
        15
    }
}

/// A local alignment engine.
///
/// Implementations must be deterministic and side-effect free: the same
/// profile and reference always produce the same result.
pub trait AlignmentEngine: Sync {
    type Profile: Send + Sync;

    /// Precompute per-query state for repeated alignment.
    fn prepare_profile(&self, query: &[u8], matrix: &ScoringMatrix) -> Self::Profile;

    /// Align a prepared query against an encoded reference.
    fn align(&self, profile: &Self::Profile, reference: &[u8], params: &AlignParams)
        -> AlignmentResult;
}

/// Engines that can be selected by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineKind {
    #[default]
    Native,
}

impl FromStr for EngineKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "native" | "ssw" => Ok(Self::Native),
            _ => Err(EngineError::Unavailable(s.to_string())),
        }
    }
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Native => write!(f, "native"),
        }
    }
}
