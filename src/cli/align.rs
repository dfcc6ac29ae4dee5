//! Align command - report local alignments of queries against targets.

use std::borrow::Cow;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use tracing::{info, warn};

use crate::align::{AlignParams, AlignmentEngine, AlignmentResult, EngineKind, SmithWaterman};
use crate::cli::{OutputFormat, ScoringArgs};
use crate::config::AlignmentConfig;
use crate::core::matrix::ScoringMatrix;
use crate::core::sequence::{reverse_complement, SequenceRecord};
use crate::parsing::{open_sequences, read_sequences, SequenceReader};
use crate::report::{sam, text, AlignedPair, AlignmentSummary, Strand};

/// Arguments for the align command
#[derive(Args)]
pub struct AlignArgs {
    /// Target sequences (FASTA/FASTQ, optionally gzipped)
    #[arg(required = true)]
    pub target: PathBuf,

    /// Query sequences (FASTA/FASTQ, optionally gzipped)
    #[arg(required = true)]
    pub query: PathBuf,

    #[command(flatten)]
    pub scoring: ScoringArgs,

    /// Show the aligned rows (required for SAM output)
    #[arg(short = 'c', long)]
    pub path: bool,

    /// Only report alignments scoring at least this
    #[arg(short = 'f', long, default_value = "0")]
    pub threshold: i32,

    /// Also align the reverse complement and report the better strand
    #[arg(short = 'r', long)]
    pub best: bool,

    /// Write SAM instead of the text report (requires --path)
    #[arg(short = 's', long)]
    pub sam: bool,

    /// Write a SAM header (with --sam)
    #[arg(long)]
    pub header: bool,
}

/// Where each reported alignment goes
enum Sink<W: Write> {
    Text { out: W, show_path: bool },
    Sam { out: W },
    Json { records: Vec<AlignmentSummary> },
    Tsv { out: W },
}

impl<W: Write> Sink<W> {
    fn emit(&mut self, pair: &AlignedPair<'_>) -> io::Result<()> {
        match self {
            Self::Text { out, show_path } => text::write_stanza(out, pair, *show_path),
            Self::Sam { out } => sam::write_record(out, pair),
            Self::Json { records } => {
                records.push(pair.summary());
                Ok(())
            }
            Self::Tsv { out } => writeln!(out, "{}", pair.summary().to_tsv()),
        }
    }
}

/// Execute the align command
///
/// # Errors
///
/// Returns an error if the configuration is invalid, an input cannot be
/// parsed, or output cannot be written.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: AlignArgs, format: OutputFormat) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = args.scoring.load_config()?;
    config.validate()?;
    let engine = config.engine_kind()?;
    let matrix = config.build_matrix().with_context(|| match &config.matrix {
        Some(path) => format!("Failed to load weight matrix {}", path.display()),
        None => "Failed to build scoring matrix".to_string(),
    })?;

    let mut sam_output = args.sam;
    if sam_output && !args.path {
        warn!("SAM output is only available together with --path; writing the text report");
        sam_output = false;
    }

    let targets = read_sequences(&args.target)
        .with_context(|| format!("Failed to read targets {}", args.target.display()))?;
    let queries = open_sequences(&args.query)
        .with_context(|| format!("Failed to open queries {}", args.query.display()))?;
    info!(targets = targets.len(), engine = %engine, "Loaded targets");

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let mut sink = match format {
        OutputFormat::Text if sam_output => {
            if args.header {
                sam::write_header(&mut out, &targets)?;
            }
            Sink::Sam { out }
        }
        OutputFormat::Text => Sink::Text {
            out,
            show_path: args.path,
        },
        OutputFormat::Json => Sink::Json {
            records: Vec::new(),
        },
        OutputFormat::Tsv => {
            writeln!(out, "{}", AlignmentSummary::TSV_HEADER)?;
            Sink::Tsv { out }
        }
    };

    let aligned = match engine {
        EngineKind::Native => {
            align_all(&SmithWaterman, &matrix, &config, &args, &targets, queries, &mut sink)
        }
    }
    .with_context(|| format!("Failed to align {}", args.query.display()))?;

    match sink {
        Sink::Json { records } => {
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Sink::Text { mut out, .. } | Sink::Sam { mut out } | Sink::Tsv { mut out } => {
            out.flush()?;
        }
    }

    info!(
        alignments = aligned,
        elapsed = ?start.elapsed(),
        "Alignment complete"
    );
    Ok(())
}

/// Align every query against every target, emitting alignments that reach
/// the threshold. Returns the number emitted.
fn align_all<E: AlignmentEngine, W: Write>(
    engine: &E,
    matrix: &ScoringMatrix,
    config: &AlignmentConfig,
    args: &AlignArgs,
    targets: &[SequenceRecord],
    queries: SequenceReader,
    sink: &mut Sink<W>,
) -> anyhow::Result<u64> {
    let alphabet = matrix.alphabet();
    let encoded_targets: Vec<Vec<u8>> = targets
        .iter()
        .map(|target| alphabet.encode(&target.sequence))
        .collect();

    let mut emitted = 0u64;
    for query in queries {
        let query = query?;
        let params = AlignParams::new(config.gap_open, config.gap_extend, query.len());
        let forward = engine.prepare_profile(&alphabet.encode(&query.sequence), matrix);

        let reverse_bases = args.best.then(|| reverse_complement(&query.sequence));
        let reverse = reverse_bases
            .as_ref()
            .map(|bases| engine.prepare_profile(&alphabet.encode(bases), matrix));

        for (target, encoded) in targets.iter().zip(&encoded_targets) {
            let best_strand = |params: &AlignParams| {
                pick_strand(
                    engine.align(&forward, encoded, params),
                    reverse
                        .as_ref()
                        .map(|profile| engine.align(profile, encoded, params)),
                )
            };

            let (strand, result) = if args.threshold > 0 {
                // Only pairs that clear the threshold are traced back
                let (strand, scored) = best_strand(&params.score_only());
                if scored.score < args.threshold {
                    continue;
                }
                let profile = match (strand, &reverse) {
                    (Strand::Reverse, Some(profile)) => profile,
                    _ => &forward,
                };
                (strand, engine.align(profile, encoded, &params))
            } else {
                best_strand(&params)
            };

            let bases = match (strand, &reverse_bases) {
                (Strand::Reverse, Some(bases)) => Cow::Borrowed(bases.as_slice()),
                _ => Cow::Borrowed(query.sequence.as_slice()),
            };
            let pair = AlignedPair::new(target, &query, strand, bases, result);
            sink.emit(&pair)?;
            emitted += 1;
        }
    }

    Ok(emitted)
}

/// Forward wins only when it scores strictly higher than the reverse
/// complement.
fn pick_strand(
    forward: AlignmentResult,
    reverse: Option<AlignmentResult>,
) -> (Strand, AlignmentResult) {
    match reverse {
        Some(reverse) if reverse.score >= forward.score => (Strand::Reverse, reverse),
        _ => (Strand::Forward, forward),
    }
}
