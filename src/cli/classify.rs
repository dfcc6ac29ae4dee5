//! Classify command - credit each read to the control category it supports.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use tracing::{info, warn};

use crate::align::{AlignmentEngine, EngineKind, SmithWaterman};
use crate::classify::{CategoryTally, Classifier, RunSummary, TemplatePanel};
use crate::cli::{OutputFormat, ScoringArgs};
use crate::config::AlignmentConfig;
use crate::core::category::Category;
use crate::core::matrix::ScoringMatrix;
use crate::parsing::{open_sequences, ParseError, SequenceReader};

/// Arguments for the classify command
#[derive(Args)]
pub struct ClassifyArgs {
    /// Reads to classify (FASTA/FASTQ, optionally gzipped)
    #[arg(required = true)]
    pub query: PathBuf,

    /// Control templates named <category>[_N] (FASTA/FASTQ, optionally gzipped)
    #[arg(required = true)]
    pub templates: PathBuf,

    #[command(flatten)]
    pub scoring: ScoringArgs,

    /// Reads are only credited when their best score is above this [default: 0]
    #[arg(long)]
    pub min_score: Option<i32>,

    /// Worker threads; 0 uses all cores [default: 1]
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Reads scored together per parallel batch [default: 1024]
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Also write intron-retention-positive read ids to this file, one per line
    #[arg(long)]
    pub evidence: Option<PathBuf>,
}

impl ClassifyArgs {
    fn resolve_config(&self) -> anyhow::Result<AlignmentConfig> {
        let mut config = self.scoring.load_config()?;
        if let Some(value) = self.min_score {
            config.min_score = value;
        }
        if let Some(value) = self.threads {
            config.threads = value;
        }
        if let Some(value) = self.batch_size {
            config.batch_size = value;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Execute the classify command
///
/// # Errors
///
/// Returns an error if the configuration is invalid, an input cannot be
/// parsed, a template name has no category, or output cannot be written.
#[allow(clippy::needless_pass_by_value)]
pub fn run(args: ClassifyArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = args.resolve_config()?;
    let engine = config.engine_kind()?;
    let matrix = config.build_matrix().with_context(|| match &config.matrix {
        Some(path) => format!("Failed to load weight matrix {}", path.display()),
        None => "Failed to build scoring matrix".to_string(),
    })?;

    let panel = TemplatePanel::load(&args.templates, matrix.alphabet())
        .with_context(|| format!("Failed to load templates from {}", args.templates.display()))?;
    if panel.is_empty() {
        warn!(path = %args.templates.display(), "No templates found; every read will be rejected");
    }
    let [sj_pos, sj_neg, ir_pos, ir_neg] = panel.category_counts();
    info!(
        templates = panel.len(),
        sj_pos, sj_neg, ir_pos, ir_neg,
        engine = %engine,
        "Loaded template panel"
    );

    let reads = open_sequences(&args.query)
        .with_context(|| format!("Failed to open reads {}", args.query.display()))?;

    let mut tally = CategoryTally::new();
    let summary = match engine {
        EngineKind::Native => classify_reads(&SmithWaterman, &matrix, &panel, &config, reads, &mut tally),
    }
    .with_context(|| format!("Failed to read {}", args.query.display()))?;

    if let Some(path) = &args.evidence {
        write_evidence(path, &tally)
            .with_context(|| format!("Failed to write evidence file {}", path.display()))?;
    }

    match format {
        OutputFormat::Text => print_text(&tally, &summary, panel.len()),
        OutputFormat::Json => print_json(&tally, &summary)?,
        OutputFormat::Tsv => print_tsv(&tally),
    }

    Ok(())
}

fn classify_reads<E: AlignmentEngine>(
    engine: &E,
    matrix: &ScoringMatrix,
    panel: &TemplatePanel,
    config: &AlignmentConfig,
    reads: SequenceReader,
    tally: &mut CategoryTally,
) -> Result<RunSummary, ParseError> {
    let classifier = Classifier::new(engine, matrix, panel, config.classifier_config());

    if config.threads == 1 {
        classifier.classify_all(reads, tally)
    } else {
        // 0 lets rayon use every core
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build_global()
            .ok();
        info!(threads = rayon::current_num_threads(), "Classifying in parallel");
        classifier.classify_parallel(reads, tally)
    }
}

fn write_evidence(path: &Path, tally: &CategoryTally) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for id in tally.evidence() {
        writeln!(out, "{id}")?;
    }
    out.flush()
}

fn print_text(tally: &CategoryTally, summary: &RunSummary, templates: usize) {
    println!(
        "\nClassified {} reads against {templates} templates\n",
        summary.processed
    );

    println!("   {:<28} {:>10}", "Category", "Reads");
    for category in Category::ALL {
        println!("   {:<28} {:>10}", category.as_str(), tally.count(category));
    }

    println!(
        "\n   Rejected: {} below threshold, {} ambiguous",
        summary.below_threshold, summary.ambiguous
    );

    if tally.evidence().is_empty() {
        println!("\n   No intron retention evidence");
    } else {
        println!(
            "\n   Intron retention evidence ({} reads):",
            tally.evidence().len()
        );
        for id in tally.evidence() {
            println!("      {id}");
        }
    }
}

fn print_json(tally: &CategoryTally, summary: &RunSummary) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "counts": tally.counts(),
        "intron_retention_positive_reads": tally.evidence(),
        "processed": summary.processed,
        "rejected": {
            "below_threshold": summary.below_threshold,
            "ambiguous": summary.ambiguous,
        },
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv(tally: &CategoryTally) {
    println!("category\tcount");
    for (category, count) in tally.counts() {
        println!("{category}\t{count}");
    }
}
