use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::align::{AlignParams, AlignmentEngine};
use crate::classify::decision::{decide, Decision, RejectReason, ScorePanel};
use crate::classify::panel::TemplatePanel;
use crate::classify::tally::CategoryTally;
use crate::core::matrix::ScoringMatrix;
use crate::core::sequence::SequenceRecord;
use crate::parsing::ParseError;

/// Default number of reads scored together in parallel mode
pub const DEFAULT_BATCH_SIZE: usize = 1024;

/// Configuration for the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifierConfig {
    /// A read is only credited when its best score exceeds this
    pub min_score: i32,
    pub gap_open: i32,
    pub gap_extend: i32,
    /// Reads per parallel batch
    pub batch_size: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_score: 0,
            gap_open: 3,
            gap_extend: 1,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Outcome counts for a classification run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub processed: u64,
    pub assigned: u64,
    pub below_threshold: u64,
    pub ambiguous: u64,
}

impl RunSummary {
    pub fn record(&mut self, decision: Decision) {
        self.processed += 1;
        match decision {
            Decision::Assigned(_) => self.assigned += 1,
            Decision::Rejected(RejectReason::BelowThreshold) => self.below_threshold += 1,
            Decision::Rejected(RejectReason::Ambiguous) => self.ambiguous += 1,
        }
    }

    #[must_use]
    pub fn rejected(&self) -> u64 {
        self.below_threshold + self.ambiguous
    }
}

/// Classifies reads against a template panel with a given engine.
pub struct Classifier<'a, E: AlignmentEngine> {
    engine: &'a E,
    matrix: &'a ScoringMatrix,
    panel: &'a TemplatePanel,
    config: ClassifierConfig,
}

impl<'a, E: AlignmentEngine> Classifier<'a, E> {
    pub fn new(
        engine: &'a E,
        matrix: &'a ScoringMatrix,
        panel: &'a TemplatePanel,
        config: ClassifierConfig,
    ) -> Self {
        Self {
            engine,
            matrix,
            panel,
            config,
        }
    }

    /// Align one read against every template (forward strand only) and keep
    /// the best score per category.
    #[must_use]
    pub fn score_query(&self, query: &SequenceRecord) -> ScorePanel {
        let encoded = self.matrix.alphabet().encode(&query.sequence);
        let profile = self.engine.prepare_profile(&encoded, self.matrix);
        let params = AlignParams::new(self.config.gap_open, self.config.gap_extend, query.len())
            .score_only();

        self.panel
            .iter()
            .map(|template| {
                let result = self.engine.align(&profile, template.encoded(), &params);
                (template.category, result.score)
            })
            .collect()
    }

    /// Verdict for one read, without touching any tally.
    #[must_use]
    pub fn decide(&self, query: &SequenceRecord) -> Decision {
        let scores = self.score_query(query);
        let decision = decide(&scores, self.config.min_score);
        debug!(query = %query.id, ?decision, "Classified read");
        decision
    }

    /// Classify one read and credit it to `tally` if it is assigned.
    pub fn classify(&self, query: &SequenceRecord, tally: &mut CategoryTally) -> Decision {
        let decision = self.decide(query);
        tally.apply(decision, &query.id);
        decision
    }

    /// Classify reads one at a time, in input order.
    ///
    /// # Errors
    ///
    /// Returns the first `ParseError` produced by `queries`. Reads before it
    /// have already been credited to `tally`.
    pub fn classify_all<I>(
        &self,
        queries: I,
        tally: &mut CategoryTally,
    ) -> Result<RunSummary, ParseError>
    where
        I: IntoIterator<Item = Result<SequenceRecord, ParseError>>,
    {
        let mut summary = RunSummary::default();
        for query in queries {
            let query = query?;
            summary.record(self.classify(&query, tally));
        }

        log_summary(&summary, tally);
        Ok(summary)
    }

    /// Classify reads in batches, scoring each batch on the current rayon
    /// pool. Decisions are applied to `tally` in input order, so the result
    /// matches [`Classifier::classify_all`].
    ///
    /// # Errors
    ///
    /// Returns the first `ParseError` produced by `queries`. Complete
    /// batches before it have already been credited to `tally`.
    pub fn classify_parallel<I>(
        &self,
        queries: I,
        tally: &mut CategoryTally,
    ) -> Result<RunSummary, ParseError>
    where
        I: IntoIterator<Item = Result<SequenceRecord, ParseError>>,
    {
        let batch_size = self.config.batch_size.max(1);
        let mut summary = RunSummary::default();
        let mut batch: Vec<SequenceRecord> = Vec::with_capacity(batch_size);

        for query in queries {
            batch.push(query?);
            if batch.len() == batch_size {
                self.classify_batch(&batch, tally, &mut summary);
                batch.clear();
            }
        }
        if !batch.is_empty() {
            self.classify_batch(&batch, tally, &mut summary);
        }

        log_summary(&summary, tally);
        Ok(summary)
    }

    fn classify_batch(
        &self,
        batch: &[SequenceRecord],
        tally: &mut CategoryTally,
        summary: &mut RunSummary,
    ) {
        let decisions: Vec<Decision> = batch.par_iter().map(|query| self.decide(query)).collect();

        for (query, decision) in batch.iter().zip(decisions) {
            tally.apply(decision, &query.id);
            summary.record(decision);
        }
        debug!(reads = batch.len(), processed = summary.processed, "Finished batch");
    }
}

fn log_summary(summary: &RunSummary, tally: &CategoryTally) {
    info!(
        processed = summary.processed,
        assigned = summary.assigned,
        below_threshold = summary.below_threshold,
        ambiguous = summary.ambiguous,
        intron_retention_positive = tally.evidence().len(),
        "Classification complete"
    );
}
