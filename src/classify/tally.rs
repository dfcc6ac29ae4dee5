//! Running per-category counts and intron-retention evidence.

use std::collections::BTreeMap;

use crate::classify::decision::Decision;
use crate::core::category::Category;

/// Reads credited to each category, plus the ids of every read credited to
/// [`Category::IntronRetentionPositive`] in the order they were seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTally {
    counts: [u64; 4],
    evidence: Vec<String>,
}

impl CategoryTally {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit one read to `category`.
    pub fn record(&mut self, category: Category, query_id: &str) {
        self.counts[category.index()] += 1;
        if category == Category::IntronRetentionPositive {
            self.evidence.push(query_id.to_string());
        }
    }

    /// Credit the read if the decision assigned it. Returns whether the
    /// tally changed.
    pub fn apply(&mut self, decision: Decision, query_id: &str) -> bool {
        match decision {
            Decision::Assigned(category) => {
                self.record(category, query_id);
                true
            }
            Decision::Rejected(_) => false,
        }
    }

    /// Fold another tally into this one; its evidence is appended after ours.
    pub fn merge(&mut self, other: CategoryTally) {
        for (mine, theirs) in self.counts.iter_mut().zip(other.counts) {
            *mine += theirs;
        }
        self.evidence.extend(other.evidence);
    }

    #[must_use]
    pub fn count(&self, category: Category) -> u64 {
        self.counts[category.index()]
    }

    /// Reads credited to any category.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Counts keyed by category, in declaration order.
    #[must_use]
    pub fn counts(&self) -> BTreeMap<Category, u64> {
        Category::ALL.into_iter().map(|c| (c, self.count(c))).collect()
    }

    #[must_use]
    pub fn evidence(&self) -> &[String] {
        &self.evidence
    }
}
