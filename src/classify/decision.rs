//! Turning per-category best scores into a verdict.

use serde::Serialize;

use crate::core::category::Category;

/// Best primary score seen for each category while aligning one read.
/// Every category starts at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScorePanel {
    maxima: [i32; 4],
}

impl ScorePanel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `score` if it beats the current best for `category`.
    pub fn observe(&mut self, category: Category, score: i32) {
        let slot = &mut self.maxima[category.index()];
        *slot = (*slot).max(score);
    }

    #[must_use]
    pub fn get(&self, category: Category) -> i32 {
        self.maxima[category.index()]
    }

    /// Categories ordered by score, highest first. Equal scores keep
    /// declaration order.
    #[must_use]
    pub fn ranked(&self) -> [(Category, i32); 4] {
        let mut ranked = Category::ALL.map(|c| (c, self.get(c)));
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

impl FromIterator<(Category, i32)> for ScorePanel {
    fn from_iter<I: IntoIterator<Item = (Category, i32)>>(iter: I) -> Self {
        let mut panel = Self::new();
        for (category, score) in iter {
            panel.observe(category, score);
        }
        panel
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Best score did not exceed the minimum
    BelowThreshold,
    /// Two categories share the best score
    Ambiguous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Assigned(Category),
    Rejected(RejectReason),
}

/// Decide which category, if any, a read supports.
///
/// The read is rejected when the best score is at or below `min_score`, or
/// when the runner-up category has the same score.
#[must_use]
pub fn decide(panel: &ScorePanel, min_score: i32) -> Decision {
    let [(best_category, best), (_, second), ..] = panel.ranked();

    if best <= min_score {
        Decision::Rejected(RejectReason::BelowThreshold)
    } else if best == second {
        Decision::Rejected(RejectReason::Ambiguous)
    } else {
        Decision::Assigned(best_category)
    }
}
