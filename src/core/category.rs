use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CategoryError {
    #[error("Unknown category '{label}' derived from template '{template}'")]
    UnknownCategory { template: String, label: String },
}

/// Read-support category of a control template.
///
/// Declaration order is the tie-break order when ranking category scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    SpliceJunctionPositive,
    SpliceJunctionNegative,
    IntronRetentionPositive,
    IntronRetentionNegative,
}

impl Category {
    /// All categories in declaration order.
    pub const ALL: [Category; 4] = [
        Category::SpliceJunctionPositive,
        Category::SpliceJunctionNegative,
        Category::IntronRetentionPositive,
        Category::IntronRetentionNegative,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SpliceJunctionPositive => "splice_junction_positive",
            Self::SpliceJunctionNegative => "splice_junction_negative",
            Self::IntronRetentionPositive => "intron_retention_positive",
            Self::IntronRetentionNegative => "intron_retention_negative",
        }
    }

    /// Position in [`Category::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Parse an exact category label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == label)
    }

    /// Derive the category of a template from its name.
    ///
    /// One trailing `_<digits>` suffix is stripped before matching, so
    /// `intron_retention_positive_12` and `intron_retention_positive` both
    /// map to [`Category::IntronRetentionPositive`].
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::UnknownCategory` if the stripped name is not one
    /// of the four known labels.
    pub fn from_template_name(name: &str) -> Result<Self, CategoryError> {
        let label = strip_numeric_suffix(name);
        Self::from_label(label).ok_or_else(|| CategoryError::UnknownCategory {
            template: name.to_string(),
            label: label.to_string(),
        })
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Remove one trailing `_<digits>` from `name`, if present.
fn strip_numeric_suffix(name: &str) -> &str {
    match name.rsplit_once('_') {
        Some((stem, digits))
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) =>
        {
            stem
        }
        _ => name,
    }
}
