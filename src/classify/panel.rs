//! The labeled template panel reads are classified against.

use std::path::Path;

use tracing::debug;

use crate::classify::ClassifyError;
use crate::core::alphabet::Alphabet;
use crate::core::category::{Category, CategoryError};
use crate::core::sequence::SequenceRecord;
use crate::parsing::read_sequences;

/// A control template with its category resolved from its name.
#[derive(Debug, Clone)]
pub struct Template {
    pub name: String,
    pub category: Category,
    pub sequence: Vec<u8>,
    encoded: Vec<u8>,
}

impl Template {
    /// Sequence encoded against the panel's alphabet
    #[must_use]
    pub fn encoded(&self) -> &[u8] {
        &self.encoded
    }
}

/// Templates in file order, encoded once up front.
#[derive(Debug, Clone, Default)]
pub struct TemplatePanel {
    templates: Vec<Template>,
}

impl TemplatePanel {
    /// Build a panel from parsed records.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::UnknownCategory` for the first record whose
    /// name does not map to a category.
    pub fn from_records(
        records: Vec<SequenceRecord>,
        alphabet: &Alphabet,
    ) -> Result<Self, CategoryError> {
        let templates = records
            .into_iter()
            .map(|record| {
                let category = Category::from_template_name(&record.id)?;
                let encoded = alphabet.encode(&record.sequence);
                Ok(Template {
                    name: record.id,
                    category,
                    sequence: record.sequence,
                    encoded,
                })
            })
            .collect::<Result<Vec<_>, CategoryError>>()?;

        Ok(Self { templates })
    }

    /// Read and validate a template file.
    ///
    /// # Errors
    ///
    /// Returns `ClassifyError::Parse` if the file cannot be read, or
    /// `ClassifyError::Category` if a template name has no category.
    pub fn load(path: &Path, alphabet: &Alphabet) -> Result<Self, ClassifyError> {
        let records = read_sequences(path)?;
        let panel = Self::from_records(records, alphabet)?;

        debug!(
            templates = panel.len(),
            path = %path.display(),
            "Loaded template panel"
        );
        Ok(panel)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    /// Number of templates per category, indexed by [`Category::index`].
    #[must_use]
    pub fn category_counts(&self) -> [usize; 4] {
        let mut counts = [0; 4];
        for template in &self.templates {
            counts[template.category.index()] += 1;
        }
        counts
    }
}
