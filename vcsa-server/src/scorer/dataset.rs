//! Labeled sentiment corpus loading
//!
//! Corpus format is CSV with three columns: `item_id,label,text`. The text
//! column is the remainder of the line after the second comma and may itself
//! contain commas. A header row is accepted and skipped. Labels are `1`/`0`
//! (also `true`/`false`).

use std::path::Path;
use thiserror::Error;

/// Embedded default corpus, used when no `dataset_path` is configured
const EMBEDDED_CORPUS: &str = include_str!("../../data/sentiment_corpus.csv");

/// One labeled training example
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledExample {
    /// Sentiment label (true = positive)
    pub label: bool,
    /// Example text
    pub text: String,
}

/// Error raised while loading a corpus
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Corpus file could not be read
    #[error("failed to read corpus: {0}")]
    Io(#[from] std::io::Error),

    /// A data row did not match the expected format
    #[error("corpus line {line}: {reason}")]
    BadRow { line: usize, reason: String },

    /// Not enough examples to train on
    #[error("corpus holds {0} examples; at least 2 are required")]
    TooSmall(usize),

    /// All examples carry the same label
    #[error("corpus holds only one class; both positive and negative examples are required")]
    SingleClass,
}

/// A labeled sentiment corpus
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Examples in file order
    pub examples: Vec<LabeledExample>,
}

impl Dataset {
    /// Load the embedded default corpus
    pub fn embedded() -> Result<Self, DatasetError> {
        Self::from_csv(EMBEDDED_CORPUS)
    }

    /// Load a corpus from a CSV file
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_csv(&content)
    }

    /// Parse corpus CSV content
    pub fn from_csv(content: &str) -> Result<Self, DatasetError> {
        let mut examples = Vec::new();
        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let mut fields = line.splitn(3, ',');
            let _item_id = fields.next().unwrap_or_default();
            let label_field = fields.next().ok_or_else(|| DatasetError::BadRow {
                line: index + 1,
                reason: "missing label column".to_string(),
            })?;
            let text = fields.next().ok_or_else(|| DatasetError::BadRow {
                line: index + 1,
                reason: "missing text column".to_string(),
            })?;

            let label = match label_field.trim() {
                "1" | "true" => true,
                "0" | "false" => false,
                other => {
                    // Header row is tolerated in first position only
                    if index == 0 {
                        continue;
                    }
                    return Err(DatasetError::BadRow {
                        line: index + 1,
                        reason: format!("unrecognized label '{}'", other),
                    });
                }
            };

            examples.push(LabeledExample {
                label,
                text: text.to_string(),
            });
        }

        if examples.len() < 2 {
            return Err(DatasetError::TooSmall(examples.len()));
        }
        let positives = examples.iter().filter(|e| e.label).count();
        if positives == 0 || positives == examples.len() {
            return Err(DatasetError::SingleClass);
        }

        Ok(Self { examples })
    }

    /// Number of examples
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    /// Whether the corpus is empty
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }
}
