//! Ordered-fallback field extraction
//!
//! For each target the pipeline walks its strategy chain in order and keeps
//! the first value that survives [`accept`]. Strategies run one at a time: a
//! later, more general strategy is only consulted once every earlier one has
//! come up empty. Errors and panics inside a strategy count as "no value".

use super::document::Document;
use super::table::StrategyTable;
use super::target::ExtractionTarget;
use crate::error::panic_message;
use futures::FutureExt;
use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use tracing::{debug, info, instrument, warn};

/// Trim `raw` and keep it unless it is blank or equals `placeholder`.
///
/// Rejecting the placeholder means a page that literally renders
/// "Unable to scrape" is reported the same way as a page with nothing on it.
pub fn accept(raw: &str, placeholder: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() || value == placeholder {
        None
    } else {
        Some(value.to_string())
    }
}

/// Resolved values, keyed by target
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues {
    values: BTreeMap<ExtractionTarget, String>,
}

impl FieldValues {
    /// No values resolved
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value for `target`
    pub fn insert<S: Into<String>>(&mut self, target: ExtractionTarget, value: S) {
        self.values.insert(target, value.into());
    }

    /// Value for `target`, if it was extracted
    pub fn get(&self, target: ExtractionTarget) -> Option<&str> {
        self.values.get(&target).map(String::as_str)
    }

    /// Number of resolved targets
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing was resolved
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values in target order
    pub fn iter(&self) -> impl Iterator<Item = (ExtractionTarget, &str)> {
        self.values
            .iter()
            .map(|(target, value)| (*target, value.as_str()))
    }
}

/// Walks strategy chains against a document
#[derive(Debug, Clone, Default)]
pub struct ExtractionPipeline {
    table: StrategyTable,
}

impl ExtractionPipeline {
    /// Pipeline over the given strategy table
    pub fn new(table: StrategyTable) -> Self {
        Self { table }
    }

    /// Strategy table in use
    pub fn table(&self) -> &StrategyTable {
        &self.table
    }

    /// Resolve one target. Always returns a trimmed value or the target's
    /// placeholder.
    #[instrument(skip_all, fields(target = %target))]
    pub async fn extract(&self, document: &dyn Document, target: ExtractionTarget) -> String {
        let placeholder = target.default_value();

        for (index, strategy) in self.table.strategies(target).iter().enumerate() {
            let outcome = AssertUnwindSafe(strategy.evaluate(document))
                .catch_unwind()
                .await;

            match outcome {
                Ok(Ok(Some(raw))) => match accept(&raw, placeholder) {
                    Some(value) => {
                        debug!(
                            strategy = strategy.kind(),
                            index,
                            chars = value.chars().count(),
                            "Strategy matched"
                        );
                        return value;
                    }
                    None => debug!(
                        strategy = strategy.kind(),
                        index,
                        "Strategy returned blank or placeholder text"
                    ),
                },
                Ok(Ok(None)) => debug!(strategy = strategy.kind(), index, "Strategy found nothing"),
                Ok(Err(e)) => warn!(strategy = strategy.kind(), index, "Strategy failed: {}", e),
                Err(payload) => warn!(
                    strategy = strategy.kind(),
                    index,
                    "Strategy panicked: {}",
                    panic_message(payload.as_ref())
                ),
            }
        }

        info!("All strategies exhausted, using \"{}\"", placeholder);
        placeholder.to_string()
    }

    /// Resolve every target in `targets`, in order
    pub async fn extract_all(
        &self,
        document: &dyn Document,
        targets: &[ExtractionTarget],
    ) -> FieldValues {
        let mut values = FieldValues::new();
        for &target in targets {
            let value = self.extract(document, target).await;
            info!("Extracted {}: {}", target, preview(&value));
            values.insert(target, value);
        }
        values
    }
}

fn preview(value: &str) -> String {
    const MAX: usize = 80;
    if value.chars().count() <= MAX {
        value.to_string()
    } else {
        let head: String = value.chars().take(MAX).collect();
        format!("{}…", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_trims() {
        assert_eq!(
            accept("  Meeting Notes  \n", "Unknown Title"),
            Some("Meeting Notes".to_string())
        );
    }

    #[test]
    fn test_accept_rejects_blank_and_placeholder() {
        assert_eq!(accept("", "Unable to scrape"), None);
        assert_eq!(accept(" \n\t ", "Unable to scrape"), None);
        assert_eq!(accept("  Unable to scrape ", "Unable to scrape"), None);
        assert_eq!(
            accept("Unable to scrape", "Unknown Title"),
            Some("Unable to scrape".to_string())
        );
    }

    #[test]
    fn test_field_values() {
        let mut values = FieldValues::new();
        assert!(values.is_empty());
        values.insert(ExtractionTarget::Summary, "s");
        values.insert(ExtractionTarget::Title, "t");
        assert_eq!(values.len(), 2);
        assert_eq!(values.get(ExtractionTarget::Title), Some("t"));
        assert_eq!(values.get(ExtractionTarget::CreatedDate), None);

        let order: Vec<_> = values.iter().map(|(t, _)| t).collect();
        assert_eq!(
            order,
            vec![ExtractionTarget::Title, ExtractionTarget::Summary]
        );
    }

    #[test]
    fn test_preview_truncates() {
        assert_eq!(preview("short"), "short");
        let long = "x".repeat(200);
        assert_eq!(preview(&long).chars().count(), 81);
    }
}
