//! Result assembly
//!
//! One [`ExtractionResult`] is produced for every input URL, whatever
//! happened while loading it. On failure every field is forced to its
//! placeholder and `error` carries the reason.

use crate::extraction::{accept, ExtractionTarget, FieldValues};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Per-URL output record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// URL as given in the task
    pub url: String,
    /// Conversation title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Summary text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Transcript text, when transcript extraction is enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    /// Creation date as rendered by the page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,
    /// Why the page could not be scraped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// ISO-8601 UTC timestamp, millisecond precision
    pub scraped_at: String,
}

impl ExtractionResult {
    /// Record for a page that could not be loaded or processed
    pub fn failed<S: Into<String>>(url: &str, targets: &[ExtractionTarget], error: S) -> Self {
        assemble(url, targets, &FieldValues::new(), Some(error.into()))
    }

    /// Value recorded for `target`
    pub fn field(&self, target: ExtractionTarget) -> Option<&str> {
        match target {
            ExtractionTarget::Title => self.title.as_deref(),
            ExtractionTarget::Summary => self.summary.as_deref(),
            ExtractionTarget::Transcript => self.transcript.as_deref(),
            ExtractionTarget::CreatedDate => self.created_date.as_deref(),
        }
    }

    fn field_mut(&mut self, target: ExtractionTarget) -> &mut Option<String> {
        match target {
            ExtractionTarget::Title => &mut self.title,
            ExtractionTarget::Summary => &mut self.summary,
            ExtractionTarget::Transcript => &mut self.transcript,
            ExtractionTarget::CreatedDate => &mut self.created_date,
        }
    }

    /// Whether this record carries an error
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Current time in the record timestamp format
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Build the record for `url`.
///
/// Each target in `targets` gets a field. With an `error`, every field is
/// its placeholder. Otherwise values come from `fields`, re-checked so that a
/// missing, blank or untrimmed value still lands as trimmed text or the
/// placeholder.
pub fn assemble(
    url: &str,
    targets: &[ExtractionTarget],
    fields: &FieldValues,
    error: Option<String>,
) -> ExtractionResult {
    let mut record = ExtractionResult {
        url: url.to_string(),
        title: None,
        summary: None,
        transcript: None,
        created_date: None,
        error: None,
        scraped_at: timestamp(),
    };

    for &target in targets {
        let placeholder = target.default_value();
        let value = match (&error, fields.get(target)) {
            (None, Some(raw)) => {
                accept(raw, placeholder).unwrap_or_else(|| placeholder.to_string())
            }
            _ => placeholder.to_string(),
        };
        *record.field_mut(target) = Some(value);
    }

    record.error = error;
    record
}
