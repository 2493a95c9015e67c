//! Extraction targets
//!
//! The semantic fields pulled out of a shared conversation page, each with
//! the placeholder reported when nothing on the page can be trusted.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder for text fields that could not be resolved
pub const UNABLE_TO_SCRAPE: &str = "Unable to scrape";

/// Placeholder for an unresolved conversation title
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Placeholder for an unresolved creation date
pub const UNKNOWN_DATE: &str = "Unknown Date";

/// A field to extract from the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExtractionTarget {
    /// Conversation title
    Title,
    /// Generated summary text
    Summary,
    /// Full transcript text
    Transcript,
    /// When the conversation was recorded
    CreatedDate,
}

impl ExtractionTarget {
    /// Every target, in record order
    pub const ALL: [ExtractionTarget; 4] = [
        ExtractionTarget::Title,
        ExtractionTarget::Summary,
        ExtractionTarget::Transcript,
        ExtractionTarget::CreatedDate,
    ];

    /// Field name used in records and logs
    pub fn name(&self) -> &'static str {
        match self {
            ExtractionTarget::Title => "title",
            ExtractionTarget::Summary => "summary",
            ExtractionTarget::Transcript => "transcript",
            ExtractionTarget::CreatedDate => "createdDate",
        }
    }

    /// Placeholder reported when every strategy comes up empty
    pub fn default_value(&self) -> &'static str {
        match self {
            ExtractionTarget::Title => UNKNOWN_TITLE,
            ExtractionTarget::Summary | ExtractionTarget::Transcript => UNABLE_TO_SCRAPE,
            ExtractionTarget::CreatedDate => UNKNOWN_DATE,
        }
    }
}

impl fmt::Display for ExtractionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        assert_eq!(ExtractionTarget::Title.default_value(), "Unknown Title");
        assert_eq!(
            ExtractionTarget::Summary.default_value(),
            "Unable to scrape"
        );
        assert_eq!(
            ExtractionTarget::Transcript.default_value(),
            "Unable to scrape"
        );
        assert_eq!(
            ExtractionTarget::CreatedDate.default_value(),
            "Unknown Date"
        );
    }

    #[test]
    fn test_names_match_record_fields() {
        let names: Vec<_> = ExtractionTarget::ALL.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["title", "summary", "transcript", "createdDate"]);
        assert_eq!(ExtractionTarget::CreatedDate.to_string(), "createdDate");
    }

    #[test]
    fn test_serde_uses_field_names() {
        let json = serde_json::to_string(&ExtractionTarget::CreatedDate).unwrap();
        assert_eq!(json, "\"createdDate\"");
    }
}
