//! Page structure snapshots for debugging strategy choice
//!
//! Nothing here feeds back into extraction. A snapshot is logged so that,
//! when a page update breaks a chain, the new class names and attribute hits
//! are visible in the run log without re-opening the page by hand.

use super::strategy::Strategy;
use super::table::StrategyTable;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default number of classed elements sampled
pub const DEFAULT_SAMPLE_LIMIT: usize = 50;

/// What to include in a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotOptions {
    /// Maximum number of elements sampled
    pub sample_limit: usize,
    /// Attributes to count across the page
    pub attributes: Vec<String>,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            sample_limit: DEFAULT_SAMPLE_LIMIT,
            attributes: Vec::new(),
        }
    }
}

impl SnapshotOptions {
    /// Sample every attribute an attribute-presence strategy in `table` relies on
    pub fn for_table(table: &StrategyTable, sample_limit: usize) -> Self {
        let mut attributes: Vec<String> = Vec::new();
        for strategy in table.iter().flat_map(|(_, strategies)| strategies) {
            if let Strategy::AttributePresence { attribute, .. } = strategy {
                if !attributes.contains(attribute) {
                    attributes.push(attribute.clone());
                }
            }
        }
        Self {
            sample_limit,
            attributes,
        }
    }
}

/// One sampled element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSample {
    /// Lowercase tag name
    pub tag: String,
    /// Element id, if any
    pub id: Option<String>,
    /// Class list in source order
    pub classes: Vec<String>,
}

impl ElementSample {
    /// `tag#id.class.class`, unescaped
    pub fn signature(&self) -> String {
        let mut signature = self.tag.clone();
        if let Some(id) = &self.id {
            signature.push('#');
            signature.push_str(id);
        }
        for class in &self.classes {
            signature.push('.');
            signature.push_str(class);
        }
        signature
    }
}

/// How often an attribute occurs on the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeHit {
    /// Attribute name
    pub attribute: String,
    /// Elements carrying it
    pub count: usize,
    /// Value on the first element where it is non-blank
    pub first_value: Option<String>,
}

/// Read-only structural sample of a page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticSnapshot {
    /// Total elements in the document
    pub element_count: usize,
    /// Classed elements, in document order
    pub samples: Vec<ElementSample>,
    /// One entry per sampled attribute
    pub attribute_hits: Vec<AttributeHit>,
}

impl DiagnosticSnapshot {
    /// Emit the snapshot at debug level
    pub fn log(&self) {
        debug!(
            elements = self.element_count,
            sampled = self.samples.len(),
            "Page structure snapshot"
        );
        for sample in &self.samples {
            debug!("  {}", sample.signature());
        }
        for hit in &self.attribute_hits {
            debug!(
                attribute = %hit.attribute,
                count = hit.count,
                first_value = ?hit.first_value,
                "Attribute presence"
            );
        }
    }
}
