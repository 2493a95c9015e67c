//! Extraction strategies
//!
//! A [`Strategy`] is one read-only lookup against a [`Document`]. Strategies
//! are plain data so that the per-field chains can live in configuration;
//! this module turns each variant into the document query it stands for.
//!
//! Variants go from most to least specific:
//!
//! ```text
//! structural_path      #main > div:nth-child(1) > form > input
//! class_signature      input.text-3xl.px-2.rounded-sm
//! attribute_presence   [data-value]
//! largest_text         longest visible text block under a scope
//! body_text            everything the page renders
//! ```

use super::document::Document;
use crate::error::{ExtractionError, Result};
use serde::{Deserialize, Serialize};

fn default_scope() -> String {
    "body".to_string()
}

/// A single lookup for one field's value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Strategy {
    /// Exact parent-to-child path, one CSS step per level
    StructuralPath {
        /// Steps joined with the child combinator
        steps: Vec<String>,
        /// Attribute to read before falling back to rendered text
        #[serde(default)]
        attribute: Option<String>,
    },

    /// Element carrying every listed class
    ClassSignature {
        /// Restrict matches to this tag
        #[serde(default)]
        tag: Option<String>,
        /// Raw class names (escaped when the selector is built)
        classes: Vec<String>,
        /// Attribute to read before falling back to rendered text
        #[serde(default)]
        attribute: Option<String>,
    },

    /// First element carrying an attribute, in document order
    AttributePresence {
        /// Attribute whose presence selects the element
        attribute: String,
        /// Restrict matches to this tag
        #[serde(default)]
        tag: Option<String>,
        /// Attribute to read; defaults to `attribute` itself
        #[serde(default)]
        read: Option<String>,
    },

    /// Descendant of `scope` with the most visible text
    LargestText {
        /// Selector for the subtree to search
        #[serde(default = "default_scope")]
        scope: String,
        /// Blocks shorter than this are ignored
        #[serde(default)]
        min_chars: usize,
    },

    /// Full rendered body text
    BodyText,
}

impl Strategy {
    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Strategy::StructuralPath { .. } => "structural_path",
            Strategy::ClassSignature { .. } => "class_signature",
            Strategy::AttributePresence { .. } => "attribute_presence",
            Strategy::LargestText { .. } => "largest_text",
            Strategy::BodyText => "body_text",
        }
    }

    /// Build a structural path strategy reading rendered text
    pub fn path<I, S>(steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Strategy::StructuralPath {
            steps: steps.into_iter().map(Into::into).collect(),
            attribute: None,
        }
    }

    /// Build a class signature strategy reading rendered text
    pub fn classes<I, S>(tag: Option<&str>, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Strategy::ClassSignature {
            tag: tag.map(String::from),
            classes: classes.into_iter().map(Into::into).collect(),
            attribute: None,
        }
    }

    /// Build an attribute presence strategy reading the attribute itself
    pub fn attribute<S: Into<String>>(attribute: S) -> Self {
        Strategy::AttributePresence {
            attribute: attribute.into(),
            tag: None,
            read: None,
        }
    }

    /// Build a largest-text strategy
    pub fn largest_text<S: Into<String>>(scope: S, min_chars: usize) -> Self {
        Strategy::LargestText {
            scope: scope.into(),
            min_chars,
        }
    }

    /// Read `attribute` before rendered text.
    ///
    /// For attribute presence this replaces the attribute being read, not the
    /// one being matched. Has no effect on text-block strategies.
    pub fn reading<S: Into<String>>(mut self, attribute: S) -> Self {
        let attribute = attribute.into();
        match &mut self {
            Strategy::StructuralPath { attribute: a, .. }
            | Strategy::ClassSignature { attribute: a, .. } => *a = Some(attribute),
            Strategy::AttributePresence { read, .. } => *read = Some(attribute),
            Strategy::LargestText { .. } | Strategy::BodyText => {}
        }
        self
    }

    /// CSS selector for element strategies, `None` for text-block ones
    pub fn selector(&self) -> Result<Option<String>> {
        let selector = match self {
            Strategy::StructuralPath { steps, .. } => {
                let steps: Vec<&str> = steps
                    .iter()
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .collect();
                if steps.is_empty() {
                    let reason = "structural path has no steps";
                    return Err(ExtractionError::EmptyStrategy(reason.into()).into());
                }
                steps.join(" > ")
            }
            Strategy::ClassSignature { tag, classes, .. } => {
                let classes: Vec<&str> = classes
                    .iter()
                    .map(|c| c.trim())
                    .filter(|c| !c.is_empty())
                    .collect();
                if classes.is_empty() {
                    let reason = "class signature has no classes";
                    return Err(ExtractionError::EmptyStrategy(reason.into()).into());
                }
                let mut selector = tag.clone().unwrap_or_default();
                for class in classes {
                    selector.push('.');
                    selector.push_str(&css_escape(class));
                }
                selector
            }
            Strategy::AttributePresence { attribute, tag, .. } => {
                let attribute = attribute.trim();
                if attribute.is_empty() {
                    let reason = "attribute presence has no attribute";
                    return Err(ExtractionError::EmptyStrategy(reason.into()).into());
                }
                let tag = tag.as_deref().unwrap_or("");
                format!("{}[{}]", tag, css_escape(attribute))
            }
            Strategy::LargestText { .. } | Strategy::BodyText => return Ok(None),
        };
        Ok(Some(selector))
    }

    /// Attribute read in preference to rendered text
    pub fn read_attribute(&self) -> Option<&str> {
        match self {
            Strategy::StructuralPath { attribute, .. }
            | Strategy::ClassSignature { attribute, .. } => attribute.as_deref(),
            Strategy::AttributePresence { attribute, read, .. } => {
                Some(read.as_deref().unwrap_or(attribute.as_str()))
            }
            Strategy::LargestText { .. } | Strategy::BodyText => None,
        }
    }

    /// Run this strategy against a document.
    ///
    /// Returns the raw, untrimmed value. Acceptance is the pipeline's call.
    pub async fn evaluate(&self, document: &dyn Document) -> Result<Option<String>> {
        match self {
            Strategy::LargestText { scope, min_chars } => {
                document.largest_text(scope, *min_chars).await
            }
            Strategy::BodyText => document.body_text().await,
            _ => match self.selector()? {
                Some(selector) => document.first_value(&selector, self.read_attribute()).await,
                None => Ok(None),
            },
        }
    }
}

/// Escape a class or attribute name for use in a CSS selector.
///
/// Utility-class frameworks produce names like `hover:bg-[#F6F7F9]` that
/// must be escaped before they can appear in a selector.
pub fn css_escape(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len() + 8);
    let leading_hyphen = ident.starts_with('-');

    for (i, ch) in ident.chars().enumerate() {
        match ch {
            'a'..='z' | 'A'..='Z' | '_' => out.push(ch),
            '-' if i > 0 || ident.len() > 1 => out.push(ch),
            '0'..='9' if i == 0 || (i == 1 && leading_hyphen) => {
                out.push_str(&format!("\\{:x} ", ch as u32));
            }
            '0'..='9' => out.push(ch),
            c if c.is_control() => out.push_str(&format!("\\{:x} ", c as u32)),
            c if !c.is_ascii() => out.push(c),
            c => {
                out.push('\\');
                out.push(c);
            }
        }
    }

    out
}
