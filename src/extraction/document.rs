//! Read-only document handles
//!
//! [`Document`] is the boundary between strategies and whatever holds the
//! rendered page. The live browser tab implements it over CDP (see
//! `browser::live`); [`StaticDocument`] implements it over saved HTML with
//! `scraper`, which is what offline runs and the test-suite use.

use super::diagnostics::{AttributeHit, DiagnosticSnapshot, ElementSample, SnapshotOptions};
use crate::error::{ExtractionError, Result};
use async_trait::async_trait;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use std::sync::OnceLock;

/// Tags whose text is never rendered
const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Page chrome skipped when looking for the largest text block
const CHROME_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "nav", "header", "footer", "aside",
];

/// Tags rendered on their own line
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "blockquote", "br", "dd", "div", "dl", "dt", "fieldset", "figcaption",
    "figure", "form", "h1", "h2", "h3", "h4", "h5", "h6", "hr", "li", "main", "ol", "p", "pre",
    "section", "table", "tr", "ul",
];

/// A loaded page that strategies can query.
///
/// Every method is a read; implementations must not mutate the page.
#[async_trait]
pub trait Document: Send + Sync {
    /// Value of the first element matching `selector`, in document order.
    ///
    /// A non-blank `attribute` wins over rendered text.
    async fn first_value(&self, selector: &str, attribute: Option<&str>) -> Result<Option<String>>;

    /// Text of the descendant of `scope` with the most visible text
    async fn largest_text(&self, scope: &str, min_chars: usize) -> Result<Option<String>>;

    /// Full rendered body text
    async fn body_text(&self) -> Result<Option<String>>;

    /// Bounded structural sample for debugging strategy choice
    async fn snapshot(&self, _options: &SnapshotOptions) -> Result<DiagnosticSnapshot> {
        Ok(DiagnosticSnapshot::default())
    }
}

/// Document backed by an HTML string
#[derive(Debug, Clone)]
pub struct StaticDocument {
    source: String,
}

impl StaticDocument {
    /// Wrap raw HTML
    pub fn new<S: Into<String>>(html: S) -> Self {
        Self {
            source: html.into(),
        }
    }

    /// Raw HTML this document was built from
    pub fn source(&self) -> &str {
        &self.source
    }

    // `Html` is neither Send nor Sync, so it is parsed per query rather than
    // stored.
    fn parse(&self) -> Html {
        Html::parse_document(&self.source)
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| ExtractionError::InvalidSelector(format!("{}: {:?}", selector, e)).into())
}

fn non_blank(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

// HTML attribute names are stored lowercased by the parser
fn attribute_value<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element.value().attr(&name.to_ascii_lowercase())
}

fn element_value(element: ElementRef<'_>, attribute: Option<&str>) -> Option<String> {
    attribute
        .and_then(|name| attribute_value(element, name))
        .and_then(non_blank)
        .or_else(|| non_blank(&visible_text(element)))
}

/// Rendered text of an element, approximating `innerText`
pub fn visible_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    push_visible_text(element, &mut raw);
    normalize_whitespace(&raw)
}

fn push_visible_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let name = el.name();
                if HIDDEN_TAGS.contains(&name) {
                    continue;
                }
                let block = BLOCK_TAGS.contains(&name);
                if block {
                    out.push('\n');
                }
                if let Some(child) = ElementRef::wrap(child) {
                    push_visible_text(child, out);
                }
                if block {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

/// Collapse runs of spaces and blank lines the way a browser lays text out
pub fn normalize_whitespace(text: &str) -> String {
    static INLINE: OnceLock<Regex> = OnceLock::new();
    static LINES: OnceLock<Regex> = OnceLock::new();

    let inline = INLINE.get_or_init(|| Regex::new(r"[^\S\n]+").expect("valid whitespace regex"));
    let lines = LINES.get_or_init(|| Regex::new(r" ?\n[\s]*").expect("valid line break regex"));

    let text = inline.replace_all(text, " ");
    let text = lines.replace_all(&text, "\n");
    text.trim().to_string()
}

fn is_chrome(element: ElementRef<'_>) -> bool {
    CHROME_TAGS.contains(&element.value().name())
}

#[async_trait]
impl Document for StaticDocument {
    async fn first_value(&self, selector: &str, attribute: Option<&str>) -> Result<Option<String>> {
        let selector = parse_selector(selector)?;
        let html = self.parse();
        Ok(html
            .select(&selector)
            .next()
            .and_then(|element| element_value(element, attribute)))
    }

    async fn largest_text(&self, scope: &str, min_chars: usize) -> Result<Option<String>> {
        let scope = parse_selector(scope)?;
        let html = self.parse();
        let Some(root) = html.select(&scope).next() else {
            return Ok(None);
        };

        let mut best: Option<(usize, String)> = None;
        for element in root.descendants().skip(1).filter_map(ElementRef::wrap) {
            let inside_chrome = element
                .ancestors()
                .take_while(|node| node.id() != root.id())
                .filter_map(ElementRef::wrap)
                .any(is_chrome);
            if is_chrome(element) || inside_chrome {
                continue;
            }

            let text = visible_text(element);
            let length = text.chars().count();
            if length == 0 || length < min_chars {
                continue;
            }
            if best.as_ref().map_or(true, |(longest, _)| length > *longest) {
                best = Some((length, text));
            }
        }

        Ok(best.map(|(_, text)| text))
    }

    async fn body_text(&self) -> Result<Option<String>> {
        let body = parse_selector("body")?;
        let html = self.parse();
        Ok(html
            .select(&body)
            .next()
            .and_then(|element| non_blank(&visible_text(element))))
    }

    async fn snapshot(&self, options: &SnapshotOptions) -> Result<DiagnosticSnapshot> {
        let any = parse_selector("*")?;
        let classed = parse_selector("[class]")?;
        let html = self.parse();

        let samples = html
            .select(&classed)
            .take(options.sample_limit)
            .map(|element| ElementSample {
                tag: element.value().name().to_string(),
                id: element.value().id().map(String::from),
                classes: element.value().classes().map(String::from).collect(),
            })
            .collect();

        let mut attribute_hits = Vec::with_capacity(options.attributes.len());
        for attribute in &options.attributes {
            let escaped = super::strategy::css_escape(attribute);
            let selector = parse_selector(&format!("[{}]", escaped))?;
            let mut count = 0;
            let mut first_value = None;
            for element in html.select(&selector) {
                count += 1;
                if first_value.is_none() {
                    first_value = attribute_value(element, attribute).and_then(non_blank);
                }
            }
            attribute_hits.push(AttributeHit {
                attribute: attribute.clone(),
                count,
                first_value,
            });
        }

        Ok(DiagnosticSnapshot {
            element_count: html.select(&any).count(),
            samples,
            attribute_hits,
        })
    }
}
