//! Strategy queries against a live tab
//!
//! Each [`Document`] query becomes one `Runtime.evaluate` call. Selectors and
//! attribute names are embedded as JSON string literals, never spliced raw.
//! Text queries return `''` rather than `null`: a null remote object carries
//! no value and would surface as a deserialization error.

use crate::browser::PageHandle;
use crate::error::{Error, ExtractionError, Result};
use crate::extraction::{DiagnosticSnapshot, Document, SnapshotOptions};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::instrument;

fn js_string(value: &str) -> Result<String> {
    serde_json::to_string(value).map_err(Error::from)
}

impl PageHandle {
    async fn evaluate_value<T: DeserializeOwned>(&self, script: &str) -> Result<T> {
        self.page
            .evaluate(script)
            .await
            .map_err(|e| ExtractionError::JsExecutionFailed(e.to_string()))?
            .into_value()
            .map_err(|e| ExtractionError::JsExecutionFailed(e.to_string()).into())
    }

    async fn evaluate_text(&self, script: &str) -> Result<Option<String>> {
        let text: String = self.evaluate_value(script).await?;
        Ok(Some(text).filter(|text| !text.trim().is_empty()))
    }
}

#[async_trait]
impl Document for PageHandle {
    #[instrument(skip(self))]
    async fn first_value(&self, selector: &str, attribute: Option<&str>) -> Result<Option<String>> {
        let attribute = match attribute {
            Some(name) => js_string(name)?,
            None => "null".to_string(),
        };
        let script = format!(
            r#"
            (() => {{
                const el = document.querySelector({selector});
                if (!el) return '';
                const attribute = {attribute};
                if (attribute) {{
                    const live = el[attribute];
                    if (typeof live === 'string' && live.trim()) return live;
                    const raw = el.getAttribute(attribute);
                    if (raw && raw.trim()) return raw;
                }}
                return el.innerText || el.textContent || '';
            }})()
            "#,
            selector = js_string(selector)?,
            attribute = attribute,
        );

        self.evaluate_text(&script).await
    }

    #[instrument(skip(self))]
    async fn largest_text(&self, scope: &str, min_chars: usize) -> Result<Option<String>> {
        let script = format!(
            r#"
            (() => {{
                const root = document.querySelector({scope});
                if (!root) return '';
                const skipped = ['script', 'style', 'noscript', 'template', 'nav', 'header', 'footer', 'aside'];
                const walker = document.createTreeWalker(
                    root,
                    NodeFilter.SHOW_ELEMENT,
                    {{
                        acceptNode: (node) => skipped.includes(node.tagName.toLowerCase())
                            ? NodeFilter.FILTER_REJECT
                            : NodeFilter.FILTER_ACCEPT
                    }}
                );

                let best = '';
                let bestLength = 0;
                let node;
                while (node = walker.nextNode()) {{
                    const text = (node.innerText || '').trim();
                    if (text.length >= {min_chars} && text.length > bestLength) {{
                        best = text;
                        bestLength = text.length;
                    }}
                }}
                return best;
            }})()
            "#,
            scope = js_string(scope)?,
            min_chars = min_chars,
        );

        self.evaluate_text(&script).await
    }

    #[instrument(skip(self))]
    async fn body_text(&self) -> Result<Option<String>> {
        self.evaluate_text("document.body ? document.body.innerText : ''")
            .await
    }

    #[instrument(skip(self, options))]
    async fn snapshot(&self, options: &SnapshotOptions) -> Result<DiagnosticSnapshot> {
        let attributes = serde_json::to_string(&options.attributes)?;
        let script = format!(
            r#"
            (() => {{
                const all = document.querySelectorAll('*');
                const samples = [];
                for (const el of all) {{
                    if (samples.length >= {limit}) break;
                    if (!el.classList.length) continue;
                    samples.push({{
                        tag: el.tagName.toLowerCase(),
                        id: el.id || null,
                        classes: Array.from(el.classList)
                    }});
                }}

                const attributeHits = {attributes}.map(attribute => {{
                    const hits = document.querySelectorAll('[' + CSS.escape(attribute) + ']');
                    let firstValue = null;
                    for (const el of hits) {{
                        const value = el.getAttribute(attribute);
                        if (value && value.trim()) {{
                            firstValue = value;
                            break;
                        }}
                    }}
                    return {{ attribute, count: hits.length, firstValue }};
                }});

                return {{ elementCount: all.length, samples, attributeHits }};
            }})()
            "#,
            limit = options.sample_limit,
            attributes = attributes,
        );

        self.evaluate_value(&script).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_string_escapes_quotes() {
        assert_eq!(
            js_string(r#"meta[property="og:title"]"#).unwrap(),
            r#""meta[property=\"og:title\"]""#
        );
        assert_eq!(js_string("it's").unwrap(), r#""it's""#);
    }
}
