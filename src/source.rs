//! Page acquisition boundary
//!
//! A [`PageSource`] turns a URL into a loaded [`Document`]. The browser
//! controller is the live implementation; [`HtmlFileSource`] replays a saved
//! page so that strategy chains can be exercised without a browser.

use crate::error::{NavigationError, Result};
use crate::extraction::{Document, StaticDocument};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Loads a URL into a document ready for extraction
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Document handle produced by this source
    type Document: Document + 'static;

    /// Load `url`. The returned document must already be settled.
    async fn acquire(&self, url: &str) -> Result<Self::Document>;

    /// Give the document back once extraction is done
    async fn release(&self, document: Self::Document) {
        drop(document);
    }
}

/// Serves one saved HTML file for any URL
#[derive(Debug, Clone)]
pub struct HtmlFileSource {
    path: PathBuf,
}

impl HtmlFileSource {
    /// Source reading from `path` on every acquisition
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// File backing this source
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PageSource for HtmlFileSource {
    type Document = StaticDocument;

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn acquire(&self, url: &str) -> Result<StaticDocument> {
        let html = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            NavigationError::LoadFailed(format!("{}: {}", self.path.display(), e))
        })?;
        debug!(bytes = html.len(), "Loaded saved page");
        Ok(StaticDocument::new(html))
    }
}
