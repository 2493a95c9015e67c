//! Scrape job
//!
//! Ties one [`PageSource`], the extraction pipeline and one [`DatasetSink`]
//! together. Whatever goes wrong while loading or reading a page, the URL
//! still gets exactly one record; only a sink failure is reported as `Err`.

use crate::browser::UrlValidator;
use crate::error::{panic_message, Error, Result};
use crate::extraction::{
    Document, ExtractionPipeline, ExtractionTarget, FieldValues, SnapshotOptions, StrategyTable,
};
use crate::record::{assemble, ExtractionResult};
use crate::sink::DatasetSink;
use crate::source::PageSource;
use crate::task::ScrapeTask;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tracing::{debug, error, info, instrument, warn};

/// Default targets: everything except the transcript
pub const DEFAULT_TARGETS: &[ExtractionTarget] = &[
    ExtractionTarget::Title,
    ExtractionTarget::Summary,
    ExtractionTarget::CreatedDate,
];

/// Scrapes conversation pages into a dataset
pub struct ConversationScraper<S: PageSource, K: DatasetSink> {
    source: S,
    sink: K,
    pipeline: ExtractionPipeline,
    targets: Vec<ExtractionTarget>,
    diagnostics: Option<SnapshotOptions>,
}

impl<S: PageSource, K: DatasetSink> ConversationScraper<S, K> {
    /// Scraper using the built-in strategy table and default targets
    pub fn new(source: S, sink: K) -> Self {
        Self {
            source,
            sink,
            pipeline: ExtractionPipeline::default(),
            targets: DEFAULT_TARGETS.to_vec(),
            diagnostics: None,
        }
    }

    /// Use a different strategy table
    pub fn with_strategies(mut self, table: StrategyTable) -> Self {
        self.pipeline = ExtractionPipeline::new(table);
        self
    }

    /// Extract these targets, in this order
    pub fn with_targets(mut self, targets: Vec<ExtractionTarget>) -> Self {
        self.targets = targets;
        self
    }

    /// Log a diagnostic snapshot of every page before extracting
    pub fn with_diagnostics(mut self, options: Option<SnapshotOptions>) -> Self {
        self.diagnostics = options;
        self
    }

    /// Page source in use
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Sink receiving records
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Take the source and sink back, e.g. to close the browser
    pub fn into_parts(self) -> (S, K) {
        (self.source, self.sink)
    }

    /// Enabled targets
    pub fn targets(&self) -> &[ExtractionTarget] {
        &self.targets
    }

    /// Scrape one task and push its record.
    ///
    /// The record is returned as well. `Err` means the record could not be
    /// written; every page-level problem is inside the record instead.
    #[instrument(skip_all, fields(url = %task.url))]
    pub async fn run(&self, task: &ScrapeTask) -> Result<ExtractionResult> {
        info!(user_data = %task.user_data, "Processing conversation");

        let scraped = AssertUnwindSafe(self.scrape(&task.url)).catch_unwind();
        let record = match scraped.await {
            Ok(record) => record,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!("Scrape panicked: {}", message);
                let error = format!("Internal error: {}", message);
                ExtractionResult::failed(&task.url, &self.targets, error)
            }
        };

        match &record.error {
            Some(reason) => warn!("Recording failure: {}", reason),
            None => info!("Successfully scraped conversation"),
        }
        self.sink.push(&record).await?;
        Ok(record)
    }

    async fn scrape(&self, url: &str) -> ExtractionResult {
        if let Err(e) = UrlValidator::validate(url) {
            return ExtractionResult::failed(url, &self.targets, Error::from(e).to_string());
        }

        let document = match self.source.acquire(url).await {
            Ok(document) => document,
            Err(e) => return ExtractionResult::failed(url, &self.targets, e.to_string()),
        };

        // The document goes back to the source even if reading it panics
        let read = AssertUnwindSafe(self.read(&document))
            .catch_unwind()
            .await;
        self.source.release(document).await;

        match read {
            Ok(fields) => assemble(url, &self.targets, &fields, None),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!("Extraction panicked: {}", message);
                let error = format!("Internal error: {}", message);
                ExtractionResult::failed(url, &self.targets, error)
            }
        }
    }

    async fn read(&self, document: &S::Document) -> FieldValues {
        if let Some(options) = &self.diagnostics {
            match AssertUnwindSafe(document.snapshot(options))
                .catch_unwind()
                .await
            {
                Ok(Ok(snapshot)) => snapshot.log(),
                Ok(Err(e)) => warn!("Diagnostic snapshot failed: {}", e),
                Err(payload) => warn!(
                    "Diagnostic snapshot panicked: {}",
                    panic_message(payload.as_ref())
                ),
            }
        }

        let fields = self.pipeline.extract_all(document, &self.targets).await;
        debug!(resolved = fields.len(), "Extraction finished");
        fields
    }
}
