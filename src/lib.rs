//! Otter Scrape - Conversation Page Field Extraction
//!
//! This crate loads a shared conversation page and turns it into one flat
//! record: title, summary, optional transcript and creation date, plus a
//! timestamp and, when the page could not be read, an error message.
//!
//! # Features
//!
//! - **Ordered Fallbacks**: Each field is resolved by a chain of independent
//!   strategies, most specific first, ending in a fixed placeholder
//! - **Browser Automation**: Live pages via ChromiumOxide (CDP)
//! - **Offline Replay**: Saved HTML parsed with `scraper`, same strategies
//! - **Configurable Chains**: Strategy tables loadable from TOML
//!
//! # Architecture
//!
//! ```text
//! ScrapeTask ──▶ PageSource ──▶ Document ──▶ ExtractionPipeline
//!                (browser or                    │
//!                 saved HTML)                    ▼
//!                                         assemble ──▶ DatasetSink
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use otter_scrape::{ConversationScraper, HtmlFileSource, MemorySink, ScrapeTask};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let scraper = ConversationScraper::new(HtmlFileSource::new("page.html"), MemorySink::new());
//!
//!     let record = scraper.run(&ScrapeTask::new("https://otter.ai/u/abc")).await?;
//!     println!("Title: {:?}", record.title);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod browser;
pub mod config;
pub mod error;
pub mod extraction;
pub mod job;
pub mod record;
pub mod sink;
pub mod source;
pub mod task;

// Re-exports for convenience
pub use browser::{BrowserConfig, BrowserController};
pub use config::ScraperConfig;
pub use error::{Error, Result};
pub use extraction::{
    Document, ExtractionPipeline, ExtractionTarget, StaticDocument, Strategy, StrategyTable,
};
pub use job::ConversationScraper;
pub use record::{assemble, ExtractionResult};
pub use sink::{DatasetSink, JsonLinesSink, MemorySink, StdoutSink};
pub use source::{HtmlFileSource, PageSource};
pub use task::ScrapeTask;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
