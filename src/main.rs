//! Otter Scrape CLI
//!
//! Scrapes one shared conversation page into a JSON-lines dataset.

use anyhow::Context;
use clap::Parser;
use otter_scrape::browser::{BrowserConfig, BrowserController};
use otter_scrape::{
    ConversationScraper, DatasetSink, ExtractionResult, HtmlFileSource, JsonLinesSink, PageSource,
    ScrapeTask, ScraperConfig, StdoutSink,
};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Otter conversation scraper
#[derive(Parser, Debug)]
#[command(name = "otter-scrape")]
#[command(version)]
#[command(about = "Extract title, summary and date from shared conversations")]
struct Args {
    /// Conversation URL
    #[arg(short, long)]
    url: Option<String>,

    /// Task as JSON: {"url": "...", "userData": {...}}
    #[arg(short, long, env = "OTTER_SCRAPE_INPUT")]
    input: Option<String>,

    /// Read the page from a saved HTML file instead of a browser
    #[arg(long)]
    html_file: Option<PathBuf>,

    /// Append records to this JSON-lines file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to Chrome/Chromium executable
    #[arg(long)]
    chrome_path: Option<String>,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Disable the Chrome sandbox
    #[arg(long)]
    no_sandbox: bool,

    /// Navigation timeout per attempt
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Wait after load before extracting
    #[arg(long)]
    settle_ms: Option<u64>,

    /// Navigation retries
    #[arg(long)]
    retries: Option<u32>,

    /// Also extract the transcript
    #[arg(long)]
    transcript: bool,

    /// Log a diagnostic snapshot of the page
    #[arg(long)]
    diagnose: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// `--url` wins over `--input`
    fn task(&self) -> otter_scrape::Result<ScrapeTask> {
        match (&self.url, &self.input) {
            (Some(url), _) => ScrapeTask::from_url(url),
            (None, Some(input)) => ScrapeTask::from_json(input),
            (None, None) => ScrapeTask::from_url(""),
        }
    }

    fn apply(&self, config: &mut ScraperConfig) {
        if let Some(timeout_ms) = self.timeout_ms {
            config.navigation.timeout_ms = timeout_ms;
        }
        if let Some(settle_ms) = self.settle_ms {
            config.navigation.settle_ms = settle_ms;
        }
        if let Some(retries) = self.retries {
            config.navigation.retries = retries;
        }
        config.include_transcript |= self.transcript;
        config.diagnostics |= self.diagnose;
    }

    fn browser_config(&self, config: &ScraperConfig) -> BrowserConfig {
        let mut builder = BrowserConfig::builder()
            .headless(!self.headed)
            .sandbox(!self.no_sandbox)
            .timeout_ms(config.navigation.timeout_ms);
        if let Some(ref path) = self.chrome_path {
            builder = builder.chrome_path(path.clone());
        }
        builder.build()
    }
}

fn scraper<S: PageSource>(
    source: S,
    sink: Box<dyn DatasetSink>,
    config: &ScraperConfig,
) -> ConversationScraper<S, Box<dyn DatasetSink>> {
    ConversationScraper::new(source, sink)
        .with_strategies(config.strategies.clone())
        .with_targets(config.targets())
        .with_diagnostics(config.snapshot_options())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let task = args.task()?;

    let mut config = match &args.config {
        Some(path) => ScraperConfig::load(path)
            .await
            .with_context(|| format!("loading {}", path.display()))?,
        None => ScraperConfig::default(),
    };
    args.apply(&mut config);

    let sink: Box<dyn DatasetSink> = match &args.output {
        Some(path) => Box::new(JsonLinesSink::open(path).await?),
        None => Box::new(StdoutSink),
    };

    info!(
        "Otter Scrape {} starting: {}",
        otter_scrape::VERSION,
        task.url
    );

    let record = if let Some(path) = &args.html_file {
        scraper(HtmlFileSource::new(path), sink, &config)
            .run(&task)
            .await?
    } else {
        match BrowserController::with_config(args.browser_config(&config)).await {
            Ok(browser) => {
                let browser = browser.with_navigation(config.navigation.clone());
                let job = scraper(browser, sink, &config);
                let outcome = job.run(&task).await;
                let (browser, _) = job.into_parts();
                if let Err(e) = browser.close().await {
                    error!("Failed to close browser: {}", e);
                }
                outcome?
            }
            Err(e) => {
                error!("Browser unavailable: {}", e);
                let record = ExtractionResult::failed(&task.url, &config.targets(), e.to_string());
                sink.push(&record).await?;
                record
            }
        }
    };

    info!(failed = record.is_failure(), "Done");
    Ok(())
}
