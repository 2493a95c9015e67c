//! Page navigation functionality
//!
//! This module handles URL validation and navigation with retry logic,
//! timeout handling, and a fixed settle delay for client-rendered content.

use crate::browser::PageHandle;
use crate::error::{Error, NavigationError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Longest URL accepted for navigation
const MAX_URL_LENGTH: usize = 2048;

/// Options for page navigation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationOptions {
    /// Timeout in milliseconds (default: 30000)
    pub timeout_ms: u64,
    /// Wait until condition (default: networkidle0)
    pub wait_until: WaitUntil,
    /// Number of retry attempts (default: 3)
    pub retries: u32,
    /// Delay between retries in ms (default: 1000)
    pub retry_delay_ms: u64,
    /// Extra wait after the page reports ready, for late client rendering
    /// (default: 3000)
    pub settle_ms: u64,
}

impl Default for NavigationOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 30000,
            wait_until: WaitUntil::NetworkIdle0,
            retries: 3,
            retry_delay_ms: 1000,
            settle_ms: 3000,
        }
    }
}

/// Condition to wait for after navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitUntil {
    /// Wait until load event fires
    Load,
    /// Wait until DOMContentLoaded event fires
    DomContentLoaded,
    /// Wait until network is idle (0 connections for 500ms)
    #[serde(rename = "networkidle0")]
    NetworkIdle0,
    /// Wait until network is idle (max 2 connections for 500ms)
    #[serde(rename = "networkidle2")]
    NetworkIdle2,
}

/// Where a navigation ended up and how long it took
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationResult {
    /// URL after redirects
    pub final_url: String,
    /// Time from the first attempt to the end of the settle delay
    pub duration_ms: u64,
}

/// URL validation utilities
pub struct UrlValidator;

impl UrlValidator {
    /// Validate a URL for navigation
    pub fn validate(url: &str) -> std::result::Result<Url, NavigationError> {
        let url = url.trim();

        if url.is_empty() {
            return Err(NavigationError::InvalidUrl("URL cannot be empty".to_string()));
        }

        if url.len() > MAX_URL_LENGTH {
            return Err(NavigationError::InvalidUrl(format!(
                "URL exceeds maximum length of {} characters",
                MAX_URL_LENGTH
            )));
        }

        let parsed = Url::parse(url)
            .map_err(|e| NavigationError::InvalidUrl(format!("{}: {}", url, e)))?;

        match parsed.scheme() {
            "http" | "https" | "file" => Ok(parsed),
            scheme => Err(NavigationError::InvalidUrl(format!(
                "URL must use http, https, or file, got {}: {}",
                scheme, url
            ))),
        }
    }
}

/// Page navigator
pub struct PageNavigator;

impl PageNavigator {
    /// Navigate to a URL and wait for it to settle
    #[instrument(skip(page, opts))]
    pub async fn goto(
        page: &PageHandle,
        url: &str,
        opts: &NavigationOptions,
    ) -> Result<NavigationResult> {
        let start = std::time::Instant::now();
        let url = UrlValidator::validate(url)?;

        info!("Navigating to: {}", url);

        let mut last_error = None;
        for attempt in 0..=opts.retries {
            if attempt > 0 {
                warn!("Navigation retry attempt {} of {}", attempt, opts.retries);
                tokio::time::sleep(Duration::from_millis(opts.retry_delay_ms)).await;
            }

            match Self::navigate_once(&page.page, url.as_str(), opts).await {
                Ok(final_url) => {
                    if opts.settle_ms > 0 {
                        debug!("Settling for {}ms", opts.settle_ms);
                        tokio::time::sleep(Duration::from_millis(opts.settle_ms)).await;
                    }

                    return Ok(NavigationResult {
                        final_url,
                        duration_ms: start.elapsed().as_millis() as u64,
                    });
                }
                Err(e) => {
                    warn!("Navigation attempt {} failed: {}", attempt + 1, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            NavigationError::LoadFailed("Navigation failed after all retries".to_string()).into()
        }))
    }

    /// One attempt: load, wait for readiness, report the final URL
    async fn navigate_once(
        page: &chromiumoxide::Page,
        url: &str,
        opts: &NavigationOptions,
    ) -> Result<String> {
        let timeout = Duration::from_millis(opts.timeout_ms);

        tokio::time::timeout(timeout, page.goto(url))
            .await
            .map_err(|_| NavigationError::Timeout(opts.timeout_ms))?
            .map_err(|e| NavigationError::LoadFailed(e.to_string()))?;

        Self::wait_for_ready(page, opts).await?;

        let final_url = page
            .url()
            .await
            .map_err(|e| Error::cdp(e.to_string()))?
            .unwrap_or_else(|| url.to_string());

        debug!("Navigation complete: {} -> {}", url, final_url);
        Ok(final_url)
    }

    /// Wait for page to be ready based on wait_until condition
    async fn wait_for_ready(page: &chromiumoxide::Page, opts: &NavigationOptions) -> Result<()> {
        let timeout = Duration::from_millis(opts.timeout_ms);
        tokio::time::timeout(timeout, page.evaluate(ready_script(opts.wait_until)))
            .await
            .map_err(|_| NavigationError::Timeout(opts.timeout_ms))?
            .map_err(|e| Error::cdp(e.to_string()))?;

        Ok(())
    }
}

/// Promise resolving once the page reaches `wait_until`.
///
/// Network idle has no page-side signal, so it is a quiet period after
/// `load`; late client rendering is left to the settle delay.
fn ready_script(wait_until: WaitUntil) -> String {
    let (ready, event, target, quiet_ms) = match wait_until {
        WaitUntil::Load => ("document.readyState === 'complete'", "load", "window", 0),
        WaitUntil::DomContentLoaded => (
            "document.readyState !== 'loading'",
            "DOMContentLoaded",
            "document",
            0,
        ),
        WaitUntil::NetworkIdle0 => ("document.readyState === 'complete'", "load", "window", 500),
        WaitUntil::NetworkIdle2 => ("document.readyState === 'complete'", "load", "window", 250),
    };

    format!(
        "new Promise(resolve => {{ \
            const done = () => setTimeout(() => resolve(true), {quiet_ms}); \
            if ({ready}) done(); else {target}.addEventListener('{event}', done); \
        }})"
    )
}
