//! Browser lifecycle management
//!
//! This module handles browser launch, shutdown, and page management.

use super::navigation::{NavigationOptions, PageNavigator};
use crate::error::{BrowserError, Error, Result};
use crate::source::PageSource;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as CdpBrowserConfig};
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::Page;
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Configuration for browser launch
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run in headless mode (default: true)
    pub headless: bool,
    /// Browser window width (default: 1920)
    pub width: u32,
    /// Browser window height (default: 1080)
    pub height: u32,
    /// Enable sandbox (default: true)
    pub sandbox: bool,
    /// User agent string (None = use default)
    pub user_agent: Option<String>,
    /// CDP request timeout in milliseconds (default: 30000)
    pub timeout_ms: u64,
    /// Path to Chrome/Chromium executable (None = auto-detect)
    pub chrome_path: Option<String>,
    /// Additional Chrome arguments
    pub extra_args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            width: 1920,
            height: 1080,
            sandbox: true,
            user_agent: None,
            timeout_ms: 30000,
            chrome_path: None,
            extra_args: Vec::new(),
        }
    }
}

impl BrowserConfig {
    /// Create a new config builder
    pub fn builder() -> BrowserConfigBuilder {
        BrowserConfigBuilder::default()
    }
}

/// Builder for BrowserConfig
#[derive(Default)]
pub struct BrowserConfigBuilder {
    config: BrowserConfig,
}

impl BrowserConfigBuilder {
    /// Set headless mode
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    /// Set viewport dimensions
    pub fn viewport(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    /// Enable/disable sandbox
    pub fn sandbox(mut self, sandbox: bool) -> Self {
        self.config.sandbox = sandbox;
        self
    }

    /// Set user agent
    pub fn user_agent<S: Into<String>>(mut self, ua: S) -> Self {
        self.config.user_agent = Some(ua.into());
        self
    }

    /// Set CDP request timeout
    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.config.timeout_ms = ms;
        self
    }

    /// Set Chrome path
    pub fn chrome_path<S: Into<String>>(mut self, path: S) -> Self {
        self.config.chrome_path = Some(path.into());
        self
    }

    /// Add extra Chrome argument
    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.config.extra_args.push(arg.into());
        self
    }

    /// Build the config
    pub fn build(self) -> BrowserConfig {
        self.config
    }
}

/// One open tab
#[derive(Clone)]
pub struct PageHandle {
    pub(crate) page: Page,
}

impl PageHandle {
    /// Close the tab
    pub async fn close(self) -> Result<()> {
        self.page
            .close()
            .await
            .map_err(|e| Error::cdp(e.to_string()))
    }
}

/// High-level browser controller
pub struct BrowserController {
    browser: Browser,
    handler: JoinHandle<()>,
    navigation: NavigationOptions,
}

/// Translate our config into chromiumoxide launch options
fn launch_options(config: &BrowserConfig) -> Result<CdpBrowserConfig> {
    let mut builder = CdpBrowserConfig::builder()
        .viewport(Viewport {
            width: config.width,
            height: config.height,
            device_scale_factor: None,
            emulating_mobile: false,
            is_landscape: true,
            has_touch: false,
        })
        .request_timeout(Duration::from_millis(config.timeout_ms));

    if !config.headless {
        builder = builder.with_head();
    }
    if !config.sandbox {
        builder = builder.no_sandbox();
    }
    if let Some(ua) = &config.user_agent {
        builder = builder.arg(format!("--user-agent={}", ua));
    }
    if let Some(path) = &config.chrome_path {
        builder = builder.chrome_executable(path);
    }
    builder = builder.args(&config.extra_args);

    builder
        .build()
        .map_err(|e| BrowserError::ConfigError(e).into())
}

impl BrowserController {
    /// Launch a browser
    #[instrument(skip(config))]
    pub async fn with_config(config: BrowserConfig) -> Result<Self> {
        info!(
            "Launching browser with config: headless={}, sandbox={}",
            config.headless, config.sandbox
        );

        let (browser, mut handler) = Browser::launch(launch_options(&config)?)
            .await
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        // Spawn handler task
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    warn!("Browser handler event error");
                    break;
                }
            }
            debug!("Browser handler finished");
        });

        info!("Browser launched successfully");

        Ok(Self {
            browser,
            handler: handler_task,
            navigation: NavigationOptions::default(),
        })
    }

    /// Replace the navigation options used by [`navigate`](Self::navigate)
    pub fn with_navigation(mut self, navigation: NavigationOptions) -> Self {
        self.navigation = navigation;
        self
    }

    async fn new_page(&self) -> Result<PageHandle> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::PageCreationFailed(e.to_string()))?;

        debug!("Created new page");

        Ok(PageHandle { page })
    }

    /// Navigate to URL and return a settled page handle.
    ///
    /// The tab is closed again if navigation fails.
    #[instrument(skip(self))]
    pub async fn navigate(&self, url: &str) -> Result<PageHandle> {
        let page_handle = self.new_page().await?;
        match PageNavigator::goto(&page_handle, url, &self.navigation).await {
            Ok(result) => {
                info!(
                    final_url = %result.final_url,
                    duration_ms = result.duration_ms,
                    "Page ready"
                );
                Ok(page_handle)
            }
            Err(e) => {
                if let Err(close_err) = page_handle.close().await {
                    debug!("Failed to close page after navigation error: {}", close_err);
                }
                Err(e)
            }
        }
    }

    /// Close the browser
    #[instrument(skip(self))]
    pub async fn close(mut self) -> Result<()> {
        info!("Closing browser");

        self.browser
            .close()
            .await
            .map_err(|e| Error::cdp(e.to_string()))?;

        // Wait for handler to finish
        let _ = tokio::time::timeout(Duration::from_secs(5), self.handler).await;

        info!("Browser closed");
        Ok(())
    }
}

#[async_trait]
impl PageSource for BrowserController {
    type Document = PageHandle;

    async fn acquire(&self, url: &str) -> Result<PageHandle> {
        self.navigate(url).await
    }

    async fn release(&self, document: PageHandle) {
        if let Err(e) = document.close().await {
            debug!("Failed to close page: {}", e);
        }
    }
}
