//! Scrape task input

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const MISSING_URL: &str =
    "Please provide a URL in the input. Expected format: { \"url\": \"https://otter.ai/u/...\" }";

fn default_user_data() -> Value {
    json!({ "label": "otter-conversation" })
}

/// One URL to scrape, plus opaque caller data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeTask {
    /// Page to load
    #[serde(default)]
    pub url: String,
    /// Passed through untouched; only ever logged
    #[serde(default = "default_user_data")]
    pub user_data: Value,
}

impl ScrapeTask {
    /// Task for `url` with the default user data
    pub fn new<S: Into<String>>(url: S) -> Self {
        Self {
            url: url.into(),
            user_data: default_user_data(),
        }
    }

    /// Task for `url`, rejecting a blank URL
    pub fn from_url(url: &str) -> Result<Self> {
        let url = url.trim();
        if url.is_empty() {
            return Err(Error::InvalidInput(MISSING_URL.to_string()));
        }
        Ok(Self::new(url))
    }

    /// Replace the user data
    pub fn with_user_data(mut self, user_data: Value) -> Self {
        self.user_data = user_data;
        self
    }

    /// Parse a task from its JSON form, rejecting a missing or blank URL
    pub fn from_json(input: &str) -> Result<Self> {
        let mut task: ScrapeTask = serde_json::from_str(input)
            .map_err(|e| Error::InvalidInput(format!("{}. {}", e, MISSING_URL)))?;
        task.url = task.url.trim().to_string();
        if task.url.is_empty() {
            return Err(Error::InvalidInput(MISSING_URL.to_string()));
        }
        Ok(task)
    }
}
