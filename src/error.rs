//! Error types for otter-scrape
//!
//! One top-level error built with `thiserror`, with a sub-enum per boundary.
//! Note that none of these ever escape the field extraction pipeline: a
//! failing strategy is logged and skipped. They surface only from
//! acquisition, the sink, configuration and input handling.

use thiserror::Error;

/// The main error type for otter-scrape operations
#[derive(Error, Debug)]
pub enum Error {
    /// Browser-related errors
    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    /// Navigation errors
    #[error("Navigation error: {0}")]
    Navigation(#[from] NavigationError),

    /// Document query errors raised by a single strategy
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Dataset sink errors
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Malformed task input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ChromiumOxide errors
    #[error("CDP error: {0}")]
    Cdp(String),

    /// Generic error with message
    #[error("{0}")]
    Generic(String),
}

/// Browser lifecycle and control errors
#[derive(Error, Debug)]
pub enum BrowserError {
    /// Failed to launch browser
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Browser configuration error
    #[error("Invalid browser configuration: {0}")]
    ConfigError(String),

    /// Failed to create new page/tab
    #[error("Failed to create page: {0}")]
    PageCreationFailed(String),
}

/// Errors raised while querying a document
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Selector could not be parsed
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// Strategy has nothing to query with
    #[error("Empty strategy: {0}")]
    EmptyStrategy(String),

    /// JavaScript execution failed
    #[error("JavaScript execution failed: {0}")]
    JsExecutionFailed(String),
}

/// Navigation errors
#[derive(Error, Debug)]
pub enum NavigationError {
    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Navigation timeout
    #[error("Navigation timed out after {0}ms")]
    Timeout(u64),

    /// Page load failed
    #[error("Page load failed: {0}")]
    LoadFailed(String),
}

/// Dataset sink errors
#[derive(Error, Debug)]
pub enum SinkError {
    /// Could not open the dataset for appending
    #[error("Failed to open dataset {path}: {message}")]
    OpenFailed {
        /// Dataset location
        path: String,
        /// Underlying cause
        message: String,
    },

    /// A record could not be written
    #[error("Failed to write record for {url}: {message}")]
    WriteFailed {
        /// URL of the record being written
        url: String,
        /// Underlying cause
        message: String,
    },
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read {path}: {message}")]
    ReadFailed {
        /// Config file location
        path: String,
        /// Underlying cause
        message: String,
    },

    /// Config file is not valid TOML for the expected schema
    #[error("Failed to parse config: {0}")]
    ParseFailed(String),
}

/// Result type alias for otter-scrape operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a generic error from a string
    pub fn generic<S: Into<String>>(msg: S) -> Self {
        Error::Generic(msg.into())
    }

    /// Create a CDP error from a string
    pub fn cdp<S: Into<String>>(msg: S) -> Self {
        Error::Cdp(msg.into())
    }
}

/// Text of a caught panic payload
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Convert chromiumoxide errors
impl From<chromiumoxide::error::CdpError> for Error {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Error::Cdp(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(ConfigError::ParseFailed(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Browser(BrowserError::LaunchFailed("no chrome".to_string()));
        assert!(err.to_string().contains("Failed to launch browser"));
        assert!(err.to_string().contains("no chrome"));
    }

    #[test]
    fn test_navigation_timeout_message() {
        let err: Error = NavigationError::Timeout(30000).into();
        assert_eq!(
            err.to_string(),
            "Navigation error: Navigation timed out after 30000ms"
        );
    }

    #[test]
    fn test_extraction_error() {
        let err = ExtractionError::InvalidSelector("div[".to_string());
        assert!(err.to_string().contains("Invalid selector"));
    }

    #[test]
    fn test_sink_error() {
        let err = SinkError::WriteFailed {
            url: "https://otter.ai/u/abc".to_string(),
            message: "disk full".to_string(),
        };
        assert!(err.to_string().contains("https://otter.ai/u/abc"));
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_toml_error_conversion() {
        let parse = toml::from_str::<toml::Value>("= nope").unwrap_err();
        let err: Error = parse.into();
        assert!(matches!(err, Error::Config(ConfigError::ParseFailed(_))));
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");

        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");

        let payload: Box<dyn std::any::Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }

    #[test]
    fn test_generic_error() {
        let err = Error::generic("something went wrong");
        assert_eq!(err.to_string(), "something went wrong");
    }
}
