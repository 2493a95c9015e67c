//! Browser automation module
//!
//! This module provides page acquisition through ChromiumOxide: browser
//! lifecycle, navigation with a settle delay, and the live-tab
//! implementation of the extraction `Document` trait.

pub mod controller;
pub mod live;
pub mod navigation;

pub use controller::{BrowserConfig, BrowserConfigBuilder, BrowserController, PageHandle};
pub use navigation::{NavigationOptions, NavigationResult, PageNavigator, UrlValidator, WaitUntil};
