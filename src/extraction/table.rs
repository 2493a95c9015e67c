//! Per-field strategy chains
//!
//! The built-in chains are tuned for the shared conversation view. Any chain
//! can be replaced from the `[strategies]` section of the config file without
//! touching the pipeline; chains missing from the file keep their defaults.

use super::strategy::Strategy;
use super::target::ExtractionTarget;
use serde::{Deserialize, Serialize};

/// Root of the conversation detail component
const CONVERSATION_DETAIL: &[&str] = &[
    "#main-content",
    "div.otter-main-content__container",
    "app-conversation-detail",
];

/// Full class list of the editable title input
const TITLE_INPUT_CLASSES: &[&str] = &[
    "text-3xl",
    "px-2",
    "rounded-sm",
    "truncate",
    "bg-white",
    "border",
    "border-transparent",
    "text-default",
    "w-full",
    "transition-colors",
    "hover:bg-[#F6F7F9]",
    "focus:bg-default",
    "focus:border-subtle",
    "focus:outline-none",
];

fn detail_path(rest: &[&str]) -> Strategy {
    Strategy::path(CONVERSATION_DETAIL.iter().chain(rest.iter()).copied())
}

/// Ordered strategies for every target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyTable {
    /// Title chain
    pub title: Vec<Strategy>,
    /// Summary chain
    pub summary: Vec<Strategy>,
    /// Transcript chain
    pub transcript: Vec<Strategy>,
    /// Creation date chain
    pub created_date: Vec<Strategy>,
}

impl Default for StrategyTable {
    fn default() -> Self {
        Self {
            title: vec![
                detail_path(&[
                    "div:nth-child(1)",
                    "app-speech-header",
                    "div",
                    "div",
                    "div.flex.items-center.justify-between",
                    "form",
                    "input",
                ])
                .reading("value"),
                Strategy::classes(Some("input"), TITLE_INPUT_CLASSES.iter().copied())
                    .reading("value"),
                Strategy::classes(Some("input"), ["text-3xl", "px-2", "rounded-sm"])
                    .reading("value"),
                Strategy::attribute("data-title"),
                Strategy::path(["head", r#"meta[property="og:title"]"#]).reading("content"),
                Strategy::path(["head", "title"]),
            ],
            summary: vec![
                detail_path(&[
                    "div:nth-child(2)",
                    "app-conversation-summary",
                    "div",
                    "div.summary-content",
                ]),
                Strategy::classes(Some("div"), ["summary-content", "whitespace-pre-wrap"]),
                Strategy::attribute("data-value"),
                Strategy::largest_text("app-conversation-detail", 80),
                Strategy::BodyText,
            ],
            transcript: vec![
                detail_path(&[
                    "div:nth-child(3)",
                    "app-transcript",
                    "div.transcript-content",
                ]),
                Strategy::classes(Some("div"), ["transcript-snippet", "transcript-content"]),
                Strategy::attribute("data-transcript"),
                Strategy::largest_text("body", 200),
            ],
            created_date: vec![
                detail_path(&[
                    "div:nth-child(1)",
                    "app-speech-header",
                    "div",
                    "div",
                    "div.speech-header__meta",
                    "span",
                ]),
                Strategy::classes(Some("span"), ["speech-header__date"]),
                Strategy::AttributePresence {
                    attribute: "datetime".to_string(),
                    tag: Some("time".to_string()),
                    read: None,
                },
                Strategy::path(["head", r#"meta[property="article:published_time"]"#])
                    .reading("content"),
            ],
        }
    }
}

impl StrategyTable {
    /// Table with no strategies; every field resolves to its placeholder
    pub fn empty() -> Self {
        Self {
            title: Vec::new(),
            summary: Vec::new(),
            transcript: Vec::new(),
            created_date: Vec::new(),
        }
    }

    /// Strategies for `target`, in evaluation order
    pub fn strategies(&self, target: ExtractionTarget) -> &[Strategy] {
        match target {
            ExtractionTarget::Title => &self.title,
            ExtractionTarget::Summary => &self.summary,
            ExtractionTarget::Transcript => &self.transcript,
            ExtractionTarget::CreatedDate => &self.created_date,
        }
    }

    /// Replace the chain for `target`
    pub fn set(&mut self, target: ExtractionTarget, strategies: Vec<Strategy>) {
        let slot = match target {
            ExtractionTarget::Title => &mut self.title,
            ExtractionTarget::Summary => &mut self.summary,
            ExtractionTarget::Transcript => &mut self.transcript,
            ExtractionTarget::CreatedDate => &mut self.created_date,
        };
        *slot = strategies;
    }

    /// Builder-style [`set`](Self::set)
    pub fn with(mut self, target: ExtractionTarget, strategies: Vec<Strategy>) -> Self {
        self.set(target, strategies);
        self
    }

    /// All chains, in target order
    pub fn iter(&self) -> impl Iterator<Item = (ExtractionTarget, &[Strategy])> {
        ExtractionTarget::ALL
            .into_iter()
            .map(move |target| (target, self.strategies(target)))
    }
}
