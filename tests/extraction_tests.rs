//! Extraction pipeline tests
//!
//! These tests drive the strategy chains against saved pages through
//! `StaticDocument`, and against a scripted document for failure handling.

use async_trait::async_trait;
use otter_scrape::extraction::{
    DiagnosticSnapshot, Document, ExtractionPipeline, ExtractionTarget, SnapshotOptions,
    StaticDocument, Strategy, StrategyTable, UNABLE_TO_SCRAPE, UNKNOWN_DATE, UNKNOWN_TITLE,
};
use otter_scrape::Error;
use pretty_assertions::assert_eq;

/// Shared conversation page as rendered by the app
const CONVERSATION_PAGE: &str = r#"
<html>
  <head>
    <title>Otter.ai - Weekly sync</title>
    <meta property="og:title" content="Weekly sync (shared)" />
  </head>
  <body>
    <div id="main-content">
      <div class="otter-main-content__container">
        <app-conversation-detail>
          <div>
            <app-speech-header>
              <div><div>
                <div class="flex items-center justify-between">
                  <form>
                    <input class="text-3xl px-2 rounded-sm truncate bg-white border border-transparent text-default w-full transition-colors hover:bg-[#F6F7F9] focus:bg-default focus:border-subtle focus:outline-none"
                           value="  Weekly sync  " />
                  </form>
                </div>
                <div class="speech-header__meta"><span>Oct 3, 2026 at 9:00 am</span></div>
              </div></div>
            </app-speech-header>
          </div>
          <div>
            <app-conversation-summary>
              <div>
                <div class="summary-content whitespace-pre-wrap">
                  We agreed to ship the Q3 roadmap.
                </div>
              </div>
            </app-conversation-summary>
          </div>
        </app-conversation-detail>
      </div>
    </div>
  </body>
</html>
"#;

#[tokio::test]
async fn test_builtin_table_on_conversation_page() {
    let doc = StaticDocument::new(CONVERSATION_PAGE);
    let pipeline = ExtractionPipeline::default();

    assert_eq!(
        pipeline.extract(&doc, ExtractionTarget::Title).await,
        "Weekly sync"
    );
    assert_eq!(
        pipeline.extract(&doc, ExtractionTarget::Summary).await,
        "We agreed to ship the Q3 roadmap."
    );
    assert_eq!(
        pipeline.extract(&doc, ExtractionTarget::CreatedDate).await,
        "Oct 3, 2026 at 9:00 am"
    );
}

#[tokio::test]
async fn test_class_signature_with_utility_classes() {
    // No structural path; only the escaped class signature can match
    let doc = StaticDocument::new(
        r#"<html><body><input class="text-3xl px-2 rounded-sm truncate bg-white border border-transparent text-default w-full transition-colors hover:bg-[#F6F7F9] focus:bg-default focus:border-subtle focus:outline-none" value="Design review"></body></html>"#,
    );
    let pipeline = ExtractionPipeline::default();
    assert_eq!(
        pipeline.extract(&doc, ExtractionTarget::Title).await,
        "Design review"
    );
}

#[tokio::test]
async fn test_earlier_strategy_wins() {
    let doc = StaticDocument::new(
        r#"<html><body>
            <h1 id="first">From strategy one</h1>
            <h2 data-title="From strategy three">ignored</h2>
        </body></html>"#,
    );
    let table = StrategyTable::empty().with(
        ExtractionTarget::Title,
        vec![
            Strategy::path(["body", "h1#first"]),
            Strategy::path(["body", "h1#missing"]),
            Strategy::attribute("data-title"),
        ],
    );
    let pipeline = ExtractionPipeline::new(table);

    assert_eq!(
        pipeline.extract(&doc, ExtractionTarget::Title).await,
        "From strategy one"
    );
}

#[tokio::test]
async fn test_trim_normalization() {
    let doc = StaticDocument::new(
        r#"<html><body><input id="t" value="  Meeting Notes  &#10;"></body></html>"#,
    );
    let table = StrategyTable::empty().with(
        ExtractionTarget::Title,
        vec![Strategy::path(["input#t"]).reading("value")],
    );
    let pipeline = ExtractionPipeline::new(table);

    assert_eq!(
        pipeline.extract(&doc, ExtractionTarget::Title).await,
        "Meeting Notes"
    );
}

#[tokio::test]
async fn test_placeholder_text_is_reported_as_placeholder() {
    let doc = StaticDocument::new("<html><body><p>Unable to scrape</p></body></html>");
    let table = StrategyTable::empty().with(ExtractionTarget::Summary, vec![Strategy::BodyText]);
    let pipeline = ExtractionPipeline::new(table);

    assert_eq!(
        pipeline.extract(&doc, ExtractionTarget::Summary).await,
        UNABLE_TO_SCRAPE
    );
}

#[tokio::test]
async fn test_placeholder_text_skipped_for_better_source() {
    let doc = StaticDocument::new(
        r#"<html><body><div data-value="Unable to scrape"></div><main>Real summary text</main></body></html>"#,
    );
    let table = StrategyTable::empty().with(
        ExtractionTarget::Summary,
        vec![
            Strategy::attribute("data-value"),
            Strategy::path(["body", "main"]),
        ],
    );
    let pipeline = ExtractionPipeline::new(table);

    assert_eq!(
        pipeline.extract(&doc, ExtractionTarget::Summary).await,
        "Real summary text"
    );
}

#[tokio::test]
async fn test_exhausted_targets_use_placeholders() {
    let doc = StaticDocument::new("<html><body></body></html>");
    let pipeline = ExtractionPipeline::default();

    assert_eq!(
        pipeline.extract(&doc, ExtractionTarget::Title).await,
        UNKNOWN_TITLE
    );
    assert_eq!(
        pipeline.extract(&doc, ExtractionTarget::Summary).await,
        UNABLE_TO_SCRAPE
    );
    assert_eq!(
        pipeline.extract(&doc, ExtractionTarget::Transcript).await,
        UNABLE_TO_SCRAPE
    );
    assert_eq!(
        pipeline.extract(&doc, ExtractionTarget::CreatedDate).await,
        UNKNOWN_DATE
    );
}

#[tokio::test]
async fn test_data_value_summary() {
    let doc = StaticDocument::new(
        r#"<html><body><section><div data-value="Q3 planning summary"></div></section></body></html>"#,
    );
    let pipeline = ExtractionPipeline::default();

    assert_eq!(
        pipeline.extract(&doc, ExtractionTarget::Summary).await,
        "Q3 planning summary"
    );
}

#[tokio::test]
async fn test_extraction_is_idempotent() {
    let doc = StaticDocument::new(CONVERSATION_PAGE);
    let pipeline = ExtractionPipeline::default();

    let first = pipeline.extract_all(&doc, &ExtractionTarget::ALL).await;
    let second = pipeline.extract_all(&doc, &ExtractionTarget::ALL).await;
    assert_eq!(first, second);
    assert_eq!(first.len(), ExtractionTarget::ALL.len());
}

#[tokio::test]
async fn test_invalid_selector_does_not_stop_chain() {
    let doc = StaticDocument::new(r#"<html><body><h1>Fallback title</h1></body></html>"#);
    let table = StrategyTable::empty().with(
        ExtractionTarget::Title,
        vec![Strategy::path(["div["]), Strategy::path(["body", "h1"])],
    );
    let pipeline = ExtractionPipeline::new(table);

    assert_eq!(
        pipeline.extract(&doc, ExtractionTarget::Title).await,
        "Fallback title"
    );
}

/// Document whose answers depend on the selector asked for
struct ScriptedDocument;

#[async_trait]
impl Document for ScriptedDocument {
    async fn first_value(
        &self,
        selector: &str,
        _attribute: Option<&str>,
    ) -> otter_scrape::Result<Option<String>> {
        match selector {
            "#fails" => Err(Error::generic("lookup exploded")),
            "#panics" => panic!("strategy bug"),
            "#works" => Ok(Some("  Recovered title ".to_string())),
            _ => Ok(None),
        }
    }

    async fn largest_text(
        &self,
        _scope: &str,
        _min_chars: usize,
    ) -> otter_scrape::Result<Option<String>> {
        Err(Error::generic("no layout"))
    }

    async fn body_text(&self) -> otter_scrape::Result<Option<String>> {
        Ok(None)
    }
}

#[tokio::test]
async fn test_failing_strategies_are_isolated() {
    let table = StrategyTable::empty().with(
        ExtractionTarget::Title,
        vec![
            Strategy::path(["#fails"]),
            Strategy::path(["#panics"]),
            Strategy::largest_text("body", 0),
            Strategy::path(["#works"]),
        ],
    );
    let pipeline = ExtractionPipeline::new(table);
    let document = ScriptedDocument;

    assert_eq!(
        pipeline.extract(&document, ExtractionTarget::Title).await,
        "Recovered title"
    );
}

#[tokio::test]
async fn test_snapshot_defaults_to_empty() {
    let snapshot = ScriptedDocument
        .snapshot(&SnapshotOptions::default())
        .await
        .unwrap();
    assert_eq!(snapshot, DiagnosticSnapshot::default());
}

#[tokio::test]
async fn test_attribute_name_case_is_ignored() {
    let doc = StaticDocument::new(
        r#"<html><body><div data-value="Q3 planning summary"></div></body></html>"#,
    );
    let table = StrategyTable::empty().with(
        ExtractionTarget::Summary,
        vec![Strategy::attribute("Data-Value")],
    );
    let pipeline = ExtractionPipeline::new(table);

    assert_eq!(
        pipeline.extract(&doc, ExtractionTarget::Summary).await,
        "Q3 planning summary"
    );
}

#[tokio::test]
async fn test_only_failing_strategies_yield_placeholder() {
    let table = StrategyTable::empty().with(
        ExtractionTarget::CreatedDate,
        vec![Strategy::path(["#fails"]), Strategy::path(["#panics"])],
    );
    let pipeline = ExtractionPipeline::new(table);

    let value = pipeline
        .extract(&ScriptedDocument, ExtractionTarget::CreatedDate)
        .await;
    assert_eq!(value, UNKNOWN_DATE);
}

#[test]
fn test_strategy_table_from_toml() {
    let table: StrategyTable = toml::from_str(
        r#"
        [[summary]]
        kind = "class_signature"
        tag = "div"
        classes = ["summary-content"]

        [[summary]]
        kind = "largest_text"
        scope = "main"
        min_chars = 40
        "#,
    )
    .unwrap();

    assert_eq!(
        table.summary,
        vec![
            Strategy::classes(Some("div"), ["summary-content"]),
            Strategy::largest_text("main", 40),
        ]
    );
    assert_eq!(table.title, StrategyTable::default().title);
}
