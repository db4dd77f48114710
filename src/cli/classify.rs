//! CLI `classify` command: categorize one piece of text.

use anyhow::Result;

use daybook::config::DaybookConfig;
use daybook::service::{CategorizationService, Source};

/// Categorize `text` and print the category with the tier that produced it.
pub async fn classify(config: &DaybookConfig, text: &str, offline: bool) -> Result<()> {
    let service = if offline {
        CategorizationService::offline()
    } else {
        CategorizationService::from_config(&config.classifier)?
    };

    let (category, source) = service.classify_with_source(text).await;
    let via = match source {
        Source::EmptyInput => "empty input",
        Source::Keywords => "keywords",
        Source::External => "external classifier",
        Source::Fallback => "keywords, external classifier discarded",
    };

    println!("{category}  ({via})");
    Ok(())
}
