//! Two-tier entry categorization.
//!
//! [`CategorizationService::classify`] prefers the external classifier when one is
//! configured and its answer is a valid category; on absence, transport failure,
//! timeout, or invalid output it answers with the keyword classifier instead.
//! It never returns an error.

use std::sync::Arc;
use std::time::Duration;

use crate::category::keywords::KeywordClassifier;
use crate::category::Category;
use crate::classifier::prompt::{self, PromptPolicy};
use crate::classifier::{parse_completion, ClassifierError, ExternalClassifier};
use crate::config::ClassifierConfig;

/// Where a classification came from. Logged, and reported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    EmptyInput,
    Keywords,
    External,
    Fallback,
}

#[derive(Clone)]
pub struct CategorizationService {
    external: Option<Arc<dyn ExternalClassifier>>,
    keywords: KeywordClassifier,
    prompt_policy: PromptPolicy,
    timeout: Duration,
}

impl CategorizationService {
    /// Keyword-only service.
    pub fn offline() -> Self {
        Self {
            external: None,
            keywords: KeywordClassifier,
            prompt_policy: PromptPolicy::Auto,
            timeout: Duration::from_millis(ClassifierConfig::default().timeout_ms),
        }
    }

    /// Service that consults `external` first, bounded by `timeout`.
    pub fn with_external(
        external: Arc<dyn ExternalClassifier>,
        prompt_policy: PromptPolicy,
        timeout: Duration,
    ) -> Self {
        Self {
            external: Some(external),
            keywords: KeywordClassifier,
            prompt_policy,
            timeout,
        }
    }

    /// Build from config. No credential yields the keyword-only service.
    pub fn from_config(config: &ClassifierConfig) -> anyhow::Result<Self> {
        let prompt_policy = config
            .prompt_language
            .parse::<PromptPolicy>()
            .map_err(anyhow::Error::msg)?;

        match crate::classifier::create_classifier(config)? {
            Some(external) => {
                tracing::info!(model = %config.model, endpoint = %config.endpoint, "external classifier enabled");
                Ok(Self::with_external(
                    Arc::from(external),
                    prompt_policy,
                    Duration::from_millis(config.timeout_ms),
                ))
            }
            None => {
                tracing::info!("no classifier credential configured, using keyword matching only");
                Ok(Self::offline())
            }
        }
    }

    pub fn has_external(&self) -> bool {
        self.external.is_some()
    }

    /// Categorize `text`. Always resolves to a category.
    pub async fn classify(&self, text: &str) -> Category {
        self.classify_with_source(text).await.0
    }

    /// Like [`classify`](Self::classify), also reporting which tier answered.
    pub async fn classify_with_source(&self, text: &str) -> (Category, Source) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return (Category::Normal, Source::EmptyInput);
        }

        let Some(external) = &self.external else {
            return (self.keywords.classify(text), Source::Keywords);
        };

        match self.ask_external(external.as_ref(), trimmed).await {
            Ok(category) => {
                tracing::debug!(category = %category, "external classification accepted");
                (category, Source::External)
            }
            Err(e) => {
                let category = self.keywords.classify(text);
                tracing::warn!(error = %e, fallback = %category, "external classification discarded");
                (category, Source::Fallback)
            }
        }
    }

    async fn ask_external(
        &self,
        external: &dyn ExternalClassifier,
        trimmed: &str,
    ) -> Result<Category, ClassifierError> {
        let language = self.prompt_policy.language_for(trimmed);
        let system = prompt::system_prompt(language);
        let user = prompt::user_message(language, trimmed);

        let raw = tokio::time::timeout(self.timeout, external.complete(system, &user))
            .await
            .map_err(|_| ClassifierError::Timeout(self.timeout))??;

        parse_completion(&raw)
    }
}

impl Default for CategorizationService {
    fn default() -> Self {
        Self::offline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    enum Reply {
        Text(&'static str),
        Status(u16),
        Hang,
    }

    struct Scripted {
        reply: Reply,
        calls: AtomicUsize,
        last_system: Mutex<Option<String>>,
    }

    impl Scripted {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
                last_system: Mutex::new(None),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ExternalClassifier for Scripted {
        async fn complete(&self, system: &str, _user: &str) -> Result<String, ClassifierError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_system.lock().unwrap() = Some(system.to_string());
            match self.reply {
                Reply::Text(text) => Ok(text.to_string()),
                Reply::Status(status) => Err(ClassifierError::Status {
                    status,
                    body: "boom".into(),
                }),
                Reply::Hang => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok("TODO".into())
                }
            }
        }
    }

    fn service(double: &Arc<Scripted>) -> CategorizationService {
        CategorizationService::with_external(
            double.clone(),
            PromptPolicy::Auto,
            Duration::from_millis(100),
        )
    }

    #[tokio::test]
    async fn valid_external_answer_wins() {
        let double = Scripted::new(Reply::Text("GRATITUDE"));
        let svc = service(&double);
        // Keyword path would say TODO.
        let (category, source) = svc.classify_with_source("need to buy milk").await;
        assert_eq!(category, Category::Gratitude);
        assert_eq!(source, Source::External);
        assert_eq!(double.calls(), 1);
    }

    #[tokio::test]
    async fn lowercase_padded_answer_is_accepted() {
        let double = Scripted::new(Reply::Text("  dream \n"));
        assert_eq!(service(&double).classify("anything").await, Category::Dream);
    }

    #[tokio::test]
    async fn invalid_answer_falls_back() {
        for reply in ["URGENT", "", "TODO please"] {
            let double = Scripted::new(Reply::Text(reply));
            let (category, source) = service(&double)
                .classify_with_source("Grateful for this quiet morning")
                .await;
            assert_eq!(category, Category::Gratitude, "reply {reply:?}");
            assert_eq!(source, Source::Fallback);
        }
    }

    #[tokio::test]
    async fn transport_error_falls_back() {
        let double = Scripted::new(Reply::Status(503));
        let category = service(&double).classify("TODO: buy milk").await;
        assert_eq!(category, Category::Todo);
        assert_eq!(double.calls(), 1);
    }

    #[tokio::test]
    async fn timeout_falls_back() {
        let double = Scripted::new(Reply::Hang);
        let started = std::time::Instant::now();
        let (category, source) = service(&double)
            .classify_with_source("The train was ten minutes late today.")
            .await;
        assert_eq!(category, Category::Normal);
        assert_eq!(source, Source::Fallback);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn blank_input_skips_both_classifiers() {
        let double = Scripted::new(Reply::Text("TODO"));
        let svc = service(&double);
        assert_eq!(svc.classify("").await, Category::Normal);
        assert_eq!(svc.classify("  \t\n").await, Category::Normal);
        assert_eq!(double.calls(), 0);
    }

    #[tokio::test]
    async fn offline_matches_keyword_classifier() {
        let svc = CategorizationService::offline();
        assert!(!svc.has_external());
        for text in [
            "待办：下午三点记得给张总回个电话",
            "Grateful for this quiet morning",
            "The train was ten minutes late today.",
            "unhappy days",
        ] {
            let (category, source) = svc.classify_with_source(text).await;
            assert_eq!(category, KeywordClassifier.classify(text));
            assert_eq!(source, Source::Keywords);
        }
    }

    #[tokio::test]
    async fn prompt_language_follows_entry_script() {
        let double = Scripted::new(Reply::Text("NORMAL"));
        let svc = service(&double);

        svc.classify("今天去了公园").await;
        let system = double.last_system.lock().unwrap().clone().unwrap();
        assert_eq!(system, prompt::system_prompt(prompt::PromptLanguage::Chinese));

        svc.classify("Went to the park").await;
        let system = double.last_system.lock().unwrap().clone().unwrap();
        assert_eq!(system, prompt::system_prompt(prompt::PromptLanguage::English));
    }

    #[test]
    fn from_config_without_credential_is_offline() {
        let svc = CategorizationService::from_config(&ClassifierConfig::default()).unwrap();
        assert!(!svc.has_external());
    }

    #[test]
    fn from_config_rejects_unknown_prompt_language() {
        let config = ClassifierConfig {
            prompt_language: "klingon".into(),
            ..Default::default()
        };
        assert!(CategorizationService::from_config(&config).is_err());
    }
}
