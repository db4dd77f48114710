//! External text-completion classifier.
//!
//! Provides the [`ExternalClassifier`] trait, the [`ClassifierError`] taxonomy for
//! everything that can go wrong on the remote path, and the instruction prompts.
//! [`chat::ChatCompletionClassifier`] talks to any OpenAI-compatible endpoint.

pub mod chat;
pub mod prompt;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::category::Category;
use crate::config::ClassifierConfig;

/// Failures on the external classification path. None of these reach the
/// caller of [`crate::service::CategorizationService`]; they select the fallback.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server error: HTTP {status} - {body}")]
    Status { status: u16, body: String },

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("response had no completion text")]
    EmptyResponse,

    #[error("model answered outside the category set: {0:?}")]
    InvalidCategory(String),
}

/// A remote completion service that answers with a category label.
#[async_trait]
pub trait ExternalClassifier: Send + Sync {
    /// Send one system/user message pair and return the raw completion text.
    async fn complete(&self, system: &str, user: &str) -> Result<String, ClassifierError>;
}

/// Turn raw completion text into a category: trim, uppercase, then check
/// membership in the closed set.
pub fn parse_completion(raw: &str) -> Result<Category, ClassifierError> {
    let label = raw.trim().to_uppercase();
    if label.is_empty() {
        return Err(ClassifierError::EmptyResponse);
    }
    label
        .parse::<Category>()
        .map_err(|_| ClassifierError::InvalidCategory(label))
}

/// Build the configured external classifier, or `None` when no credential is set.
pub fn create_classifier(
    config: &ClassifierConfig,
) -> anyhow::Result<Option<Box<dyn ExternalClassifier>>> {
    match config.credential() {
        Some(api_key) => {
            let classifier = chat::ChatCompletionClassifier::new(config, api_key)?;
            Ok(Some(Box::new(classifier)))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_uppercases() {
        assert_eq!(parse_completion("  gratitude\n").unwrap(), Category::Gratitude);
        assert_eq!(parse_completion("Todo").unwrap(), Category::Todo);
        assert_eq!(parse_completion("NORMAL").unwrap(), Category::Normal);
    }

    #[test]
    fn parse_rejects_labels_outside_the_set() {
        assert!(matches!(
            parse_completion("URGENT"),
            Err(ClassifierError::InvalidCategory(label)) if label == "URGENT"
        ));
        assert!(matches!(
            parse_completion("TODO."),
            Err(ClassifierError::InvalidCategory(_))
        ));
        assert!(matches!(
            parse_completion("Category: TODO"),
            Err(ClassifierError::InvalidCategory(_))
        ));
    }

    #[test]
    fn parse_rejects_blank_output() {
        assert!(matches!(parse_completion(""), Err(ClassifierError::EmptyResponse)));
        assert!(matches!(parse_completion(" \n "), Err(ClassifierError::EmptyResponse)));
    }

    #[test]
    fn no_credential_means_no_classifier() {
        let config = ClassifierConfig::default();
        assert!(create_classifier(&config).unwrap().is_none());
    }

    #[test]
    fn credential_builds_classifier() {
        let config = ClassifierConfig {
            api_key: Some("sk-test".into()),
            ..Default::default()
        };
        assert!(create_classifier(&config).unwrap().is_some());
    }
}
