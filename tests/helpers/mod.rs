#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use rusqlite::Connection;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use daybook::api::{self, AppState};
use daybook::category::Category;
use daybook::classifier::prompt::PromptPolicy;
use daybook::classifier::{ClassifierError, ExternalClassifier};
use daybook::diary::types::DiaryEntry;
use daybook::service::CategorizationService;

/// Open a fresh in-memory database with the schema applied.
pub fn test_db() -> Connection {
    daybook::db::open_memory_database().unwrap()
}

/// What the stub external classifier does when called.
#[derive(Clone, Copy)]
pub enum StubReply {
    Answer(&'static str),
    Fail,
    Hang,
}

/// External classifier double that counts calls.
pub struct StubClassifier {
    reply: StubReply,
    calls: AtomicUsize,
}

impl StubClassifier {
    pub fn new(reply: StubReply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExternalClassifier for StubClassifier {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.reply {
            StubReply::Answer(text) => Ok(text.to_string()),
            StubReply::Fail => Err(ClassifierError::Status {
                status: 500,
                body: "internal".into(),
            }),
            StubReply::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok("DREAM".into())
            }
        }
    }
}

/// Service backed by `stub`, with a short timeout.
pub fn stub_service(stub: &Arc<StubClassifier>) -> CategorizationService {
    CategorizationService::with_external(
        stub.clone(),
        PromptPolicy::Auto,
        Duration::from_millis(200),
    )
}

/// Serve the API on an ephemeral port. Returns the base URL.
pub async fn spawn_app(service: CategorizationService) -> String {
    let state = AppState::new(service, test_db());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, api::router(state)).await.unwrap();
    });
    format!("http://{addr}")
}

/// An entry dated `date` (`YYYY-MM-DD`) at `time` (`HH:MM`).
pub fn entry_at(owner: &str, content: &str, category: Category, date: &str, time: &str) -> DiaryEntry {
    DiaryEntry::new(
        owner,
        content,
        category,
        NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        NaiveTime::parse_from_str(time, "%H:%M").unwrap(),
    )
}
