//! HTTP routes.
//!
//! `POST /api/categorize` is the categorization endpoint; it answers
//! `{"category": ...}` for every request, falling back to `NORMAL` when the body
//! is unusable. The `/api/users/{owner}/...` routes store and query entries.

pub mod error;

use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use chrono::{NaiveDate, NaiveTime};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

use crate::category::Category;
use crate::diary::stats::{self, CalendarDay, CategoryStats};
use crate::diary::store;
use crate::diary::types::{DiaryEntry, EntryFilter, EntryPatch, DATE_FORMAT, TIME_FORMAT};
use crate::service::CategorizationService;
use error::ApiError;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    service: Arc<CategorizationService>,
    db: Arc<Mutex<Connection>>,
}

impl AppState {
    pub fn new(service: CategorizationService, conn: Connection) -> Self {
        Self {
            service: Arc::new(service),
            db: Arc::new(Mutex::new(conn)),
        }
    }

    /// Run a blocking store call on the connection.
    async fn with_db<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Connection) -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let conn = db
                .lock()
                .map_err(|e| anyhow::anyhow!("db lock poisoned: {e}"))?;
            f(&conn)
        })
        .await
        .map_err(|e| ApiError::Internal(format!("db task failed: {e}")))?
        .map_err(ApiError::from)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/categorize", post(categorize))
        .route(
            "/api/users/{owner}/entries",
            get(list_entries).post(create_entry),
        )
        .route(
            "/api/users/{owner}/entries/{id}",
            patch(update_entry).delete(delete_entry),
        )
        .route("/api/users/{owner}/stats", get(entry_stats))
        .route("/api/users/{owner}/calendar", get(calendar))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "external_classifier": state.service.has_external(),
    }))
}

#[derive(Debug, Deserialize)]
struct CategorizeRequest {
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct CategorizeResponse {
    category: Category,
}

async fn categorize(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Json<CategorizeResponse> {
    let content = match body {
        Ok(bytes) => match serde_json::from_slice::<CategorizeRequest>(&bytes) {
            Ok(CategorizeRequest { content: Some(content) }) => content,
            Ok(_) => String::new(),
            Err(e) => {
                tracing::debug!(error = %e, "unreadable categorize body, answering NORMAL");
                String::new()
            }
        },
        Err(e) => {
            tracing::debug!(error = %e, "categorize body rejected, answering NORMAL");
            String::new()
        }
    };

    let (category, source) = state.service.classify_with_source(&content).await;
    tracing::info!(
        content_len = content.len(),
        category = %category,
        source = ?source,
        "entry categorized"
    );
    Json(CategorizeResponse { category })
}

#[derive(Debug, Default, Deserialize)]
struct ListParams {
    date: Option<String>,
    category: Option<String>,
    q: Option<String>,
    limit: Option<usize>,
}

async fn list_entries(
    State(state): State<AppState>,
    Path(owner): Path<String>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<DiaryEntry>>, ApiError> {
    let Query(params) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let filter = EntryFilter {
        owner,
        date: params.date.as_deref().map(parse_date).transpose()?,
        category: params
            .category
            .as_deref()
            .map(|c| c.trim().to_uppercase().parse::<Category>())
            .transpose()
            .map_err(ApiError::BadRequest)?,
        query: params.q,
        limit: params.limit,
    };

    let entries = state
        .with_db(move |conn| store::find_entries(conn, &filter))
        .await?;
    Ok(Json(entries))
}

#[derive(Debug, Deserialize)]
struct CreateEntryRequest {
    content: String,
    date: Option<String>,
    time: Option<String>,
}

async fn create_entry(
    State(state): State<AppState>,
    Path(owner): Path<String>,
    payload: Result<Json<CreateEntryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DiaryEntry>), ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let content = req.content.trim();
    if content.is_empty() {
        return Err(ApiError::BadRequest("content must not be empty".into()));
    }

    let now = chrono::Local::now();
    let date = match req.date.as_deref() {
        Some(d) => parse_date(d)?,
        None => now.date_naive(),
    };
    let time = match req.time.as_deref() {
        Some(t) => NaiveTime::parse_from_str(t.trim(), TIME_FORMAT)
            .map_err(|_| ApiError::BadRequest(format!("invalid time {t:?}, expected HH:MM")))?,
        None => now.time(),
    };

    let category = state.service.classify(content).await;
    let entry = DiaryEntry::new(&owner, content, category, date, time);

    let stored = entry.clone();
    state
        .with_db(move |conn| store::upsert_entry(conn, &stored))
        .await?;

    tracing::info!(id = %entry.id, owner = %entry.owner, category = %entry.category, "entry created");
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn update_entry(
    State(state): State<AppState>,
    Path((owner, id)): Path<(String, String)>,
    payload: Result<Json<EntryPatch>, JsonRejection>,
) -> Result<Json<DiaryEntry>, ApiError> {
    let Json(patch) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let lookup_id = id.clone();
    let updated = state
        .with_db(move |conn| store::update_entry(conn, &owner, &lookup_id, &patch))
        .await?;

    updated.map(Json).ok_or(ApiError::NotFound(id))
}

async fn delete_entry(
    State(state): State<AppState>,
    Path((owner, id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let lookup_id = id.clone();
    let deleted = state
        .with_db(move |conn| store::delete_entry(conn, &owner, &lookup_id))
        .await?;

    if deleted {
        tracing::info!(id = %id, "entry deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(id))
    }
}

async fn entry_stats(
    State(state): State<AppState>,
    Path(owner): Path<String>,
) -> Result<Json<CategoryStats>, ApiError> {
    let stats = state
        .with_db(move |conn| stats::category_stats(conn, &owner))
        .await?;
    Ok(Json(stats))
}

#[derive(Debug, Deserialize)]
struct CalendarParams {
    month: Option<String>,
}

async fn calendar(
    State(state): State<AppState>,
    Path(owner): Path<String>,
    query: Result<Query<CalendarParams>, QueryRejection>,
) -> Result<Json<Vec<CalendarDay>>, ApiError> {
    let Query(params) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let first_day = match params.month.as_deref() {
        Some(month) => {
            stats::parse_month(month).map_err(|e| ApiError::BadRequest(e.to_string()))?
        }
        None => chrono::Local::now().date_naive(),
    };

    let days = state
        .with_db(move |conn| stats::calendar_month(conn, &owner, first_day))
        .await?;
    Ok(Json(days))
}

fn parse_date(date: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
        .map_err(|_| ApiError::BadRequest(format!("invalid date {date:?}, expected YYYY-MM-DD")))
}
