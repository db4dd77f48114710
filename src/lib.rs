//! Personal diary backend with automatic entry categorization.
//!
//! Every entry is sorted into one of six categories:
//!
//! | Category | Meaning |
//! |----------|---------|
//! | **TODO** | Tasks, to-dos, things to complete |
//! | **DREAM** | Dreams, future visions, wishes, expectations |
//! | **BEAUTIFUL** | Beautiful, happy, joyful moments |
//! | **REFLECTION** | Mistakes, lessons, self-improvement |
//! | **GRATITUDE** | Gratitude, thanks |
//! | **NORMAL** | Everything else |
//!
//! # Architecture
//!
//! - **Keywords**: a static bilingual (Chinese/English) substring table, always available
//! - **External classifier**: an optional OpenAI-compatible chat model, used only
//!   when a credential is configured and only if its answer is one of the six labels
//! - **Storage**: SQLite, one `entries` table scoped by owner
//! - **Transport**: JSON over HTTP (axum)
//!
//! # Modules
//!
//! - [`category`]: The category enum, keyword table, and keyword classifier
//! - [`classifier`]: The external classifier trait, error type, prompts, and HTTP client
//! - [`service`]: Two-tier categorization with validation and fallback
//! - [`diary`]: Entry records, owner-scoped store, stats and calendar views
//! - [`api`]: axum routes
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`db`]: SQLite database initialization and schema

pub mod api;
pub mod category;
pub mod classifier;
pub mod config;
pub mod db;
pub mod diary;
pub mod server;
pub mod service;
