//! HTTP server startup.
//!
//! [`serve`] opens the database, builds the categorization service from config,
//! and runs the axum router until ctrl-c.

use crate::api::{self, AppState};
use crate::config::DaybookConfig;
use crate::db;
use crate::service::CategorizationService;
use anyhow::{Context, Result};

/// Open the DB and build the categorization service.
pub fn setup_state(config: &DaybookConfig) -> Result<AppState> {
    let db_path = config.resolved_db_path();
    let conn = db::open_database(&db_path)?;
    tracing::info!(db = %db_path.display(), "database ready");

    let service = CategorizationService::from_config(&config.classifier)?;

    Ok(AppState::new(service, conn))
}

/// Start the HTTP API.
pub async fn serve(config: DaybookConfig) -> Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);

    let state = setup_state(&config)?;
    let router = api::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "daybook listening at http://{bind_addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("shutting down HTTP server");
        })
        .await?;

    Ok(())
}
