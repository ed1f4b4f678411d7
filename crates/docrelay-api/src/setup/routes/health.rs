//! Health check handler.

use crate::state::AppState;
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use docrelay_core::constants::SERVICE_NAME;
use serde::Serialize;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

/// Run an async check with timeout; `true` only when it finished successfully in time.
async fn run_check<F, E>(timeout: Duration, f: F, name: &str) -> bool
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match tokio::time::timeout(timeout, f).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            tracing::warn!(check = name, error = %e, "Health check failed");
            false
        }
        Err(_) => {
            tracing::warn!(check = name, "Health check timed out");
            false
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: &'static str,
    pub domain: String,
    pub database: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// Liveness plus a best-effort database probe. Always answers 200.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let database = if run_check(TIMEOUT, state.store.ping(), "database").await {
        "connected"
    } else {
        "disconnected"
    };

    Json(HealthResponse {
        ok: true,
        service: SERVICE_NAME,
        domain: state.config.domain().to_string(),
        database,
        timestamp: Utc::now(),
    })
}
