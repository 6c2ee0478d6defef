//! Health check endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::db::StoreMode;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct NotificationHealth {
    pub subscribers: usize,
}

/// Health report.
///
/// `mongodb` keeps the key the site already reads; it reports whether the
/// primary document store is in use.
#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub mongodb: &'static str,
    pub mode: StoreMode,
    pub notifications: NotificationHealth,
}

/// GET /api/health - Report store connectivity and subscriber count.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthReport> {
    let mode = state.store_mode();

    Json(HealthReport {
        status: "Server is running",
        mongodb: match mode {
            StoreMode::Database => "connected",
            StoreMode::Demo => "disconnected",
        },
        mode,
        notifications: NotificationHealth {
            subscribers: state.notifier.subscriber_count(),
        },
    })
}
