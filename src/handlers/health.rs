use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::AppState;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "couple-dashboard-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// The finance gateway is reported but never gates readiness.
pub async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let entries_ok = state.entries.ping().await;
    let notes_ok = state.notes.ping().await;
    let finance = if state.finance.is_configured() {
        "configured"
    } else {
        "not_configured"
    };

    let check = |ok: bool| if ok { "ok" } else { "failed" };
    let checks = json!({
        "entries": check(entries_ok),
        "notes": check(notes_ok),
        "finance": finance,
    });

    if entries_ok && notes_ok {
        (
            StatusCode::OK,
            Json(json!({ "status": "ready", "checks": checks })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "not_ready", "checks": checks })),
        )
    }
}
