use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::models::finance::PartnerFinances;
use crate::AppState;

pub async fn get_finances(State(state): State<AppState>) -> AppResult<Json<PartnerFinances>> {
    let finances = state.finance.fetch_balances().await?;
    tracing::debug!(total = finances.total_balance(), "Balances fetched");
    Ok(Json(finances))
}
