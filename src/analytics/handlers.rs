use axum::{extract::State, routing::get, Json, Router};
use tracing::{info, instrument};

use super::{dto::AnalyticsResponse, services};
use crate::{auth::extractors::AdminUser, error::AppResult, state::AppState};

pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/admin/analytics", get(get_analytics))
}

#[instrument(skip(state, admin), fields(admin_id = %admin.0.sub))]
pub async fn get_analytics(
    State(state): State<AppState>,
    admin: AdminUser,
) -> AppResult<Json<AnalyticsResponse>> {
    let report = services::dashboard(&state.db).await?;
    info!(
        transactions = report.total_transactions,
        revenue = report.total_revenue,
        "analytics computed"
    );
    Ok(Json(report))
}
