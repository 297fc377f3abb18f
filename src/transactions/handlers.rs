use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{CreateTransactionRequest, TransactionPage, TransactionQuery, UpdateStatusRequest},
    repo,
    repo_types::TransactionDetails,
    services,
};
use crate::{
    auth::{dto::MessageResponse, extractors::AdminUser},
    error::AppResult,
    pagination::{Page, PageParams},
    state::AppState,
};

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route(
            "/admin/transactions/:id",
            axum::routing::patch(update_status).delete(delete_transaction),
        )
}

#[instrument(skip(state, _admin))]
pub async fn list_transactions(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(q): Query<TransactionQuery>,
) -> AppResult<Json<TransactionPage>> {
    let page = Page::from_params(&PageParams {
        page: q.page,
        limit: q.limit,
    });
    let search = q
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let (rows, total) = tokio::try_join!(
        repo::list(&state.db, search, page),
        repo::count(&state.db, search),
    )?;

    Ok(Json(TransactionPage {
        transactions: rows.into_iter().map(TransactionDetails::from).collect(),
        total,
        page: page.page,
        total_pages: page.total_pages(total),
    }))
}

#[instrument(skip(state, admin, body), fields(admin_id = %admin.0.sub))]
pub async fn create_transaction(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(body): Json<CreateTransactionRequest>,
) -> AppResult<(StatusCode, Json<TransactionDetails>)> {
    let new = services::validate_new(body)?;
    let created = services::create_transaction(&state.db, new).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state, admin, body), fields(admin_id = %admin.0.sub))]
pub async fn update_status(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateStatusRequest>,
) -> AppResult<Json<TransactionDetails>> {
    let updated = services::set_status(&state.db, id, body.status).await?;
    Ok(Json(updated))
}

#[instrument(skip(state, admin), fields(admin_id = %admin.0.sub))]
pub async fn delete_transaction(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    services::delete_transaction(&state.db, id).await?;
    Ok(Json(MessageResponse {
        message: "Transaction deleted successfully".into(),
    }))
}
