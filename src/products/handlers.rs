use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{CreateProductRequest, ProductPage, ProductQuery, UpdateProductRequest},
    repo,
    repo_types::Product,
    services::{filter_from_query, validate_changes, validate_new},
};
use crate::{
    auth::{dto::MessageResponse, extractors::AdminUser},
    error::{is_foreign_key_violation, AppError, AppResult},
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/:id", get(get_product))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/products", axum::routing::post(create_product))
        .route(
            "/products/:id",
            axum::routing::put(update_product).delete(delete_product),
        )
}

#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    Query(q): Query<ProductQuery>,
) -> AppResult<Json<ProductPage>> {
    let (filter, page) = filter_from_query(&q)?;

    let (products, total) = tokio::try_join!(
        repo::list(&state.db, &filter, page),
        repo::count(&state.db, &filter),
    )?;

    Ok(Json(ProductPage {
        products,
        total,
        page: page.page,
        total_pages: page.total_pages(total),
    }))
}

#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Product>> {
    repo::find_by_id(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Product not found"))
}

#[instrument(skip(state, admin, body), fields(admin_id = %admin.0.sub))]
pub async fn create_product(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(body): Json<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let new = validate_new(body)?;
    let product = repo::insert(&state.db, &new).await?;
    info!(product_id = %product.id, name = %product.name, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

#[instrument(skip(state, admin, body), fields(admin_id = %admin.0.sub))]
pub async fn update_product(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateProductRequest>,
) -> AppResult<Json<Product>> {
    let changes = validate_changes(body)?;
    let product = repo::update(&state.db, id, &changes)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;
    info!(product_id = %product.id, "product updated");
    Ok(Json(product))
}

#[instrument(skip(state, admin), fields(admin_id = %admin.0.sub))]
pub async fn delete_product(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    match repo::delete(&state.db, id).await {
        Ok(true) => {
            info!(product_id = %id, "product deleted");
            Ok(Json(MessageResponse {
                message: "Product deleted successfully".into(),
            }))
        }
        Ok(false) => Err(AppError::not_found("Product not found")),
        Err(e) if is_foreign_key_violation(&e) => {
            warn!(product_id = %id, "product still referenced by transactions");
            Err(AppError::Conflict(
                "Product has transactions and cannot be deleted".into(),
            ))
        }
        Err(e) => Err(e.into()),
    }
}
