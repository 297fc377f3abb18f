use axum::{extract::State, routing::post, Json, Router};
use tracing::{info, instrument};

use super::{
    dto::{BuyNowRequest, CartCheckoutRequest, ContactRequest, HandoffResponse},
    services::{
        buy_now_message, cart_message, cart_total, check_available, contact_message, deep_link,
        price_cart, validate_customer, OrderLine,
    },
};
use crate::{
    error::{AppError, AppResult},
    products::repo as products,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/checkout/buy-now", post(buy_now))
        .route("/checkout/cart", post(checkout_cart))
        .route("/contact", post(contact))
}

#[instrument(skip(state, body), fields(product_id = %body.product_id, quantity = body.quantity))]
pub async fn buy_now(
    State(state): State<AppState>,
    Json(body): Json<BuyNowRequest>,
) -> AppResult<Json<HandoffResponse>> {
    validate_customer(&body.customer)?;

    let product = products::find_by_id(&state.db, body.product_id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;
    check_available(&product.name, product.stock, body.quantity)?;

    let line = OrderLine::new(product.name, product.price, body.quantity);
    let text = buy_now_message(&line, &body.customer);

    info!(total = line.total, "buy-now hand-off prepared");
    Ok(Json(HandoffResponse {
        url: deep_link(&state.config.checkout, &text),
        message: text,
        total: Some(line.total),
    }))
}

#[instrument(skip(state, body), fields(lines = body.items.items.len()))]
pub async fn checkout_cart(
    State(state): State<AppState>,
    Json(body): Json<CartCheckoutRequest>,
) -> AppResult<Json<HandoffResponse>> {
    validate_customer(&body.customer)?;
    if body.items.is_empty() {
        return Err(AppError::bad_request("Cart is empty"));
    }

    let ids: Vec<_> = body.items.items.iter().map(|i| i.product_id).collect();
    let catalog = products::find_many(&state.db, &ids).await?;
    let lines = price_cart(&body.items.items, &catalog)?;

    let total = cart_total(&lines);
    let text = cart_message(&lines, &body.customer);

    info!(total, "cart hand-off prepared");
    Ok(Json(HandoffResponse {
        url: deep_link(&state.config.checkout, &text),
        message: text,
        total: Some(total),
    }))
}

pub async fn contact(
    State(state): State<AppState>,
    Json(body): Json<ContactRequest>,
) -> AppResult<Json<HandoffResponse>> {
    let text = contact_message(&body)?;
    Ok(Json(HandoffResponse {
        url: deep_link(&state.config.checkout, &text),
        message: text,
        total: None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn contact_returns_deep_link() {
        let state = AppState::fake();
        let Json(res) = contact(
            State(state),
            Json(ContactRequest {
                first_name: "Ana".into(),
                email: "ana@example.com".into(),
                message: "Hi".into(),
                ..Default::default()
            }),
        )
        .await
        .expect("contact ok");
        assert!(res.url.starts_with("https://wa.me/15550001111?text=Hello%2C%20my%20name%20is%20Ana"));
        assert!(res.total.is_none());
    }

    #[tokio::test]
    async fn empty_cart_is_rejected_before_touching_db() {
        let state = AppState::fake();
        let body: CartCheckoutRequest = serde_json::from_value(serde_json::json!({
            "items": [],
            "customer": {"name": "Jane", "phone": "555", "address": "Main St"}
        }))
        .unwrap();
        let err = checkout_cart(State(state), Json(body)).await.unwrap_err();
        assert_eq!(err.to_string(), "Cart is empty");
    }
}
