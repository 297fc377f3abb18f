use sqlx::PgPool;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::CreateTransactionRequest,
    repo,
    repo_types::{NewTransaction, TransactionDetails, TransactionStatus},
};
use crate::error::AppError;

#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("Quantity must be at least 1")]
    InvalidQuantity,

    #[error("User not found")]
    UserNotFound,

    #[error("Product not found")]
    ProductNotFound,

    #[error("Transaction not found")]
    NotFound,

    #[error("Insufficient stock")]
    InsufficientStock { available: i32, requested: i32 },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<TransactionError> for AppError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::MissingFields
            | TransactionError::InvalidQuantity
            | TransactionError::InsufficientStock { .. } => AppError::BadRequest(err.to_string()),
            TransactionError::UserNotFound
            | TransactionError::ProductNotFound
            | TransactionError::NotFound => AppError::NotFound(err.to_string()),
            TransactionError::Database(e) => AppError::Database(e),
        }
    }
}

pub fn validate_new(req: CreateTransactionRequest) -> Result<NewTransaction, TransactionError> {
    let (Some(user_id), Some(product_id), Some(quantity)) =
        (req.user_id, req.product_id, req.quantity)
    else {
        return Err(TransactionError::MissingFields);
    };
    if quantity < 1 {
        return Err(TransactionError::InvalidQuantity);
    }
    Ok(NewTransaction {
        user_id,
        product_id,
        quantity,
        status: req.status.unwrap_or_default(),
    })
}

/// Stock left after taking `requested` units, or the reason it cannot be taken.
pub fn remaining_stock(available: i32, requested: i32) -> Result<i32, TransactionError> {
    if requested < 1 {
        return Err(TransactionError::InvalidQuantity);
    }
    if available < requested {
        return Err(TransactionError::InsufficientStock {
            available,
            requested,
        });
    }
    Ok(available - requested)
}

/// Line total rounded to cents.
pub fn line_total(price: f64, quantity: i32) -> f64 {
    (price * f64::from(quantity) * 100.0).round() / 100.0
}

/// Records a purchase and takes its quantity out of stock as one unit of
/// work. The product row stays locked from the stock check to the commit.
pub async fn create_transaction(
    db: &PgPool,
    new: NewTransaction,
) -> Result<TransactionDetails, TransactionError> {
    let mut tx = db.begin().await?;

    if !repo::user_exists_tx(&mut tx, new.user_id).await? {
        return Err(TransactionError::UserNotFound);
    }

    let (stock, price) = repo::lock_product_tx(&mut tx, new.product_id)
        .await?
        .ok_or(TransactionError::ProductNotFound)?;

    let remaining = remaining_stock(stock, new.quantity).map_err(|e| {
        warn!(product_id = %new.product_id, stock, requested = new.quantity, "insufficient stock");
        e
    })?;

    let total = line_total(price, new.quantity);
    let id = repo::insert_tx(&mut tx, &new, total).await?;
    repo::adjust_stock_tx(&mut tx, new.product_id, -new.quantity).await?;

    let row = repo::find_details(&mut tx, id)
        .await?
        .ok_or(TransactionError::NotFound)?;
    tx.commit().await?;

    info!(
        transaction_id = %id,
        product_id = %new.product_id,
        quantity = new.quantity,
        remaining,
        "transaction created"
    );
    Ok(row.into())
}

/// Removes a purchase and puts its quantity back into stock atomically.
pub async fn delete_transaction(db: &PgPool, id: Uuid) -> Result<(), TransactionError> {
    let mut tx = db.begin().await?;

    let (product_id, quantity) = repo::delete_returning_tx(&mut tx, id)
        .await?
        .ok_or(TransactionError::NotFound)?;
    repo::adjust_stock_tx(&mut tx, product_id, quantity).await?;

    tx.commit().await?;
    info!(transaction_id = %id, %product_id, quantity, "transaction deleted, stock restored");
    Ok(())
}

/// Status changes never touch stock.
pub async fn set_status(
    db: &PgPool,
    id: Uuid,
    status: TransactionStatus,
) -> Result<TransactionDetails, TransactionError> {
    if !repo::update_status(db, id, status).await? {
        return Err(TransactionError::NotFound);
    }
    let mut conn = db.acquire().await?;
    let row = repo::find_details(&mut conn, id)
        .await?
        .ok_or(TransactionError::NotFound)?;
    Ok(row.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn stock_check_rejects_overdraw() {
        assert_eq!(remaining_stock(5, 3).unwrap(), 2);
        assert_eq!(remaining_stock(3, 3).unwrap(), 0);
        assert!(matches!(
            remaining_stock(2, 3),
            Err(TransactionError::InsufficientStock {
                available: 2,
                requested: 3
            })
        ));
        assert!(matches!(
            remaining_stock(5, 0),
            Err(TransactionError::InvalidQuantity)
        ));
    }

    #[test]
    fn line_total_rounds_to_cents() {
        assert_eq!(line_total(1199.99, 3), 3599.97);
        assert_eq!(line_total(0.1, 3), 0.3);
    }

    #[test]
    fn validate_defaults_status_to_pending() {
        let t = validate_new(CreateTransactionRequest {
            user_id: Some(Uuid::new_v4()),
            product_id: Some(Uuid::new_v4()),
            quantity: Some(2),
            status: None,
        })
        .expect("valid");
        assert_eq!(t.status, TransactionStatus::Pending);
        assert_eq!(t.quantity, 2);
    }

    #[test]
    fn validate_rejects_missing_or_bad_quantity() {
        assert!(matches!(
            validate_new(CreateTransactionRequest::default()),
            Err(TransactionError::MissingFields)
        ));
        assert!(matches!(
            validate_new(CreateTransactionRequest {
                user_id: Some(Uuid::new_v4()),
                product_id: Some(Uuid::new_v4()),
                quantity: Some(0),
                status: None,
            }),
            Err(TransactionError::InvalidQuantity)
        ));
    }

    #[test]
    fn errors_map_to_http_statuses() {
        let insufficient: AppError = TransactionError::InsufficientStock {
            available: 1,
            requested: 2,
        }
        .into();
        assert_eq!(insufficient.status(), StatusCode::BAD_REQUEST);
        assert_eq!(insufficient.to_string(), "Insufficient stock");

        let missing: AppError = TransactionError::ProductNotFound.into();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn create_request_reads_camel_case() {
        let req: CreateTransactionRequest = serde_json::from_str(
            r#"{"userId":"7d0c8f5e-8a4f-4b8e-9a51-1f0f5d1c2b3a","productId":"1b4e28ba-2fa1-11d2-883f-0016d3cca427","quantity":3,"status":"COMPLETED"}"#,
        )
        .unwrap();
        assert_eq!(req.quantity, Some(3));
        assert_eq!(req.status, Some(TransactionStatus::Completed));
    }
}
