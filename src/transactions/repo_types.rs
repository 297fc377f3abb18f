use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

/// Transaction joined with the buyer and product columns the console shows.
#[derive(Debug, Clone, FromRow)]
pub struct TransactionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub total: f64,
    pub status: TransactionStatus,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub user_name: String,
    pub user_email: String,
    pub product_name: String,
    pub product_price: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TransactionUser {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TransactionProduct {
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetails {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub total: f64,
    pub status: TransactionStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub user: TransactionUser,
    pub product: TransactionProduct,
}

impl From<TransactionRow> for TransactionDetails {
    fn from(r: TransactionRow) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            product_id: r.product_id,
            quantity: r.quantity,
            total: r.total,
            status: r.status,
            created_at: r.created_at,
            updated_at: r.updated_at,
            user: TransactionUser {
                name: r.user_name,
                email: r.user_email,
            },
            product: TransactionProduct {
                name: r.product_name,
                price: r.product_price,
            },
        }
    }
}

/// Validated purchase request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewTransaction {
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub status: TransactionStatus,
}
