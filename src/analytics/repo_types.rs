use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::products::repo_types::Category;

#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct CategoryStat {
    pub category: Category,
    pub count: i64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub id: Uuid,
    pub name: String,
    pub category: Category,
    pub total_sold: i64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopBuyer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub total_spent: f64,
    pub total_orders: i64,
}

#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct MonthlyRevenue {
    pub month: String, // YYYY-MM
    pub revenue: f64,
    pub transactions: i64,
}

/// Transaction counts per status, zero when a status has no rows.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct StatusStats {
    pub completed: i64,
    pub pending: i64,
    pub cancelled: i64,
}
