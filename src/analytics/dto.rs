use serde::Serialize;

use super::repo_types::{CategoryStat, MonthlyRevenue, StatusStats, TopBuyer, TopProduct};
use crate::transactions::repo_types::TransactionDetails;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub total_products: i64,
    pub total_transactions: i64,
    pub total_users: i64,
    pub total_revenue: f64,
    pub recent_transactions: Vec<TransactionDetails>,
    pub category_stats: Vec<CategoryStat>,
    pub monthly_revenue: Vec<MonthlyRevenue>,
    pub status_stats: StatusStats,
    pub top_products: Vec<TopProduct>,
    pub top_buyers: Vec<TopBuyer>,
}
