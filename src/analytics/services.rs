use sqlx::PgPool;

use super::{dto::AnalyticsResponse, repo, repo_types::StatusStats};
use crate::transactions::{self, repo_types::TransactionStatus};

pub const RECENT_TRANSACTIONS: i64 = 5;
pub const TOP_PRODUCTS: i64 = 10;
pub const TOP_BUYERS: i64 = 5;
pub const REVENUE_MONTHS: i32 = 6;

pub fn status_stats(rows: &[(TransactionStatus, i64)]) -> StatusStats {
    rows.iter()
        .fold(StatusStats::default(), |mut acc, (status, count)| {
            match status {
                TransactionStatus::Completed => acc.completed += count,
                TransactionStatus::Pending => acc.pending += count,
                TransactionStatus::Cancelled => acc.cancelled += count,
            }
            acc
        })
}

/// Runs every aggregate the admin dashboard needs.
pub async fn dashboard(db: &PgPool) -> anyhow::Result<AnalyticsResponse> {
    let (
        (total_products, total_transactions, total_users),
        total_revenue,
        recent,
        category_stats,
        status_rows,
        top_products,
        top_buyers,
        monthly_revenue,
    ) = tokio::try_join!(
        repo::totals(db),
        repo::completed_revenue(db),
        transactions::repo::recent(db, RECENT_TRANSACTIONS),
        repo::category_stats(db),
        repo::status_counts(db),
        repo::top_products(db, TOP_PRODUCTS),
        repo::top_buyers(db, TOP_BUYERS),
        repo::monthly_revenue(db, REVENUE_MONTHS),
    )?;

    Ok(AnalyticsResponse {
        total_products,
        total_transactions,
        total_users,
        total_revenue,
        recent_transactions: recent.into_iter().map(Into::into).collect(),
        category_stats,
        monthly_revenue,
        status_stats: status_stats(&status_rows),
        top_products,
        top_buyers,
    })
}
