use sqlx::PgPool;

use super::repo_types::{CategoryStat, MonthlyRevenue, TopBuyer, TopProduct};
use crate::auth::repo_types::Role;
use crate::transactions::repo_types::TransactionStatus;

const COMPLETED: TransactionStatus = TransactionStatus::Completed;

/// `(products, transactions, users)`
pub async fn totals(db: &PgPool) -> anyhow::Result<(i64, i64, i64)> {
    let row = sqlx::query_as::<_, (i64, i64, i64)>(
        r#"
        SELECT (SELECT COUNT(*) FROM products),
               (SELECT COUNT(*) FROM transactions),
               (SELECT COUNT(*) FROM users)
        "#,
    )
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn completed_revenue(db: &PgPool) -> anyhow::Result<f64> {
    let revenue: f64 = sqlx::query_scalar(
        r#"
        SELECT COALESCE(ROUND(SUM(total)::numeric, 2), 0)::float8
          FROM transactions
         WHERE status = $1
        "#,
    )
    .bind(COMPLETED)
    .fetch_one(db)
    .await?;
    Ok(revenue)
}

pub async fn category_stats(db: &PgPool) -> anyhow::Result<Vec<CategoryStat>> {
    let rows = sqlx::query_as::<_, CategoryStat>(
        r#"
        SELECT p.category,
               COUNT(*) AS count,
               ROUND(SUM(t.total)::numeric, 2)::float8 AS revenue
          FROM transactions t
          JOIN products p ON p.id = t.product_id
         WHERE t.status = $1
         GROUP BY p.category
         ORDER BY revenue DESC, p.category ASC
        "#,
    )
    .bind(COMPLETED)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn status_counts(db: &PgPool) -> anyhow::Result<Vec<(TransactionStatus, i64)>> {
    let rows = sqlx::query_as::<_, (TransactionStatus, i64)>(
        "SELECT status, COUNT(*) FROM transactions GROUP BY status",
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn top_products(db: &PgPool, limit: i64) -> anyhow::Result<Vec<TopProduct>> {
    let rows = sqlx::query_as::<_, TopProduct>(
        r#"
        SELECT p.id, p.name, p.category,
               SUM(t.quantity)::int8 AS total_sold,
               ROUND(SUM(t.total)::numeric, 2)::float8 AS revenue
          FROM transactions t
          JOIN products p ON p.id = t.product_id
         WHERE t.status = $1
         GROUP BY p.id, p.name, p.category
         ORDER BY total_sold DESC, p.name ASC, p.id ASC
         LIMIT $2
        "#,
    )
    .bind(COMPLETED)
    .bind(limit)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Ranks BUYER accounts only; admin test purchases never show up.
pub async fn top_buyers(db: &PgPool, limit: i64) -> anyhow::Result<Vec<TopBuyer>> {
    let rows = sqlx::query_as::<_, TopBuyer>(
        r#"
        SELECT u.id, u.name, u.email,
               ROUND(SUM(t.total)::numeric, 2)::float8 AS total_spent,
               COUNT(*) AS total_orders
          FROM transactions t
          JOIN users u ON u.id = t.user_id
         WHERE t.status = $1 AND u.role = $2
         GROUP BY u.id, u.name, u.email
         ORDER BY total_spent DESC, u.name ASC, u.id ASC
         LIMIT $3
        "#,
    )
    .bind(COMPLETED)
    .bind(Role::Buyer)
    .bind(limit)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn monthly_revenue(db: &PgPool, months: i32) -> anyhow::Result<Vec<MonthlyRevenue>> {
    let rows = sqlx::query_as::<_, MonthlyRevenue>(
        r#"
        SELECT to_char(date_trunc('month', created_at AT TIME ZONE 'UTC'), 'YYYY-MM') AS month,
               ROUND(SUM(total)::numeric, 2)::float8 AS revenue,
               COUNT(*) AS transactions
          FROM transactions
         WHERE status = $1
           AND created_at >= now() - make_interval(months => $2)
         GROUP BY 1
         ORDER BY 1 ASC
        "#,
    )
    .bind(COMPLETED)
    .bind(months)
    .fetch_all(db)
    .await?;
    Ok(rows)
}
