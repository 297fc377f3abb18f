use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::repo_types::{NewTransaction, TransactionRow, TransactionStatus};
use crate::pagination::Page;
use crate::products::repo::like_pattern;

const DETAILS_SELECT: &str = r#"
    SELECT t.id, t.user_id, t.product_id, t.quantity, t.total, t.status,
           t.created_at, t.updated_at,
           u.name AS user_name, u.email AS user_email,
           p.name AS product_name, p.price AS product_price
      FROM transactions t
      JOIN users u ON u.id = t.user_id
      JOIN products p ON p.id = t.product_id
"#;

/// Matches the buyer's name OR the product's name.
const SEARCH_CLAUSE: &str = "WHERE ($1::text IS NULL OR u.name ILIKE $1 OR p.name ILIKE $1)";

pub async fn list(
    db: &PgPool,
    search: Option<&str>,
    page: Page,
) -> anyhow::Result<Vec<TransactionRow>> {
    let rows = sqlx::query_as::<_, TransactionRow>(&format!(
        "{DETAILS_SELECT} {SEARCH_CLAUSE} ORDER BY t.created_at DESC, t.id DESC LIMIT $2 OFFSET $3"
    ))
    .bind(search.map(like_pattern))
    .bind(page.limit)
    .bind(page.offset())
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn count(db: &PgPool, search: Option<&str>) -> anyhow::Result<i64> {
    let total: i64 = sqlx::query_scalar(&format!(
        r#"
        SELECT COUNT(*)
          FROM transactions t
          JOIN users u ON u.id = t.user_id
          JOIN products p ON p.id = t.product_id
        {SEARCH_CLAUSE}
        "#
    ))
    .bind(search.map(like_pattern))
    .fetch_one(db)
    .await?;
    Ok(total)
}

pub async fn recent(db: &PgPool, limit: i64) -> anyhow::Result<Vec<TransactionRow>> {
    let rows = sqlx::query_as::<_, TransactionRow>(&format!(
        "{DETAILS_SELECT} ORDER BY t.created_at DESC, t.id DESC LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn find_details(
    conn: &mut PgConnection,
    id: Uuid,
) -> Result<Option<TransactionRow>, sqlx::Error> {
    sqlx::query_as::<_, TransactionRow>(&format!("{DETAILS_SELECT} WHERE t.id = $1"))
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn user_exists_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
        .bind(user_id)
        .fetch_one(&mut **tx)
        .await
}

/// Reads `(stock, price)` and holds the row lock until the transaction ends.
pub async fn lock_product_tx(
    tx: &mut Transaction<'_, Postgres>,
    product_id: Uuid,
) -> Result<Option<(i32, f64)>, sqlx::Error> {
    sqlx::query_as::<_, (i32, f64)>("SELECT stock, price FROM products WHERE id = $1 FOR UPDATE")
        .bind(product_id)
        .fetch_optional(&mut **tx)
        .await
}

pub async fn adjust_stock_tx(
    tx: &mut Transaction<'_, Postgres>,
    product_id: Uuid,
    delta: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE products SET stock = stock + $2 WHERE id = $1")
        .bind(product_id)
        .bind(delta)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

pub async fn insert_tx(
    tx: &mut Transaction<'_, Postgres>,
    t: &NewTransaction,
    total: f64,
) -> Result<Uuid, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        INSERT INTO transactions (user_id, product_id, quantity, total, status)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(t.user_id)
    .bind(t.product_id)
    .bind(t.quantity)
    .bind(total)
    .bind(t.status)
    .fetch_one(&mut **tx)
    .await
}

/// Deletes the row and returns what it had taken out of stock.
pub async fn delete_returning_tx(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> Result<Option<(Uuid, i32)>, sqlx::Error> {
    sqlx::query_as::<_, (Uuid, i32)>(
        "DELETE FROM transactions WHERE id = $1 RETURNING product_id, quantity",
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await
}

pub async fn update_status(
    db: &PgPool,
    id: Uuid,
    status: TransactionStatus,
) -> Result<bool, sqlx::Error> {
    let res = sqlx::query("UPDATE transactions SET status = $2, updated_at = now() WHERE id = $1")
        .bind(id)
        .bind(status)
        .execute(db)
        .await?;
    Ok(res.rows_affected() > 0)
}
