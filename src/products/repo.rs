use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::repo_types::{NewProduct, Product, ProductChanges, ProductFilter};
use crate::pagination::Page;

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, image, category, stock, featured, created_at";

/// `%term%` with LIKE metacharacters escaped.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('%');
    out
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, f: &ProductFilter) {
    qb.push(" WHERE TRUE");
    if let Some(search) = &f.search {
        qb.push(" AND name ILIKE ").push_bind(like_pattern(search));
    }
    if let Some(category) = f.category {
        qb.push(" AND category = ").push_bind(category);
    }
    if let Some(featured) = f.featured {
        qb.push(" AND featured = ").push_bind(featured);
    }
}

pub async fn list(db: &PgPool, filter: &ProductFilter, page: Page) -> anyhow::Result<Vec<Product>> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT ");
    qb.push(PRODUCT_COLUMNS).push(" FROM products");
    push_filters(&mut qb, filter);
    qb.push(" ORDER BY created_at DESC, id DESC LIMIT ")
        .push_bind(page.limit)
        .push(" OFFSET ")
        .push_bind(page.offset());

    let rows = qb.build_query_as::<Product>().fetch_all(db).await?;
    Ok(rows)
}

pub async fn count(db: &PgPool, filter: &ProductFilter) -> anyhow::Result<i64> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products");
    push_filters(&mut qb, filter);
    let total: i64 = qb.build_query_scalar().fetch_one(db).await?;
    Ok(total)
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Product>> {
    let row = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn find_many(db: &PgPool, ids: &[Uuid]) -> anyhow::Result<Vec<Product>> {
    let rows = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)"
    ))
    .bind(ids)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn insert(db: &PgPool, p: &NewProduct) -> anyhow::Result<Product> {
    let row = sqlx::query_as::<_, Product>(&format!(
        r#"
        INSERT INTO products (name, description, price, image, category, stock, featured)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {PRODUCT_COLUMNS}
        "#
    ))
    .bind(&p.name)
    .bind(&p.description)
    .bind(p.price)
    .bind(&p.image)
    .bind(p.category)
    .bind(p.stock)
    .bind(p.featured)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn update(
    db: &PgPool,
    id: Uuid,
    c: &ProductChanges,
) -> anyhow::Result<Option<Product>> {
    let row = sqlx::query_as::<_, Product>(&format!(
        r#"
        UPDATE products
           SET name        = COALESCE($2, name),
               description = COALESCE($3, description),
               price       = COALESCE($4, price),
               image       = COALESCE($5, image),
               category    = COALESCE($6, category),
               featured    = COALESCE($7, featured)
         WHERE id = $1
        RETURNING {PRODUCT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&c.name)
    .bind(&c.description)
    .bind(c.price)
    .bind(&c.image)
    .bind(c.category)
    .bind(c.featured)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Returns whether a row was removed. Fails with a foreign-key violation
/// while transactions still reference the product.
pub async fn delete(db: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let res = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(res.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::products::repo_types::Category;

    #[test]
    fn like_pattern_wraps_and_escapes() {
        assert_eq!(like_pattern("iphone"), "%iphone%");
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b\\c"), "%a\\_b\\\\c%");
    }

    #[test]
    fn filters_are_joined_with_and() {
        let filter = ProductFilter {
            search: Some("pro".into()),
            category: Some(Category::Laptops),
            featured: Some(true),
        };
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products");
        push_filters(&mut qb, &filter);
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM products WHERE TRUE AND name ILIKE $1 AND category = $2 AND featured = $3"
        );
    }

    #[test]
    fn empty_filter_matches_everything() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products");
        push_filters(&mut qb, &ProductFilter::default());
        assert_eq!(qb.sql(), "SELECT COUNT(*) FROM products WHERE TRUE");
    }
}
