#![allow(dead_code)]

use std::env;
use std::sync::OnceLock;

use electrostore::{
    auth::repo_types::{Role, User},
    products::{
        repo as products,
        repo_types::{Category, NewProduct, Product},
    },
};
use sqlx::PgPool;
use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

static TEST_DB_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

pub struct TestDb {
    pub pool: PgPool,
    _guard: MutexGuard<'static, ()>,
}

/// Connects to `TEST_DATABASE_URL` and applies migrations. Returns `None`
/// when the variable is unset so the suite can run without Postgres.
pub async fn init_test_db() -> Option<TestDb> {
    dotenvy::dotenv().ok();
    let Ok(url) = env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set; skipping database test");
        return None;
    };

    let lock = TEST_DB_LOCK.get_or_init(|| Mutex::new(()));
    let guard = lock.lock().await;

    let pool = PgPool::connect(&url).await.expect("connect test db");
    sqlx::migrate!().run(&pool).await.expect("migrations");
    Some(TestDb {
        pool,
        _guard: guard,
    })
}

pub fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

pub async fn user(pool: &PgPool, name: &str, role: Role) -> User {
    User::create(
        pool,
        &format!("{}@example.com", unique("user")),
        name,
        "not-a-real-hash",
        role,
    )
    .await
    .expect("insert user")
}

pub async fn buyer(pool: &PgPool) -> User {
    user(pool, &unique("Buyer"), Role::Buyer).await
}

/// Empties every table. Only for tests that assert on global aggregates.
pub async fn reset(pool: &PgPool) {
    sqlx::query("TRUNCATE transactions, products, users")
        .execute(pool)
        .await
        .expect("truncate");
}

pub async fn product(pool: &PgPool, name: &str, category: Category, stock: i32) -> Product {
    priced_product(pool, name, category, stock, 10.5).await
}

pub async fn priced_product(
    pool: &PgPool,
    name: &str,
    category: Category,
    stock: i32,
    price: f64,
) -> Product {
    products::insert(
        pool,
        &NewProduct {
            name: name.into(),
            description: "test product".into(),
            price,
            image: "https://images.example.com/test.jpg".into(),
            category,
            stock,
            featured: false,
        },
    )
    .await
    .expect("insert product")
}

pub async fn stock_of(pool: &PgPool, id: Uuid) -> i32 {
    sqlx::query_scalar("SELECT stock FROM products WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("read stock")
}
