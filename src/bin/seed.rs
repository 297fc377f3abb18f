//! Resets the database to a demo catalog with one admin and a few buyers.

use anyhow::Context;
use electrostore::{
    auth::{
        repo_types::{Role, User},
        services::hash_password,
    },
    products::{
        repo as products,
        repo_types::{Category, NewProduct},
    },
    state::AppState,
    telemetry,
};
use tracing::info;

fn demo_products() -> Vec<NewProduct> {
    let p = |name: &str, description: &str, price: f64, category: Category, stock: i32, featured: bool| NewProduct {
        name: name.into(),
        description: description.into(),
        price,
        image: format!(
            "https://images.example.com/products/{}.jpg",
            name.to_lowercase().replace(' ', "-")
        ),
        category,
        stock,
        featured,
    };
    vec![
        p("iPhone 15 Pro Max", "Titanium design, A17 Pro chip and a pro camera system.", 1199.99, Category::Smartphones, 25, true),
        p("Samsung Galaxy S24 Ultra", "S Pen, 200MP camera and AI-powered features.", 1299.99, Category::Smartphones, 30, true),
        p("Google Pixel 8 Pro", "Pure Android with advanced AI photography.", 999.99, Category::Smartphones, 20, false),
        p("MacBook Pro 16", "M3 Max chip, Liquid Retina XDR display.", 3499.00, Category::Laptops, 10, true),
        p("Dell XPS 15", "OLED display, Intel Core i9, RTX graphics.", 2199.00, Category::Laptops, 12, false),
        p("iPad Pro 12.9", "M2 chip and Liquid Retina XDR display.", 1099.00, Category::Tablets, 18, true),
        p("Galaxy Tab S9", "Dynamic AMOLED 2X and included S Pen.", 799.99, Category::Tablets, 15, false),
        p("Anker 737 Power Bank", "24,000mAh with 140W output.", 149.99, Category::Accessories, 50, false),
        p("Sony WH-1000XM5", "Industry-leading noise cancelling headphones.", 399.99, Category::Audio, 40, true),
        p("AirPods Pro", "Active noise cancellation and spatial audio.", 249.00, Category::Audio, 60, false),
        p("PlayStation 5", "Ultra-high speed SSD and ray tracing.", 499.99, Category::Gaming, 8, true),
        p("Nintendo Switch OLED", "7-inch OLED screen and enhanced audio.", 349.99, Category::Gaming, 22, false),
    ]
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init("seed=info,electrostore=info");

    let state = AppState::init().await?;
    sqlx::migrate!("./migrations").run(&state.db).await?;

    sqlx::query("TRUNCATE transactions, products, users")
        .execute(&state.db)
        .await
        .context("clear tables")?;
    info!("cleared existing data");

    let admin_hash = hash_password("admin123")?;
    let buyer_hash = hash_password("buyer123")?;

    User::create(&state.db, "admin@electrostore.com", "Admin User", &admin_hash, Role::Admin).await?;
    User::create(&state.db, "buyer@electrostore.com", "John Buyer", &buyer_hash, Role::Buyer).await?;
    for i in 1..=10 {
        User::create(
            &state.db,
            &format!("buyer{i}@example.com"),
            &format!("Buyer {i}"),
            &buyer_hash,
            Role::Buyer,
        )
        .await?;
    }
    info!("created users");

    let catalog = demo_products();
    for product in &catalog {
        products::insert(&state.db, product).await?;
    }
    info!(count = catalog.len(), "created products");

    Ok(())
}
