use electrostore::{
    pagination::Page,
    products::{
        repo as products,
        repo_types::{Category, ProductChanges, ProductFilter},
    },
};

mod support;

#[tokio::test]
async fn filters_are_conjunctive_and_pages_partition_results() {
    let Some(db) = support::init_test_db().await else {
        return;
    };
    let pool = &db.pool;
    let tag = support::unique("cat");

    for i in 0..5 {
        support::product(pool, &format!("{tag} laptop {i}"), Category::Laptops, 3).await;
    }
    for i in 0..2 {
        support::product(pool, &format!("{tag} phone {i}"), Category::Smartphones, 3).await;
    }
    let featured = support::product(pool, &format!("{tag} laptop pro"), Category::Laptops, 1).await;
    products::update(
        pool,
        featured.id,
        &ProductChanges {
            featured: Some(true),
            ..Default::default()
        },
    )
    .await
    .expect("update")
    .expect("product exists");

    let by_tag = ProductFilter {
        search: Some(tag.to_uppercase()),
        ..Default::default()
    };
    assert_eq!(products::count(pool, &by_tag).await.unwrap(), 8);

    let laptops = ProductFilter {
        category: Some(Category::Laptops),
        ..by_tag.clone()
    };
    assert_eq!(products::count(pool, &laptops).await.unwrap(), 6);

    let featured_laptops = ProductFilter {
        featured: Some(true),
        ..laptops.clone()
    };
    let rows = products::list(pool, &featured_laptops, Page { page: 1, limit: 10 })
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, featured.id);

    let mut seen = Vec::new();
    let page_size = Page { page: 1, limit: 4 };
    assert_eq!(page_size.total_pages(6), 2);
    for page in 1..=3 {
        let rows = products::list(pool, &laptops, Page { page, limit: 4 })
            .await
            .unwrap();
        assert!(rows.iter().all(|p| p.category == Category::Laptops));
        seen.extend(rows.into_iter().map(|p| p.id));
    }
    let total = seen.len();
    seen.sort();
    seen.dedup();
    assert_eq!(total, 6);
    assert_eq!(seen.len(), 6);
}

#[tokio::test]
async fn search_treats_wildcards_literally() {
    let Some(db) = support::init_test_db().await else {
        return;
    };
    let pool = &db.pool;
    let tag = support::unique("wild");
    support::product(pool, &format!("{tag} 100% cotton case"), Category::Accessories, 2).await;
    support::product(pool, &format!("{tag} 1000 mAh bank"), Category::Accessories, 2).await;

    let filter = ProductFilter {
        search: Some(format!("{tag} 100%")),
        ..Default::default()
    };
    assert_eq!(products::count(pool, &filter).await.unwrap(), 1);
}
