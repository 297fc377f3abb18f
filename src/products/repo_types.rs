use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Closed set of catalog tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "product_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Smartphones,
    Laptops,
    Tablets,
    Accessories,
    Audio,
    Gaming,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Smartphones,
        Category::Laptops,
        Category::Tablets,
        Category::Accessories,
        Category::Audio,
        Category::Gaming,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Smartphones => "smartphones",
            Category::Laptops => "laptops",
            Category::Tablets => "tablets",
            Category::Accessories => "accessories",
            Category::Audio => "audio",
            Category::Gaming => "gaming",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image: String,
    pub category: Category,
    pub stock: i32,
    pub featured: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Validated input for an insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image: String,
    pub category: Category,
    pub stock: i32,
    pub featured: bool,
}

/// Validated partial update; `None` keeps the stored value. Stock is not
/// editable here, only transactions change it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub image: Option<String>,
    pub category: Option<Category>,
    pub featured: Option<bool>,
}

/// Conjunctive catalog filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub category: Option<Category>,
    pub featured: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("laptops".parse::<Category>(), Ok(Category::Laptops));
        assert_eq!(" Audio ".parse::<Category>(), Ok(Category::Audio));
        assert!("toasters".parse::<Category>().is_err());
    }

    #[test]
    fn category_serializes_lowercase() {
        let json = serde_json::to_string(&Category::Smartphones).unwrap();
        assert_eq!(json, "\"smartphones\"");
        for c in Category::ALL {
            assert_eq!(c.to_string().parse::<Category>(), Ok(c));
        }
    }
}
