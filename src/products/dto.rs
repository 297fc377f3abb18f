use serde::{Deserialize, Serialize};

use crate::products::repo_types::Product;

/// `GET /products` query string. `category` stays a string so that the
/// front-end's `""`/`"all"` mean "no filter".
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub featured: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
}

/// A number the admin form may send either as JSON number or as text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    /// Empty or whitespace-only text counts as not supplied.
    pub fn is_blank(&self) -> bool {
        matches!(self, Numeric::Text(s) if s.trim().is_empty())
    }

    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Numeric::Number(n) => Some(*n),
            Numeric::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Whole numbers within `i32` only; `"3.5"` or `"ten"` yield `None`.
    pub fn to_i32(&self) -> Option<i32> {
        let v = self.to_f64()?;
        (v.fract() == 0.0 && v >= f64::from(i32::MIN) && v <= f64::from(i32::MAX))
            .then_some(v as i32)
    }
}

/// Every field is optional on the wire so a missing one yields a 400 with a
/// readable message instead of a deserializer rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Numeric>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub stock: Option<Numeric>,
    pub featured: Option<bool>,
}

/// Stock is absent on purpose: only purchases move it. A `stock` key sent by
/// an edit form is ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Numeric>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub featured: Option<bool>,
}
