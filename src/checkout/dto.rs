use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cart::Cart;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyNowRequest {
    pub product_id: Uuid,
    pub quantity: i32,
    pub customer: CustomerInfo,
}

#[derive(Debug, Deserialize)]
pub struct CartCheckoutRequest {
    pub items: Cart,
    pub customer: CustomerInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

/// Pre-filled chat hand-off for the client to open.
#[derive(Debug, Serialize)]
pub struct HandoffResponse {
    pub message: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
}
