//! Cart and wishlist as the storefront keeps them in browser storage.
//!
//! Nothing here is persisted server-side. The types mirror the JSON the
//! client stores so a cart can be posted as-is to the checkout endpoint.
//! On the server only `Cart::add` runs, to merge repeated lines before the
//! checkout stock check; the other operations serve clients of the crate.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(default)]
    pub id: String,
    pub product_id: Uuid,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub image: String,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    #[serde(default)]
    pub id: String,
    pub product_id: Uuid,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub image: String,
    pub category: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn new(items: Vec<CartItem>) -> Self {
        Self { items }
    }

    /// Adding a product already in the cart bumps its quantity.
    pub fn add(&mut self, item: CartItem) {
        match self
            .items
            .iter_mut()
            .find(|i| i.product_id == item.product_id)
        {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
            None => self.items.push(item),
        }
    }

    pub fn remove(&mut self, product_id: Uuid) {
        self.items.retain(|i| i.product_id != product_id);
    }

    /// A quantity of zero or less drops the line. Unknown products are ignored.
    pub fn update_quantity(&mut self, product_id: Uuid, quantity: i32) {
        if quantity <= 0 {
            self.remove(product_id);
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            item.quantity = quantity;
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn total(&self) -> f64 {
        self.items
            .iter()
            .map(|i| i.price * f64::from(i.quantity))
            .sum()
    }

    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i64::from(i.quantity)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Wishlist {
    pub items: Vec<WishlistItem>,
}

impl Wishlist {
    /// Returns false when the product was already listed.
    pub fn add(&mut self, item: WishlistItem) -> bool {
        if self.contains(item.product_id) {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn remove(&mut self, product_id: Uuid) {
        self.items.retain(|i| i.product_id != product_id);
    }

    pub fn contains(&self, product_id: Uuid) -> bool {
        self.items.iter().any(|i| i.product_id == product_id)
    }
}
