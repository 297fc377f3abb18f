use std::collections::HashMap;
use std::fmt::Write as _;

use uuid::Uuid;

use super::dto::{ContactRequest, CustomerInfo};
use crate::cart::{Cart, CartItem};
use crate::config::CheckoutConfig;
use crate::error::AppError;
use crate::products::repo_types::Product;
use crate::transactions::services::line_total;

/// One priced line of an order, taken from the catalog rather than the client.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub name: String,
    pub unit_price: f64,
    pub quantity: i32,
    pub total: f64,
}

impl OrderLine {
    pub fn new(name: impl Into<String>, unit_price: f64, quantity: i32) -> Self {
        Self {
            name: name.into(),
            unit_price,
            quantity,
            total: line_total(unit_price, quantity),
        }
    }
}

/// Percent-encodes everything outside `A-Z a-z 0-9 - _ . ! ~ * ' ( )`,
/// the same set browsers leave alone in a URI component.
pub fn encode_uri_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len() * 3);
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => {
                let _ = write!(out, "%{byte:02X}");
            }
        }
    }
    out
}

pub fn deep_link(cfg: &CheckoutConfig, text: &str) -> String {
    format!(
        "{}/{}?text={}",
        cfg.base_url.trim_end_matches('/'),
        cfg.phone_number,
        encode_uri_component(text)
    )
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn or_default<'a>(v: &'a Option<String>, fallback: &'a str) -> &'a str {
    v.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(fallback)
}

pub fn validate_customer(c: &CustomerInfo) -> Result<(), AppError> {
    if blank(&c.name) || blank(&c.phone) || blank(&c.address) {
        return Err(AppError::bad_request("Please fill in all required fields"));
    }
    Ok(())
}

/// Advisory availability check at hand-off time; nothing is reserved.
pub fn check_available(name: &str, stock: i32, quantity: i32) -> Result<(), AppError> {
    if quantity < 1 {
        return Err(AppError::bad_request("Quantity must be at least 1"));
    }
    if stock < quantity {
        return Err(AppError::bad_request(format!(
            "Insufficient stock for {name}: {stock} left"
        )));
    }
    Ok(())
}

/// Re-prices client cart lines against the catalog and checks stock.
/// Repeated lines for one product are merged first so their combined
/// quantity is what gets checked.
pub fn price_cart(items: &[CartItem], catalog: &[Product]) -> Result<Vec<OrderLine>, AppError> {
    if items.is_empty() {
        return Err(AppError::bad_request("Cart is empty"));
    }
    if items.iter().any(|i| i.quantity < 1) {
        return Err(AppError::bad_request("Quantity must be at least 1"));
    }
    let merged = items.iter().cloned().fold(Cart::default(), |mut cart, item| {
        cart.add(item);
        cart
    });
    let by_id: HashMap<Uuid, &Product> = catalog.iter().map(|p| (p.id, p)).collect();

    merged
        .items
        .iter()
        .map(|item| {
            let product = by_id
                .get(&item.product_id)
                .ok_or_else(|| AppError::not_found(format!("Product not found: {}", item.name)))?;
            check_available(&product.name, product.stock, item.quantity)?;
            Ok(OrderLine::new(&product.name, product.price, item.quantity))
        })
        .collect()
}

fn push_customer(out: &mut String, c: &CustomerInfo) {
    let _ = writeln!(out, "*CUSTOMER INFORMATION*");
    let _ = writeln!(out, "Name: {}", c.name.trim());
    let _ = writeln!(out, "Email: {}", or_default(&c.email, "Not provided"));
    let _ = writeln!(out, "Phone: {}", c.phone.trim());
    let _ = writeln!(out, "Address: {}", c.address.trim());
    out.push('\n');
    let _ = writeln!(out, "Notes: {}", or_default(&c.notes, "None"));
    out.push('\n');
    out.push_str("Thank you for your order! We will contact you soon to confirm the details.");
}

pub fn buy_now_message(line: &OrderLine, customer: &CustomerInfo) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "*ORDER DETAILS*");
    out.push('\n');
    let _ = writeln!(out, "Product: {}", line.name);
    let _ = writeln!(out, "Price: ${:.2}", line.unit_price);
    let _ = writeln!(out, "Quantity: {}", line.quantity);
    let _ = writeln!(out, "Total: ${:.2}", line.total);
    out.push('\n');
    push_customer(&mut out, customer);
    out
}

pub fn cart_total(lines: &[OrderLine]) -> f64 {
    (lines.iter().map(|l| l.total).sum::<f64>() * 100.0).round() / 100.0
}

pub fn cart_message(lines: &[OrderLine], customer: &CustomerInfo) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "*ORDER DETAILS*");
    out.push('\n');
    for (i, l) in lines.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {} x{} @ ${:.2} = ${:.2}",
            i + 1,
            l.name,
            l.quantity,
            l.unit_price,
            l.total
        );
    }
    let _ = writeln!(out, "Total: ${:.2}", cart_total(lines));
    out.push('\n');
    push_customer(&mut out, customer);
    out
}

pub fn contact_message(req: &ContactRequest) -> Result<String, AppError> {
    if blank(&req.first_name) || blank(&req.email) || blank(&req.message) {
        return Err(AppError::bad_request(
            "Please fill in at least your First Name, Email, and Message.",
        ));
    }
    let name = format!("{} {}", req.first_name.trim(), req.last_name.trim());
    Ok(format!(
        "Hello, my name is {}\nEmail: {}\nPhone: {}\nSubject: {}\nMessage: {}",
        name.trim_end(),
        req.email.trim(),
        req.phone.trim(),
        req.subject.trim(),
        req.message.trim()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::products::repo_types::Category;
    use time::OffsetDateTime;

    fn customer() -> CustomerInfo {
        CustomerInfo {
            name: "Jane Doe".into(),
            email: None,
            phone: "+1 555 0100".into(),
            address: "1 Main St".into(),
            notes: Some("  ".into()),
        }
    }

    fn product(name: &str, price: f64, stock: i32) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            price,
            image: String::new(),
            category: Category::Audio,
            stock,
            featured: false,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn cart_item(p: &Product, quantity: i32) -> CartItem {
        CartItem {
            id: p.id.to_string(),
            product_id: p.id,
            name: p.name.clone(),
            price: 0.01, // stale client price
            image: String::new(),
            quantity,
        }
    }

    #[test]
    fn encodes_like_a_browser() {
        assert_eq!(encode_uri_component("abc-_.!~*'()"), "abc-_.!~*'()");
        assert_eq!(encode_uri_component("a b&c=d"), "a%20b%26c%3Dd");
        assert_eq!(encode_uri_component("$1\n"), "%241%0A");
        assert_eq!(encode_uri_component("é"), "%C3%A9");
    }

    #[test]
    fn deep_link_targets_configured_number() {
        let cfg = CheckoutConfig {
            base_url: "https://wa.me/".into(),
            phone_number: "15550001111".into(),
        };
        assert_eq!(deep_link(&cfg, "hi there"), "https://wa.me/15550001111?text=hi%20there");
    }

    #[test]
    fn buy_now_message_lists_order_and_defaults() {
        let line = OrderLine::new("Sony WH-1000XM5", 399.99, 2);
        let msg = buy_now_message(&line, &customer());
        assert!(msg.contains("Product: Sony WH-1000XM5"));
        assert!(msg.contains("Price: $399.99"));
        assert!(msg.contains("Quantity: 2"));
        assert!(msg.contains("Total: $799.98"));
        assert!(msg.contains("Email: Not provided"));
        assert!(msg.contains("Notes: None"));
    }

    #[test]
    fn customer_requires_name_phone_address() {
        assert!(validate_customer(&customer()).is_ok());
        let mut c = customer();
        c.address = " ".into();
        assert!(validate_customer(&c).is_err());
    }

    #[test]
    fn cart_is_repriced_from_catalog() {
        let a = product("AirPods Pro", 249.0, 10);
        let b = product("HomePod mini", 99.5, 3);
        let lines = price_cart(&[cart_item(&a, 2), cart_item(&b, 1)], &[a.clone(), b.clone()])
            .expect("priced");
        assert_eq!(lines[0].total, 498.0);
        assert_eq!(lines[1].total, 99.5);
        assert_eq!(cart_total(&lines), 597.5);

        let msg = cart_message(&lines, &customer());
        assert!(msg.contains("1. AirPods Pro x2 @ $249.00 = $498.00"));
        assert!(msg.contains("Total: $597.50"));
    }

    #[test]
    fn cart_rejects_overdraw_missing_and_empty() {
        let a = product("AirPods Pro", 249.0, 1);
        assert!(price_cart(&[cart_item(&a, 2)], &[a.clone()]).is_err());
        assert!(price_cart(&[cart_item(&a, 1)], &[]).is_err());
        assert!(price_cart(&[], &[a]).is_err());
    }

    #[test]
    fn repeated_lines_are_checked_together() {
        let a = product("AirPods Pro", 249.0, 5);
        let err = price_cart(&[cart_item(&a, 3), cart_item(&a, 3)], &[a.clone()]).unwrap_err();
        assert_eq!(err.to_string(), "Insufficient stock for AirPods Pro: 5 left");

        let lines = price_cart(&[cart_item(&a, 2), cart_item(&a, 3)], &[a]).expect("fits");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 5);
        assert_eq!(lines[0].total, 1245.0);
    }

    #[test]
    fn non_positive_line_cannot_offset_another() {
        let a = product("AirPods Pro", 249.0, 2);
        assert!(price_cart(&[cart_item(&a, 4), cart_item(&a, -3)], &[a]).is_err());
    }

    #[test]
    fn contact_requires_core_fields() {
        let req = ContactRequest {
            first_name: "Ana".into(),
            email: "ana@example.com".into(),
            message: "Do you ship abroad?".into(),
            ..Default::default()
        };
        let msg = contact_message(&req).expect("valid");
        assert!(msg.starts_with("Hello, my name is Ana\n"));
        assert!(msg.ends_with("Message: Do you ship abroad?"));

        assert!(contact_message(&ContactRequest::default()).is_err());
    }
}
