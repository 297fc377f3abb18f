use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
}

/// Where checkout and contact messages are handed off to.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutConfig {
    pub base_url: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub cookie: CookieConfig,
    pub checkout: CheckoutConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "electrostore".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "electrostore-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24),
        };
        let cookie = CookieConfig {
            name: std::env::var("COOKIE_NAME").unwrap_or_else(|_| "token".into()),
            secure: std::env::var("COOKIE_SECURE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        };
        let checkout = CheckoutConfig {
            base_url: std::env::var("CHECKOUT_BASE_URL")
                .unwrap_or_else(|_| "https://wa.me".into()),
            phone_number: std::env::var("CHECKOUT_PHONE").context("CHECKOUT_PHONE must be set")?,
        };
        Ok(Self {
            database_url,
            jwt,
            cookie,
            checkout,
        })
    }
}
