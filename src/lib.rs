pub mod analytics;
pub mod app;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod pagination;
pub mod products;
pub mod state;
pub mod telemetry;
pub mod transactions;
pub mod users;
