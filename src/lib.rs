//! Storefront
//!
//! Client-side state for a storefront: the shopper's cart and wishlist persisted
//! through a key-value storage port, checkout totals, the product catalog and
//! order analytics.

pub mod analytics;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod collection;
pub mod config;
pub mod context;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod storage;
pub mod wishlist;
