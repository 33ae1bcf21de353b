//! Storefront configuration

use std::path::PathBuf;

use clap::Args;
use thiserror::Error;

use crate::{
    catalog::{Catalog, CatalogError},
    checkout::CheckoutRates,
    context::{DEFAULT_NAMESPACE, StoreContext},
    pricing::{PriceError, currency, money_from_minor, parse_amount, parse_percentage},
    storage::StorageError,
};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A price, rate or currency setting is invalid.
    #[error("invalid pricing setting")]
    Price(#[from] PriceError),

    /// The storage directory cannot be opened.
    #[error("failed to open storage")]
    Storage(#[from] StorageError),

    /// The catalog cannot be loaded.
    #[error("failed to load catalog")]
    Catalog(#[from] CatalogError),

    /// The catalog is priced in a different currency than checkout.
    #[error("catalog currency {catalog} does not match checkout currency {checkout}")]
    CurrencyMismatch {
        /// Catalog currency code
        catalog: &'static str,
        /// Checkout currency code
        checkout: &'static str,
    },
}

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Storefront settings, read from CLI arguments or `STOREFRONT_*` variables.
#[derive(Debug, Clone, Args)]
pub struct StorefrontConfig {
    /// Directory the cart and wishlist are persisted in
    #[arg(long, env = "STOREFRONT_STORAGE_DIR", default_value = ".storefront")]
    pub storage_dir: PathBuf,

    /// Storage namespace, allowing several shoppers to share a directory
    #[arg(long, env = "STOREFRONT_NAMESPACE", default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,

    /// Product catalog (YAML)
    #[arg(long, env = "STOREFRONT_CATALOG", default_value = "fixtures/catalog.yml")]
    pub catalog: PathBuf,

    /// ISO currency code used at checkout
    #[arg(long, env = "STOREFRONT_CURRENCY", default_value = "USD")]
    pub currency: String,

    /// Tax rate, as "8%" or "0.08"
    #[arg(long, env = "STOREFRONT_TAX_RATE", default_value = "8%")]
    pub tax_rate: String,

    /// Flat shipping fee in major units
    #[arg(long, env = "STOREFRONT_SHIPPING", default_value = "49.99")]
    pub shipping: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

impl StorefrontConfig {
    /// Checkout tax rate and shipping fee.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Price`] if the currency, rate or fee is invalid.
    pub fn checkout_rates(&self) -> Result<CheckoutRates<'static>, ConfigError> {
        let currency = currency(&self.currency)?;
        let tax_rate = parse_percentage(&self.tax_rate)?;
        let shipping = money_from_minor(parse_amount(&self.shipping, currency)?, currency)?;

        Ok(CheckoutRates::new(tax_rate, shipping))
    }

    /// Open the file-backed stores.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Storage`] if the namespace is not usable as a
    /// file name or the storage directory cannot be created.
    pub fn open_context(&self) -> Result<StoreContext, ConfigError> {
        Ok(StoreContext::open_dir(&self.storage_dir, &self.namespace)?)
    }

    /// Load the catalog, checking it is priced in the checkout currency.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the catalog cannot be loaded or uses
    /// another currency.
    pub fn load_catalog(&self) -> Result<Catalog, ConfigError> {
        let catalog = Catalog::from_path(&self.catalog)?;
        let checkout = currency(&self.currency)?;

        match catalog.currency() {
            Some(found) if found != checkout => Err(ConfigError::CurrencyMismatch {
                catalog: found.iso_alpha_code,
                checkout: checkout.iso_alpha_code,
            }),
            _ => Ok(catalog),
        }
    }
}
