//! Catalog
//!
//! Product catalog loaded from YAML, the source the cart and wishlist entries are built from.

use std::{collections::BTreeMap, fs, path::Path};

use rusty_money::iso::Currency;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    cart::CartItem,
    pricing::{PriceError, parse_price},
    products::ProductId,
    wishlist::WishlistItem,
};

/// Catalog loading and lookup errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading the catalog file
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// A product price could not be parsed
    #[error("product {id}: {source}")]
    Price {
        /// Product identifier
        id: String,
        /// Underlying parse error
        source: PriceError,
    },

    /// Products are priced in more than one currency
    #[error("currency mismatch: expected {expected}, found {found} for product {id}")]
    CurrencyMismatch {
        /// Product identifier
        id: String,
        /// Currency of the first product
        expected: &'static str,
        /// Currency of this product
        found: &'static str,
    },

    /// No product has the requested id
    #[error("product not found: {0}")]
    ProductNotFound(String),
}

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
struct CatalogFixture {
    products: BTreeMap<String, ProductFixture>,
}

/// Product as written in the catalog file
#[derive(Debug, Deserialize)]
struct ProductFixture {
    name: String,

    /// e.g. "999.00 USD"
    price: String,

    #[serde(default)]
    image: String,

    #[serde(default)]
    category: String,

    #[serde(default)]
    brand: String,

    #[serde(default)]
    condition: String,

    #[serde(default)]
    stock: u32,

    #[serde(default)]
    model: String,

    #[serde(default)]
    sku: String,

    #[serde(default)]
    featured: bool,
}

/// A catalog product with its price resolved to minor units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogProduct {
    /// Product identifier
    pub id: ProductId,
    /// Product name
    pub name: String,
    /// Unit price in minor units of the catalog currency
    pub price: u64,
    /// Currency of `price`
    pub currency: &'static Currency,
    /// Product image URL
    pub image: String,
    /// Product category
    pub category: String,
    /// Product brand
    pub brand: String,
    /// Condition or type label
    pub condition: String,
    /// Units in stock
    pub stock: u32,
    /// Model code
    pub model: String,
    /// Size or SKU code
    pub sku: String,
    /// Featured flag
    pub featured: bool,
}

impl CatalogProduct {
    /// Cart entry for this product.
    pub fn to_cart_item(&self) -> CartItem {
        CartItem {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            currency: self.currency.iso_alpha_code.to_string(),
            image: self.image.clone(),
            category: self.category.clone(),
            brand: self.brand.clone(),
            condition: self.condition.clone(),
            stock: self.stock,
            model: self.model.clone(),
        }
    }

    /// Wishlist entry for this product.
    pub fn to_wishlist_item(&self) -> WishlistItem {
        WishlistItem {
            id: self.id.clone(),
            name: self.name.clone(),
            price: self.price,
            currency: self.currency.iso_alpha_code.to_string(),
            image: self.image.clone(),
            category: self.category.clone(),
            brand: self.brand.clone(),
            kind: self.condition.clone(),
            sku: self.sku.clone(),
            is_featured: self.featured,
        }
    }
}

/// Products available in the storefront, all priced in one currency.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: BTreeMap<ProductId, CatalogProduct>,
    currency: Option<&'static Currency>,
}

impl Catalog {
    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the file cannot be read or parsed, or a
    /// price is invalid.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        Self::from_yaml_str(&fs::read_to_string(path)?)
    }

    /// Parse a catalog from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the YAML is malformed, a price is
    /// invalid, or products use different currencies.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let fixture: CatalogFixture = serde_norway::from_str(yaml)?;

        let mut catalog = Self::default();

        for (id, product) in fixture.products {
            let (price, currency) = parse_price(&product.price).map_err(|source| {
                CatalogError::Price {
                    id: id.clone(),
                    source,
                }
            })?;

            match catalog.currency {
                Some(expected) if expected != currency => {
                    return Err(CatalogError::CurrencyMismatch {
                        id,
                        expected: expected.iso_alpha_code,
                        found: currency.iso_alpha_code,
                    });
                }
                Some(_) => {}
                None => catalog.currency = Some(currency),
            }

            let id = ProductId::new(id);

            catalog.products.insert(
                id.clone(),
                CatalogProduct {
                    id,
                    name: product.name,
                    price,
                    currency,
                    image: product.image,
                    category: product.category,
                    brand: product.brand,
                    condition: product.condition,
                    stock: product.stock,
                    model: product.model,
                    sku: product.sku,
                    featured: product.featured,
                },
            );
        }

        Ok(catalog)
    }

    /// Currency of the catalog prices, if any product is listed.
    pub fn currency(&self) -> Option<&'static Currency> {
        self.currency
    }

    /// Look up a product.
    pub fn get(&self, id: &str) -> Option<&CatalogProduct> {
        self.products.get(id)
    }

    /// Look up a product, failing if it is not listed.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ProductNotFound`] for unknown ids.
    pub fn require(&self, id: &str) -> Result<&CatalogProduct, CatalogError> {
        self.get(id)
            .ok_or_else(|| CatalogError::ProductNotFound(id.to_string()))
    }

    /// Cart entry for a listed product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ProductNotFound`] for unknown ids.
    pub fn cart_item(&self, id: &str) -> Result<CartItem, CatalogError> {
        Ok(self.require(id)?.to_cart_item())
    }

    /// Wishlist entry for a listed product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ProductNotFound`] for unknown ids.
    pub fn wishlist_item(&self, id: &str) -> Result<WishlistItem, CatalogError> {
        Ok(self.require(id)?.to_wishlist_item())
    }

    /// Products ordered by id.
    pub fn products(&self) -> impl Iterator<Item = &CatalogProduct> {
        self.products.values()
    }

    /// Number of listed products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog lists no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rusty_money::iso::USD;
    use tempfile::NamedTempFile;
    use testresult::TestResult;

    use super::*;

    const CATALOG: &str = r#"
products:
  laptop-x1:
    name: Acme X1
    price: "999.00 USD"
    image: https://cdn.example.com/x1.jpg
    category: laptops
    brand: Acme
    condition: new
    stock: 4
    model: X1-2024
    sku: X1-15
    featured: true
  phone-s2:
    name: Acme S2
    price: "349.50 USD"
"#;

    #[test]
    fn parses_products_and_currency() -> TestResult {
        let catalog = Catalog::from_yaml_str(CATALOG)?;

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.currency(), Some(USD));

        let laptop = catalog.require("laptop-x1")?;

        assert_eq!(laptop.price, 99_900);
        assert_eq!(laptop.stock, 4);
        assert!(laptop.featured);

        let phone = catalog.require("phone-s2")?;

        assert_eq!(phone.price, 34_950);
        assert_eq!(phone.stock, 0);
        assert_eq!(phone.brand, "");

        Ok(())
    }

    #[test]
    fn builds_cart_and_wishlist_entries() -> TestResult {
        let catalog = Catalog::from_yaml_str(CATALOG)?;

        let cart_item = catalog.cart_item("laptop-x1")?;
        let wishlist_item = catalog.wishlist_item("laptop-x1")?;

        assert_eq!(cart_item.id.as_str(), "laptop-x1");
        assert_eq!(cart_item.model, "X1-2024");
        assert_eq!(wishlist_item.sku, "X1-15");
        assert_eq!(wishlist_item.kind, "new");
        assert!(wishlist_item.is_featured);

        Ok(())
    }

    #[test]
    fn unknown_product_errors() -> TestResult {
        let catalog = Catalog::from_yaml_str(CATALOG)?;

        assert!(matches!(
            catalog.cart_item("missing"),
            Err(CatalogError::ProductNotFound(id)) if id == "missing"
        ));

        Ok(())
    }

    #[test]
    fn mixed_currencies_are_rejected() {
        let yaml = r#"
products:
  a:
    name: A
    price: "1.00 USD"
  b:
    name: B
    price: "1.00 GBP"
"#;

        let result = Catalog::from_yaml_str(yaml);

        assert!(
            matches!(
                result,
                Err(CatalogError::CurrencyMismatch { ref id, expected: "USD", found: "GBP" }) if id == "b"
            ),
            "expected currency mismatch, got {result:?}"
        );
    }

    #[test]
    fn invalid_price_names_product() {
        let yaml = r#"
products:
  a:
    name: A
    price: "cheap"
"#;

        let result = Catalog::from_yaml_str(yaml);

        assert!(
            matches!(result, Err(CatalogError::Price { ref id, .. }) if id == "a"),
            "expected price error, got {result:?}"
        );
    }

    #[test]
    fn loads_from_file() -> TestResult {
        let mut file = NamedTempFile::new()?;

        file.write_all(CATALOG.as_bytes())?;

        let catalog = Catalog::from_path(file.path())?;

        assert_eq!(catalog.len(), 2);

        Ok(())
    }
}
