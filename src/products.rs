//! Products

use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};

/// Product identifier, the key shared by the cart and the wishlist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a product id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ProductId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for ProductId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn displays_inner_id() {
        let id = ProductId::new("sku-42");

        assert_eq!(id.to_string(), "sku-42");
        assert_eq!(id.as_str(), "sku-42");
    }

    #[test]
    fn serializes_as_plain_string() -> TestResult {
        let id = ProductId::from("p-1");

        assert_eq!(serde_json::to_string(&id)?, "\"p-1\"");
        assert_eq!(serde_json::from_str::<ProductId>("\"p-1\"")?, id);

        Ok(())
    }
}
