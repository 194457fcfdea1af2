//! Domain DTOs for the product API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Integration tests catch any schema drift between the two crates. The client
//! treats `Product` as an opaque payload: only `id` is ever read, to build the
//! item path.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Server-assigned product identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u32);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Product category. The declaration order is the order in which types are
/// sent as `type` query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductType {
    Standard,
    Budget,
    Premium,
}

impl ProductType {
    pub const ALL: [ProductType; 3] = [ProductType::Standard, ProductType::Budget, ProductType::Premium];

    /// Wire name, identical to the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Standard => "STANDARD",
            ProductType::Budget => "BUDGET",
            ProductType::Premium => "PREMIUM",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A product as exchanged with the server.
///
/// `id` is `None` for products that have not been stored yet and is left out
/// of the JSON body in that case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: ProductType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl Product {
    /// A product without id or price, ready to be stored.
    pub fn new(name: impl Into<String>, product_type: ProductType) -> Self {
        Self {
            id: None,
            name: name.into(),
            product_type,
            price: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<ProductId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }
}
