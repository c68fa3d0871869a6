// stockyard/src/core/product.rs

//! Product records as the catalog holds them, and the loosely-typed wire shape
//! they are parsed from at the API boundary.

use crate::error::{CatalogError, CatalogResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stock quantities at or below this (and above zero) are shown as low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Highest rating a product can carry.
pub const MAX_RATING: f32 = 5.0;

/// Identifier of a product within a loaded catalog session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl fmt::Display for ProductId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Availability {
  InStock,
  LowStock,
  OutOfStock,
}

impl Availability {
  /// Derives availability from a stock count.
  pub fn from_stock(quantity: i64) -> Self {
    if quantity <= 0 {
      Availability::OutOfStock
    } else if quantity <= LOW_STOCK_THRESHOLD {
      Availability::LowStock
    } else {
      Availability::InStock
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      Availability::InStock => "In Stock",
      Availability::LowStock => "Low Stock",
      Availability::OutOfStock => "Out of Stock",
    }
  }
}

impl fmt::Display for Availability {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

impl FromStr for Availability {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "in stock" => Ok(Availability::InStock),
      "low stock" => Ok(Availability::LowStock),
      "out of stock" => Ok(Availability::OutOfStock),
      other => Err(format!("unknown availability '{}'", other)),
    }
  }
}

/// A verified product, ready to be shown in the catalog grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
  pub id: ProductId,
  pub name: String,
  pub description: String,
  pub price: Decimal,
  pub category: String,
  pub image_url: String,
  pub rating: f32,
  pub availability: Availability,
}

/// Product as it travels over the wire. Every field is optional here;
/// `Product::try_from` decides what a usable record is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub price: Option<Decimal>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub category: Option<String>,
  #[serde(alias = "image_url", alias = "image", skip_serializing_if = "Option::is_none")]
  pub image_url: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub rating: Option<f32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub availability: Option<String>,
  #[serde(alias = "stock_quantity", alias = "stock", skip_serializing_if = "Option::is_none")]
  pub stock_quantity: Option<i64>,
}

impl TryFrom<ProductRecord> for Product {
  type Error = CatalogError;

  fn try_from(record: ProductRecord) -> CatalogResult<Self> {
    let id = record.id.ok_or_else(|| CatalogError::invalid(None, "missing id"))?;
    let invalid = |reason: String| CatalogError::invalid(Some(id), reason);

    let name = match record.name {
      Some(name) if !name.trim().is_empty() => name,
      _ => return Err(invalid("missing or empty name".to_string())),
    };

    let price = record.price.ok_or_else(|| invalid("missing price".to_string()))?;
    if price.is_sign_negative() && !price.is_zero() {
      return Err(invalid(format!("negative price {}", price)));
    }

    let rating = record.rating.unwrap_or(0.0);
    if !(0.0..=MAX_RATING).contains(&rating) {
      return Err(invalid(format!("rating {} outside 0..={}", rating, MAX_RATING)));
    }

    let availability = match (record.availability, record.stock_quantity) {
      (Some(label), _) => label.parse::<Availability>().map_err(invalid)?,
      (None, Some(quantity)) => Availability::from_stock(quantity),
      (None, None) => Availability::InStock,
    };

    Ok(Product {
      id: ProductId(id),
      name,
      description: record.description.unwrap_or_default(),
      price,
      category: record.category.unwrap_or_default(),
      image_url: record.image_url.unwrap_or_default(),
      rating,
      availability,
    })
  }
}

impl From<&Product> for ProductRecord {
  fn from(product: &Product) -> Self {
    ProductRecord {
      id: Some(product.id.0),
      name: Some(product.name.clone()),
      description: Some(product.description.clone()),
      price: Some(product.price),
      category: Some(product.category.clone()),
      image_url: Some(product.image_url.clone()),
      rating: Some(product.rating),
      availability: Some(product.availability.label().to_string()),
      stock_quantity: None,
    }
  }
}
