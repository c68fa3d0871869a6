// stockyard/src/filter.rs

//! Client-side search over the products already loaded.
//!
//! Filtering never reaches the backend: a matching product on a page that has
//! not been loaded yet stays invisible until the user scrolls it in.

use crate::core::Product;

/// A lower-cased search term.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
  raw: String,
  needle: String,
}

impl SearchQuery {
  pub fn new(term: impl Into<String>) -> Self {
    let raw = term.into();
    let needle = raw.to_lowercase();
    SearchQuery { raw, needle }
  }

  /// The term as the user typed it.
  pub fn term(&self) -> &str {
    &self.raw
  }

  pub fn is_empty(&self) -> bool {
    self.needle.is_empty()
  }
}

/// True when the term is a substring of the lower-cased name, description or category.
pub fn matches(product: &Product, query: &SearchQuery) -> bool {
  if query.is_empty() {
    return true;
  }
  [&product.name, &product.description, &product.category]
    .iter()
    .any(|field| field.to_lowercase().contains(&query.needle))
}

/// The loaded products matching `query`, in catalog order.
pub fn filter_products<'a>(products: &'a [Product], query: &SearchQuery) -> Vec<&'a Product> {
  products.iter().filter(|product| matches(product, query)).collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::source::seed_catalog;

  #[test]
  fn empty_term_keeps_everything() {
    let products = seed_catalog();
    assert_eq!(filter_products(&products, &SearchQuery::default()).len(), products.len());
  }

  #[test]
  fn matches_any_of_the_three_fields_ignoring_case() {
    let products = seed_catalog();

    let by_name: Vec<&str> = filter_products(&products, &SearchQuery::new("REBAR"))
      .iter()
      .map(|p| p.name.as_str())
      .collect();
    assert_eq!(by_name, vec!["Steel Rebar 12mm"]);

    let by_category = filter_products(&products, &SearchQuery::new("masonry"));
    assert_eq!(by_category.len(), 2);

    let by_description = filter_products(&products, &SearchQuery::new("basements"));
    assert_eq!(by_description.len(), 1);
    assert_eq!(by_description[0].name, "Waterproofing Membrane");
  }

  #[test]
  fn no_tokenization_or_fuzziness() {
    let products = seed_catalog();
    assert!(filter_products(&products, &SearchQuery::new("cement rebar")).is_empty());
    assert!(filter_products(&products, &SearchQuery::new("cemnt")).is_empty());
  }

  #[test]
  fn keeps_the_typed_term() {
    let query = SearchQuery::new("Cement");
    assert_eq!(query.term(), "Cement");
    assert!(!query.is_empty());
  }
}
