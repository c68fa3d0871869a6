// stockyard/src/source/http.rs
use super::ProductSource;
use crate::core::{Page, PageRequest, Product, ProductRecord};
use crate::error::{CatalogError, CatalogResult};
use crate::session::Session;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{event, instrument, Level};

/// Listing bodies the backend is known to send.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Listing {
  Bare(Vec<ProductRecord>),
  Envelope {
    products: Vec<ProductRecord>,
    #[serde(default, alias = "has_more")]
    #[serde(rename = "hasMore")]
    has_more: Option<bool>,
  },
}

/// Parses and verifies a listing body.
///
/// Accepts a bare JSON array of product records or an envelope
/// `{"products": [...], "hasMore": bool}`. Without an explicit `hasMore`, a
/// page shorter than `limit` is taken as the last one. A single invalid record
/// rejects the whole page.
pub fn decode_listing(body: &[u8], limit: usize) -> CatalogResult<Page> {
  let (records, has_more) = match serde_json::from_slice::<Listing>(body)? {
    Listing::Bare(records) => (records, None),
    Listing::Envelope { products, has_more } => (products, has_more),
  };

  let exhausted = match has_more {
    Some(has_more) => !has_more,
    None => records.len() < limit,
  };

  let products = records
    .into_iter()
    .map(Product::try_from)
    .collect::<CatalogResult<Vec<Product>>>()?;

  Ok(Page { products, exhausted })
}

/// Reads product pages from the marketplace REST API
/// (`GET {base_url}/products?page=&offset=&limit=`).
#[derive(Debug, Clone)]
pub struct HttpProductSource {
  client: Client,
  base_url: String,
  session: Session,
}

impl HttpProductSource {
  pub fn new(base_url: impl Into<String>, session: Session) -> Self {
    Self::with_client(Client::new(), base_url, session)
  }

  pub fn with_client(client: Client, base_url: impl Into<String>, session: Session) -> Self {
    let base_url = base_url.into().trim_end_matches('/').to_string();
    HttpProductSource {
      client,
      base_url,
      session,
    }
  }

  pub fn session(&self) -> &Session {
    &self.session
  }

  pub fn products_url(&self) -> String {
    format!("{}/products", self.base_url)
  }
}

#[async_trait]
impl ProductSource for HttpProductSource {
  fn name(&self) -> &str {
    "http"
  }

  #[instrument(
    name = "HttpProductSource::fetch_page",
    skip(self),
    fields(page = request.page, offset = request.offset, limit = request.limit),
    err(Display)
  )]
  async fn fetch_page(&self, request: PageRequest) -> CatalogResult<Page> {
    let url = self.products_url();
    let mut builder = self.client.get(&url).query(&[
      ("page", request.page.to_string()),
      ("offset", request.offset.to_string()),
      ("limit", request.limit.to_string()),
    ]);
    if let Some(token) = self.session.bearer() {
      builder = builder.bearer_auth(token);
    }

    let response = builder.send().await?;
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
      self.session.invalidate();
      return Err(CatalogError::Unauthorized);
    }
    if !status.is_success() {
      event!(Level::WARN, status = status.as_u16(), "Product listing request failed.");
      return Err(CatalogError::Status {
        status: status.as_u16(),
        url,
      });
    }

    let body = response.bytes().await?;
    let page = decode_listing(&body, request.limit)?;
    event!(Level::DEBUG, count = page.products.len(), exhausted = page.exhausted, "Decoded product listing.");
    Ok(page)
  }
}
