// demos/storefront_app/src/web/handlers/product_handlers.rs

use actix_web::{http::header, web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::state::AppState;
use stockyard::ProductRecord;

const DEFAULT_PAGE_LIMIT: usize = 8;
const MAX_PAGE_LIMIT: usize = 100;

#[derive(Deserialize, Debug)]
pub struct ListProductsQuery {
  pub page: Option<u32>,
  pub offset: Option<usize>,
  pub limit: Option<usize>,
}

// Rejects the request unless it carries the configured bearer token.
fn authorize(req: &HttpRequest, expected: Option<&str>) -> Result<(), AppError> {
  let Some(expected) = expected else {
    return Ok(());
  };
  let presented = req
    .headers()
    .get(header::AUTHORIZATION)
    .and_then(|value| value.to_str().ok())
    .and_then(|value| value.strip_prefix("Bearer "));
  match presented {
    Some(token) if token == expected => Ok(()),
    Some(_) => Err(AppError::Auth("Invalid bearer token.".to_string())),
    None => Err(AppError::Auth("Missing bearer token.".to_string())),
  }
}

#[instrument(name = "handler::list_products", skip(app_state, req), fields(page = ?query.page))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  query: web::Query<ListProductsQuery>,
) -> Result<HttpResponse, AppError> {
  authorize(&req, app_state.config.api_token.as_deref())?;

  let offset = query.offset.unwrap_or(0);
  let limit = query.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
  if limit == 0 || limit > MAX_PAGE_LIMIT {
    warn!("Rejected product listing with limit {}.", limit);
    return Err(AppError::Validation(format!(
      "limit must be between 1 and {}",
      MAX_PAGE_LIMIT
    )));
  }

  let inventory = &app_state.inventory;
  let records: Vec<ProductRecord> = inventory
    .iter()
    .skip(offset)
    .take(limit)
    .map(ProductRecord::from)
    .collect();
  let has_more = offset.saturating_add(records.len()) < inventory.len();

  info!("Listing {} products from offset {} (has more: {}).", records.len(), offset, has_more);

  Ok(HttpResponse::Ok().json(json!({
      "message": "Products fetched successfully.",
      "products": records,
      "hasMore": has_more
  })))
}
