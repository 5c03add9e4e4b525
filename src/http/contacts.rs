//! Admin read endpoints over stored contacts: paginated list, get by id.

use crate::{
  app::AppState,
  models::{
    contact::{api_contact::ApiContact, contact_row::ContactRow, contact_summary::ContactSummary},
    response::error_body::ErrorBody,
  },
};
use axum::{
  Json,
  extract::{Path as AxumPath, Query, State},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;

pub const DEFAULT_LIMIT: u32 = 20;
pub const MAX_LIMIT: u32 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub page: Option<u32>,
  pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct Pagination {
  pub page: u32,
  pub limit: u32,
  pub total: i64,
  #[serde(rename = "totalPages")]
  pub total_pages: i64,
}

#[derive(Debug, Serialize)]
pub struct ContactList {
  pub success: bool,
  pub data: Vec<ContactSummary>,
  pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct ContactDetail {
  pub success: bool,
  pub data: ApiContact,
}

/// Normalized page/limit/offset from raw query parameters.
pub fn page_window(p: &ListParams) -> (u32, u32, u32) {
  let page = p.page.unwrap_or(1).max(1);
  let limit = p.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
  let offset = (page - 1) * limit;
  (page, limit, offset)
}

pub async fn list_contacts(
  State(state): State<AppState>,
  Query(params): Query<ListParams>,
) -> Response {
  let (page, limit, offset) = page_window(&params);
  // id breaks ties so the newest-first order stays total.
  let rows = match sqlx::query_as::<_, ContactSummary>(
    "SELECT id, name, email, company, message, created_at FROM contacts ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
  )
  .bind(limit as i64)
  .bind(offset as i64)
  .fetch_all(&state.db)
  .await
  {
    Ok(rows) => rows,
    Err(e) => {
      error!("list_contacts query failed: {e}");
      return super::internal_error(&state, "Failed to retrieve contacts", &e);
    }
  };

  let total = match sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM contacts")
    .fetch_one(&state.db)
    .await
  {
    Ok(total) => total,
    Err(e) => {
      error!("list_contacts count failed: {e}");
      return super::internal_error(&state, "Failed to retrieve contacts", &e);
    }
  };

  let total_pages = (total + limit as i64 - 1) / limit as i64;
  Json(ContactList {
    success: true,
    data: rows,
    pagination: Pagination {
      page,
      limit,
      total,
      total_pages,
    },
  })
  .into_response()
}

pub async fn get_contact(State(state): State<AppState>, AxumPath(id): AxumPath<i64>) -> Response {
  let row = sqlx::query_as::<_, ContactRow>(
    "SELECT id, name, email, company, message, ip_address, user_agent, created_at FROM contacts WHERE id = ?",
  )
  .bind(id)
  .fetch_optional(&state.db)
  .await;
  match row {
    Ok(Some(c)) => Json(ContactDetail {
      success: true,
      data: ApiContact::from(c),
    })
    .into_response(),
    Ok(None) => (
      StatusCode::NOT_FOUND,
      Json(ErrorBody::new("Contact not found")),
    )
      .into_response(),
    Err(e) => {
      error!("get_contact query failed: {e}");
      super::internal_error(&state, "Failed to retrieve contact", &e)
    }
  }
}
