//! Listing row: the fields exposed by the paginated index.
//!
//! Request metadata (ip, user agent) stays out of the listing; the
//! single-record endpoint returns it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Serialize, FromRow)]
pub struct ContactSummary {
  pub id: i64,
  pub name: String,
  pub email: String,
  pub company: Option<String>,
  pub message: String,
  pub created_at: DateTime<Utc>,
}
