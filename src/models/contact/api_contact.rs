//! API representation of a stored contact submission.

use super::contact_row::ContactRow;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiContact {
  pub id: i64,
  pub name: String,
  pub email: String,
  pub company: Option<String>,
  pub message: String,
  pub ip_address: Option<String>,
  pub user_agent: Option<String>,
  pub created_at: DateTime<Utc>,
}

impl From<ContactRow> for ApiContact {
  fn from(r: ContactRow) -> Self {
    ApiContact {
      id: r.id,
      name: r.name,
      email: r.email,
      company: r.company,
      message: r.message,
      ip_address: r.ip_address,
      user_agent: r.user_agent,
      created_at: r.created_at,
    }
  }
}
