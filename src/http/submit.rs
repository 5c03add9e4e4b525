//! Contact submission handler: validate, persist, notify.

use crate::{app::AppState, mail::ContactData, util::client_ip};
use axum::{
  Json,
  extract::{ConnectInfo, State},
  http::{HeaderMap, StatusCode, header},
  response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tracing::{error, info, warn};

// Caps mirror the column widths of the contacts table.
const MAX_NAME: usize = 255;
const MAX_EMAIL: usize = 255;
const MAX_COMPANY: usize = 255;
const MAX_MESSAGE: usize = 5000;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SubmitRequest {
  pub name: String,
  pub email: String,
  pub company: Option<String>,
  pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
  pub success: bool,
  pub message: String,
  #[serde(rename = "contactId")]
  pub contact_id: i64,
}

#[derive(Debug, Serialize)]
pub struct FieldError {
  pub field: &'static str,
  pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ValidationErrors {
  pub success: bool,
  pub errors: Vec<FieldError>,
}

/// Field-level checks; an empty result means the request is acceptable.
pub fn validate_submission(req: &SubmitRequest) -> Vec<FieldError> {
  let mut errors = Vec::new();
  if req.name.trim().is_empty() {
    errors.push(FieldError {
      field: "name",
      message: "Name is required",
    });
  } else if req.name.len() > MAX_NAME {
    errors.push(FieldError {
      field: "name",
      message: "Name is too long",
    });
  }
  let email = req.email.trim();
  if email.is_empty() {
    errors.push(FieldError {
      field: "email",
      message: "Email is required",
    });
  } else if email.len() > MAX_EMAIL || email.parse::<lettre::Address>().is_err() {
    errors.push(FieldError {
      field: "email",
      message: "Email address is not valid",
    });
  }
  if let Some(company) = &req.company {
    if company.len() > MAX_COMPANY {
      errors.push(FieldError {
        field: "company",
        message: "Company is too long",
      });
    }
  }
  if req.message.trim().is_empty() {
    errors.push(FieldError {
      field: "message",
      message: "Message is required",
    });
  } else if req.message.len() > MAX_MESSAGE {
    errors.push(FieldError {
      field: "message",
      message: "Message is too long",
    });
  }
  errors
}

struct NewContact<'a> {
  name: &'a str,
  email: &'a str,
  company: Option<&'a str>,
  message: &'a str,
  ip_address: Option<String>,
  user_agent: Option<String>,
  created_at: DateTime<Utc>,
}

async fn insert_contact(state: &AppState, c: &NewContact<'_>) -> Result<i64, sqlx::Error> {
  let res = sqlx::query(
    "INSERT INTO contacts (name, email, company, message, ip_address, user_agent, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
  )
  .bind(c.name)
  .bind(c.email)
  .bind(c.company)
  .bind(c.message)
  .bind(c.ip_address.as_deref())
  .bind(c.user_agent.as_deref())
  .bind(c.created_at)
  .execute(&state.db)
  .await?;
  Ok(res.last_insert_rowid())
}

pub async fn submit_contact(
  State(state): State<AppState>,
  ConnectInfo(peer): ConnectInfo<SocketAddr>,
  headers: HeaderMap,
  Json(req): Json<SubmitRequest>,
) -> Response {
  let errors = validate_submission(&req);
  if !errors.is_empty() {
    return (
      StatusCode::BAD_REQUEST,
      Json(ValidationErrors {
        success: false,
        errors,
      }),
    )
      .into_response();
  }

  let new = NewContact {
    name: req.name.trim(),
    email: req.email.trim(),
    company: req
      .company
      .as_deref()
      .map(str::trim)
      .filter(|c| !c.is_empty()),
    message: &req.message,
    ip_address: Some(client_ip(&headers, peer).to_string()),
    user_agent: headers
      .get(header::USER_AGENT)
      .and_then(|v| v.to_str().ok())
      .map(|v| v.to_string()),
    created_at: Utc::now(),
  };

  let id = match insert_contact(&state, &new).await {
    Ok(id) => id,
    Err(e) => {
      error!("contact insert failed: {e}");
      return super::internal_error(
        &state,
        "An error occurred while processing your request. Please try again later.",
        &e,
      );
    }
  };
  info!("new contact submission from {} (id {})", new.email, id);

  let contact = ContactData {
    name: new.name.to_string(),
    email: new.email.to_string(),
    company: new.company.map(|c| c.to_string()),
    message: new.message.to_string(),
    ip_address: new.ip_address.clone(),
    submitted_at: new.created_at,
  };

  // The row is already durable; a failed notification only gets logged.
  if let Err(e) = state.mailer.send_business_notification(&contact).await {
    error!("business notification failed for contact {id}: {e}");
  }

  // Fire and forget; shutdown does not wait for this task.
  let mailer = state.mailer.clone();
  tokio::spawn(async move {
    if let Err(e) = mailer.send_confirmation(&contact).await {
      warn!("confirmation email failed for {}: {e}", contact.email);
    }
  });

  (
    StatusCode::CREATED,
    Json(SubmitResponse {
      success: true,
      message: "Thank you for contacting us! We will get back to you within 24 hours.".to_string(),
      contact_id: id,
    }),
  )
    .into_response()
}
