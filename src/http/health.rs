//! Liveness, index, and fallback handlers.

use crate::app::AppState;
use axum::{
  Json,
  extract::State,
  http::{StatusCode, Uri},
  response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
  pub success: bool,
  pub message: String,
  pub timestamp: String,
  pub uptime: f64,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
  Json(HealthResponse {
    success: true,
    message: format!("{} API is running", state.config.site_name),
    timestamp: Utc::now().to_rfc3339(),
    uptime: state.started.elapsed().as_secs_f64(),
  })
}

#[derive(Debug, Serialize)]
pub struct Endpoints {
  pub health: &'static str,
  pub contact: &'static str,
}

#[derive(Debug, Serialize)]
pub struct IndexResponse {
  pub success: bool,
  pub message: String,
  pub version: &'static str,
  pub endpoints: Endpoints,
}

pub async fn index(State(state): State<AppState>) -> Json<IndexResponse> {
  Json(IndexResponse {
    success: true,
    message: format!("{} API", state.config.site_name),
    version: env!("CARGO_PKG_VERSION"),
    endpoints: Endpoints {
      health: "/health",
      contact: "/api/contact",
    },
  })
}

#[derive(Debug, Serialize)]
pub struct NotFoundBody {
  pub success: bool,
  pub message: String,
  pub path: String,
}

pub async fn not_found(uri: Uri) -> Response {
  (
    StatusCode::NOT_FOUND,
    Json(NotFoundBody {
      success: false,
      message: "Endpoint not found".to_string(),
      path: uri.path().to_string(),
    }),
  )
    .into_response()
}
