//! HTTP router, middleware stack, and handlers.

use crate::{app::AppState, models::response::error_body::ErrorBody};
use axum::{
  Json, Router,
  extract::DefaultBodyLimit,
  http::{HeaderValue, Method, StatusCode, header},
  middleware::from_fn_with_state,
  response::{IntoResponse, Response},
  routing::{get, post},
};
use std::{sync::Arc, time::Duration};
use tower_http::{
  cors::{AllowOrigin, Any, CorsLayer},
  set_header::SetResponseHeaderLayer,
};

pub mod auth;
pub mod contacts;
pub mod health;
pub mod rate_limit;
pub mod submit;

use self::rate_limit::{RateLimiter, rate_limit};

/// Assemble the HTTP router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
  let api_gate = Arc::new(RateLimiter::new(
    state.config.rate_max,
    Duration::from_secs(state.config.rate_window_secs),
  ));
  let submit_gate = Arc::new(RateLimiter::new(
    state.config.submit_rate_max,
    Duration::from_secs(state.config.submit_rate_window_secs),
  ));

  Router::new()
    .route("/", get(health::index))
    .route("/health", get(health::health))
    .route(
      "/api/contact/submit",
      post(submit::submit_contact).layer(from_fn_with_state(submit_gate, rate_limit)),
    )
    .route(
      "/api/contact",
      get(contacts::list_contacts).layer(from_fn_with_state(state.clone(), auth::require_admin)),
    )
    .route(
      "/api/contact/:id",
      get(contacts::get_contact).layer(from_fn_with_state(state.clone(), auth::require_admin)),
    )
    .fallback(health::not_found)
    .layer(from_fn_with_state(api_gate, rate_limit))
    .layer(cors_layer(&state))
    .layer(SetResponseHeaderLayer::if_not_present(
      header::X_CONTENT_TYPE_OPTIONS,
      HeaderValue::from_static("nosniff"),
    ))
    .layer(SetResponseHeaderLayer::if_not_present(
      header::X_FRAME_OPTIONS,
      HeaderValue::from_static("DENY"),
    ))
    .layer(DefaultBodyLimit::max(state.config.body_limit))
    .with_state(state)
}

fn cors_layer(state: &AppState) -> CorsLayer {
  let cors = CorsLayer::new()
    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
    .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    .max_age(Duration::from_secs(86_400));
  if state.config.allowed_origins.is_empty() {
    cors.allow_origin(Any)
  } else {
    let origins: Vec<HeaderValue> = state
      .config
      .allowed_origins
      .iter()
      .filter_map(|o| o.parse().ok())
      .collect();
    cors
      .allow_origin(AllowOrigin::list(origins))
      .allow_credentials(true)
  }
}

/// Generic 500; carries the underlying error text only in development.
pub(crate) fn internal_error(
  state: &AppState,
  public: &str,
  err: &dyn std::fmt::Display,
) -> Response {
  let message = if state.config.is_dev() {
    format!("{public} ({err})")
  } else {
    public.to_string()
  };
  (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody::new(message))).into_response()
}
