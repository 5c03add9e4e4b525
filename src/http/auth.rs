//! Optional bearer-token guard for the admin read endpoints.
//!
//! With no token configured the endpoints stay open, which is the intended
//! local-development behavior.

use crate::{app::AppState, models::response::error_body::ErrorBody};
use axum::{
  Json,
  extract::{Request, State},
  http::{StatusCode, header},
  middleware::Next,
  response::{IntoResponse, Response},
};

pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
  let Some(expected) = state.config.admin_token.as_deref() else {
    return next.run(req).await;
  };
  let presented = req
    .headers()
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "));
  if presented != Some(expected) {
    return (
      StatusCode::UNAUTHORIZED,
      Json(ErrorBody::new("Missing or invalid admin token")),
    )
      .into_response();
  }
  next.run(req).await
}
