//! Fixed-window per-IP request gate.

use crate::models::response::error_body::ErrorBody;
use crate::util::client_ip;
use axum::{
  Json,
  extract::{ConnectInfo, Request, State},
  http::StatusCode,
  middleware::Next,
  response::{IntoResponse, Response},
};
use std::{
  collections::HashMap,
  net::{IpAddr, SocketAddr},
  sync::{Arc, Mutex},
  time::{Duration, Instant},
};

/// Counts requests per client address inside a fixed window.
pub struct RateLimiter {
  max: u32,
  window: Duration,
  hits: Mutex<HashMap<IpAddr, Window>>,
}

struct Window {
  started: Instant,
  count: u32,
}

impl RateLimiter {
  pub fn new(max: u32, window: Duration) -> Self {
    RateLimiter {
      max,
      window,
      hits: Mutex::new(HashMap::new()),
    }
  }

  /// Record one hit and report whether the client is still inside its budget.
  pub fn check(&self, ip: IpAddr) -> bool {
    let now = Instant::now();
    let mut hits = self.hits.lock().unwrap();
    if hits.len() > 1024 {
      let window = self.window;
      hits.retain(|_, w| now.duration_since(w.started) < window);
    }
    let w = hits.entry(ip).or_insert(Window {
      started: now,
      count: 0,
    });
    if now.duration_since(w.started) >= self.window {
      w.started = now;
      w.count = 0;
    }
    w.count += 1;
    w.count <= self.max
  }
}

pub async fn rate_limit(
  State(limiter): State<Arc<RateLimiter>>,
  ConnectInfo(peer): ConnectInfo<SocketAddr>,
  req: Request,
  next: Next,
) -> Response {
  let ip = client_ip(req.headers(), peer);
  if !limiter.check(ip) {
    return (
      StatusCode::TOO_MANY_REQUESTS,
      Json(ErrorBody::new("Too many requests, please try again later.")),
    )
      .into_response();
  }
  next.run(req).await
}
