//! Environment-driven configuration.
//!
//! Every setting has a default so the server can come up bare for local
//! development; malformed values fall back with a warning.

use std::fmt::Display;
use std::str::FromStr;
use tracing::warn;

/// Runtime environment; controls how much detail 500 responses carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
  Development,
  Production,
}

/// Outbound SMTP relay settings.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
  pub host: String,
  pub port: u16,
  /// true wraps the connection in TLS; false speaks plaintext (local relay).
  pub secure: bool,
  pub user: Option<String>,
  pub pass: Option<String>,
  pub from: String,
}

#[derive(Debug, Clone)]
pub struct Config {
  pub addr: String,
  pub database: String,
  pub db_pool: u32,
  pub smtp: SmtpConfig,
  /// Fixed recipient of the business notification email.
  pub recipient: String,
  pub site_name: String,
  /// Exact allowed CORS origins; empty means any origin.
  pub allowed_origins: Vec<String>,
  pub body_limit: usize,
  pub rate_max: u32,
  pub rate_window_secs: u64,
  pub submit_rate_max: u32,
  pub submit_rate_window_secs: u64,
  /// When set, the listing endpoints require this bearer token.
  pub admin_token: Option<String>,
  pub environment: Environment,
}

impl Config {
  /// Read the full configuration from `REACHOUT_*` environment variables.
  pub fn from_env() -> Self {
    Config {
      addr: var_or("REACHOUT_ADDR", "127.0.0.1:8080"),
      database: var_or("REACHOUT_DATABASE", "sqlite://reachout.db"),
      db_pool: parse_or("REACHOUT_DB_POOL", 10),
      smtp: SmtpConfig {
        host: var_or("REACHOUT_SMTP_HOST", "127.0.0.1"),
        port: parse_or("REACHOUT_SMTP_PORT", 587),
        secure: parse_or("REACHOUT_SMTP_SECURE", false),
        user: std::env::var("REACHOUT_SMTP_USER").ok(),
        pass: std::env::var("REACHOUT_SMTP_PASS").ok(),
        from: var_or("REACHOUT_SMTP_FROM", "no-reply@localhost"),
      },
      recipient: var_or("REACHOUT_RECIPIENT", "inbox@localhost"),
      site_name: var_or("REACHOUT_SITE_NAME", "Reachout"),
      allowed_origins: std::env::var("REACHOUT_ALLOWED_ORIGINS")
        .map(|s| {
          s.split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect()
        })
        .unwrap_or_default(),
      body_limit: parse_or("REACHOUT_BODY_LIMIT", 10 * 1024 * 1024),
      rate_max: parse_or("REACHOUT_RATE_MAX", 100),
      rate_window_secs: parse_or("REACHOUT_RATE_WINDOW", 900),
      submit_rate_max: parse_or("REACHOUT_SUBMIT_RATE_MAX", 5),
      submit_rate_window_secs: parse_or("REACHOUT_SUBMIT_RATE_WINDOW", 3600),
      admin_token: std::env::var("REACHOUT_ADMIN_TOKEN")
        .ok()
        .filter(|t| !t.is_empty()),
      environment: match var_or("REACHOUT_ENV", "development").as_str() {
        "production" | "prod" => Environment::Production,
        _ => Environment::Development,
      },
    }
  }

  pub fn is_dev(&self) -> bool {
    self.environment == Environment::Development
  }
}

fn var_or(key: &str, default: &str) -> String {
  std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T>(key: &str, default: T) -> T
where
  T: FromStr,
  T::Err: Display,
{
  match std::env::var(key) {
    Ok(raw) => match raw.parse() {
      Ok(v) => v,
      Err(e) => {
        warn!("invalid {key}={raw}: {e}, using default");
        default
      }
    },
    Err(_) => default,
  }
}
