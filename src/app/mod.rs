//! Application setup and runtime.

use crate::{config::Config, db, http, mail::Mailer};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use std::{net::SocketAddr, sync::Arc, time::Instant};
use tokio::signal;
use tracing::info;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
  pub db: SqlitePool,
  pub config: Arc<Config>,
  pub mailer: Mailer,
  pub started: Instant,
}

/// Start the HTTP server with configured environment.
pub async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
  crate::util::init_tracing();

  let config = Arc::new(Config::from_env());
  let db_url = db::ensure_sqlite_path(&config.database);
  let pool = SqlitePoolOptions::new()
    .max_connections(config.db_pool)
    .connect(&db_url)
    .await?;
  db::run_migrations(&pool).await?;
  info!("database ready at {}", config.database);

  let mailer = Mailer::from_config(&config)?;
  let state = AppState {
    db: pool.clone(),
    config: config.clone(),
    mailer,
    started: Instant::now(),
  };

  let app = http::build_router(state);

  let addr: SocketAddr = config.addr.parse()?;
  let listener = tokio::net::TcpListener::bind(addr).await?;
  info!("listening on http://{}", addr);
  info!("submit endpoint:  POST http://{}/api/contact/submit", addr);
  info!("health check:     http://{}/health", addr);
  info!("notifications go to {}", config.recipient);

  axum::serve(
    listener,
    app.into_make_service_with_connect_info::<SocketAddr>(),
  )
  .with_graceful_shutdown(shutdown_signal())
  .await?;

  // Drain the pool once the listener has stopped. Detached confirmation
  // tasks are best-effort and not awaited.
  pool.close().await;
  info!("shutdown complete");
  Ok(())
}

async fn shutdown_signal() {
  let ctrl_c = async {
    signal::ctrl_c().await.expect("ctrl-c handler");
    info!("received ctrl-c, shutting down");
  };

  #[cfg(unix)]
  let terminate = async {
    signal::unix::signal(signal::unix::SignalKind::terminate())
      .expect("signal handler")
      .recv()
      .await;
    info!("received terminate signal, shutting down");
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    _ = ctrl_c => {},
    _ = terminate => {},
  }
}
