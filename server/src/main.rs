// server/src/main.rs

mod config;
mod errors;
mod models;
mod services;
mod state;
mod storage;
mod web;

use crate::config::AppConfig;
use crate::services::MockCheckoutGateway;
use crate::state::AppState;
use crate::storage::PgStore;

use actix_web::{web as actix_data, App, HttpServer};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE) // Log when spans close, showing duration
    .init();

  tracing::info!("Starting teamkit server...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      panic!("Configuration error: {}", e);
    }
  };

  let db_pool = match PgPool::connect(&app_config.database_url).await {
    Ok(pool) => {
      tracing::info!("Successfully connected to the database.");
      pool
    }
    Err(e) => {
      tracing::error!(error = %e, "Failed to connect to the database.");
      panic!("Database connection error: {}", e);
    }
  };

  let store = Arc::new(PgStore::new(db_pool));

  if app_config.apply_schema {
    if let Err(e) = store.apply_schema().await {
      tracing::error!(error = %e, "Failed to apply database schema.");
      panic!("Schema application error: {}", e);
    }
    tracing::info!("Database schema applied.");
  }

  let gateway = Arc::new(MockCheckoutGateway::new(
    app_config.checkout_base_url.clone(),
    app_config.sandbox_checkout_base_url.clone(),
  ));

  let app_state = AppState {
    store,
    gateway,
    config: app_config.clone(),
  };

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
