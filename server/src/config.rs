// server/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,

  // Base URLs handed to the mock checkout gateway when it builds init points.
  pub checkout_base_url: String,
  pub sandbox_checkout_base_url: String,

  // Optional: apply schema.sql on startup.
  pub apply_schema: bool,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL")?;

    let checkout_base_url =
      get_env("CHECKOUT_BASE_URL").unwrap_or_else(|_| "https://checkout.example.com".to_string());
    let sandbox_checkout_base_url =
      get_env("SANDBOX_CHECKOUT_BASE_URL").unwrap_or_else(|_| "https://sandbox.checkout.example.com".to_string());

    let apply_schema = get_env("APPLY_SCHEMA")
      .unwrap_or_else(|_| "false".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid APPLY_SCHEMA value: {}", e)))?;

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
      checkout_base_url,
      sandbox_checkout_base_url,
      apply_schema,
    })
  }
}
