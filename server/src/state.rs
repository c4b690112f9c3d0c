// server/src/state.rs
use crate::config::AppConfig;
use crate::storage::PgStore;
use std::sync::Arc;
use teamkit_core::PaymentGateway;

#[derive(Clone)]
pub struct AppState {
  pub store: Arc<PgStore>,
  pub gateway: Arc<dyn PaymentGateway>,
  pub config: Arc<AppConfig>,
}
