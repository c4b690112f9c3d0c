// server/src/models/order.rs

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use teamkit_core::domain::{Order, ProductionStage};
use teamkit_core::EngineResult;

#[derive(Debug, Clone, FromRow)]
pub struct OrderRow {
  pub id: Uuid,
  pub team_id: Uuid,
  pub status: String,
  pub payment_status: String,
  pub current_stage: Option<String>,
  pub subtotal: i64,
  pub total_amount: i64,
  pub locked_at: Option<DateTime<Utc>>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl OrderRow {
  pub fn into_domain(self) -> EngineResult<Order> {
    let current_stage = match self.current_stage.as_deref() {
      Some(value) => Some(
        ProductionStage::from_str_opt(value).ok_or_else(|| super::decode_error("current_stage", value))?,
      ),
      None => None,
    };
    Ok(Order {
      id: self.id,
      team_id: self.team_id,
      status: super::order_status(&self.status)?,
      payment_status: super::payment_status(&self.payment_status)?,
      current_stage,
      subtotal: self.subtotal,
      total_amount: self.total_amount,
      locked_at: self.locked_at,
      created_at: self.created_at,
      updated_at: self.updated_at,
    })
  }
}
