// server/src/models/contribution.rs

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use teamkit_core::domain::PaymentContribution;
use teamkit_core::EngineResult;

#[derive(Debug, Clone, FromRow)]
pub struct PaymentContributionRow {
  pub id: Uuid,
  pub order_id: Uuid,
  pub user_id: Uuid,
  pub amount: i64,
  pub status: String,
  pub external_reference: String,
  pub preference_id: Option<String>,
  pub created_at: DateTime<Utc>,
  pub settled_at: Option<DateTime<Utc>>,
}

impl PaymentContributionRow {
  pub fn into_domain(self) -> EngineResult<PaymentContribution> {
    Ok(PaymentContribution {
      id: self.id,
      order_id: self.order_id,
      user_id: self.user_id,
      amount: self.amount,
      status: super::contribution_status(&self.status)?,
      external_reference: self.external_reference,
      preference_id: self.preference_id,
      created_at: self.created_at,
      settled_at: self.settled_at,
    })
  }
}
