// server/src/web/handlers/payment_handlers.rs

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use teamkit_core::ContributionLedger;

// The payment surface speaks camelCase, matching the checkout frontend.

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SplitPaymentPayload {
  pub order_id: Uuid,
  pub user_id: Uuid,
  pub amount_clp: i64,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SplitPaymentResponse {
  pub contribution_id: Uuid,
  pub preference_id: String,
  pub init_point: String,
  pub sandbox_init_point: String,
}

#[instrument(
    name = "handler::split_payment",
    skip(app_state, payload),
    fields(order_id = %payload.order_id, user_id = %payload.user_id, amount = payload.amount_clp)
)]
pub async fn split_payment_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<SplitPaymentPayload>,
) -> Result<HttpResponse, AppError> {
  let ledger = ContributionLedger::new(app_state.store.as_ref(), app_state.gateway.as_ref());
  let initiated = ledger
    .initiate(payload.order_id, payload.user_id, payload.amount_clp)
    .await?;

  info!(contribution_id = %initiated.contribution.id, "split payment initiated");

  Ok(HttpResponse::Created().json(SplitPaymentResponse {
    contribution_id: initiated.contribution.id,
    preference_id: initiated.preference.preference_id,
    init_point: initiated.preference.init_point,
    sandbox_init_point: initiated.preference.sandbox_init_point,
  }))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn split_payload_accepts_camel_case() {
    let payload: SplitPaymentPayload = serde_json::from_str(
      r#"{
                "orderId": "8f6f9f3e-5b39-4a8d-9a41-111111111111",
                "userId": "8f6f9f3e-5b39-4a8d-9a41-222222222222",
                "amountClp": 10000
            }"#,
    )
    .unwrap();
    assert_eq!(payload.amount_clp, 10_000);
  }

  #[test]
  fn split_response_serializes_camel_case() {
    let response = SplitPaymentResponse {
      contribution_id: Uuid::nil(),
      preference_id: "mock_pref_1".to_string(),
      init_point: "https://checkout.example.com/checkout".to_string(),
      sandbox_init_point: "https://sandbox.checkout.example.com/checkout".to_string(),
    };
    let value = serde_json::to_value(&response).unwrap();
    assert!(value.get("contributionId").is_some());
    assert!(value.get("initPoint").is_some());
    assert!(value.get("sandboxInitPoint").is_some());
    assert!(value.get("contribution_id").is_none());
  }
}
