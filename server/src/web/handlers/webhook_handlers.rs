// server/src/web/handlers/webhook_handlers.rs

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use teamkit_core::domain::SettlementOutcome;
use teamkit_core::ContributionLedger;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WebhookOutcome {
  Approved,
  Rejected,
}

impl From<WebhookOutcome> for SettlementOutcome {
  fn from(outcome: WebhookOutcome) -> Self {
    match outcome {
      WebhookOutcome::Approved => SettlementOutcome::Approved,
      WebhookOutcome::Rejected => SettlementOutcome::Rejected,
    }
  }
}

/// Processor callback. Identifies the contribution either by our id or by
/// the external reference we handed the processor at initiation.
#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PaymentWebhookPayload {
  pub contribution_id: Option<Uuid>,
  pub external_reference: Option<String>,
  pub outcome: WebhookOutcome,
}

#[instrument(
    name = "handler::payment_webhook",
    skip(app_state, payload),
    fields(contribution_id = ?payload.contribution_id, external_reference = ?payload.external_reference)
)]
pub async fn payment_webhook_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<PaymentWebhookPayload>,
) -> Result<HttpResponse, AppError> {
  let ledger = ContributionLedger::new(app_state.store.as_ref(), app_state.gateway.as_ref());
  let outcome: SettlementOutcome = payload.outcome.into();

  let record = if let Some(contribution_id) = payload.contribution_id {
    ledger.settle(contribution_id, outcome).await?
  } else if let Some(reference) = payload.external_reference.as_deref() {
    ledger.settle_by_reference(reference, outcome).await?
  } else {
    return Err(AppError::BadRequest(
      "Webhook payload must carry contributionId or externalReference.".to_string(),
    ));
  };

  if record.overpayment_rejected {
    warn!(
      contribution_id = %record.contribution.id,
      total_approved = record.total_approved,
      "approval exceeded order funding; contribution recorded as rejected"
    );
  } else if record.transitioned {
    info!(
      contribution_id = %record.contribution.id,
      order_paid = record.order_paid,
      total_approved = record.total_approved,
      "settlement processed"
    );
  } else {
    // Replayed or out-of-order delivery. Still a 200: the processor only
    // needs to know we have the event.
    warn!(contribution_id = %record.contribution.id, "settlement replay ignored");
  }

  Ok(HttpResponse::Ok().json(json!({
      "processed": record.transitioned,
      "orderPaid": record.order_paid,
      "totalApproved": record.total_approved,
  })))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn webhook_payload_accepts_either_identifier() {
    let by_id: PaymentWebhookPayload = serde_json::from_str(
      r#"{"contributionId": "8f6f9f3e-5b39-4a8d-9a41-111111111111", "outcome": "approved"}"#,
    )
    .unwrap();
    assert!(by_id.contribution_id.is_some());
    assert_eq!(by_id.outcome, WebhookOutcome::Approved);

    let by_reference: PaymentWebhookPayload = serde_json::from_str(
      r#"{"externalReference": "teamkit-split|a|b", "outcome": "rejected"}"#,
    )
    .unwrap();
    assert_eq!(by_reference.external_reference.as_deref(), Some("teamkit-split|a|b"));
    assert_eq!(by_reference.outcome, WebhookOutcome::Rejected);
  }
}
