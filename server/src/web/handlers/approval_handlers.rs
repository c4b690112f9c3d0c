// server/src/web/handlers/approval_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;
use teamkit_core::{ApprovalCommand, AssemblyOutcome, OrderAssembler};

#[derive(Deserialize, Debug)]
pub struct ApproveRequestPayload {
  pub team_id: Uuid,
  /// When set, items extend this existing order.
  pub order_id: Option<Uuid>,
}

#[instrument(
    name = "handler::approve_design_request",
    skip(app_state, payload, auth_user),
    fields(design_request_id = %path, user_id = %auth_user.user_id, team_id = %payload.team_id)
)]
pub async fn approve_design_request_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  payload: web::Json<ApproveRequestPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let cmd = ApprovalCommand {
    design_request_id: path.into_inner(),
    team_id: payload.team_id,
    approved_by: auth_user.user_id,
    target_order_id: payload.order_id,
  };

  let record = OrderAssembler::new(app_state.store.as_ref()).approve(&cmd).await?;

  let (outcome, status) = match &record.outcome {
    AssemblyOutcome::Created(_) => ("created", actix_web::http::StatusCode::CREATED),
    AssemblyOutcome::Extended(_) => ("extended", actix_web::http::StatusCode::OK),
  };
  info!(order_id = %record.outcome.order().id, outcome, "design request approved");

  Ok(HttpResponse::build(status).json(json!({
      "outcome": outcome,
      "order": record.outcome.order(),
      "design_request": record.design_request,
      "items_created": record.items_created,
  })))
}
