// server/src/web/handlers/progress_handlers.rs

use actix_web::{web, HttpResponse};
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use teamkit_core::tracker::team_progress;
use teamkit_core::CommerceStore;

#[instrument(name = "handler::team_progress", skip(app_state), fields(team_id = %path))]
pub async fn team_progress_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let team_id = path.into_inner();
  let store = app_state.store.as_ref();

  let requests = store.design_requests_for_team(team_id).await?;
  let roster = store.roster_facts(team_id).await?;
  let orders = store.orders_for_team(team_id).await?;

  let snapshot = team_progress(&requests, roster, &orders);
  Ok(HttpResponse::Ok().json(snapshot))
}
