// server/src/models/design_request.rs

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use teamkit_core::domain::{ApparelSelection, DesignRequest};
use teamkit_core::EngineResult;

#[derive(Debug, Clone, FromRow)]
pub struct DesignRequestRow {
  pub id: Uuid,
  pub team_id: Uuid,
  pub design_id: Option<Uuid>,
  pub selected_product_id: Option<Uuid>,
  pub selected_color: Option<String>,
  pub selected_size: Option<String>,
  pub product_slug: Option<String>,
  pub sport_slug: Option<String>,
  pub status: String,
  pub approval_status: String,
  pub order_id: Option<Uuid>,
  pub mockup_count: i32,
  pub created_at: DateTime<Utc>,
  pub approved_at: Option<DateTime<Utc>>,
  pub approved_by: Option<Uuid>,
}

impl DesignRequestRow {
  pub fn into_domain(self) -> EngineResult<DesignRequest> {
    // The selection is considered present as soon as any of its columns is.
    let selected_apparel = if self.selected_product_id.is_some()
      || self.selected_color.is_some()
      || self.selected_size.is_some()
    {
      Some(ApparelSelection {
        product_id: self.selected_product_id,
        color: self.selected_color,
        size: self.selected_size,
      })
    } else {
      None
    };

    Ok(DesignRequest {
      id: self.id,
      team_id: self.team_id,
      design_id: self.design_id,
      selected_apparel,
      product_slug: self.product_slug,
      sport_slug: self.sport_slug,
      status: super::request_status(&self.status)?,
      approval_status: super::approval_status(&self.approval_status)?,
      order_id: self.order_id,
      mockup_count: self.mockup_count,
      created_at: self.created_at,
      approved_at: self.approved_at,
      approved_by: self.approved_by,
    })
  }
}
