use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Content-generation state of a design request. Independent of approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Rendering,
    Ready,
    Cancelled,
}

/// Approval state. Monotonic: once `Approved`, a request never regresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
}

/// Nested product/color/size selection captured on submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApparelSelection {
    pub product_id: Option<Uuid>,
    pub color: Option<String>,
    pub size: Option<String>,
}

/// A team's request for a customized apparel design, independent of its
/// eventual order. At most one order is ever attached (`order_id` is set
/// exactly once, at the approval commit point).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignRequest {
    pub id: Uuid,
    pub team_id: Uuid,
    pub design_id: Option<Uuid>,
    pub selected_apparel: Option<ApparelSelection>,
    pub product_slug: Option<String>,
    pub sport_slug: Option<String>,
    pub status: RequestStatus,
    pub approval_status: ApprovalStatus,
    pub order_id: Option<Uuid>,
    /// Number of rendered mockups attached by the render step.
    pub mockup_count: i32,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<Uuid>,
}

impl DesignRequest {
    /// True once the request has been approved with an order attached,
    /// i.e. the state a repeated approval call must treat as final.
    pub fn is_booked(&self) -> bool {
        self.approval_status == ApprovalStatus::Approved && self.order_id.is_some()
    }
}
