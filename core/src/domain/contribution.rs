use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionStatus {
    Pending,
    Approved,
    Rejected,
}

/// Settlement verdict delivered by the payment processor callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementOutcome {
    Approved,
    Rejected,
}

impl SettlementOutcome {
    pub fn into_status(self) -> ContributionStatus {
        match self {
            SettlementOutcome::Approved => ContributionStatus::Approved,
            SettlementOutcome::Rejected => ContributionStatus::Rejected,
        }
    }
}

/// One member's attempted/settled partial payment toward an order's total.
///
/// Invariant: at most one `Approved` row exists per (order_id, user_id) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentContribution {
    pub id: Uuid,
    pub order_id: Uuid,
    pub user_id: Uuid,
    pub amount: i64,
    pub status: ContributionStatus,
    /// Deterministic processor-side reference, see [`crate::ledger::external_reference`].
    pub external_reference: String,
    /// Preference id returned by the processor when the checkout was created.
    pub preference_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub settled_at: Option<DateTime<Utc>>,
}
