// server/src/models/mod.rs

//! Row structs mapping Postgres rows onto `teamkit_core` domain types.
//!
//! Status columns are stored as text; the codecs below keep the translation
//! in one place so the core crate stays free of sqlx.

pub mod contribution;
pub mod design_request;
pub mod order;
pub mod product;
pub mod team;

pub use contribution::PaymentContributionRow;
pub use design_request::DesignRequestRow;
pub use order::OrderRow;
pub use product::{DesignProductLinkRow, ProductRow};
pub use team::TeamMemberRow;

use teamkit_core::domain::{
  ApprovalStatus, ContributionStatus, OrderStatus, PaymentStatus, RequestStatus, TeamRole,
};
use teamkit_core::{EngineError, EngineResult};

pub(crate) fn decode_error(column: &str, value: &str) -> EngineError {
  EngineError::dependency(
    "decode row",
    anyhow::anyhow!("unrecognized {column} value '{value}'"),
  )
}

pub(crate) fn request_status(value: &str) -> EngineResult<RequestStatus> {
  match value {
    "pending" => Ok(RequestStatus::Pending),
    "rendering" => Ok(RequestStatus::Rendering),
    "ready" => Ok(RequestStatus::Ready),
    "cancelled" => Ok(RequestStatus::Cancelled),
    other => Err(decode_error("status", other)),
  }
}

pub(crate) fn approval_status(value: &str) -> EngineResult<ApprovalStatus> {
  match value {
    "pending" => Ok(ApprovalStatus::Pending),
    "approved" => Ok(ApprovalStatus::Approved),
    other => Err(decode_error("approval_status", other)),
  }
}

pub(crate) fn order_status(value: &str) -> EngineResult<OrderStatus> {
  match value {
    "pending" => Ok(OrderStatus::Pending),
    "paid" => Ok(OrderStatus::Paid),
    "processing" => Ok(OrderStatus::Processing),
    "shipped" => Ok(OrderStatus::Shipped),
    "delivered" => Ok(OrderStatus::Delivered),
    "cancelled" => Ok(OrderStatus::Cancelled),
    other => Err(decode_error("status", other)),
  }
}

pub(crate) fn payment_status(value: &str) -> EngineResult<PaymentStatus> {
  match value {
    "pending" => Ok(PaymentStatus::Pending),
    "paid" => Ok(PaymentStatus::Paid),
    other => Err(decode_error("payment_status", other)),
  }
}

pub(crate) fn contribution_status(value: &str) -> EngineResult<ContributionStatus> {
  match value {
    "pending" => Ok(ContributionStatus::Pending),
    "approved" => Ok(ContributionStatus::Approved),
    "rejected" => Ok(ContributionStatus::Rejected),
    other => Err(decode_error("status", other)),
  }
}

pub(crate) fn contribution_status_str(status: ContributionStatus) -> &'static str {
  match status {
    ContributionStatus::Pending => "pending",
    ContributionStatus::Approved => "approved",
    ContributionStatus::Rejected => "rejected",
  }
}

pub(crate) fn order_status_str(status: OrderStatus) -> &'static str {
  match status {
    OrderStatus::Pending => "pending",
    OrderStatus::Paid => "paid",
    OrderStatus::Processing => "processing",
    OrderStatus::Shipped => "shipped",
    OrderStatus::Delivered => "delivered",
    OrderStatus::Cancelled => "cancelled",
  }
}

pub(crate) fn payment_status_str(status: PaymentStatus) -> &'static str {
  match status {
    PaymentStatus::Pending => "pending",
    PaymentStatus::Paid => "paid",
  }
}

pub(crate) fn team_role(value: &str) -> EngineResult<TeamRole> {
  match value {
    "owner" => Ok(TeamRole::Owner),
    "manager" => Ok(TeamRole::Manager),
    "player" => Ok(TeamRole::Player),
    other => Err(decode_error("role", other)),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn status_codecs_round_trip() {
    for status in [
      ContributionStatus::Pending,
      ContributionStatus::Approved,
      ContributionStatus::Rejected,
    ] {
      assert_eq!(contribution_status(contribution_status_str(status)).unwrap(), status);
    }
    for status in [
      OrderStatus::Pending,
      OrderStatus::Paid,
      OrderStatus::Processing,
      OrderStatus::Shipped,
      OrderStatus::Delivered,
      OrderStatus::Cancelled,
    ] {
      assert_eq!(order_status(order_status_str(status)).unwrap(), status);
    }
  }

  #[test]
  fn unknown_status_values_surface_as_dependency_errors() {
    let err = order_status("limbo").unwrap_err();
    assert!(matches!(err, EngineError::Dependency { .. }));
  }
}
