//! Production stage tracking: two completion percentages computed on demand
//! from current facts. Nothing here performs I/O or mutates state; advancing
//! `current_stage` is an external fulfillment action consumed as a fact.

use serde::{Deserialize, Serialize};

use crate::domain::{ApprovalStatus, DesignRequest, Order, OrderStatus, PaymentStatus, ProductionStage, RequestStatus};

/// Player-info submission counts for a team.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RosterFacts {
    pub submissions: u32,
    pub self_confirmed: u32,
}

/// The four independently true/false steps of the order-placement phase.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PlacementFacts {
    pub design_requested: bool,
    pub design_confirmed: bool,
    pub players_added: bool,
    pub payment_complete: bool,
}

impl PlacementFacts {
    /// Derives the placement facts from raw team state.
    pub fn derive(requests: &[DesignRequest], roster: RosterFacts, orders: &[Order]) -> Self {
        let design_requested = !requests.is_empty();
        let design_confirmed = requests.iter().any(|r| {
            r.mockup_count > 0
                || r.status == RequestStatus::Ready
                || r.approval_status == ApprovalStatus::Approved
        });
        // Partial rosters do not count: every submission must be confirmed.
        let players_added = roster.submissions > 0 && roster.self_confirmed == roster.submissions;
        let payment_complete = !orders.is_empty()
            && orders.iter().all(|o| o.payment_status == PaymentStatus::Paid);
        PlacementFacts {
            design_requested,
            design_confirmed,
            players_added,
            payment_complete,
        }
    }

    pub fn completed_steps(self) -> u8 {
        [
            self.design_requested,
            self.design_confirmed,
            self.players_added,
            self.payment_complete,
        ]
        .iter()
        .filter(|step| **step)
        .count() as u8
    }

    /// Completion percentage of the placement phase (steps of 25).
    pub fn percent(self) -> u8 {
        self.completed_steps() * 25
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageState {
    Complete,
    Active,
    Locked,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StageView {
    pub stage: ProductionStage,
    pub state: StageState,
}

/// Production-phase progress for one order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionProgress {
    pub stages: Vec<StageView>,
    pub percent: u8,
}

/// Maps terminal order statuses onto their stage shortcuts, otherwise the
/// stored `current_stage`.
fn effective_stage(status: OrderStatus, current_stage: Option<ProductionStage>) -> Option<ProductionStage> {
    match status {
        OrderStatus::Delivered => Some(ProductionStage::Delivered),
        OrderStatus::Shipped => Some(ProductionStage::Shipping),
        _ => current_stage,
    }
}

/// Computes production progress for an order.
///
/// Only meaningful once payment completes; before that the phase has not
/// started and everything is locked at 0%. With a stage set, everything
/// strictly earlier is complete, the stage itself is active, everything
/// later is locked, and the percentage is `(index + 1) / 9`.
pub fn production_progress(
    payment_complete: bool,
    status: OrderStatus,
    current_stage: Option<ProductionStage>,
) -> ProductionProgress {
    let stage = if payment_complete {
        effective_stage(status, current_stage)
    } else {
        None
    };

    let stages = match stage {
        Some(active) => {
            let active_idx = active.index();
            ProductionStage::ALL
                .iter()
                .enumerate()
                .map(|(idx, s)| StageView {
                    stage: *s,
                    state: if idx < active_idx {
                        StageState::Complete
                    } else if idx == active_idx {
                        StageState::Active
                    } else {
                        StageState::Locked
                    },
                })
                .collect()
        }
        None => ProductionStage::ALL
            .iter()
            .map(|s| StageView { stage: *s, state: StageState::Locked })
            .collect(),
    };

    let percent = match stage {
        Some(active) => ((active.index() + 1) * 100 / ProductionStage::ALL.len()) as u8,
        None => 0,
    };

    ProductionProgress { stages, percent }
}

/// Combined two-phase progress snapshot, as served to the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamProgress {
    pub placement: PlacementFacts,
    pub placement_percent: u8,
    pub production: Vec<OrderProduction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderProduction {
    pub order_id: uuid::Uuid,
    pub progress: ProductionProgress,
}

/// Computes the full two-phase snapshot for a team.
pub fn team_progress(requests: &[DesignRequest], roster: RosterFacts, orders: &[Order]) -> TeamProgress {
    let placement = PlacementFacts::derive(requests, roster, orders);
    let production = orders
        .iter()
        .map(|order| OrderProduction {
            order_id: order.id,
            progress: production_progress(
                placement.payment_complete,
                order.status,
                order.current_stage,
            ),
        })
        .collect();
    TeamProgress {
        placement,
        placement_percent: placement.percent(),
        production,
    }
}
