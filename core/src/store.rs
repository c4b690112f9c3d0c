use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    ContributionStatus, DesignProductLink, DesignRequest, Order, OrderItem, PaymentContribution,
    Product, TeamMember, TeamRole,
};
use crate::error::EngineResult;
use crate::tracker::RosterFacts;

/// Storage collaborator for the engine.
///
/// The backing store is assumed to offer single-row atomic writes and
/// row-level constraints, but NOT multi-statement transactions across all
/// call sites. Every cross-row guarantee the engine needs is therefore
/// expressed here as a conditional single-statement update whose return
/// value tells the caller whether it won:
///
/// - [`approve_design_request`](CommerceStore::approve_design_request) is the
///   approval commit point (`WHERE approval_status <> 'approved'`);
/// - [`settle_contribution`](CommerceStore::settle_contribution) only
///   transitions rows out of `pending`, making replayed callbacks no-ops;
/// - [`mark_order_paid`](CommerceStore::mark_order_paid) is guarded by
///   `payment_status <> 'paid'`.
#[async_trait]
pub trait CommerceStore: Send + Sync {
    // --- Design requests ---

    async fn design_request(&self, id: Uuid) -> EngineResult<Option<DesignRequest>>;

    async fn design_requests_for_team(&self, team_id: Uuid) -> EngineResult<Vec<DesignRequest>>;

    /// Conditional approval commit: sets `status = ready`,
    /// `approval_status = approved`, the order linkage and the approval
    /// timestamp/actor, but only if the request is not already approved.
    /// Returns false when zero rows were affected (a concurrent call won).
    async fn approve_design_request(
        &self,
        id: Uuid,
        order_id: Uuid,
        approved_by: Uuid,
        approved_at: DateTime<Utc>,
    ) -> EngineResult<bool>;

    // --- Catalog ---

    async fn product(&self, id: Uuid) -> EngineResult<Option<Product>>;

    async fn product_by_slug(&self, slug: &str) -> EngineResult<Option<Product>>;

    /// Design→product associations in insertion order.
    async fn products_for_design(&self, design_id: Uuid) -> EngineResult<Vec<DesignProductLink>>;

    async fn sport_id_by_slug(&self, slug: &str) -> EngineResult<Option<i64>>;

    /// Products associated with a sport. Implementations must match the
    /// sport id in both its string and numeric historical representations.
    async fn products_for_sport(&self, sport_id: i64) -> EngineResult<Vec<Product>>;

    /// Any product at all, catalog order. Last resort of the resolver chain.
    async fn any_product(&self) -> EngineResult<Option<Product>>;

    // --- Teams ---

    async fn team_role(&self, team_id: Uuid, user_id: Uuid) -> EngineResult<Option<TeamRole>>;

    async fn team_members(&self, team_id: Uuid) -> EngineResult<Vec<TeamMember>>;

    /// Player-info submission counts used by the placement tracker.
    async fn roster_facts(&self, team_id: Uuid) -> EngineResult<RosterFacts>;

    // --- Orders ---

    async fn order(&self, id: Uuid) -> EngineResult<Option<Order>>;

    async fn orders_for_team(&self, team_id: Uuid) -> EngineResult<Vec<Order>>;

    async fn insert_order(&self, order: &Order) -> EngineResult<()>;

    /// Single batch insert; either every item lands or none does.
    async fn insert_order_items(&self, items: &[OrderItem]) -> EngineResult<()>;

    /// Removes an order and its items. Only used by the assembler to clean
    /// up an order of its own making.
    async fn delete_order(&self, id: Uuid) -> EngineResult<()>;

    /// Re-derives `subtotal`/`total_amount` by summing current order items
    /// and persists them. Returns the new `(subtotal, total_amount)`.
    async fn recompute_order_totals(&self, order_id: Uuid) -> EngineResult<(i64, i64)>;

    /// Conditionally flips the order to paid. Returns false when the order
    /// was already paid (replayed settlement).
    async fn mark_order_paid(&self, order_id: Uuid) -> EngineResult<bool>;

    // --- Payment contributions ---

    async fn contribution(&self, id: Uuid) -> EngineResult<Option<PaymentContribution>>;

    async fn contribution_by_reference(
        &self,
        external_reference: &str,
    ) -> EngineResult<Option<PaymentContribution>>;

    async fn approved_contribution_exists(
        &self,
        order_id: Uuid,
        user_id: Uuid,
    ) -> EngineResult<bool>;

    async fn insert_contribution(&self, contribution: &PaymentContribution) -> EngineResult<()>;

    async fn set_contribution_preference(
        &self,
        id: Uuid,
        preference_id: &str,
    ) -> EngineResult<()>;

    /// Transitions a `pending` contribution to the given terminal status.
    /// Returns false when the row was not pending (out-of-order or
    /// duplicated callback delivery).
    async fn settle_contribution(
        &self,
        id: Uuid,
        status: ContributionStatus,
        settled_at: DateTime<Utc>,
    ) -> EngineResult<bool>;

    /// Sum of currently approved contributions, computed fresh from ledger
    /// rows. Never a cached counter.
    async fn sum_approved_contributions(&self, order_id: Uuid) -> EngineResult<i64>;
}
