//! Order assembly: converts one approved design request into an order with
//! one line item per team member.

use chrono::Utc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::domain::{DesignRequest, Order, OrderItem, RequestStatus, ApprovalStatus};
use crate::error::{EngineError, EngineResult};
use crate::resolver::ProductResolver;
use crate::store::CommerceStore;

/// One approval call, as issued by a team manager or owner.
#[derive(Debug, Clone)]
pub struct ApprovalCommand {
    pub design_request_id: Uuid,
    pub team_id: Uuid,
    pub approved_by: Uuid,
    /// When set, items are added to this existing order instead of a new one.
    pub target_order_id: Option<Uuid>,
}

/// Which branch the assembly took. Callers never observe a half-built order:
/// the contained order is the post-assembly row.
#[derive(Debug, Clone)]
pub enum AssemblyOutcome {
    Created(Order),
    Extended(Order),
}

impl AssemblyOutcome {
    pub fn order(&self) -> &Order {
        match self {
            AssemblyOutcome::Created(order) | AssemblyOutcome::Extended(order) => order,
        }
    }
}

/// Result of a successful approval.
#[derive(Debug, Clone)]
pub struct ApprovalRecord {
    pub outcome: AssemblyOutcome,
    pub design_request: DesignRequest,
    pub items_created: usize,
}

pub struct OrderAssembler<'a, S: CommerceStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: CommerceStore + ?Sized> OrderAssembler<'a, S> {
    pub fn new(store: &'a S) -> Self {
        OrderAssembler { store }
    }

    /// Approves a design request and assembles its order.
    ///
    /// Repeated calls for the same request are safe: the first one to pass
    /// the conditional approval update wins, later ones get
    /// [`EngineError::AlreadyApproved`].
    #[instrument(skip(self, cmd), fields(
        design_request_id = %cmd.design_request_id,
        team_id = %cmd.team_id,
        target_order_id = ?cmd.target_order_id,
    ))]
    pub async fn approve(&self, cmd: &ApprovalCommand) -> EngineResult<ApprovalRecord> {
        let role = self
            .store
            .team_role(cmd.team_id, cmd.approved_by)
            .await?
            .ok_or_else(|| EngineError::forbidden("caller has no access to this team"))?;
        if !role.can_approve() {
            return Err(EngineError::forbidden(
                "only team owners and managers may approve design requests",
            ));
        }

        let mut request = self
            .store
            .design_request(cmd.design_request_id)
            .await?
            .ok_or_else(|| EngineError::not_found("design request"))?;
        if request.team_id != cmd.team_id {
            return Err(EngineError::forbidden("design request belongs to another team"));
        }
        if request.is_booked() {
            return Err(EngineError::AlreadyApproved);
        }

        let members = self.store.team_members(cmd.team_id).await?;
        if members.is_empty() {
            // An order with zero items is invalid; reject before any write.
            return Err(EngineError::validation("team has no members to order for"));
        }

        let resolved = ProductResolver::new(self.store).resolve(&request).await?;
        let product = resolved.product;
        let total = product.price * members.len() as i64;
        info!(
            product_id = %product.id,
            strategy = ?resolved.strategy,
            member_count = members.len(),
            total,
            "pricing assembled order"
        );

        // Branch on caller intent: fresh order vs extending an existing one.
        let (order_id, created) = match cmd.target_order_id {
            Some(target_id) => {
                let target = self
                    .store
                    .order(target_id)
                    .await?
                    .ok_or_else(|| EngineError::not_found("order"))?;
                if target.team_id != cmd.team_id {
                    return Err(EngineError::forbidden("order belongs to another team"));
                }
                if !target.status.accepts_items() || target.locked_at.is_some() {
                    return Err(EngineError::OrderLocked);
                }
                (target.id, false)
            }
            None => {
                let order = Order::new_pending(cmd.team_id, total, Utc::now());
                self.store.insert_order(&order).await?;
                (order.id, true)
            }
        };

        let items: Vec<OrderItem> = members
            .iter()
            .map(|member| OrderItem {
                id: Uuid::new_v4(),
                order_id,
                product_id: product.id,
                product_name: product.name.clone(),
                unit_price: product.price,
                quantity: 1,
                player_id: member.user_id,
                size: None,
                number: None,
                notes: None,
            })
            .collect();

        if let Err(item_err) = self.store.insert_order_items(&items).await {
            // No orphan order without items: undo our own creation. An
            // extended order keeps its pre-existing items and is untouched.
            if created {
                if let Err(cleanup_err) = self.store.delete_order(order_id).await {
                    error!(%order_id, error = %cleanup_err, "failed to delete orphan order after item insert failure");
                }
            }
            return Err(item_err);
        }

        // Totals are re-derived from the rows just written, never patched
        // from values captured earlier in the request.
        self.store.recompute_order_totals(order_id).await?;

        // Commit point: conditional update so a concurrent approval of the
        // same request observably loses instead of double-booking.
        let approved_at = Utc::now();
        match self
            .store
            .approve_design_request(request.id, order_id, cmd.approved_by, approved_at)
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                warn!(%order_id, "lost approval race, cleaning up this call's order");
                if created {
                    if let Err(cleanup_err) = self.store.delete_order(order_id).await {
                        error!(%order_id, error = %cleanup_err, "failed to delete order after losing approval race");
                    }
                }
                return Err(EngineError::AlreadyApproved);
            }
            Err(update_err) => {
                // The order is financially real at this point and must not
                // be discarded. Re-running approval is safe because of the
                // conditional commit above.
                error!(
                    %order_id,
                    error = %update_err,
                    "order assembled but design request update failed; order preserved for retry"
                );
                return Err(update_err);
            }
        }

        let order = self
            .store
            .order(order_id)
            .await?
            .ok_or_else(|| EngineError::not_found("order"))?;

        request.status = RequestStatus::Ready;
        request.approval_status = ApprovalStatus::Approved;
        request.order_id = Some(order_id);
        request.approved_at = Some(approved_at);
        request.approved_by = Some(cmd.approved_by);

        let outcome = if created {
            AssemblyOutcome::Created(order)
        } else {
            AssemblyOutcome::Extended(order)
        };
        info!(%order_id, items = items.len(), created, "design request approved");

        Ok(ApprovalRecord {
            outcome,
            design_request: request,
            items_created: items.len(),
        })
    }
}
