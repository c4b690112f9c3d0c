//! Payment contribution ledger: split payments from independent contributors
//! reconciled against a single order total.

use chrono::Utc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::domain::{ContributionStatus, PaymentContribution, PaymentStatus, SettlementOutcome};
use crate::error::{EngineError, EngineResult};
use crate::gateway::{CheckoutPreference, PaymentGateway};
use crate::store::CommerceStore;

/// Namespace tag for processor-side external references.
pub const SPLIT_REFERENCE_NAMESPACE: &str = "teamkit-split";

/// Deterministic external reference for a contribution, so retried
/// initiations stay traceable on the processor side.
pub fn external_reference(order_id: Uuid, user_id: Uuid) -> String {
    format!("{SPLIT_REFERENCE_NAMESPACE}|{order_id}|{user_id}")
}

/// A freshly initiated contribution plus the processor checkout to redirect
/// the payer to.
#[derive(Debug, Clone)]
pub struct InitiatedContribution {
    pub contribution: PaymentContribution,
    pub preference: CheckoutPreference,
}

/// Outcome of one settlement callback.
#[derive(Debug, Clone)]
pub struct SettlementRecord {
    pub contribution: PaymentContribution,
    /// Sum of approved contributions after this settlement.
    pub total_approved: i64,
    /// True when this settlement flipped the order to paid.
    pub order_paid: bool,
    /// True when the callback actually transitioned the row (false on
    /// duplicate or out-of-order delivery).
    pub transitioned: bool,
    /// True when an approval arrived for an order that was already fully
    /// funded (or would have been overshot) and the contribution was
    /// recorded as rejected instead. The payment must be refunded out of
    /// band.
    pub overpayment_rejected: bool,
}

pub struct ContributionLedger<'a, S, G>
where
    S: CommerceStore + ?Sized,
    G: PaymentGateway + ?Sized,
{
    store: &'a S,
    gateway: &'a G,
}

impl<'a, S, G> ContributionLedger<'a, S, G>
where
    S: CommerceStore + ?Sized,
    G: PaymentGateway + ?Sized,
{
    pub fn new(store: &'a S, gateway: &'a G) -> Self {
        ContributionLedger { store, gateway }
    }

    /// Starts a member's payment toward an order.
    ///
    /// Fails with [`EngineError::OrderAlreadyPaid`] on a settled order,
    /// [`EngineError::DuplicateContribution`] when this user already has an
    /// approved contribution, and a validation error for non-positive
    /// amounts or amounts above the outstanding remainder.
    #[instrument(skip(self), fields(%order_id, %user_id, amount = amount))]
    pub async fn initiate(
        &self,
        order_id: Uuid,
        user_id: Uuid,
        amount: i64,
    ) -> EngineResult<InitiatedContribution> {
        if amount <= 0 {
            return Err(EngineError::validation("contribution amount must be positive"));
        }

        let order = self
            .store
            .order(order_id)
            .await?
            .ok_or_else(|| EngineError::not_found("order"))?;
        if order.payment_status == PaymentStatus::Paid {
            return Err(EngineError::OrderAlreadyPaid);
        }
        if self
            .store
            .approved_contribution_exists(order_id, user_id)
            .await?
        {
            return Err(EngineError::DuplicateContribution);
        }

        let already_approved = self.store.sum_approved_contributions(order_id).await?;
        let remaining = order.total_amount - already_approved;
        if amount > remaining {
            return Err(EngineError::validation(format!(
                "amount {amount} exceeds the outstanding balance {remaining}"
            )));
        }

        let reference = external_reference(order_id, user_id);
        let mut contribution = PaymentContribution {
            id: Uuid::new_v4(),
            order_id,
            user_id,
            amount,
            status: ContributionStatus::Pending,
            external_reference: reference.clone(),
            preference_id: None,
            created_at: Utc::now(),
            settled_at: None,
        };
        self.store.insert_contribution(&contribution).await?;

        let preference = self
            .gateway
            .create_preference(&order, user_id, amount, &reference)
            .await?;
        self.store
            .set_contribution_preference(contribution.id, &preference.preference_id)
            .await?;
        contribution.preference_id = Some(preference.preference_id.clone());

        info!(contribution_id = %contribution.id, preference_id = %preference.preference_id, "contribution initiated");
        Ok(InitiatedContribution { contribution, preference })
    }

    /// Applies a processor settlement callback.
    ///
    /// Safe against replays and out-of-order delivery: the contribution only
    /// transitions out of `pending` once, and the paid decision is made by
    /// summing current ledger rows against a re-read order row, never by
    /// incrementing a cached counter.
    ///
    /// Approvals are additionally guarded against overlapping pending
    /// contributions: the remainder check at `initiate` counts only approved
    /// rows, so two members can both hold a pending contribution for the
    /// same balance. The order and the approved sum are therefore re-read
    /// immediately before the transition, and an approval that lands on a
    /// paid order or would push the approved sum past `total_amount` is
    /// recorded as rejected instead.
    #[instrument(skip(self), fields(%contribution_id, ?outcome))]
    pub async fn settle(
        &self,
        contribution_id: Uuid,
        outcome: SettlementOutcome,
    ) -> EngineResult<SettlementRecord> {
        let contribution = self
            .store
            .contribution(contribution_id)
            .await?
            .ok_or_else(|| EngineError::not_found("payment contribution"))?;

        let mut status = outcome.into_status();
        let mut overpayment_rejected = false;
        if status == ContributionStatus::Approved
            && contribution.status == ContributionStatus::Pending
        {
            let order = self
                .store
                .order(contribution.order_id)
                .await?
                .ok_or_else(|| EngineError::not_found("order"))?;
            let already_approved = self
                .store
                .sum_approved_contributions(contribution.order_id)
                .await?;
            if order.payment_status == PaymentStatus::Paid
                || contribution.amount > order.total_amount - already_approved
            {
                warn!(
                    order_id = %order.id,
                    amount = contribution.amount,
                    already_approved,
                    total_amount = order.total_amount,
                    "approval would overshoot the order total; rejecting contribution"
                );
                status = ContributionStatus::Rejected;
                overpayment_rejected = true;
            }
        }

        let settled_at = Utc::now();
        let transitioned = self
            .store
            .settle_contribution(contribution_id, status, settled_at)
            .await?;
        if !transitioned {
            debug!("contribution was not pending; treating callback as replay");
        }

        let total_approved = self
            .store
            .sum_approved_contributions(contribution.order_id)
            .await?;

        let mut order_paid = false;
        if status == ContributionStatus::Approved {
            // Re-read the order row immediately before deciding, so a
            // concurrent item addition is not lost.
            let order = self
                .store
                .order(contribution.order_id)
                .await?
                .ok_or_else(|| EngineError::not_found("order"))?;
            if total_approved >= order.total_amount {
                order_paid = self.store.mark_order_paid(order.id).await?;
                if order_paid {
                    info!(order_id = %order.id, total_approved, "order fully funded, marked paid");
                }
            }
        }

        let contribution = self
            .store
            .contribution(contribution_id)
            .await?
            .ok_or_else(|| EngineError::not_found("payment contribution"))?;

        Ok(SettlementRecord {
            contribution,
            total_approved,
            order_paid,
            transitioned,
            overpayment_rejected,
        })
    }

    /// Settlement lookup by the processor's external reference, for
    /// callbacks that do not carry the contribution id.
    #[instrument(skip(self))]
    pub async fn settle_by_reference(
        &self,
        external_reference: &str,
        outcome: SettlementOutcome,
    ) -> EngineResult<SettlementRecord> {
        let contribution = self
            .store
            .contribution_by_reference(external_reference)
            .await?
            .ok_or_else(|| EngineError::not_found("payment contribution"))?;
        self.settle(contribution.id, outcome).await
    }
}
