// src/lib.rs

//! TeamKit core: the order lifecycle & payment reconciliation engine.
//!
//! The engine turns approved design requests into orders, reconciles split
//! payments from independent contributors against order totals, and derives
//! two-phase production progress from current facts:
//!  - Product resolution through an ordered first-match-wins fallback chain.
//!  - Order assembly with one line item per team member and an idempotent
//!    approval commit point.
//!  - A payment contribution ledger that is safe against duplicated and
//!    out-of-order processor callbacks.
//!  - A pure production-stage tracker (no stored percentages).
//!
//! All I/O goes through the [`store::CommerceStore`] and
//! [`gateway::PaymentGateway`] traits; this crate carries no database or web
//! dependencies.

pub mod assembler;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod ledger;
pub mod resolver;
pub mod store;
pub mod tracker;

// --- Re-exports for the Public API ---

pub use crate::assembler::{ApprovalCommand, ApprovalRecord, AssemblyOutcome, OrderAssembler};
pub use crate::domain::{
    ApparelSelection, ApprovalStatus, ContributionStatus, DesignProductLink, DesignRequest,
    Order, OrderItem, OrderStatus, PaymentContribution, PaymentStatus, Product, ProductionStage,
    RequestStatus, SettlementOutcome, TeamMember, TeamRole,
};
pub use crate::error::{EngineError, EngineResult};
pub use crate::gateway::{CheckoutPreference, PaymentGateway};
pub use crate::ledger::{
    external_reference, ContributionLedger, InitiatedContribution, SettlementRecord,
    SPLIT_REFERENCE_NAMESPACE,
};
pub use crate::resolver::{ProductResolver, ResolutionStrategy, ResolvedProduct};
pub use crate::store::CommerceStore;
pub use crate::tracker::{
    production_progress, team_progress, OrderProduction, PlacementFacts, ProductionProgress,
    RosterFacts, StageState, StageView, TeamProgress,
};
