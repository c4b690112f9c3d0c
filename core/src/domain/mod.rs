//! Domain entities shared by the engine and its storage/gateway adapters.

pub mod contribution;
pub mod design_request;
pub mod order;
pub mod product;
pub mod team;

pub use contribution::{ContributionStatus, PaymentContribution, SettlementOutcome};
pub use design_request::{ApparelSelection, ApprovalStatus, DesignRequest, RequestStatus};
pub use order::{Order, OrderItem, OrderStatus, PaymentStatus, ProductionStage};
pub use product::{DesignProductLink, Product};
pub use team::{TeamMember, TeamRole};
