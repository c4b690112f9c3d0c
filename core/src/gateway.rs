use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Order;
use crate::error::EngineResult;

/// Checkout preference returned by the payment processor.
#[derive(Debug, Clone)]
pub struct CheckoutPreference {
    pub preference_id: String,
    pub init_point: String,
    pub sandbox_init_point: String,
}

/// Payment processor collaborator.
///
/// Calls are fire-and-forget from the engine's perspective: the contribution
/// stays `pending` until the processor's asynchronous settlement callback
/// arrives, possibly delayed or duplicated. No engine component blocks
/// waiting for payment.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_preference(
        &self,
        order: &Order,
        user_id: Uuid,
        amount: i64,
        external_reference: &str,
    ) -> EngineResult<CheckoutPreference>;
}
