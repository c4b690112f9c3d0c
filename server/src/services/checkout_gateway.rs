// server/src/services/checkout_gateway.rs

//! Stand-in for the external checkout processor. Produces preference ids and
//! init points shaped like the real integration so the rest of the system
//! exercises the same flow.

use async_trait::async_trait;
use tracing::{info, instrument};
use uuid::Uuid;

use teamkit_core::domain::Order;
use teamkit_core::{CheckoutPreference, EngineResult, PaymentGateway};

pub struct MockCheckoutGateway {
  base_url: String,
  sandbox_base_url: String,
}

impl MockCheckoutGateway {
  pub fn new(base_url: impl Into<String>, sandbox_base_url: impl Into<String>) -> Self {
    MockCheckoutGateway {
      base_url: base_url.into(),
      sandbox_base_url: sandbox_base_url.into(),
    }
  }
}

#[async_trait]
impl PaymentGateway for MockCheckoutGateway {
  #[instrument(skip(self, order), fields(order_id = %order.id, user_id = %user_id, amount = amount))]
  async fn create_preference(
    &self,
    order: &Order,
    user_id: Uuid,
    amount: i64,
    external_reference: &str,
  ) -> EngineResult<CheckoutPreference> {
    info!("Simulating checkout preference creation");
    tokio::time::sleep(std::time::Duration::from_millis(50)).await; // Simulate network latency

    let preference_id = format!("mock_pref_{}", Uuid::new_v4());
    Ok(CheckoutPreference {
      preference_id: preference_id.clone(),
      init_point: format!(
        "{}/checkout?pref_id={}&external_reference={}",
        self.base_url, preference_id, external_reference
      ),
      sandbox_init_point: format!(
        "{}/checkout?pref_id={}&external_reference={}",
        self.sandbox_base_url, preference_id, external_reference
      ),
    })
  }
}
