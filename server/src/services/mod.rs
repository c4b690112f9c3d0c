// server/src/services/mod.rs

pub mod checkout_gateway;

pub use checkout_gateway::MockCheckoutGateway;
