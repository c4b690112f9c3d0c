// server/src/web/handlers/mod.rs

pub mod approval_handlers;
pub mod payment_handlers;
pub mod progress_handlers;
pub mod webhook_handlers;
