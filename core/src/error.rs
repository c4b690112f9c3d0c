use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Failure taxonomy for engine operations.
///
/// Variants map one-to-one onto the error classes the HTTP surface reports:
/// the idempotency guards (`AlreadyApproved`, `DuplicateContribution`,
/// `OrderAlreadyPaid`) are success-adjacent from the caller's point of view,
/// while `Dependency` is the only class that warrants a retry.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Not found: {entity}")]
    NotFound { entity: String },

    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Design request is already approved")]
    AlreadyApproved,

    #[error("An approved contribution already exists for this user and order")]
    DuplicateContribution,

    #[error("Order is already fully paid")]
    OrderAlreadyPaid,

    #[error("Order can no longer accept new items")]
    OrderLocked,

    #[error("No sellable product available in the catalog")]
    NoProductAvailable,

    #[error("Dependency failure during {operation}. Source: {source}")]
    Dependency {
        operation: String,
        #[source]
        source: AnyhowError,
    },
}

impl EngineError {
    pub fn not_found(entity: impl Into<String>) -> Self {
        EngineError::NotFound { entity: entity.into() }
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        EngineError::Forbidden { reason: reason.into() }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        EngineError::Validation { message: message.into() }
    }

    pub fn dependency(operation: impl Into<String>, source: impl Into<AnyhowError>) -> Self {
        EngineError::Dependency {
            operation: operation.into(),
            source: source.into(),
        }
    }

    /// Stable machine-readable code carried in error payloads.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::NotFound { .. } => "not_found",
            EngineError::Forbidden { .. } => "forbidden",
            EngineError::Validation { .. } => "validation_error",
            EngineError::AlreadyApproved => "already_approved",
            EngineError::DuplicateContribution => "duplicate_contribution",
            EngineError::OrderAlreadyPaid => "order_already_paid",
            EngineError::OrderLocked => "order_locked",
            EngineError::NoProductAvailable => "no_product_available",
            EngineError::Dependency { .. } => "dependency_failure",
        }
    }
}

pub type EngineResult<T, E = EngineError> = std::result::Result<T, E>;
