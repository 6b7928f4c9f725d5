//! Engine error: domain failures plus store/transport failures.

use thiserror::Error;

use corrpay_core::DomainError;
use corrpay_store::StoreError;

pub type EngineResult<T> = Result<T, EngineError>;

/// Failure of a workflow operation.
///
/// Domain errors are deterministic business failures and are never retried
/// automatically. Store concurrency conflicts are retriable by the caller
/// from a fresh read; other store errors are fatal to the operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EngineError {
    /// An optimistic-concurrency collision the caller should retry.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            EngineError::Store(StoreError::Concurrency(_))
                | EngineError::Domain(DomainError::Conflict(_))
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            EngineError::Store(StoreError::NotFound) | EngineError::Domain(DomainError::NotFound)
        )
    }
}
