use thiserror::Error;

use corrpay_compliance::{Certificate, CertificateStatus};
use corrpay_core::{CertificateId, CorrespondentId, LiquidationId, OperatorId, PaymentRequestId};
use corrpay_liquidations::{Liquidation, LiquidationStatus};
use corrpay_payments::{PaymentRequest, PaymentRequestStatus};

/// Store operation result.
pub type StoreResult<T> = Result<T, StoreError>;

/// Record store operation error.
///
/// Infrastructure errors (concurrency, availability), as opposed to the
/// domain errors produced by the state machines.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The conditioned write lost a race: the record was no longer in the
    /// expected prior status. The caller re-reads and retries; the write is
    /// never silently applied.
    #[error("concurrency conflict: {0}")]
    Concurrency(String),

    /// Record not found.
    #[error("record not found")]
    NotFound,

    /// A record with this identifier already exists.
    #[error("record already exists: {0}")]
    AlreadyExists(String),

    /// The store is unreachable or corrupted; fatal to the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Fields a payment-request conditioned write may set alongside the status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestUpdate {
    pub processor: Option<OperatorId>,
    pub notes: Option<String>,
}

impl RequestUpdate {
    pub fn processor(processor: OperatorId) -> Self {
        Self {
            processor: Some(processor),
            notes: None,
        }
    }

    pub fn notes(notes: impl Into<String>) -> Self {
        Self {
            processor: None,
            notes: Some(notes.into()),
        }
    }
}

/// Transactional record store for the three settlement entities.
///
/// Every `update_*` method is a compare-and-swap: the write only lands if
/// the record is still in `expected`; otherwise `StoreError::Concurrency`.
/// `settle_payment` and `reject_payment` are the atomic multi-record writes
/// (both records move or neither does).
pub trait RecordStore: Send + Sync {
    // --- certificates ---

    fn insert_certificate(&self, certificate: Certificate) -> StoreResult<()>;

    fn get_certificate(&self, id: CertificateId) -> StoreResult<Certificate>;

    /// All certificates, ordered by expiry date ascending. The ordering has
    /// no semantic effect; it keeps refresh-job logs readable.
    fn list_certificates(&self) -> StoreResult<Vec<Certificate>>;

    fn certificates_for_correspondent(
        &self,
        correspondent_id: CorrespondentId,
    ) -> StoreResult<Vec<Certificate>>;

    fn update_certificate_status(
        &self,
        id: CertificateId,
        expected: CertificateStatus,
        new: CertificateStatus,
    ) -> StoreResult<Certificate>;

    // --- liquidations ---

    fn insert_liquidation(&self, liquidation: Liquidation) -> StoreResult<()>;

    fn get_liquidation(&self, id: LiquidationId) -> StoreResult<Liquidation>;

    fn update_liquidation_status(
        &self,
        id: LiquidationId,
        expected: LiquidationStatus,
        new: LiquidationStatus,
    ) -> StoreResult<Liquidation>;

    // --- payment requests ---

    fn insert_payment_request(&self, request: PaymentRequest) -> StoreResult<()>;

    fn get_payment_request(&self, id: PaymentRequestId) -> StoreResult<PaymentRequest>;

    fn update_payment_request(
        &self,
        id: PaymentRequestId,
        expected: PaymentRequestStatus,
        new: PaymentRequestStatus,
        update: RequestUpdate,
    ) -> StoreResult<PaymentRequest>;

    /// Atomically mark the request paid (with the settlement reference in
    /// its notes) and the linked liquidation paid. Conditioned on the
    /// request being in_progress and the liquidation payment_requested;
    /// if either condition fails, neither record changes.
    fn settle_payment(
        &self,
        request_id: PaymentRequestId,
        reference: &str,
    ) -> StoreResult<(PaymentRequest, Liquidation)>;

    /// Atomically reject the request and return the linked liquidation to
    /// approved so payment can be re-requested. Conditioned on the request
    /// being pending or in_progress and the liquidation payment_requested;
    /// if either condition fails, neither record changes.
    fn reject_payment(
        &self,
        request_id: PaymentRequestId,
    ) -> StoreResult<(PaymentRequest, Liquidation)>;
}
