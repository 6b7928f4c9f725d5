use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use corrpay_core::{DomainError, DomainResult, Entity, LiquidationId, OperatorId, PaymentRequestId};

/// Payment request status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentRequestStatus {
    Pending,
    InProgress,
    Paid,
    Rejected,
}

impl PaymentRequestStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, PaymentRequestStatus::Paid | PaymentRequestStatus::Rejected)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentRequestStatus::Pending => "pending",
            PaymentRequestStatus::InProgress => "in_progress",
            PaymentRequestStatus::Paid => "paid",
            PaymentRequestStatus::Rejected => "rejected",
        }
    }
}

impl core::fmt::Display for PaymentRequestStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentRequestStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentRequestStatus::Pending),
            "in_progress" => Ok(PaymentRequestStatus::InProgress),
            "paid" => Ok(PaymentRequestStatus::Paid),
            "rejected" => Ok(PaymentRequestStatus::Rejected),
            other => Err(DomainError::validation(format!(
                "unknown payment request status '{other}'"
            ))),
        }
    }
}

/// Workflow actions on a payment request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentRequestAction {
    Start,
    Complete,
    Reject,
}

impl PaymentRequestAction {
    pub fn target(self) -> PaymentRequestStatus {
        match self {
            PaymentRequestAction::Start => PaymentRequestStatus::InProgress,
            PaymentRequestAction::Complete => PaymentRequestStatus::Paid,
            PaymentRequestAction::Reject => PaymentRequestStatus::Rejected,
        }
    }

    pub fn allowed_from(self, from: PaymentRequestStatus) -> bool {
        match self {
            PaymentRequestAction::Start => from == PaymentRequestStatus::Pending,
            PaymentRequestAction::Complete => from == PaymentRequestStatus::InProgress,
            PaymentRequestAction::Reject => matches!(
                from,
                PaymentRequestStatus::Pending | PaymentRequestStatus::InProgress
            ),
        }
    }

    /// Compute the successor status, or fail with `InvalidTransition`.
    pub fn apply(self, from: PaymentRequestStatus) -> DomainResult<PaymentRequestStatus> {
        if self.allowed_from(from) {
            Ok(self.target())
        } else {
            Err(DomainError::invalid_transition(
                from.as_str(),
                self.target().as_str(),
            ))
        }
    }
}

/// Entity: payment request tracking the financial team's processing of a
/// liquidation's payment. Exists for exactly one liquidation at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    id: PaymentRequestId,
    liquidation_id: LiquidationId,
    status: PaymentRequestStatus,
    /// Operator who took ownership via `start`.
    processor: Option<OperatorId>,
    /// Free text; carries the bank/transfer reference once paid.
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl PaymentRequest {
    /// Open a new pending request against a liquidation. The certificate
    /// gate and the approved-liquidation precondition are checked by the
    /// payment service before this record is persisted.
    pub fn open(
        id: PaymentRequestId,
        liquidation_id: LiquidationId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            liquidation_id,
            status: PaymentRequestStatus::Pending,
            processor: None,
            notes: None,
            created_at,
        }
    }

    /// Validate a settlement reference for `complete`.
    ///
    /// The processor note is treated as the settlement reference; an absent
    /// or blank note fails with `MissingReference`.
    pub fn require_reference(note: Option<&str>) -> DomainResult<&str> {
        match note {
            Some(n) if !n.trim().is_empty() => Ok(n),
            _ => Err(DomainError::MissingReference),
        }
    }

    pub fn id_typed(&self) -> PaymentRequestId {
        self.id
    }

    pub fn liquidation_id(&self) -> LiquidationId {
        self.liquidation_id
    }

    pub fn status(&self) -> PaymentRequestStatus {
        self.status
    }

    pub fn processor(&self) -> Option<OperatorId> {
        self.processor
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn with_status(mut self, status: PaymentRequestStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_processor(mut self, processor: OperatorId) -> Self {
        self.processor = Some(processor);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

impl Entity for PaymentRequest {
    type Id = PaymentRequestId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use PaymentRequestAction::*;
    use PaymentRequestStatus::*;

    #[test]
    fn start_only_from_pending() {
        assert_eq!(Start.apply(Pending).unwrap(), InProgress);
        for from in [InProgress, Paid, Rejected] {
            assert!(Start.apply(from).is_err(), "{from:?}");
        }
    }

    #[test]
    fn complete_only_from_in_progress() {
        assert_eq!(Complete.apply(InProgress).unwrap(), Paid);
        for from in [Pending, Paid, Rejected] {
            assert!(Complete.apply(from).is_err(), "{from:?}");
        }
    }

    #[test]
    fn reject_from_pending_or_in_progress() {
        assert_eq!(Reject.apply(Pending).unwrap(), Rejected);
        assert_eq!(Reject.apply(InProgress).unwrap(), Rejected);
        assert!(Reject.apply(Paid).is_err());
        assert!(Reject.apply(Rejected).is_err());
    }

    #[test]
    fn reference_must_be_non_empty() {
        assert!(matches!(
            PaymentRequest::require_reference(None),
            Err(DomainError::MissingReference)
        ));
        assert!(matches!(
            PaymentRequest::require_reference(Some("   ")),
            Err(DomainError::MissingReference)
        ));
        assert_eq!(
            PaymentRequest::require_reference(Some("SEPA-2026-0042")).unwrap(),
            "SEPA-2026-0042"
        );
    }

    #[test]
    fn open_starts_pending_without_processor() {
        let req = PaymentRequest::open(PaymentRequestId::new(), LiquidationId::new(), Utc::now());
        assert_eq!(req.status(), Pending);
        assert!(req.processor().is_none());
        assert!(req.notes().is_none());
    }
}
