use core::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use corrpay_core::{CorrespondentId, DomainError, DomainResult, Entity, LiquidationId};

/// Liquidation status lifecycle.
///
/// Closed enumeration; there is deliberately no catch-all variant. Unknown
/// inbound status strings are handled at the serialization boundary (the API
/// dto layer has a lenient legacy decoder), never inside the state machine,
/// so data corruption is not masked as a legitimate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiquidationStatus {
    Draft,
    PendingApproval,
    Approved,
    PaymentRequested,
    Paid,
    Rejected,
}

impl LiquidationStatus {
    /// Ordering index for UI timelines (0..4, rejection = -1).
    ///
    /// Carries no authority of its own; the enum is authoritative.
    pub fn step_index(self) -> i8 {
        match self {
            LiquidationStatus::Draft => 0,
            LiquidationStatus::PendingApproval => 1,
            LiquidationStatus::Approved => 2,
            LiquidationStatus::PaymentRequested => 3,
            LiquidationStatus::Paid => 4,
            LiquidationStatus::Rejected => -1,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, LiquidationStatus::Paid | LiquidationStatus::Rejected)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LiquidationStatus::Draft => "draft",
            LiquidationStatus::PendingApproval => "pending_approval",
            LiquidationStatus::Approved => "approved",
            LiquidationStatus::PaymentRequested => "payment_requested",
            LiquidationStatus::Paid => "paid",
            LiquidationStatus::Rejected => "rejected",
        }
    }
}

impl core::fmt::Display for LiquidationStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LiquidationStatus {
    type Err = DomainError;

    /// Strict decoding: unknown values are a validation error, not a
    /// fallback. See the API dto layer for the legacy-import path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(LiquidationStatus::Draft),
            "pending_approval" => Ok(LiquidationStatus::PendingApproval),
            "approved" => Ok(LiquidationStatus::Approved),
            "payment_requested" => Ok(LiquidationStatus::PaymentRequested),
            "paid" => Ok(LiquidationStatus::Paid),
            "rejected" => Ok(LiquidationStatus::Rejected),
            other => Err(DomainError::validation(format!(
                "unknown liquidation status '{other}'"
            ))),
        }
    }
}

/// Workflow actions on a liquidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiquidationAction {
    Submit,
    Approve,
    Reject,
    /// Permitted only when the certificate gate passes; the gate itself is
    /// checked by the payment service, not here.
    RequestPayment,
    /// Driven only by the payment workflow reaching paid, never directly by
    /// a user action.
    MarkPaid,
}

impl LiquidationAction {
    /// Status a successful action lands in.
    pub fn target(self) -> LiquidationStatus {
        match self {
            LiquidationAction::Submit => LiquidationStatus::PendingApproval,
            LiquidationAction::Approve => LiquidationStatus::Approved,
            LiquidationAction::Reject => LiquidationStatus::Rejected,
            LiquidationAction::RequestPayment => LiquidationStatus::PaymentRequested,
            LiquidationAction::MarkPaid => LiquidationStatus::Paid,
        }
    }

    /// Source statuses from which the action is legal.
    pub fn allowed_from(self, from: LiquidationStatus) -> bool {
        match self {
            LiquidationAction::Submit => from == LiquidationStatus::Draft,
            LiquidationAction::Approve => from == LiquidationStatus::PendingApproval,
            LiquidationAction::Reject => matches!(
                from,
                LiquidationStatus::PendingApproval | LiquidationStatus::Approved
            ),
            LiquidationAction::RequestPayment => from == LiquidationStatus::Approved,
            LiquidationAction::MarkPaid => from == LiquidationStatus::PaymentRequested,
        }
    }

    /// Compute the successor status, or fail with `InvalidTransition`
    /// identifying the current state and the attempted target.
    pub fn apply(self, from: LiquidationStatus) -> DomainResult<LiquidationStatus> {
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

/// Entity: liquidation (amount owed to a correspondent).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Liquidation {
    id: LiquidationId,
    correspondent_id: CorrespondentId,
    amount: Decimal,
    /// ISO currency code, uppercase.
    currency: String,
    status: LiquidationStatus,
    created_at: DateTime<Utc>,
}

impl Liquidation {
    /// Register a new liquidation in draft.
    pub fn register(
        id: LiquidationId,
        correspondent_id: CorrespondentId,
        amount: Decimal,
        currency: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let currency = currency.into();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(DomainError::validation(format!(
                "currency must be a 3-letter uppercase ISO code, got '{currency}'"
            )));
        }
        if amount <= Decimal::ZERO {
            return Err(DomainError::validation("amount must be positive"));
        }
        Ok(Self {
            id,
            correspondent_id,
            amount,
            currency,
            status: LiquidationStatus::Draft,
            created_at,
        })
    }

    /// Rehydrate a record read from the store (or a legacy import).
    pub fn rehydrate(
        id: LiquidationId,
        correspondent_id: CorrespondentId,
        amount: Decimal,
        currency: String,
        status: LiquidationStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            correspondent_id,
            amount,
            currency,
            status,
            created_at,
        }
    }

    pub fn id_typed(&self) -> LiquidationId {
        self.id
    }

    pub fn correspondent_id(&self) -> CorrespondentId {
        self.correspondent_id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn status(&self) -> LiquidationStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn with_status(mut self, status: LiquidationStatus) -> Self {
        self.status = status;
        self
    }
}

impl Entity for Liquidation {
    type Id = LiquidationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use LiquidationAction::*;
    use LiquidationStatus::*;

    const ALL_ACTIONS: [LiquidationAction; 5] =
        [Submit, Approve, Reject, RequestPayment, MarkPaid];

    #[test]
    fn from_draft_only_submit_is_legal() {
        for action in ALL_ACTIONS {
            let result = action.apply(Draft);
            if action == Submit {
                assert_eq!(result.unwrap(), PendingApproval);
            } else {
                let err = result.unwrap_err();
                assert!(matches!(err, DomainError::InvalidTransition { .. }), "{action:?}");
            }
        }
    }

    #[test]
    fn from_pending_approval_approve_and_reject_are_legal() {
        assert_eq!(Approve.apply(PendingApproval).unwrap(), Approved);
        assert_eq!(Reject.apply(PendingApproval).unwrap(), Rejected);
        assert!(Submit.apply(PendingApproval).is_err());
        assert!(RequestPayment.apply(PendingApproval).is_err());
        assert!(MarkPaid.apply(PendingApproval).is_err());
    }

    #[test]
    fn from_approved_reject_and_request_payment_are_legal() {
        assert_eq!(Reject.apply(Approved).unwrap(), Rejected);
        assert_eq!(RequestPayment.apply(Approved).unwrap(), PaymentRequested);
        assert!(Approve.apply(Approved).is_err());
        assert!(MarkPaid.apply(Approved).is_err());
    }

    #[test]
    fn mark_paid_only_from_payment_requested() {
        assert_eq!(MarkPaid.apply(PaymentRequested).unwrap(), Paid);
        for from in [Draft, PendingApproval, Approved, Paid, Rejected] {
            assert!(MarkPaid.apply(from).is_err(), "{from:?}");
        }
    }

    #[test]
    fn terminal_states_admit_no_action() {
        for terminal in [Paid, Rejected] {
            assert!(terminal.is_terminal());
            for action in ALL_ACTIONS {
                assert!(action.apply(terminal).is_err(), "{action:?} from {terminal:?}");
            }
        }
    }

    #[test]
    fn no_forward_skips() {
        // Each forward action advances the step index by exactly one.
        for (action, from) in [
            (Submit, Draft),
            (Approve, PendingApproval),
            (RequestPayment, Approved),
            (MarkPaid, PaymentRequested),
        ] {
            let to = action.apply(from).unwrap();
            assert_eq!(to.step_index(), from.step_index() + 1);
        }
    }

    #[test]
    fn invalid_transition_error_names_states() {
        let err = MarkPaid.apply(Draft).unwrap_err();
        assert_eq!(err.to_string(), "invalid transition: draft -> paid");
    }

    #[test]
    fn status_parsing_is_strict() {
        assert_eq!(
            "payment_requested".parse::<LiquidationStatus>().unwrap(),
            PaymentRequested
        );
        assert!("PAID".parse::<LiquidationStatus>().is_err());
        assert!("settled".parse::<LiquidationStatus>().is_err());
    }

    #[test]
    fn register_validates_amount_and_currency() {
        let now = Utc::now();
        assert!(Liquidation::register(
            LiquidationId::new(),
            CorrespondentId::new(),
            dec!(100.00),
            "USD",
            now,
        )
        .is_ok());

        assert!(matches!(
            Liquidation::register(
                LiquidationId::new(),
                CorrespondentId::new(),
                dec!(0),
                "USD",
                now,
            ),
            Err(DomainError::Validation(_))
        ));

        assert!(matches!(
            Liquidation::register(
                LiquidationId::new(),
                CorrespondentId::new(),
                dec!(10),
                "usd",
                now,
            ),
            Err(DomainError::Validation(_))
        ));
    }
}
