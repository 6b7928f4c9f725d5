//! Payment request workflow service.
//!
//! Owns the certificate gate, the two-phase request-payment flow (with a
//! compensating write on partial failure), and the atomic settlement that
//! couples payment completion to the linked liquidation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info};

use corrpay_core::{CertificateId, DomainError, LiquidationId, OperatorId, PaymentRequestId};
use corrpay_liquidations::{Liquidation, LiquidationAction, LiquidationStatus};
use corrpay_payments::{PaymentRequest, PaymentRequestAction};
use corrpay_store::{RecordStore, RequestUpdate};

use crate::error::EngineResult;

pub struct PaymentService {
    store: Arc<dyn RecordStore>,
}

impl PaymentService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub fn get(&self, id: PaymentRequestId) -> EngineResult<PaymentRequest> {
        Ok(self.store.get_payment_request(id)?)
    }

    /// Request payment of an approved liquidation.
    ///
    /// Precondition ("certificate gate"): the owning correspondent has zero
    /// expired certificates; violations fail with `CertificateGateBlocked`
    /// naming the offending certificates.
    ///
    /// Two phases: CAS the liquidation approved → payment_requested, then
    /// insert the pending request. If the insert fails, the liquidation CAS
    /// is compensated back to approved.
    pub fn request_payment(
        &self,
        request_id: PaymentRequestId,
        liquidation_id: LiquidationId,
        now: DateTime<Utc>,
    ) -> EngineResult<PaymentRequest> {
        let liquidation = self.store.get_liquidation(liquidation_id)?;
        // Verify legality before touching anything.
        LiquidationAction::RequestPayment.apply(liquidation.status())?;
        self.check_certificate_gate(&liquidation)?;

        self.store.update_liquidation_status(
            liquidation_id,
            LiquidationStatus::Approved,
            LiquidationStatus::PaymentRequested,
        )?;

        let request = PaymentRequest::open(request_id, liquidation_id, now);
        if let Err(insert_err) = self.store.insert_payment_request(request.clone()) {
            // Compensating action: put the liquidation back so payment can
            // be requested again.
            if let Err(comp_err) = self.store.update_liquidation_status(
                liquidation_id,
                LiquidationStatus::PaymentRequested,
                LiquidationStatus::Approved,
            ) {
                error!(
                    liquidation_id = %liquidation_id,
                    error = %comp_err,
                    "compensation failed after payment request insert error"
                );
            }
            return Err(insert_err.into());
        }

        info!(
            payment_request_id = %request_id,
            liquidation_id = %liquidation_id,
            "payment requested"
        );
        Ok(request)
    }

    /// pending → in_progress, marking `operator` as the single owner.
    ///
    /// Two operators racing to start the same pending request resolve at the
    /// conditioned write: exactly one wins, the other gets a Conflict.
    pub fn start(
        &self,
        request_id: PaymentRequestId,
        operator: OperatorId,
    ) -> EngineResult<PaymentRequest> {
        let current = self.store.get_payment_request(request_id)?;
        let next = PaymentRequestAction::Start.apply(current.status())?;
        let updated = self.store.update_payment_request(
            request_id,
            current.status(),
            next,
            RequestUpdate::processor(operator),
        )?;
        info!(payment_request_id = %request_id, operator = %operator, "payment processing started");
        Ok(updated)
    }

    /// in_progress → paid, atomically marking the linked liquidation paid.
    ///
    /// Requires a non-empty processor note carrying the settlement
    /// reference; fails with `MissingReference` otherwise. Both records move
    /// or neither does.
    pub fn complete(
        &self,
        request_id: PaymentRequestId,
        note: Option<&str>,
    ) -> EngineResult<(PaymentRequest, Liquidation)> {
        let reference = PaymentRequest::require_reference(note)?;

        let current = self.store.get_payment_request(request_id)?;
        PaymentRequestAction::Complete.apply(current.status())?;

        let (request, liquidation) = self.store.settle_payment(request_id, reference)?;
        info!(
            payment_request_id = %request_id,
            liquidation_id = %liquidation.id_typed(),
            reference,
            "payment settled"
        );
        Ok((request, liquidation))
    }

    /// pending | in_progress → rejected, atomically returning the linked
    /// liquidation to approved so payment can be re-requested. Both records
    /// move or neither does; a half-rejected pair would strand the
    /// liquidation in payment_requested with no live request.
    pub fn reject(&self, request_id: PaymentRequestId) -> EngineResult<PaymentRequest> {
        let current = self.store.get_payment_request(request_id)?;
        PaymentRequestAction::Reject.apply(current.status())?;

        let (updated, liquidation) = self.store.reject_payment(request_id)?;
        info!(
            payment_request_id = %request_id,
            liquidation_id = %liquidation.id_typed(),
            "payment request rejected"
        );
        Ok(updated)
    }

    fn check_certificate_gate(&self, liquidation: &Liquidation) -> EngineResult<()> {
        let certificates = self
            .store
            .certificates_for_correspondent(liquidation.correspondent_id())?;
        let blocking: Vec<CertificateId> = certificates
            .iter()
            .filter(|c| c.is_expired())
            .map(|c| c.id_typed())
            .collect();
        if blocking.is_empty() {
            Ok(())
        } else {
            Err(DomainError::gate_blocked(blocking).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use rust_decimal_macros::dec;

    use corrpay_compliance::Certificate;
    use corrpay_core::CorrespondentId;
    use corrpay_payments::PaymentRequestStatus;
    use corrpay_store::{InMemoryRecordStore, StoreError};

    use crate::error::EngineError;
    use crate::liquidation_service::LiquidationService;

    struct Fixture {
        store: Arc<InMemoryRecordStore>,
        liquidations: LiquidationService,
        payments: PaymentService,
        correspondent: CorrespondentId,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryRecordStore::new());
        Fixture {
            liquidations: LiquidationService::new(store.clone()),
            payments: PaymentService::new(store.clone()),
            store,
            correspondent: CorrespondentId::new(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    impl Fixture {
        fn approved_liquidation(&self) -> LiquidationId {
            let id = LiquidationId::new();
            self.liquidations
                .register(id, self.correspondent, dec!(1000), "USD", Utc::now())
                .unwrap();
            self.liquidations.submit(id).unwrap();
            self.liquidations.approve(id).unwrap();
            id
        }

        fn add_certificate(&self, expiry: NaiveDate) -> CertificateId {
            let id = CertificateId::new();
            self.store
                .insert_certificate(Certificate::register(
                    id,
                    self.correspondent,
                    "ES",
                    expiry,
                    today(),
                ))
                .unwrap();
            id
        }

        fn requested(&self) -> (PaymentRequestId, LiquidationId) {
            let liq = self.approved_liquidation();
            let req = PaymentRequestId::new();
            self.payments.request_payment(req, liq, Utc::now()).unwrap();
            (req, liq)
        }
    }

    #[test]
    fn request_payment_moves_liquidation_and_opens_pending_request() {
        let fx = fixture();
        fx.add_certificate(today() + Duration::days(365));
        let liq = fx.approved_liquidation();

        let req_id = PaymentRequestId::new();
        let request = fx.payments.request_payment(req_id, liq, Utc::now()).unwrap();
        assert_eq!(request.status(), PaymentRequestStatus::Pending);
        assert_eq!(request.liquidation_id(), liq);
        assert_eq!(
            fx.liquidations.get(liq).unwrap().status(),
            LiquidationStatus::PaymentRequested
        );
    }

    #[test]
    fn expired_certificate_blocks_payment_request() {
        let fx = fixture();
        fx.add_certificate(today() + Duration::days(365));
        let expired = fx.add_certificate(today() - Duration::days(10));
        let liq = fx.approved_liquidation();

        let err = fx
            .payments
            .request_payment(PaymentRequestId::new(), liq, Utc::now())
            .unwrap_err();
        match err {
            EngineError::Domain(DomainError::CertificateGateBlocked { certificate_ids }) => {
                assert_eq!(certificate_ids, vec![expired]);
            }
            other => panic!("expected CertificateGateBlocked, got {other:?}"),
        }

        // Gate failure leaves the liquidation untouched.
        assert_eq!(
            fx.liquidations.get(liq).unwrap().status(),
            LiquidationStatus::Approved
        );
    }

    #[test]
    fn request_payment_requires_approved_liquidation() {
        let fx = fixture();
        let id = LiquidationId::new();
        fx.liquidations
            .register(id, fx.correspondent, dec!(10), "EUR", Utc::now())
            .unwrap();

        let err = fx
            .payments
            .request_payment(PaymentRequestId::new(), id, Utc::now())
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Domain(DomainError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn complete_without_reference_fails_and_leaves_status() {
        let fx = fixture();
        let (req, _liq) = fx.requested();
        fx.payments.start(req, OperatorId::new()).unwrap();

        for note in [None, Some(""), Some("  ")] {
            let err = fx.payments.complete(req, note).unwrap_err();
            assert!(matches!(
                err,
                EngineError::Domain(DomainError::MissingReference)
            ));
        }
        assert_eq!(
            fx.payments.get(req).unwrap().status(),
            PaymentRequestStatus::InProgress
        );
    }

    #[test]
    fn complete_settles_request_and_liquidation_together() {
        let fx = fixture();
        let (req, liq) = fx.requested();
        fx.payments.start(req, OperatorId::new()).unwrap();

        let (request, liquidation) = fx.payments.complete(req, Some("SEPA-2026-0042")).unwrap();
        assert_eq!(request.status(), PaymentRequestStatus::Paid);
        assert_eq!(request.notes(), Some("SEPA-2026-0042"));
        assert_eq!(liquidation.status(), LiquidationStatus::Paid);
        assert_eq!(
            fx.liquidations.get(liq).unwrap().status(),
            LiquidationStatus::Paid
        );
    }

    #[test]
    fn reject_returns_liquidation_to_approved_for_re_request() {
        let fx = fixture();
        let (req, liq) = fx.requested();
        fx.payments.start(req, OperatorId::new()).unwrap();

        let rejected = fx.payments.reject(req).unwrap();
        assert_eq!(rejected.status(), PaymentRequestStatus::Rejected);
        assert_eq!(
            fx.liquidations.get(liq).unwrap().status(),
            LiquidationStatus::Approved
        );

        // Payment can be requested again with a fresh request record.
        let again = PaymentRequestId::new();
        assert!(fx.payments.request_payment(again, liq, Utc::now()).is_ok());
    }

    #[test]
    fn reject_never_lands_half_when_liquidation_already_moved() {
        let fx = fixture();
        let (req, liq) = fx.requested();

        // The liquidation was concurrently returned to approved: rejecting
        // now must fail whole, not leave a terminal request behind.
        fx.store
            .update_liquidation_status(
                liq,
                LiquidationStatus::PaymentRequested,
                LiquidationStatus::Approved,
            )
            .unwrap();

        let err = fx.payments.reject(req).unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(
            fx.payments.get(req).unwrap().status(),
            PaymentRequestStatus::Pending
        );
        assert_eq!(
            fx.liquidations.get(liq).unwrap().status(),
            LiquidationStatus::Approved
        );
    }

    #[test]
    fn start_from_terminal_status_is_invalid_transition() {
        let fx = fixture();
        let (req, _) = fx.requested();
        fx.payments.start(req, OperatorId::new()).unwrap();
        fx.payments.complete(req, Some("REF")).unwrap();

        let err = fx.payments.start(req, OperatorId::new()).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Domain(DomainError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn duplicate_request_id_compensates_liquidation() {
        let fx = fixture();
        let (existing_req, _) = fx.requested();

        // Re-use the existing request id against a second liquidation: the
        // insert collides and the liquidation is compensated back.
        let liq2 = fx.approved_liquidation();
        let err = fx
            .payments
            .request_payment(existing_req, liq2, Utc::now())
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Store(StoreError::AlreadyExists(_))
        ));
        assert_eq!(
            fx.liquidations.get(liq2).unwrap().status(),
            LiquidationStatus::Approved
        );
    }
}
