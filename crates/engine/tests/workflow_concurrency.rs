//! Cross-service integration tests: racing operators, job failure
//! semantics, and the full settlement path.

use std::sync::Arc;
use std::thread;

use chrono::{Duration, NaiveDate, Utc};
use rust_decimal_macros::dec;

use corrpay_compliance::{Certificate, CertificateStatus};
use corrpay_core::{CertificateId, CorrespondentId, LiquidationId, OperatorId, PaymentRequestId};
use corrpay_engine::{CertificateRefreshJob, EngineError, LiquidationService, PaymentService};
use corrpay_liquidations::LiquidationStatus;
use corrpay_payments::PaymentRequestStatus;
use corrpay_store::{
    InMemoryRecordStore, RecordStore, RequestUpdate, StoreError, StoreResult,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn pending_request(store: &Arc<InMemoryRecordStore>) -> PaymentRequestId {
    let liquidations = LiquidationService::new(store.clone());
    let payments = PaymentService::new(store.clone());

    let liq = LiquidationId::new();
    liquidations
        .register(liq, CorrespondentId::new(), dec!(500), "CHF", Utc::now())
        .unwrap();
    liquidations.submit(liq).unwrap();
    liquidations.approve(liq).unwrap();

    let req = PaymentRequestId::new();
    payments.request_payment(req, liq, Utc::now()).unwrap();
    req
}

#[test]
fn racing_starts_yield_one_winner_and_one_conflict() {
    let store = Arc::new(InMemoryRecordStore::new());
    let req = pending_request(&store);

    let mut handles = Vec::new();
    for _ in 0..2 {
        let store = store.clone();
        handles.push(thread::spawn(move || {
            let payments = PaymentService::new(store);
            payments.start(req, OperatorId::new())
        }));
    }

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let winners = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(e) if e.is_conflict()))
        .count();

    assert_eq!(winners, 1);
    assert_eq!(conflicts, 1);

    let payments = PaymentService::new(store);
    let current = payments.get(req).unwrap();
    assert_eq!(current.status(), PaymentRequestStatus::InProgress);
    assert!(current.processor().is_some());
}

#[test]
fn loser_can_retry_from_a_fresh_read_and_still_fail_legally() {
    let store = Arc::new(InMemoryRecordStore::new());
    let req = pending_request(&store);
    let payments = PaymentService::new(store);

    payments.start(req, OperatorId::new()).unwrap();

    // A retry from a fresh read now sees in_progress: the failure becomes a
    // domain-level InvalidTransition rather than a Conflict.
    let err = payments.start(req, OperatorId::new()).unwrap_err();
    assert!(matches!(err, EngineError::Domain(_)));
    assert!(!err.is_conflict());
}

#[test]
fn end_to_end_settlement_path() {
    let store = Arc::new(InMemoryRecordStore::new());
    let liquidations = LiquidationService::new(store.clone());
    let payments = PaymentService::new(store.clone());

    let correspondent = CorrespondentId::new();
    let today = date(2026, 3, 1);
    store
        .insert_certificate(Certificate::register(
            CertificateId::new(),
            correspondent,
            "PT",
            today + Duration::days(400),
            today,
        ))
        .unwrap();

    let liq = LiquidationId::new();
    liquidations
        .register(liq, correspondent, dec!(1234.56), "USD", Utc::now())
        .unwrap();
    liquidations.submit(liq).unwrap();
    liquidations.approve(liq).unwrap();

    let req = PaymentRequestId::new();
    payments.request_payment(req, liq, Utc::now()).unwrap();
    payments.start(req, OperatorId::new()).unwrap();
    let (request, liquidation) = payments.complete(req, Some("TRF-9981")).unwrap();

    assert_eq!(request.status(), PaymentRequestStatus::Paid);
    assert_eq!(liquidation.status(), LiquidationStatus::Paid);
    assert_eq!(liquidation.status().step_index(), 4);
}

/// Store wrapper that fails certificate status writes for selected records,
/// and optionally reports the whole store as unreachable.
struct FlakyStore {
    inner: InMemoryRecordStore,
    failing: Vec<CertificateId>,
    unreachable: bool,
}

impl RecordStore for FlakyStore {
    fn insert_certificate(&self, c: corrpay_compliance::Certificate) -> StoreResult<()> {
        self.inner.insert_certificate(c)
    }

    fn get_certificate(&self, id: CertificateId) -> StoreResult<corrpay_compliance::Certificate> {
        self.inner.get_certificate(id)
    }

    fn list_certificates(&self) -> StoreResult<Vec<corrpay_compliance::Certificate>> {
        if self.unreachable {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        self.inner.list_certificates()
    }

    fn certificates_for_correspondent(
        &self,
        id: CorrespondentId,
    ) -> StoreResult<Vec<corrpay_compliance::Certificate>> {
        self.inner.certificates_for_correspondent(id)
    }

    fn update_certificate_status(
        &self,
        id: CertificateId,
        expected: CertificateStatus,
        new: CertificateStatus,
    ) -> StoreResult<corrpay_compliance::Certificate> {
        if self.failing.contains(&id) {
            return Err(StoreError::Concurrency(format!(
                "certificate {id}: simulated concurrent write"
            )));
        }
        self.inner.update_certificate_status(id, expected, new)
    }

    fn insert_liquidation(&self, l: corrpay_liquidations::Liquidation) -> StoreResult<()> {
        self.inner.insert_liquidation(l)
    }

    fn get_liquidation(&self, id: LiquidationId) -> StoreResult<corrpay_liquidations::Liquidation> {
        self.inner.get_liquidation(id)
    }

    fn update_liquidation_status(
        &self,
        id: LiquidationId,
        expected: LiquidationStatus,
        new: LiquidationStatus,
    ) -> StoreResult<corrpay_liquidations::Liquidation> {
        self.inner.update_liquidation_status(id, expected, new)
    }

    fn insert_payment_request(&self, r: corrpay_payments::PaymentRequest) -> StoreResult<()> {
        self.inner.insert_payment_request(r)
    }

    fn get_payment_request(
        &self,
        id: PaymentRequestId,
    ) -> StoreResult<corrpay_payments::PaymentRequest> {
        self.inner.get_payment_request(id)
    }

    fn update_payment_request(
        &self,
        id: PaymentRequestId,
        expected: PaymentRequestStatus,
        new: PaymentRequestStatus,
        update: RequestUpdate,
    ) -> StoreResult<corrpay_payments::PaymentRequest> {
        self.inner.update_payment_request(id, expected, new, update)
    }

    fn settle_payment(
        &self,
        id: PaymentRequestId,
        reference: &str,
    ) -> StoreResult<(
        corrpay_payments::PaymentRequest,
        corrpay_liquidations::Liquidation,
    )> {
        self.inner.settle_payment(id, reference)
    }

    fn reject_payment(
        &self,
        id: PaymentRequestId,
    ) -> StoreResult<(
        corrpay_payments::PaymentRequest,
        corrpay_liquidations::Liquidation,
    )> {
        self.inner.reject_payment(id)
    }
}

#[test]
fn refresh_job_skips_failed_records_but_finishes_the_batch() {
    let inner = InMemoryRecordStore::new();
    let registered_on = date(2025, 1, 1);

    let failing = CertificateId::new();
    let healthy = CertificateId::new();
    for (id, expiry) in [(failing, date(2025, 6, 1)), (healthy, date(2025, 7, 1))] {
        inner
            .insert_certificate(Certificate::register(
                id,
                CorrespondentId::new(),
                "ES",
                expiry,
                registered_on,
            ))
            .unwrap();
    }

    let store = Arc::new(FlakyStore {
        inner,
        failing: vec![failing],
        unreachable: false,
    });

    let job = CertificateRefreshJob::new(store.clone());
    let summary = job.run(date(2026, 1, 1)).unwrap();

    // The failed record is skipped, the healthy one still lands.
    assert_eq!(summary.updated_to_expired, 1);
    assert_eq!(
        store.get_certificate(healthy).unwrap().status(),
        CertificateStatus::Expired
    );
}

#[test]
fn refresh_job_aborts_when_store_is_unreachable() {
    let store = Arc::new(FlakyStore {
        inner: InMemoryRecordStore::new(),
        failing: vec![],
        unreachable: true,
    });

    let job = CertificateRefreshJob::new(store);
    let err = job.run(date(2026, 1, 1)).unwrap_err();
    assert!(matches!(
        err,
        EngineError::Store(StoreError::Unavailable(_))
    ));
}
