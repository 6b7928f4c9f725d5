use std::collections::HashMap;
use std::sync::RwLock;

use corrpay_compliance::{Certificate, CertificateStatus};
use corrpay_core::{CertificateId, CorrespondentId, Entity, LiquidationId, PaymentRequestId};
use corrpay_liquidations::{Liquidation, LiquidationAction, LiquidationStatus};
use corrpay_payments::{PaymentRequest, PaymentRequestStatus};

use crate::record_store::{RecordStore, RequestUpdate, StoreError, StoreResult};

#[derive(Debug, Default)]
struct Records {
    certificates: HashMap<CertificateId, Certificate>,
    liquidations: HashMap<LiquidationId, Liquidation>,
    requests: HashMap<PaymentRequestId, PaymentRequest>,
}

/// In-memory record store.
///
/// One lock over all three entity maps: single-record conditioned writes
/// take it briefly, and `settle_payment` gets its two-record atomicity from
/// holding the same write guard across both mutations. Intended for tests
/// and dev; not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: RwLock<Records>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(_: impl core::fmt::Debug) -> StoreError {
    StoreError::Unavailable("lock poisoned".to_string())
}

impl RecordStore for InMemoryRecordStore {
    fn insert_certificate(&self, certificate: Certificate) -> StoreResult<()> {
        let mut records = self.records.write().map_err(poisoned)?;
        let id = *certificate.id();
        if records.certificates.contains_key(&id) {
            return Err(StoreError::AlreadyExists(id.to_string()));
        }
        records.certificates.insert(id, certificate);
        Ok(())
    }

    fn get_certificate(&self, id: CertificateId) -> StoreResult<Certificate> {
        let records = self.records.read().map_err(poisoned)?;
        records
            .certificates
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    fn list_certificates(&self) -> StoreResult<Vec<Certificate>> {
        let records = self.records.read().map_err(poisoned)?;
        let mut certificates: Vec<Certificate> = records.certificates.values().cloned().collect();
        certificates.sort_by_key(|c| (c.expiry_date(), c.id_typed().to_string()));
        Ok(certificates)
    }

    fn certificates_for_correspondent(
        &self,
        correspondent_id: CorrespondentId,
    ) -> StoreResult<Vec<Certificate>> {
        let records = self.records.read().map_err(poisoned)?;
        let mut certificates: Vec<Certificate> = records
            .certificates
            .values()
            .filter(|c| c.correspondent_id() == correspondent_id)
            .cloned()
            .collect();
        certificates.sort_by_key(|c| (c.expiry_date(), c.id_typed().to_string()));
        Ok(certificates)
    }

    fn update_certificate_status(
        &self,
        id: CertificateId,
        expected: CertificateStatus,
        new: CertificateStatus,
    ) -> StoreResult<Certificate> {
        let mut records = self.records.write().map_err(poisoned)?;
        let current = records.certificates.get(&id).ok_or(StoreError::NotFound)?;
        if current.status() != expected {
            return Err(StoreError::Concurrency(format!(
                "certificate {id}: expected status {expected}, found {}",
                current.status()
            )));
        }
        let updated = current.clone().with_status(new);
        records.certificates.insert(id, updated.clone());
        Ok(updated)
    }

    fn insert_liquidation(&self, liquidation: Liquidation) -> StoreResult<()> {
        let mut records = self.records.write().map_err(poisoned)?;
        let id = *liquidation.id();
        if records.liquidations.contains_key(&id) {
            return Err(StoreError::AlreadyExists(id.to_string()));
        }
        records.liquidations.insert(id, liquidation);
        Ok(())
    }

    fn get_liquidation(&self, id: LiquidationId) -> StoreResult<Liquidation> {
        let records = self.records.read().map_err(poisoned)?;
        records
            .liquidations
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    fn update_liquidation_status(
        &self,
        id: LiquidationId,
        expected: LiquidationStatus,
        new: LiquidationStatus,
    ) -> StoreResult<Liquidation> {
        let mut records = self.records.write().map_err(poisoned)?;
        let current = records.liquidations.get(&id).ok_or(StoreError::NotFound)?;
        if current.status() != expected {
            return Err(StoreError::Concurrency(format!(
                "liquidation {id}: expected status {expected}, found {}",
                current.status()
            )));
        }
        let updated = current.clone().with_status(new);
        records.liquidations.insert(id, updated.clone());
        Ok(updated)
    }

    fn insert_payment_request(&self, request: PaymentRequest) -> StoreResult<()> {
        let mut records = self.records.write().map_err(poisoned)?;
        let id = *request.id();
        if records.requests.contains_key(&id) {
            return Err(StoreError::AlreadyExists(id.to_string()));
        }
        records.requests.insert(id, request);
        Ok(())
    }

    fn get_payment_request(&self, id: PaymentRequestId) -> StoreResult<PaymentRequest> {
        let records = self.records.read().map_err(poisoned)?;
        records
            .requests
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    fn update_payment_request(
        &self,
        id: PaymentRequestId,
        expected: PaymentRequestStatus,
        new: PaymentRequestStatus,
        update: RequestUpdate,
    ) -> StoreResult<PaymentRequest> {
        let mut records = self.records.write().map_err(poisoned)?;
        let current = records.requests.get(&id).ok_or(StoreError::NotFound)?;
        if current.status() != expected {
            return Err(StoreError::Concurrency(format!(
                "payment request {id}: expected status {expected}, found {}",
                current.status()
            )));
        }
        let mut updated = current.clone().with_status(new);
        if let Some(processor) = update.processor {
            updated = updated.with_processor(processor);
        }
        if let Some(notes) = update.notes {
            updated = updated.with_notes(notes);
        }
        records.requests.insert(id, updated.clone());
        Ok(updated)
    }

    fn settle_payment(
        &self,
        request_id: PaymentRequestId,
        reference: &str,
    ) -> StoreResult<(PaymentRequest, Liquidation)> {
        // Single write guard across both checks and both writes: the two
        // records move together or not at all.
        let mut records = self.records.write().map_err(poisoned)?;

        let request = records
            .requests
            .get(&request_id)
            .ok_or(StoreError::NotFound)?;
        if request.status() != PaymentRequestStatus::InProgress {
            return Err(StoreError::Concurrency(format!(
                "payment request {request_id}: expected status {}, found {}",
                PaymentRequestStatus::InProgress,
                request.status()
            )));
        }

        let liquidation_id = request.liquidation_id();
        let liquidation = records
            .liquidations
            .get(&liquidation_id)
            .ok_or(StoreError::NotFound)?;
        if liquidation.status() != LiquidationStatus::PaymentRequested {
            return Err(StoreError::Concurrency(format!(
                "liquidation {liquidation_id}: expected status {}, found {}",
                LiquidationStatus::PaymentRequested,
                liquidation.status()
            )));
        }

        let settled_request = request
            .clone()
            .with_status(PaymentRequestStatus::Paid)
            .with_notes(reference);
        let settled_liquidation = liquidation
            .clone()
            .with_status(LiquidationAction::MarkPaid.apply(liquidation.status()).map_err(
                |e| StoreError::Concurrency(e.to_string()),
            )?);

        records.requests.insert(request_id, settled_request.clone());
        records
            .liquidations
            .insert(liquidation_id, settled_liquidation.clone());

        Ok((settled_request, settled_liquidation))
    }

    fn reject_payment(
        &self,
        request_id: PaymentRequestId,
    ) -> StoreResult<(PaymentRequest, Liquidation)> {
        // Same discipline as settle_payment: one write guard across both
        // checks and both writes.
        let mut records = self.records.write().map_err(poisoned)?;

        let request = records
            .requests
            .get(&request_id)
            .ok_or(StoreError::NotFound)?;
        if !matches!(
            request.status(),
            PaymentRequestStatus::Pending | PaymentRequestStatus::InProgress
        ) {
            return Err(StoreError::Concurrency(format!(
                "payment request {request_id}: expected status {} or {}, found {}",
                PaymentRequestStatus::Pending,
                PaymentRequestStatus::InProgress,
                request.status()
            )));
        }

        let liquidation_id = request.liquidation_id();
        let liquidation = records
            .liquidations
            .get(&liquidation_id)
            .ok_or(StoreError::NotFound)?;
        if liquidation.status() != LiquidationStatus::PaymentRequested {
            return Err(StoreError::Concurrency(format!(
                "liquidation {liquidation_id}: expected status {}, found {}",
                LiquidationStatus::PaymentRequested,
                liquidation.status()
            )));
        }

        let rejected_request = request.clone().with_status(PaymentRequestStatus::Rejected);
        let returned_liquidation = liquidation
            .clone()
            .with_status(LiquidationStatus::Approved);

        records.requests.insert(request_id, rejected_request.clone());
        records
            .liquidations
            .insert(liquidation_id, returned_liquidation.clone());

        Ok((rejected_request, returned_liquidation))
    }
}
