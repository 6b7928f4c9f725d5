//! Liquidation approval workflow service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::info;

use corrpay_core::{CorrespondentId, LiquidationId};
use corrpay_liquidations::{Liquidation, LiquidationAction, LiquidationStatus};
use corrpay_store::RecordStore;

use crate::error::EngineResult;

/// Drives the liquidation lifecycle through conditioned writes.
///
/// Exposes the user-facing actions only: `request_payment` belongs to the
/// payment service (it owns the certificate gate), and `mark_paid` is driven
/// exclusively by payment completion.
pub struct LiquidationService {
    store: Arc<dyn RecordStore>,
}

impl LiquidationService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Register a new draft liquidation.
    pub fn register(
        &self,
        id: LiquidationId,
        correspondent_id: CorrespondentId,
        amount: Decimal,
        currency: &str,
        created_at: DateTime<Utc>,
    ) -> EngineResult<Liquidation> {
        let liquidation =
            Liquidation::register(id, correspondent_id, amount, currency, created_at)?;
        self.store.insert_liquidation(liquidation.clone())?;
        info!(liquidation_id = %id, %amount, currency, "liquidation registered");
        Ok(liquidation)
    }

    /// Import a legacy record with a known prior status.
    pub fn import(&self, liquidation: Liquidation) -> EngineResult<()> {
        self.store.insert_liquidation(liquidation)?;
        Ok(())
    }

    pub fn get(&self, id: LiquidationId) -> EngineResult<Liquidation> {
        Ok(self.store.get_liquidation(id)?)
    }

    /// draft → pending_approval
    pub fn submit(&self, id: LiquidationId) -> EngineResult<Liquidation> {
        self.transition(id, LiquidationAction::Submit)
    }

    /// pending_approval → approved
    pub fn approve(&self, id: LiquidationId) -> EngineResult<Liquidation> {
        self.transition(id, LiquidationAction::Approve)
    }

    /// pending_approval | approved → rejected
    pub fn reject(&self, id: LiquidationId) -> EngineResult<Liquidation> {
        self.transition(id, LiquidationAction::Reject)
    }

    /// Compare-and-swap transition: read, verify legality, write conditioned
    /// on the record still being in the prior status. A lost race surfaces
    /// as a Conflict for the caller to retry from a fresh read.
    fn transition(
        &self,
        id: LiquidationId,
        action: LiquidationAction,
    ) -> EngineResult<Liquidation> {
        let current = self.store.get_liquidation(id)?;
        let next: LiquidationStatus = action.apply(current.status())?;
        let updated = self
            .store
            .update_liquidation_status(id, current.status(), next)?;
        info!(
            liquidation_id = %id,
            from = %current.status(),
            to = %next,
            "liquidation transition"
        );
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use corrpay_core::DomainError;
    use corrpay_store::InMemoryRecordStore;

    use crate::error::EngineError;

    fn service() -> LiquidationService {
        LiquidationService::new(Arc::new(InMemoryRecordStore::new()))
    }

    fn registered(service: &LiquidationService) -> LiquidationId {
        let id = LiquidationId::new();
        service
            .register(id, CorrespondentId::new(), dec!(250.00), "USD", Utc::now())
            .unwrap();
        id
    }

    #[test]
    fn full_approval_path() {
        let service = service();
        let id = registered(&service);

        assert_eq!(
            service.submit(id).unwrap().status(),
            LiquidationStatus::PendingApproval
        );
        assert_eq!(
            service.approve(id).unwrap().status(),
            LiquidationStatus::Approved
        );
    }

    #[test]
    fn approve_from_draft_is_invalid() {
        let service = service();
        let id = registered(&service);

        let err = service.approve(id).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Domain(DomainError::InvalidTransition { .. })
        ));
        assert_eq!(service.get(id).unwrap().status(), LiquidationStatus::Draft);
    }

    #[test]
    fn reject_is_terminal() {
        let service = service();
        let id = registered(&service);
        service.submit(id).unwrap();
        service.reject(id).unwrap();

        assert!(service.submit(id).is_err());
        assert!(service.approve(id).is_err());
        assert_eq!(
            service.get(id).unwrap().status(),
            LiquidationStatus::Rejected
        );
    }
}
