//! Periodic certificate refresh job.
//!
//! Idempotently brings persisted certificate statuses in line with the
//! classifier's output for the current date. Invoked by an external daily
//! scheduler or on demand; safe to re-run at any frequency.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use corrpay_compliance::{classify, CertificateStatus};
use corrpay_store::{RecordStore, StoreError};

use crate::error::EngineResult;

/// Summary record emitted after each run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshSummary {
    pub date: NaiveDate,
    pub total_certificates: u64,
    pub updated_to_expired: u64,
    pub updated_to_expiring_soon: u64,
}

pub struct CertificateRefreshJob {
    store: Arc<dyn RecordStore>,
}

impl CertificateRefreshJob {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Reclassify every certificate against `today` and persist changes.
    ///
    /// Writes only when the computed status differs AND severity strictly
    /// increases (valid → expiring_soon → expired); a certificate manually
    /// reset by replacement is never downgraded back by this job. Each write
    /// is conditioned on the stored status, so a concurrent manual
    /// reclassification is never clobbered — the record is logged and
    /// skipped. A store connectivity failure aborts the whole run.
    pub fn run(&self, today: NaiveDate) -> EngineResult<RefreshSummary> {
        let certificates = self.store.list_certificates()?;

        let mut summary = RefreshSummary {
            date: today,
            total_certificates: certificates.len() as u64,
            updated_to_expired: 0,
            updated_to_expiring_soon: 0,
        };

        for certificate in &certificates {
            let stored = certificate.status();
            let computed = classify(certificate.expiry_date(), today).status;

            if computed == stored {
                continue;
            }
            if computed.severity() <= stored.severity() {
                // Forward-only: severity downgrades are an external action.
                continue;
            }

            let id = certificate.id_typed();
            match self.store.update_certificate_status(id, stored, computed) {
                Ok(_) => {
                    match computed {
                        CertificateStatus::Expired => summary.updated_to_expired += 1,
                        CertificateStatus::ExpiringSoon => summary.updated_to_expiring_soon += 1,
                        CertificateStatus::Valid => {}
                    }
                    info!(
                        certificate_id = %id,
                        from = %stored,
                        to = %computed,
                        expiry = %certificate.expiry_date(),
                        "certificate status refreshed"
                    );
                }
                Err(StoreError::Unavailable(msg)) => {
                    // Connectivity failure: abort the run.
                    return Err(StoreError::Unavailable(msg).into());
                }
                Err(e) => {
                    // Single-record failure (conflict, vanished record):
                    // log and continue with the rest of the batch.
                    warn!(certificate_id = %id, error = %e, "certificate refresh skipped");
                }
            }
        }

        info!(
            date = %summary.date,
            total = summary.total_certificates,
            to_expired = summary.updated_to_expired,
            to_expiring_soon = summary.updated_to_expiring_soon,
            "certificate refresh run complete"
        );
        Ok(summary)
    }
}
