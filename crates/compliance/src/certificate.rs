use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use corrpay_core::{CertificateId, CorrespondentId, Entity};

use crate::classifier::classify;

/// Certificate validity status.
///
/// The status is **derived**: it must always equal what the classifier
/// computes for the current date, refreshed eventually (not live) by the
/// periodic refresh job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificateStatus {
    Valid,
    ExpiringSoon,
    Expired,
}

impl CertificateStatus {
    /// Severity ordering used by the refresh job's forward-only rule:
    /// valid < expiring_soon < expired.
    pub fn severity(self) -> u8 {
        match self {
            CertificateStatus::Valid => 0,
            CertificateStatus::ExpiringSoon => 1,
            CertificateStatus::Expired => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CertificateStatus::Valid => "valid",
            CertificateStatus::ExpiringSoon => "expiring_soon",
            CertificateStatus::Expired => "expired",
        }
    }
}

impl core::fmt::Display for CertificateStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entity: legal residency/fiscal certificate gating payment eligibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    id: CertificateId,
    correspondent_id: CorrespondentId,
    country: String,
    /// Calendar date, no time component.
    expiry_date: NaiveDate,
    status: CertificateStatus,
}

impl Certificate {
    /// Register a certificate; its status is computed at creation time.
    pub fn register(
        id: CertificateId,
        correspondent_id: CorrespondentId,
        country: impl Into<String>,
        expiry_date: NaiveDate,
        today: NaiveDate,
    ) -> Self {
        let status = classify(expiry_date, today).status;
        Self {
            id,
            correspondent_id,
            country: country.into(),
            expiry_date,
            status,
        }
    }

    pub fn id_typed(&self) -> CertificateId {
        self.id
    }

    pub fn correspondent_id(&self) -> CorrespondentId {
        self.correspondent_id
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn expiry_date(&self) -> NaiveDate {
        self.expiry_date
    }

    pub fn status(&self) -> CertificateStatus {
        self.status
    }

    pub fn is_expired(&self) -> bool {
        self.status == CertificateStatus::Expired
    }

    /// Set the derived status. Only the refresh job (and record rehydration)
    /// should call this; workflow code treats the status as read-only input.
    pub fn with_status(mut self, status: CertificateStatus) -> Self {
        self.status = status;
        self
    }
}

impl Entity for Certificate {
    type Id = CertificateId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
