//! Time-based certificate validity classifier.
//!
//! Pure, total function: maps an expiry date and a reference date to a
//! validity status. No IO, no error conditions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::certificate::CertificateStatus;

/// First alert threshold: at or under this many days remaining, a
/// certificate is considered expiring soon. Gates status derivation.
pub const FIRST_ALERT_DAYS: i64 = 90;

/// Second alert threshold. Not used for status derivation; exported for
/// notification layers that escalate inside the expiring window.
pub const SECOND_ALERT_DAYS: i64 = 30;

/// Classifier output: derived status plus the day count it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub status: CertificateStatus,
    /// Days from `today` to the expiry date; negative once expired.
    pub days_remaining: i64,
    /// Stable human-readable label for timelines and logs.
    pub label: &'static str,
}

/// Classify a certificate expiry date against a reference date.
///
/// Rules, evaluated in order:
/// - `days_remaining < 0` → expired
/// - `days_remaining <= FIRST_ALERT_DAYS` → expiring soon
/// - otherwise → valid
pub fn classify(expiry_date: NaiveDate, today: NaiveDate) -> Classification {
    let days_remaining = (expiry_date - today).num_days();

    let (status, label) = if days_remaining < 0 {
        (CertificateStatus::Expired, "expired")
    } else if days_remaining <= FIRST_ALERT_DAYS {
        (CertificateStatus::ExpiringSoon, "expiring soon")
    } else {
        (CertificateStatus::Valid, "valid")
    };

    Classification {
        status,
        days_remaining,
        label,
    }
}
