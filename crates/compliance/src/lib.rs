//! Compliance domain module (legal residency certificates).
//!
//! This crate contains the business rules gating payment eligibility,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no
//! storage): the certificate entity and the time-based validity classifier.

pub mod certificate;
pub mod classifier;

pub use certificate::{Certificate, CertificateStatus};
pub use classifier::{classify, Classification, FIRST_ALERT_DAYS, SECOND_ALERT_DAYS};
