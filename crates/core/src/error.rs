//! Domain error model.

use thiserror::Error;

use crate::id::CertificateId;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic business failures (validation,
/// illegal transitions, compliance gates). Infrastructure concerns live in
/// the store layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An attempted state change is not in the allowed transition set.
    #[error("invalid transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    /// Payment-request creation blocked by one or more expired certificates.
    ///
    /// Carries the blocking certificate identifiers so the caller can direct
    /// the user to renewal.
    #[error("blocked by expired certificate(s): {}", format_ids(certificate_ids))]
    CertificateGateBlocked { certificate_ids: Vec<CertificateId> },

    /// FX resolution lacks a usable exchange rate to EUR.
    ///
    /// The message is user-facing: it names the missing-rate condition and
    /// the offending currency.
    #[error("missing exchange rate to EUR for currency {currency}")]
    MissingExchangeRate { currency: String },

    /// Payment completion attempted without a settlement reference.
    #[error("a settlement reference is required to complete the payment")]
    MissingReference,

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested record was not found (domain-level).
    #[error("not found")]
    NotFound,

    /// Optimistic-concurrency collision; the caller should re-read and retry.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_transition(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::InvalidTransition {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn gate_blocked(certificate_ids: Vec<CertificateId>) -> Self {
        Self::CertificateGateBlocked { certificate_ids }
    }

    pub fn missing_rate(currency: impl Into<String>) -> Self {
        Self::MissingExchangeRate {
            currency: currency.into(),
        }
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}

fn format_ids(ids: &[CertificateId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
