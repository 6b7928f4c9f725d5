//! Request/response shapes and boundary decoding.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use corrpay_compliance::Certificate;
use corrpay_invoicing::{FxSummary, IntakeItem, ItemDecision, SapInvoicePayload};
use corrpay_liquidations::{Liquidation, LiquidationStatus};
use corrpay_payments::PaymentRequest;

#[derive(Debug, Deserialize)]
pub struct RegisterLiquidationRequest {
    pub correspondent_id: String,
    pub amount: Decimal,
    pub currency: String,
    /// Legacy imports may carry a prior status; decoded leniently at this
    /// boundary only (see `decode_legacy_status`).
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LiquidationResponse {
    pub id: String,
    pub correspondent_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub status: LiquidationStatus,
    /// Timeline ordering index (0..4, rejection = -1); presentation aid only.
    pub step_index: i8,
    pub created_at: DateTime<Utc>,
}

impl LiquidationResponse {
    pub fn from_entity(l: &Liquidation) -> Self {
        Self {
            id: l.id_typed().to_string(),
            correspondent_id: l.correspondent_id().to_string(),
            amount: l.amount(),
            currency: l.currency().to_string(),
            status: l.status(),
            step_index: l.status().step_index(),
            created_at: l.created_at(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterCertificateRequest {
    pub country: String,
    pub expiry_date: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct CertificateResponse {
    pub id: String,
    pub correspondent_id: String,
    pub country: String,
    pub expiry_date: NaiveDate,
    pub status: corrpay_compliance::CertificateStatus,
}

impl CertificateResponse {
    pub fn from_entity(c: &Certificate) -> Self {
        Self {
            id: c.id_typed().to_string(),
            correspondent_id: c.correspondent_id().to_string(),
            country: c.country().to_string(),
            expiry_date: c.expiry_date(),
            status: c.status(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StartPaymentRequest {
    pub operator_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CompletePaymentRequest {
    /// Settlement reference (bank/transfer id).
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PaymentRequestResponse {
    pub id: String,
    pub liquidation_id: String,
    pub status: corrpay_payments::PaymentRequestStatus,
    pub processor: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Deep link into the accounting system, when a template is configured
    /// and the request carries a settlement reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sap_link: Option<String>,
}

impl PaymentRequestResponse {
    pub fn from_entity(r: &PaymentRequest, sap_link: Option<String>) -> Self {
        Self {
            id: r.id_typed().to_string(),
            liquidation_id: r.liquidation_id().to_string(),
            status: r.status(),
            processor: r.processor().map(|p| p.to_string()),
            notes: r.notes().map(str::to_string),
            created_at: r.created_at(),
            sap_link,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BuildPayloadRequest {
    pub decisions: Vec<ItemDecision>,
    pub items: Vec<IntakeItem>,
}

#[derive(Debug, Serialize)]
pub struct BuildPayloadResponse {
    pub payload: SapInvoicePayload,
    pub attachment_count: usize,
    pub fx_summary: FxSummary,
}

#[derive(Debug, Deserialize)]
pub struct SapLinkTemplateRequest {
    pub template: String,
}

/// Lenient liquidation-status decoding for legacy imports.
///
/// Unknown values fall back to draft with a warning. This path exists only
/// at the serialization boundary; the state machine itself never accepts an
/// unknown status.
pub fn decode_legacy_status(raw: &str) -> LiquidationStatus {
    raw.parse().unwrap_or_else(|_| {
        warn!(status = raw, "unknown legacy liquidation status, falling back to draft");
        LiquidationStatus::Draft
    })
}
