//! SAP invoice payload builder.
//!
//! Joins per-item decisions to raw intake items, resolves every retained
//! line to EUR, flags attachment eligibility, and aggregates the FX summary.
//! The payload is ephemeral output for the accounting integration; it is
//! not persisted here.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::fx;
use crate::intake::{Decision, IntakeItem, IntakeItemId, IntakeItemKind, ItemDecision};

/// One included line of the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadLine {
    pub item_id: IntakeItemId,
    pub kind: IntakeItemKind,
    pub decision: Decision,
    pub currency: String,
    /// Amount in the source currency.
    pub amount: Decimal,
    pub exchange_rate_to_eur: Option<Decimal>,
    /// Resolved EUR amount; `None` when the line is unresolved (missing
    /// exchange rate). Unresolved lines contribute zero to the total.
    pub amount_eur: Option<Decimal>,
    /// Attachment eligibility: emit + attach_fee + captured file.
    pub attachment: bool,
    pub invoice_number: Option<String>,
    pub nrc_number: Option<String>,
}

impl PayloadLine {
    pub fn is_resolved(&self) -> bool {
        self.amount_eur.is_some()
    }
}

/// Aggregate FX summary over the payload lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FxSummary {
    pub total_amount_eur: Decimal,
    pub missing_rates_count: u32,
}

/// Auditable payload for the external accounting system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SapInvoicePayload {
    pub generated_at: DateTime<Utc>,
    /// Ordered as the decisions were given (discards and unknown-item
    /// decisions removed).
    pub lines: Vec<PayloadLine>,
}

/// Build the payload from decisions and intake items.
///
/// - Decisions referencing unknown items are dropped silently.
/// - Discarded pairs are excluded from all downstream computation,
///   including the missing-rate count.
/// - A line whose rate cannot be resolved is retained, flagged unresolved;
///   the build never aborts over a single missing rate.
/// - The cached `amount_eur` on intake items is ignored; EUR amounts are
///   always recomputed.
pub fn build(
    decisions: &[ItemDecision],
    items: &[IntakeItem],
    generated_at: DateTime<Utc>,
) -> SapInvoicePayload {
    let mut lines = Vec::with_capacity(decisions.len());

    for decision in decisions {
        let Some(item) = items.iter().find(|i| i.id == decision.intake_item_id) else {
            continue;
        };
        if decision.decision == Decision::Discard {
            continue;
        }

        let (rate, amount_eur) =
            match fx::resolve(&item.currency, item.amount, item.exchange_rate_to_eur) {
                Ok(r) => (Some(r.exchange_rate_to_eur), Some(r.amount_eur)),
                Err(_) => (item.exchange_rate_to_eur, None),
            };

        let attachment =
            decision.decision == Decision::Emit && decision.attach_fee && item.has_file();

        lines.push(PayloadLine {
            item_id: item.id.clone(),
            kind: item.kind,
            decision: decision.decision,
            currency: item.currency.clone(),
            amount: item.amount,
            exchange_rate_to_eur: rate,
            amount_eur,
            attachment,
            invoice_number: item.invoice_number.clone(),
            nrc_number: item.nrc_number.clone(),
        });
    }

    SapInvoicePayload {
        generated_at,
        lines,
    }
}

/// Count of attachment-eligible lines. Pure function of the payload.
pub fn attachment_count(payload: &SapInvoicePayload) -> usize {
    payload.lines.iter().filter(|l| l.attachment).count()
}

/// FX aggregate over the payload lines. Pure function of the payload.
pub fn fx_summary(payload: &SapInvoicePayload) -> FxSummary {
    let mut total = Decimal::ZERO;
    let mut missing = 0u32;
    for line in &payload.lines {
        match line.amount_eur {
            Some(amount) => total += amount,
            None => missing += 1,
        }
    }
    FxSummary {
        total_amount_eur: total,
        missing_rates_count: missing,
    }
}
