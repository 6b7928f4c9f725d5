//! Intake items and per-item inclusion decisions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// External reference of an intake item (assigned by the intake layer,
/// not a UUID — e.g. "fee-1").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntakeItemId(pub String);

impl IntakeItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for IntakeItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of intake line captured during document intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeItemKind {
    OfficialFee,
    VendorInvoice,
}

/// A fee or invoice line captured during document intake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeItem {
    pub id: IntakeItemId,
    pub kind: IntakeItemKind,
    /// ISO currency code.
    pub currency: String,
    /// Amount in the source currency.
    pub amount: Decimal,
    pub exchange_rate_to_eur: Option<Decimal>,
    /// Cached prior EUR computation. Display-only legacy data; the payload
    /// builder never reads it and always recomputes.
    pub amount_eur: Option<Decimal>,
    /// Attachment reference, when a document was captured.
    pub file_path: Option<String>,
    pub invoice_number: Option<String>,
    /// Official-fee reference number.
    pub nrc_number: Option<String>,
}

impl IntakeItem {
    pub fn has_file(&self) -> bool {
        self.file_path.as_deref().is_some_and(|p| !p.is_empty())
    }
}

/// Human routing decision for a joined intake item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Include in the SAP invoice; eligible for attachment.
    Emit,
    /// Pass through to a transfer; never an attachment.
    Transfer,
    /// Exclude from all downstream computation.
    Discard,
}

/// One decision per intake item; decisions with no matching item are
/// ignored by the builder (tolerant join).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDecision {
    pub intake_item_id: IntakeItemId,
    pub attach_fee: bool,
    pub decision: Decision,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn has_file_requires_non_empty_path() {
        let mut item = IntakeItem {
            id: IntakeItemId::new("fee-1"),
            kind: IntakeItemKind::OfficialFee,
            currency: "EUR".to_string(),
            amount: dec!(10),
            exchange_rate_to_eur: None,
            amount_eur: None,
            file_path: None,
            invoice_number: None,
            nrc_number: None,
        };
        assert!(!item.has_file());

        item.file_path = Some(String::new());
        assert!(!item.has_file());

        item.file_path = Some("docs/fee-1.pdf".to_string());
        assert!(item.has_file());
    }
}
