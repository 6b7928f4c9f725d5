//! Invoicing domain module (FX normalization and the SAP audit payload).
//!
//! This crate turns per-item human decisions plus raw intake items into an
//! auditable, EUR-normalized invoice payload for the external accounting
//! system. Pure domain logic: the builder performs no IO and is invoked
//! synchronously with in-memory slices.

pub mod fx;
pub mod intake;
pub mod payload;
pub mod sap_link;

pub use fx::{resolve, FxResolution, EUR};
pub use intake::{Decision, IntakeItem, IntakeItemId, IntakeItemKind, ItemDecision};
pub use payload::{
    attachment_count, build, fx_summary, FxSummary, PayloadLine, SapInvoicePayload,
};
pub use sap_link::{build_deep_link, REF_PLACEHOLDER, SAP_LINK_TEMPLATE_KEY};
