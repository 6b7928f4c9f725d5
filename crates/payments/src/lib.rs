//! Payments domain module (payment request processing).
//!
//! This crate contains the payment request lifecycle state machine,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no
//! storage). The certificate gate and the atomic coupling to the linked
//! liquidation live in the engine crate, which drives these rules through
//! the record store.

pub mod request;

pub use request::{PaymentRequest, PaymentRequestAction, PaymentRequestStatus};
