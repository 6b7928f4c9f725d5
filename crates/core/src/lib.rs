//! `corrpay-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! strongly-typed identifiers, the domain error taxonomy shared by the
//! settlement workflows, and the `Entity` trait.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CertificateId, CorrespondentId, LiquidationId, OperatorId, PaymentRequestId};
