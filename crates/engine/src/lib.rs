//! Workflow engine: the services driving settlement transitions through the
//! record store.
//!
//! Domain crates decide what is legal; this crate makes it happen with
//! conditioned writes (optimistic concurrency), the certificate gate, the
//! two-phase request-payment flow with compensation, and the periodic
//! certificate refresh job.

pub mod error;
pub mod liquidation_service;
pub mod payment_service;
pub mod refresh_job;

pub use error::{EngineError, EngineResult};
pub use liquidation_service::LiquidationService;
pub use payment_service::PaymentService;
pub use refresh_job::{CertificateRefreshJob, RefreshSummary};
