//! Liquidations domain module (reimbursement claims).
//!
//! This crate contains the liquidation lifecycle state machine, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod liquidation;

pub use liquidation::{Liquidation, LiquidationAction, LiquidationStatus};
