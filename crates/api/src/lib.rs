//! HTTP surface over the settlement engine.
//!
//! Thin layer: routes parse input, call the engine services, and map errors
//! to status codes. Authentication/session handling is deliberately absent
//! (handled upstream of this service).

pub mod app;
pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;
