//! Record store layer: the sole mutable shared resource.
//!
//! All workflow transitions are single-record conditioned writes against
//! this store (optimistic concurrency); the multi-record operations —
//! payment settlement and payment rejection — are atomic. The in-memory
//! implementation backs tests and the dev server; database adapters would
//! implement the same trait.

pub mod in_memory;
pub mod record_store;
pub mod settings;

pub use in_memory::InMemoryRecordStore;
pub use record_store::{RecordStore, RequestUpdate, StoreError, StoreResult};
pub use settings::{InMemorySettings, SettingsStore};
