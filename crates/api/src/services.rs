use std::sync::Arc;

use corrpay_engine::{CertificateRefreshJob, LiquidationService, PaymentService};
use corrpay_store::{InMemoryRecordStore, InMemorySettings, RecordStore, SettingsStore};

/// Shared application services injected into every route.
pub struct AppServices {
    pub store: Arc<dyn RecordStore>,
    pub settings: Arc<dyn SettingsStore>,
    pub liquidations: LiquidationService,
    pub payments: PaymentService,
    pub refresh_job: CertificateRefreshJob,
}

impl AppServices {
    /// Wire everything against the in-memory record store (dev server).
    pub fn in_memory() -> Self {
        let store: Arc<dyn RecordStore> = Arc::new(InMemoryRecordStore::new());
        let settings: Arc<dyn SettingsStore> = Arc::new(InMemorySettings::new());
        Self {
            liquidations: LiquidationService::new(store.clone()),
            payments: PaymentService::new(store.clone()),
            refresh_job: CertificateRefreshJob::new(store.clone()),
            store,
            settings,
        }
    }
}
