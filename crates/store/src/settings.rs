//! Namespaced key-value settings.
//!
//! The deep-link builder reads its URL template from here; this core treats
//! the settings store as a simple get/set string map.

use std::collections::HashMap;
use std::sync::RwLock;

/// Externally persisted key-value configuration.
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str);
}

/// In-memory settings map for tests and the dev server.
#[derive(Debug, Default)]
pub struct InMemorySettings {
    values: RwLock<HashMap<String, String>>,
}

impl InMemorySettings {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for InMemorySettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut values) = self.values.write() {
            values.insert(key.to_string(), value.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_round_trips() {
        let settings = InMemorySettings::new();
        assert_eq!(settings.get("sap.invoice_link_template"), None);

        settings.set("sap.invoice_link_template", "https://sap/{ref}");
        assert_eq!(
            settings.get("sap.invoice_link_template").as_deref(),
            Some("https://sap/{ref}")
        );
    }
}
