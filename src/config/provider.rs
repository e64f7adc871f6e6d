//! Provider configuration routing (spec.md §4.B.1).
//!
//! Configuration is provider-scoped: `backend.provider = <id>` selects a
//! provider by ID, and `backend.providers.<id>` carries that provider's
//! opaque config blob. The core only ever checks that the ID exists in the
//! registry and that the sub-object for that ID is present — it never
//! interprets the blob itself.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::StagecraftError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSelection {
    pub provider: String,
    #[serde(default)]
    pub providers: BTreeMap<String, serde_yaml::Value>,
}

impl ProviderSelection {
    /// The opaque config blob for the selected provider. Fails with
    /// `InvalidConfig` if the selected ID has no matching sub-object.
    pub fn selected_config(&self) -> Result<&serde_yaml::Value, StagecraftError> {
        self.providers.get(&self.provider).ok_or_else(|| {
            StagecraftError::invalid_config(format!(
                "no providers.{} sub-object for selected provider '{}'",
                self.provider, self.provider
            ))
        })
    }

    fn validate(&self, component: &str) -> Result<(), StagecraftError> {
        if self.provider.is_empty() {
            return Err(StagecraftError::invalid_config(format!(
                "{component}.provider is required"
            )));
        }
        self.selected_config()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    pub backend: ProviderSelection,
    pub frontend: ProviderSelection,
    pub network: ProviderSelection,
    pub cloud: ProviderSelection,
    pub migration: ProviderSelection,
}

impl ProvidersConfig {
    pub fn validate(&self) -> Result<(), StagecraftError> {
        self.backend.validate("backend")?;
        self.frontend.validate("frontend")?;
        self.network.validate("network")?;
        self.cloud.validate("cloud")?;
        self.migration.validate("migration")?;
        Ok(())
    }
}
