//! # Project Configuration
//!
//! The project descriptor (`stagecraft.yaml`) plus the environment,
//! service, database, and provider sub-configs it carries. Loading is
//! split the way deployment configs have always been split in this
//! codebase: structural validation happens here, at load time; semantic
//! validation (does this environment exist, does this role have hosts) is
//! the planner's job.

pub mod database;
pub mod environment;
pub mod provider;
pub mod service;

pub use database::{DatabaseConfig, MigrationStrategy, MigrationStrategyConfig};
pub use environment::EnvironmentConfig;
pub use provider::{ProviderSelection, ProvidersConfig};
pub use service::{BackendServiceConfig, FrontendServiceConfig, HealthCheckConfig, ServiceConfig};

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StagecraftError;

/// The project descriptor: environments, services, databases, and provider
/// selections. Deserialized from `stagecraft.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default)]
    pub gateway_role: String,
    #[serde(default)]
    pub environments: BTreeMap<String, EnvironmentConfig>,
    #[serde(default)]
    pub services: BTreeMap<String, ServiceConfig>,
    #[serde(default)]
    pub databases: BTreeMap<String, DatabaseConfig>,
    pub providers: ProvidersConfig,
}

impl ProjectConfig {
    /// Load and structurally validate a project descriptor from a YAML file.
    pub fn load(path: &Path) -> Result<Self, StagecraftError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            StagecraftError::invalid_config(format!(
                "failed to read project descriptor {}: {e}",
                path.display()
            ))
        })?;
        let config: ProjectConfig = serde_yaml::from_str(&content).map_err(|e| {
            StagecraftError::invalid_config(format!(
                "failed to parse project descriptor {}: {e}",
                path.display()
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Structural validation: required fields present and internally
    /// consistent. Does NOT check environment/role semantics — that is the
    /// planner's responsibility (spec.md §4.C failure modes).
    pub fn validate(&self) -> Result<(), StagecraftError> {
        if self.name.is_empty() {
            return Err(StagecraftError::invalid_config("project name is required"));
        }
        if self.gateway_role.is_empty() {
            return Err(StagecraftError::invalid_config(
                "gateway_role is required",
            ));
        }
        for (svc_name, svc) in &self.services {
            if svc.role.is_empty() {
                return Err(StagecraftError::invalid_config(format!(
                    "service '{svc_name}' has no role assigned"
                )));
            }
            if svc.backend.is_none() && svc.frontend.is_none() {
                return Err(StagecraftError::invalid_config(format!(
                    "service '{svc_name}' declares neither a backend nor a frontend component"
                )));
            }
        }
        self.providers.validate()?;
        Ok(())
    }

    /// Default workspace directory name, used to resolve the release store
    /// path and the project descriptor path.
    pub fn workspace_dir_name() -> &'static str {
        ".stagecraft"
    }
}
