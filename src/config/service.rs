//! Service configuration: which role a service is deployed under, and
//! which buildable components (backend/frontend) it carries.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Role this service is deployed as (e.g. "api", "gateway", "worker").
    pub role: String,
    #[serde(default)]
    pub backend: Option<BackendServiceConfig>,
    #[serde(default)]
    pub frontend: Option<FrontendServiceConfig>,
    #[serde(default)]
    pub health_check: Option<HealthCheckConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendServiceConfig {
    #[serde(default = "default_true")]
    pub buildable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontendServiceConfig {
    #[serde(default = "default_true")]
    pub buildable: bool,
}

fn default_true() -> bool {
    true
}

/// Post-rollout verification config. Consumed only by the planner's
/// `health_check` operation supplement (spec.md §4.C is silent on this;
/// SPEC_FULL.md §4.C adds it) — the executor never runs it directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckConfig {
    pub path: String,
    #[serde(default = "default_health_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_health_timeout_secs() -> u64 {
    30
}
