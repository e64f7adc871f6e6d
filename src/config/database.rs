//! Database migration configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub migrations: Option<MigrationStrategyConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationStrategyConfig {
    pub strategy: MigrationStrategy,
}

/// When a database's migrations run relative to rollout.
///
/// `PreDeploy` and `Manual` both emit a pre-rollout migrate operation
/// (spec.md §4.C step 3 treats them identically); `PostDeploy` emits a
/// post-rollout migrate operation (step 5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationStrategy {
    PreDeploy,
    PostDeploy,
    Manual,
}
