//! Shared option/result types for the provider contracts (spec.md §4.B).
//!
//! These mirror the spec's `DevOptions`/`BuildOptions`/`InfraPlan`/
//! `PlanOptions`/`RunOptions` — opaque-ish value types that carry a
//! provider-scoped config blob (§4.B.1) plus whatever else that one
//! operation needs. The core constructs and passes these; it never reaches
//! inside the `config` blob itself.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::Operation;

/// Passed to a backend/frontend provider's `dev` method.
pub struct DevOptions {
    pub operation: Operation,
    pub config: serde_yaml::Value,
}

/// Passed to a backend/frontend provider's `build_docker` method.
pub struct BuildOptions {
    pub operation: Operation,
    pub config: serde_yaml::Value,
}

/// Returned by `CloudProvider::plan`, consumed unchanged by
/// `CloudProvider::apply` — opaque to the core, which never inspects it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InfraPlan {
    pub metadata: BTreeMap<String, String>,
}

/// Passed to `MigrationProvider::plan`.
pub struct PlanOptions {
    pub database: String,
    pub config: serde_yaml::Value,
}

/// A single migration unit, as returned by `MigrationProvider::plan` and
/// consumed by `MigrationProvider::run`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Migration {
    pub id: String,
    pub description: String,
}

/// Passed to `MigrationProvider::run`.
pub struct RunOptions {
    pub database: String,
    pub migrations: Vec<Migration>,
    pub config: serde_yaml::Value,
}
