//! Per-environment host topology.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An environment maps role names to the hosts that fulfil that role.
///
/// A role with no entry (or an empty host list) has no deploy operation
/// emitted for it by the planner (spec.md §4.C step 4).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    #[serde(default)]
    pub roles: BTreeMap<String, Vec<String>>,
}

impl EnvironmentConfig {
    pub fn hosts_for_role(&self, role: &str) -> &[String] {
        self.roles.get(role).map(|v| v.as_slice()).unwrap_or(&[])
    }
}
