//! Planner output types: `Operation` and `Plan`.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Kind of work an operation performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Build,
    Push,
    Migrate,
    Deploy,
    HealthCheck,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Build => "build",
            OperationKind::Push => "push",
            OperationKind::Migrate => "migrate",
            OperationKind::Deploy => "deploy",
            OperationKind::HealthCheck => "health_check",
        }
    }
}

/// A single typed unit of work within a `Plan`.
///
/// Operations are uniquely identifiable by `id` within a `Plan`; `id` is a
/// stable, deterministic string (not a random identifier) so that two
/// `Plan` calls on identical input produce identical operation IDs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub id: String,
    pub kind: OperationKind,
    pub services: BTreeSet<String>,
    pub hosts: BTreeSet<String>,
    pub description: String,
    pub depends_on: Vec<String>,
    pub metadata: BTreeMap<String, String>,
}

impl Operation {
    pub fn new(id: impl Into<String>, kind: OperationKind, description: impl Into<String>) -> Self {
        Operation {
            id: id.into(),
            kind,
            services: BTreeSet::new(),
            hosts: BTreeSet::new(),
            description: description.into(),
            depends_on: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.services.insert(service.into());
        self
    }

    pub fn with_services(mut self, services: impl IntoIterator<Item = String>) -> Self {
        self.services.extend(services);
        self
    }

    pub fn with_hosts(mut self, hosts: impl IntoIterator<Item = String>) -> Self {
        self.hosts.extend(hosts);
        self
    }

    pub fn depending_on(mut self, deps: impl IntoIterator<Item = String>) -> Self {
        self.depends_on.extend(deps);
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A pure, topologically-ordered list of operations produced from
/// configuration + an environment name. Plans are values: planning performs
/// no I/O and Plans are never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub environment: String,
    pub operations: Vec<Operation>,
    pub metadata: BTreeMap<String, String>,
}

impl Plan {
    pub fn new(environment: impl Into<String>) -> Self {
        Plan {
            environment: environment.into(),
            operations: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn operations_of_kind(&self, kind: OperationKind) -> impl Iterator<Item = &Operation> {
        self.operations.iter().filter(move |op| op.kind == kind)
    }

    pub fn find(&self, id: &str) -> Option<&Operation> {
        self.operations.iter().find(|op| op.id == id)
    }
}
