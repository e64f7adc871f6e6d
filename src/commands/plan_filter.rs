//! `PlanOnly` filtering (spec.md §4.G): select matching operations, then
//! pull in the full transitive dependency closure of whatever matched,
//! preserving the plan's original stable order.

use std::collections::BTreeSet;

use crate::domain::Plan;

#[derive(Debug, Default, Clone)]
pub struct PlanFilter {
    pub service: Option<String>,
    pub host: Option<String>,
    /// Prefix matched against an operation's `id`, e.g. "deploy:" or
    /// "deploy:api" — covers both "every deploy" and "this role's deploy".
    pub id_prefix: Option<String>,
}

impl PlanFilter {
    pub fn is_empty(&self) -> bool {
        self.service.is_none() && self.host.is_none() && self.id_prefix.is_none()
    }

    fn matches(&self, op: &crate::domain::Operation) -> bool {
        if let Some(service) = &self.service {
            if op.services.contains(service) {
                return true;
            }
        }
        if let Some(host) = &self.host {
            if op.hosts.contains(host) {
                return true;
            }
        }
        if let Some(prefix) = &self.id_prefix {
            if op.id.starts_with(prefix.as_str()) {
                return true;
            }
        }
        false
    }
}

/// Apply `filter` to `plan`, returning only operations that match directly
/// or that a matching operation transitively depends on, in the plan's
/// original order.
pub fn filter_plan(plan: &Plan, filter: &PlanFilter) -> Plan {
    if filter.is_empty() {
        return plan.clone();
    }

    let matched: Vec<&str> = plan
        .operations
        .iter()
        .filter(|op| filter.matches(op))
        .map(|op| op.id.as_str())
        .collect();

    let mut keep: BTreeSet<String> = BTreeSet::new();
    let mut stack: Vec<String> = matched.iter().map(|s| s.to_string()).collect();
    while let Some(id) = stack.pop() {
        if !keep.insert(id.clone()) {
            continue;
        }
        if let Some(op) = plan.find(&id) {
            for dep in &op.depends_on {
                if !keep.contains(dep) {
                    stack.push(dep.clone());
                }
            }
        }
    }

    let mut filtered = plan.clone();
    filtered.operations.retain(|op| keep.contains(&op.id));
    filtered
}
