//! Release domain types.
//!
//! Defines a release as a state machine with six fixed phases. No I/O lives
//! here — the Store is what turns these types into bytes on disk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the six fixed steps a release moves through.
///
/// Identifiers are stable and must never be renamed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Build,
    Push,
    MigratePre,
    Rollout,
    MigratePost,
    Finalize,
}

/// Canonical phase order. Every phase-order-dependent algorithm in the
/// crate (executor, mark-all-failed, the `Phases` struct's field order)
/// derives from this constant.
pub const PHASE_ORDER: [Phase; 6] = [
    Phase::Build,
    Phase::Push,
    Phase::MigratePre,
    Phase::Rollout,
    Phase::MigratePost,
    Phase::Finalize,
];

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Build => "build",
            Phase::Push => "push",
            Phase::MigratePre => "migrate_pre",
            Phase::Rollout => "rollout",
            Phase::MigratePost => "migrate_post",
            Phase::Finalize => "finalize",
        }
    }

    /// Position of this phase in the canonical order (0-based).
    pub fn position(&self) -> usize {
        PHASE_ORDER.iter().position(|p| p == self).expect("exhaustive")
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of a single phase.
///
/// ```text
/// pending ── start ──▶ running ── success ──▶ completed
///                          └── failure ──▶ failed
/// pending ── upstream failed ──▶ skipped
/// ```
/// `completed`, `failed`, `skipped` are terminal: nothing transitions out of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Skipped,
}

impl PhaseStatus {
    /// Whether transitioning from `self` to `next` is a legal move in the
    /// per-phase state machine.
    pub fn can_transition_to(&self, next: PhaseStatus) -> bool {
        matches!(
            (self, next),
            (PhaseStatus::Pending, PhaseStatus::Running)
                | (PhaseStatus::Pending, PhaseStatus::Skipped)
                | (PhaseStatus::Running, PhaseStatus::Completed)
                | (PhaseStatus::Running, PhaseStatus::Failed)
        )
    }
}

impl fmt::Display for PhaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PhaseStatus::Pending => "pending",
            PhaseStatus::Running => "running",
            PhaseStatus::Completed => "completed",
            PhaseStatus::Failed => "failed",
            PhaseStatus::Skipped => "skipped",
        };
        write!(f, "{}", s)
    }
}

/// The six phase statuses of a release, declared in canonical order so
/// serde's struct field order is always `build, push, migrate_pre,
/// rollout, migrate_post, finalize` — the "all six keys always present"
/// invariant is enforced by the type system, not a runtime check.
/// `deny_unknown_fields` rejects a store file carrying an extra or
/// misspelled phase key with `InvalidFormat` rather than silently dropping
/// it (spec.md §3: "unknown keys are rejected on load").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Phases {
    pub build: PhaseStatus,
    pub push: PhaseStatus,
    pub migrate_pre: PhaseStatus,
    pub rollout: PhaseStatus,
    pub migrate_post: PhaseStatus,
    pub finalize: PhaseStatus,
}

impl Phases {
    pub fn all_pending() -> Self {
        Phases {
            build: PhaseStatus::Pending,
            push: PhaseStatus::Pending,
            migrate_pre: PhaseStatus::Pending,
            rollout: PhaseStatus::Pending,
            migrate_post: PhaseStatus::Pending,
            finalize: PhaseStatus::Pending,
        }
    }

    pub fn get(&self, phase: Phase) -> PhaseStatus {
        match phase {
            Phase::Build => self.build,
            Phase::Push => self.push,
            Phase::MigratePre => self.migrate_pre,
            Phase::Rollout => self.rollout,
            Phase::MigratePost => self.migrate_post,
            Phase::Finalize => self.finalize,
        }
    }

    pub fn set(&mut self, phase: Phase, status: PhaseStatus) {
        match phase {
            Phase::Build => self.build = status,
            Phase::Push => self.push = status,
            Phase::MigratePre => self.migrate_pre = status,
            Phase::Rollout => self.rollout = status,
            Phase::MigratePost => self.migrate_post = status,
            Phase::Finalize => self.finalize = status,
        }
    }

    pub fn all_completed(&self) -> bool {
        PHASE_ORDER.iter().all(|p| self.get(*p) == PhaseStatus::Completed)
    }
}

/// An immutable attempt record. Phase statuses are the only part that ever
/// changes after creation, and only the Phase Executor is allowed to change
/// them (through the Store's `update_phase` contract).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub id: String,
    pub environment: String,
    pub version: String,
    pub commit_sha: String,
    pub timestamp: DateTime<Utc>,
    pub previous_id: String,
    pub phases: Phases,
}

/// Format a release ID of the form `rel-YYYYMMDD-HHMMSSmmm`. Lexicographic
/// order of IDs produced this way equals chronological order of `ts`.
pub fn format_release_id(ts: DateTime<Utc>) -> String {
    format!(
        "rel-{}-{:02}{:02}{:02}{:03}",
        ts.format("%Y%m%d"),
        ts.format("%H").to_string().parse::<u32>().unwrap_or(0),
        ts.format("%M").to_string().parse::<u32>().unwrap_or(0),
        ts.format("%S").to_string().parse::<u32>().unwrap_or(0),
        ts.timestamp_subsec_millis(),
    )
}
