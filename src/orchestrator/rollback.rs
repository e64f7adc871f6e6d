//! Rollback Orchestrator (spec.md §4.F).
//!
//! Resolves a target release through exactly one selector, validates it,
//! and — unless this is a dry run — creates a fresh release pinned to the
//! target's version/commit and runs it through the same planner+executor
//! pipeline as a deploy.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::ProjectConfig;
use crate::domain::{Plan, Release};
use crate::error::StagecraftError;
use crate::executor;
use crate::orchestrator::bind;
use crate::planner;
use crate::providers::Registries;
use crate::store::ReleaseStore;

/// Exactly one of these selects the release being rolled back to.
pub enum RollbackTarget {
    Previous,
    ById(String),
    ByVersion(String),
}

pub struct RollbackRequest {
    pub environment: String,
    pub target: RollbackTarget,
    pub dry_run: bool,
}

pub struct RollbackOutcome {
    pub target: Release,
    pub release: Option<Release>,
    pub plan: Option<Plan>,
}

pub async fn rollback(
    store: &ReleaseStore,
    config: Arc<ProjectConfig>,
    registries: Arc<Registries>,
    request: RollbackRequest,
) -> Result<RollbackOutcome, StagecraftError> {
    let target = resolve_target(store, &request.environment, &request.target)?;
    validate_target(store, &request.environment, &target)?;

    info!(
        target_id = %target.id,
        environment = %request.environment,
        version = %target.version,
        "rollback target resolved"
    );

    if request.dry_run {
        return Ok(RollbackOutcome {
            target,
            release: None,
            plan: None,
        });
    }

    let release = store.create_release(&request.environment, &target.version, &target.commit_sha)?;

    let plan = match planner::plan(&config, &request.environment) {
        Ok(plan) => plan,
        Err(e) => {
            store.mark_all_failed(&release.id)?;
            return Err(e);
        }
    };

    let phase_fns = bind::bind(config, registries);
    executor::execute(
        store,
        &release.id,
        Arc::new(plan.clone()),
        &phase_fns,
        CancellationToken::new(),
    )
    .await?;

    let release = store.get_release(&release.id)?;
    Ok(RollbackOutcome {
        target,
        release: Some(release),
        plan: Some(plan),
    })
}

fn resolve_target(
    store: &ReleaseStore,
    env: &str,
    selector: &RollbackTarget,
) -> Result<Release, StagecraftError> {
    match selector {
        RollbackTarget::Previous => {
            let current = store
                .get_current_release(env)
                .map_err(|e| StagecraftError::target_invalid(format!("no current release to roll back from: {e}")))?;
            if current.previous_id.is_empty() {
                return Err(StagecraftError::target_invalid(
                    "current release has no previous release recorded",
                ));
            }
            store
                .get_release(&current.previous_id)
                .map_err(|e| StagecraftError::target_invalid(format!("previous release not found: {e}")))
        }
        RollbackTarget::ById(id) => {
            let target = store
                .get_release(id)
                .map_err(|e| StagecraftError::target_invalid(format!("release '{id}' not found: {e}")))?;
            if target.environment != env {
                return Err(StagecraftError::target_invalid(format!(
                    "release '{id}' belongs to environment '{}', not '{env}'",
                    target.environment
                )));
            }
            Ok(target)
        }
        RollbackTarget::ByVersion(version) => store
            .list_releases(env)?
            .into_iter()
            .find(|r| &r.version == version)
            .ok_or_else(|| {
                StagecraftError::target_invalid(format!(
                    "no release with version '{version}' found in environment '{env}'"
                ))
            }),
    }
}

fn validate_target(store: &ReleaseStore, env: &str, target: &Release) -> Result<(), StagecraftError> {
    if !target.phases.all_completed() {
        return Err(StagecraftError::target_invalid(format!(
            "release '{}' did not complete every phase and cannot be rolled back to",
            target.id
        )));
    }

    if let Ok(current) = store.get_current_release(env) {
        if current.id == target.id {
            return Err(StagecraftError::target_invalid(format!(
                "release '{}' is already the current release for '{env}'",
                target.id
            )));
        }
    }

    Ok(())
}
