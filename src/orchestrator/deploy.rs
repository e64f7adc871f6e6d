//! Deploy Orchestrator (spec.md §4.E).
//!
//! Resolves a version, creates a release record, plans it, and — unless
//! this is a dry run — executes the plan phase by phase.

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
use crate::vcs;

pub struct DeployRequest {
    pub environment: String,
    pub version: Option<String>,
    pub dry_run: bool,
}

pub struct DeployOutcome {
    pub release: Release,
    pub plan: Plan,
    pub executed: bool,
}

pub async fn deploy(
    store: &ReleaseStore,
    config: Arc<ProjectConfig>,
    registries: Arc<Registries>,
    request: DeployRequest,
) -> Result<DeployOutcome, StagecraftError> {
    let version = match request.version {
        Some(v) if !v.is_empty() => v,
        _ => vcs::short_sha().await.unwrap_or_else(|| "unknown".to_string()),
    };
    let commit_sha = vcs::short_sha().await.unwrap_or_default();

    let release = store.create_release(&request.environment, &version, &commit_sha)?;
    info!(release_id = %release.id, environment = %request.environment, version, "deploy started");

    let plan = match planner::plan(&config, &request.environment) {
        Ok(plan) => plan,
        Err(e) => {
            store.mark_all_failed(&release.id)?;
            return Err(e);
        }
    };

    if request.dry_run {
        info!(release_id = %release.id, "dry run: plan computed, release left pending");
        return Ok(DeployOutcome {
            release,
            plan,
            executed: false,
        });
    }

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
    Ok(DeployOutcome {
        release,
        plan,
        executed: true,
    })
}
