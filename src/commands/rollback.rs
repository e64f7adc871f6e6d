//! `rollback` command handler.

use std::sync::Arc;

use crate::config::ProjectConfig;
use crate::error::StagecraftError;
use crate::orchestrator::{self, RollbackRequest, RollbackTarget};
use crate::providers::Registries;
use crate::store::ReleaseStore;
use crate::ui;

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    store: &ReleaseStore,
    config: Arc<ProjectConfig>,
    environment: String,
    to_previous: bool,
    to_release: Option<String>,
    to_version: Option<String>,
    dry_run: bool,
) -> Result<(), StagecraftError> {
    let target = match (to_previous, to_release, to_version) {
        (true, None, None) => RollbackTarget::Previous,
        (false, Some(id), None) => RollbackTarget::ById(id),
        (false, None, Some(version)) => RollbackTarget::ByVersion(version),
        _ => {
            return Err(StagecraftError::invalid_argument(
                "exactly one of --to-previous, --to-release, or --to-version is required",
            ))
        }
    };

    let registries = Arc::new(Registries::new());
    let request = RollbackRequest {
        environment: environment.clone(),
        target,
        dry_run,
    };

    let outcome = orchestrator::rollback(store, config, registries, request).await?;

    match outcome.release {
        Some(release) => ui::print_success(&format!(
            "rolled back '{environment}' to release {} (version {})",
            release.id, outcome.target.version
        )),
        None => ui::print_info(&format!(
            "dry run: would roll back '{environment}' to release {} (version {})",
            outcome.target.id, outcome.target.version
        )),
    }
    Ok(())
}
