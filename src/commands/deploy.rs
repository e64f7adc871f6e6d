//! `deploy` command handler.

use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::config::ProjectConfig;
use crate::error::StagecraftError;
use crate::orchestrator::{self, DeployRequest};
use crate::providers::Registries;
use crate::store::ReleaseStore;
use crate::ui;

pub async fn execute(
    store: &ReleaseStore,
    config: Arc<ProjectConfig>,
    environment: String,
    version: Option<String>,
    dry_run: bool,
) -> Result<(), StagecraftError> {
    let registries = Arc::new(Registries::new());
    let request = DeployRequest {
        environment: environment.clone(),
        version,
        dry_run,
    };

    let spinner = (!dry_run && console::Term::stdout().is_term()).then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}").unwrap());
        pb.set_message(format!("running release pipeline for '{environment}'"));
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    });

    let outcome = orchestrator::deploy(store, config, registries, request).await;

    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }

    let outcome = outcome?;

    if outcome.executed {
        ui::print_success(&format!(
            "release {} deployed to '{environment}'",
            outcome.release.id
        ));
        for phase in crate::domain::PHASE_ORDER {
            println!("  {:<12} {}", phase.as_str(), outcome.release.phases.get(phase));
        }
    } else {
        ui::print_info(&format!(
            "dry run: release {} planned for '{environment}', {} operations, not executed",
            outcome.release.id,
            outcome.plan.operations.len()
        ));
    }
    Ok(())
}
