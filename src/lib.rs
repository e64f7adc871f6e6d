//! Stagecraft: a deployment orchestrator built around a fixed six-phase
//! release pipeline (build, push, migrate_pre, rollout, migrate_post,
//! finalize).
//!
//! `main.rs` is a thin wrapper around [`run`]; integration tests drive the
//! crate through this library target instead of shelling out to the
//! binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod executor;
pub mod infra;
pub mod orchestrator;
pub mod planner;
pub mod providers;
pub mod store;
pub mod ui;
pub mod vcs;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use cli::{Cli, Commands, ReleasesCommands, StatusCommands};
use commands::plan_filter::PlanFilter;
use config::ProjectConfig;
use error::StagecraftError;
use store::ReleaseStore;

fn default_config_path(workspace: &Path) -> PathBuf {
    workspace.join("stagecraft.yaml")
}

pub async fn run(cli: Cli) -> Result<(), StagecraftError> {
    let workspace = cli
        .workspace
        .clone()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let config_path = cli
        .config
        .clone()
        .map(PathBuf::from)
        .unwrap_or_else(|| default_config_path(&workspace));

    match &cli.command {
        Commands::Status { command } => {
            match command {
                StatusCommands::Roadmap => commands::status::roadmap(),
            }
            return Ok(());
        }
        Commands::Releases { command } => {
            let store = ReleaseStore::open(None, &workspace);
            match command {
                ReleasesCommands::List { environment } => {
                    return commands::releases::list(&store, environment.as_deref());
                }
                ReleasesCommands::Show { id } => {
                    return commands::releases::show(&store, id);
                }
            }
        }
        _ => {}
    }

    let config = Arc::new(ProjectConfig::load(&config_path)?);
    let store = ReleaseStore::open(None, &workspace);

    match cli.command {
        Commands::Deploy {
            environment,
            version,
            dry_run,
        } => {
            commands::deploy::execute(&store, config, environment, version, dry_run).await?;
        }
        Commands::Rollback {
            environment,
            to_previous,
            to_release,
            to_version,
            dry_run,
        } => {
            commands::rollback::execute(
                &store,
                config,
                environment,
                to_previous,
                to_release,
                to_version,
                dry_run,
            )
            .await?;
        }
        Commands::Plan {
            environment,
            service,
            host,
            phase,
        } => {
            let filter = PlanFilter {
                service,
                host,
                id_prefix: phase,
            };
            commands::plan::execute(&config, &environment, filter)?;
        }
        Commands::Build {
            environment,
            version,
            services,
            push,
            dry_run,
        } => {
            let request = commands::build::BuildRequest {
                environment,
                version,
                services: services.map(|csv| csv.split(',').map(|s| s.trim().to_string()).collect()),
                push,
                dry_run,
            };
            commands::build::execute(config, request).await?;
        }
        Commands::Releases { .. } | Commands::Status { .. } => unreachable!("handled above"),
    }

    Ok(())
}
