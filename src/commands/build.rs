//! `build` command handler.
//!
//! Builds one or more services' artifacts directly, without creating a
//! release record — an Open Question in spec.md §9, resolved here: `build`
//! is an ad hoc convenience for local iteration, not part of the release
//! lifecycle, so nothing is written to the store. It still takes an
//! environment so provider config selection stays consistent with
//! `deploy`/`rollback` (spec.md §6.1: `build --env=<e> [--version=<v>]
//! [--services=<csv>] [--push] [--dry-run]`).

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::ProjectConfig;
use crate::domain::{Operation, OperationKind};
use crate::error::StagecraftError;
use crate::infra;
use crate::providers::{BuildOptions, Registries};
use crate::ui;

pub struct BuildRequest {
    pub environment: String,
    pub version: Option<String>,
    pub services: Option<Vec<String>>,
    pub push: bool,
    pub dry_run: bool,
}

pub async fn execute(config: Arc<ProjectConfig>, request: BuildRequest) -> Result<(), StagecraftError> {
    if !config.environments.contains_key(&request.environment) {
        return Err(StagecraftError::invalid_config(format!(
            "environment '{}' is not defined",
            request.environment
        )));
    }

    let wanted: Vec<String> = match &request.services {
        Some(names) => {
            for name in names {
                if !config.services.contains_key(name) {
                    return Err(StagecraftError::not_found(format!(
                        "service '{name}' is not defined"
                    )));
                }
            }
            names.clone()
        }
        None => config.services.keys().cloned().collect(),
    };

    let registries = Registries::new();
    let cancel = CancellationToken::new();

    for service in &wanted {
        let svc = &config.services[service];

        if let Some(backend) = &svc.backend {
            if backend.buildable {
                build_component(&config, &registries, &cancel, service, "backend", &request).await?;
            }
        }
        if let Some(frontend) = &svc.frontend {
            if frontend.buildable {
                build_component(&config, &registries, &cancel, service, "frontend", &request).await?;
            }
        }
    }

    Ok(())
}

async fn build_component(
    config: &ProjectConfig,
    registries: &Registries,
    cancel: &CancellationToken,
    service: &str,
    component: &str,
    request: &BuildRequest,
) -> Result<(), StagecraftError> {
    let is_frontend = component == "frontend";
    let provider_sel = if is_frontend {
        &config.providers.frontend
    } else {
        &config.providers.backend
    };
    let provider_config = provider_sel.selected_config()?;

    let mut op = Operation::new(
        format!("build:{service}/{component}"),
        OperationKind::Build,
        format!("ad hoc {component} build"),
    )
    .with_service(service.to_string());
    if let Some(version) = &request.version {
        op = op.with_meta("version", version.clone());
    }

    if request.dry_run {
        ui::print_info(&format!(
            "would build {component} for '{service}' in '{}'",
            request.environment
        ));
        return Ok(());
    }

    let opts = BuildOptions {
        operation: op,
        config: provider_config.clone(),
    };
    let tag = if is_frontend {
        registries
            .frontend
            .get(&provider_sel.provider)?
            .build_docker(cancel, &opts)
            .await?
    } else {
        registries
            .backend
            .get(&provider_sel.provider)?
            .build_docker(cancel, &opts)
            .await?
    };
    ui::print_success(&format!("built {component} for '{service}' ({tag})"));

    if request.push {
        infra::registry::push(&tag, &format!("registry/{tag}"), 3).await?;
        ui::print_success(&format!("pushed '{tag}'"));
    }

    Ok(())
}
