//! Binds the six phase callbacks the executor needs to the provider
//! registries and ambient infra helpers (spec.md §4.E step 6).
//!
//! `build` calls the backend/frontend registry's `build_docker` and records
//! the tag it returns; `push` is pure ambient exec-layer push (spec.md
//! §4.E: "push → exec-layer push") and does not consult any provider —
//! it pushes exactly the tag `build` recorded for the matching build
//! operation. `migrate_pre`/`migrate_post` bind to the migration registry's
//! `plan`/`run`. `rollout` binds to the network registry's
//! `ensure_installed`/`ensure_joined` plus the ambient compose-up helper.
//! `finalize` is a no-op: the store already flips the current-release
//! pointer as part of the same write that marks `finalize` completed.
//!
//! `health_check` operations are not bound to anything here — per
//! planner.rs, that operation is structural only and no phase in the fixed
//! six-phase pipeline consumes it.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::config::ProjectConfig;
use crate::domain::OperationKind;
use crate::error::StagecraftError;
use crate::executor::{PhaseFn, PhaseFns};
use crate::infra;
use crate::providers::{BuildOptions, PlanOptions, Registries, RunOptions};

pub fn bind(config: Arc<ProjectConfig>, registries: Arc<Registries>) -> PhaseFns {
    let built_tags: Arc<Mutex<BTreeMap<String, String>>> = Arc::new(Mutex::new(BTreeMap::new()));

    PhaseFns {
        build: build_fn(config.clone(), registries.clone(), built_tags.clone()),
        push: push_fn(built_tags),
        migrate_pre: migrate_fn(config.clone(), registries.clone(), "pre"),
        rollout: rollout_fn(config.clone(), registries.clone()),
        migrate_post: migrate_fn(config, registries, "post"),
        finalize: finalize_fn(),
    }
}

fn build_fn(
    config: Arc<ProjectConfig>,
    registries: Arc<Registries>,
    built_tags: Arc<Mutex<BTreeMap<String, String>>>,
) -> PhaseFn {
    Box::new(move |plan, cancel| {
        let config = config.clone();
        let registries = registries.clone();
        let built_tags = built_tags.clone();
        Box::pin(async move {
            for op in plan.operations_of_kind(OperationKind::Build) {
                let is_frontend = op.id.ends_with("/frontend");
                let provider_sel = if is_frontend {
                    &config.providers.frontend
                } else {
                    &config.providers.backend
                };
                let provider_config = provider_sel.selected_config()?;
                let opts = BuildOptions {
                    operation: op.clone(),
                    config: provider_config.clone(),
                };

                let tag = if is_frontend {
                    let provider = registries.frontend.get(&provider_sel.provider)?;
                    provider.build_docker(&cancel, &opts).await?
                } else {
                    let provider = registries.backend.get(&provider_sel.provider)?;
                    provider.build_docker(&cancel, &opts).await?
                };

                built_tags.lock().expect("tag map poisoned").insert(op.id.clone(), tag);
            }
            Ok(())
        })
    })
}

fn push_fn(built_tags: Arc<Mutex<BTreeMap<String, String>>>) -> PhaseFn {
    Box::new(move |plan, _cancel| {
        let built_tags = built_tags.clone();
        Box::pin(async move {
            for op in plan.operations_of_kind(OperationKind::Push) {
                let build_id = op.id.replacen("push:", "build:", 1);
                let tag = built_tags
                    .lock()
                    .expect("tag map poisoned")
                    .get(&build_id)
                    .cloned()
                    .ok_or_else(|| {
                        StagecraftError::phase_failed(format!(
                            "no image tag recorded for '{build_id}' — the build phase did not run or produced none"
                        ))
                    })?;
                infra::registry::push(&tag, &format!("registry/{tag}"), 3).await?;
            }
            Ok(())
        })
    })
}

/// Shared by `migrate_pre` and `migrate_post` — `suffix` ("pre" or "post")
/// selects which half of the plan's `migrate:<db>:<suffix>` operations this
/// phase call is responsible for.
fn migrate_fn(config: Arc<ProjectConfig>, registries: Arc<Registries>, suffix: &'static str) -> PhaseFn {
    Box::new(move |plan, cancel| {
        let config = config.clone();
        let registries = registries.clone();
        Box::pin(async move {
            let provider_config = config.providers.migration.selected_config()?;
            let provider = registries.migration.get(&config.providers.migration.provider)?;

            for op in plan.operations_of_kind(OperationKind::Migrate) {
                if !op.id.ends_with(&format!(":{suffix}")) {
                    continue;
                }
                let database = op.id.split(':').nth(1).unwrap_or_default().to_string();

                let plan_opts = PlanOptions {
                    database: database.clone(),
                    config: provider_config.clone(),
                };
                let migrations = provider.plan(&cancel, &plan_opts).await?;

                let run_opts = RunOptions {
                    database,
                    migrations,
                    config: provider_config.clone(),
                };
                provider.run(&cancel, &run_opts).await?;
            }
            Ok(())
        })
    })
}

fn rollout_fn(config: Arc<ProjectConfig>, registries: Arc<Registries>) -> PhaseFn {
    Box::new(move |plan, cancel| {
        let config = config.clone();
        let registries = registries.clone();
        Box::pin(async move {
            let provider_config = config.providers.network.selected_config()?;
            let provider = registries.network.get(&config.providers.network.provider)?;
            let tags = vec![plan.environment.clone()];

            for op in plan.operations_of_kind(OperationKind::Deploy) {
                for host in &op.hosts {
                    provider.ensure_installed(&cancel, host, provider_config).await?;
                    provider.ensure_joined(&cancel, host, &tags, provider_config).await?;
                    let fqdn = provider.node_fqdn(host);
                    infra::compose::up(&fqdn, "compose.yaml").await?;
                }
            }
            Ok(())
        })
    })
}

fn finalize_fn() -> PhaseFn {
    Box::new(|_plan, _cancel| Box::pin(async { Ok::<(), StagecraftError>(()) }))
}
