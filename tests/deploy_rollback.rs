//! Black-box scenarios against the release pipeline: deploy, rollback,
//! and their failure/dry-run variants, exercised through the store,
//! planner, and orchestrator the way a real caller would (spec.md §8).

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::tempdir;

use stagecraft::config::{
    BackendServiceConfig, DatabaseConfig, EnvironmentConfig, MigrationStrategy,
    MigrationStrategyConfig, ProjectConfig, ProviderSelection, ProvidersConfig, ServiceConfig,
};
use stagecraft::domain::PhaseStatus;
use stagecraft::error::StagecraftError;
use stagecraft::orchestrator::{self, DeployRequest, RollbackRequest, RollbackTarget};
use stagecraft::providers::{
    BackendProvider, BuildOptions, CloudProvider, DevOptions, FrontendProvider, InfraPlan,
    Migration, MigrationProvider, NetworkProvider, PlanOptions, Registries, RunOptions,
};
use stagecraft::store::ReleaseStore;
use tokio_util::sync::CancellationToken;

struct NoopBackend;
#[async_trait]
impl BackendProvider for NoopBackend {
    fn id(&self) -> &str {
        "noop"
    }
    async fn dev(&self, _ctx: &CancellationToken, _opts: &DevOptions) -> Result<(), StagecraftError> {
        Ok(())
    }
    async fn build_docker(&self, _ctx: &CancellationToken, _opts: &BuildOptions) -> Result<String, StagecraftError> {
        Ok("noop-backend:latest".to_string())
    }
}

struct NoopFrontend;
#[async_trait]
impl FrontendProvider for NoopFrontend {
    fn id(&self) -> &str {
        "noop"
    }
    async fn dev(&self, _ctx: &CancellationToken, _opts: &DevOptions) -> Result<(), StagecraftError> {
        Ok(())
    }
    async fn build_docker(&self, _ctx: &CancellationToken, _opts: &BuildOptions) -> Result<String, StagecraftError> {
        Ok("noop-frontend:latest".to_string())
    }
}

struct NoopCloud;
#[async_trait]
impl CloudProvider for NoopCloud {
    fn id(&self) -> &str {
        "noop"
    }
    async fn plan(&self, _ctx: &CancellationToken, _env: &str) -> Result<InfraPlan, StagecraftError> {
        Ok(InfraPlan::default())
    }
    async fn apply(&self, _ctx: &CancellationToken, _infra_plan: &InfraPlan) -> Result<(), StagecraftError> {
        Ok(())
    }
}

struct NoopMigration;
#[async_trait]
impl MigrationProvider for NoopMigration {
    fn id(&self) -> &str {
        "noop"
    }
    async fn plan(&self, _ctx: &CancellationToken, _opts: &PlanOptions) -> Result<Vec<Migration>, StagecraftError> {
        Ok(Vec::new())
    }
    async fn run(&self, _ctx: &CancellationToken, _opts: &RunOptions) -> Result<(), StagecraftError> {
        Ok(())
    }
}

struct NoopNetwork;
#[async_trait]
impl NetworkProvider for NoopNetwork {
    fn id(&self) -> &str {
        "noop"
    }
    async fn ensure_installed(
        &self,
        _ctx: &CancellationToken,
        _host: &str,
        _config: &serde_yaml::Value,
    ) -> Result<(), StagecraftError> {
        Ok(())
    }
    async fn ensure_joined(
        &self,
        _ctx: &CancellationToken,
        _host: &str,
        _tags: &[String],
        _config: &serde_yaml::Value,
    ) -> Result<(), StagecraftError> {
        Ok(())
    }
    fn node_fqdn(&self, host: &str) -> String {
        format!("{host}.noop.internal")
    }
}

struct FailingNetwork;
#[async_trait]
impl NetworkProvider for FailingNetwork {
    fn id(&self) -> &str {
        "noop"
    }
    async fn ensure_installed(
        &self,
        _ctx: &CancellationToken,
        _host: &str,
        _config: &serde_yaml::Value,
    ) -> Result<(), StagecraftError> {
        Err(StagecraftError::phase_failed("simulated rollout failure"))
    }
    async fn ensure_joined(
        &self,
        _ctx: &CancellationToken,
        _host: &str,
        _tags: &[String],
        _config: &serde_yaml::Value,
    ) -> Result<(), StagecraftError> {
        Ok(())
    }
    fn node_fqdn(&self, host: &str) -> String {
        format!("{host}.noop.internal")
    }
}

fn selection(id: &str) -> ProviderSelection {
    ProviderSelection {
        provider: id.to_string(),
        providers: BTreeMap::from([(id.to_string(), serde_yaml::Value::Null)]),
    }
}

fn registries(network_fails: bool) -> Registries {
    let mut registries = Registries::new();
    registries.backend.register("noop", Arc::new(NoopBackend)).unwrap();
    registries.frontend.register("noop", Arc::new(NoopFrontend)).unwrap();
    registries.cloud.register("noop", Arc::new(NoopCloud)).unwrap();
    registries.migration.register("noop", Arc::new(NoopMigration)).unwrap();
    if network_fails {
        registries.network.register("noop", Arc::new(FailingNetwork)).unwrap();
    } else {
        registries.network.register("noop", Arc::new(NoopNetwork)).unwrap();
    }
    registries
}

fn single_service_config() -> ProjectConfig {
    let mut environments = BTreeMap::new();
    environments.insert(
        "staging".to_string(),
        EnvironmentConfig {
            roles: BTreeMap::from([("api".to_string(), vec!["host-a".to_string()])]),
        },
    );

    let mut services = BTreeMap::new();
    services.insert(
        "api-svc".to_string(),
        ServiceConfig {
            role: "api".to_string(),
            backend: Some(BackendServiceConfig { buildable: true }),
            frontend: None,
            health_check: None,
        },
    );

    ProjectConfig {
        name: "demo".into(),
        gateway_role: "api".into(),
        environments,
        services,
        databases: BTreeMap::new(),
        providers: ProvidersConfig {
            backend: selection("noop"),
            frontend: selection("noop"),
            network: selection("noop"),
            cloud: selection("noop"),
            migration: selection("noop"),
        },
    }
}

#[tokio::test]
async fn happy_path_deploy_completes_and_becomes_current() {
    let dir = tempdir().unwrap();
    let store = ReleaseStore::open(Some(dir.path().join("releases.json")), dir.path());
    let config = Arc::new(single_service_config());

    let outcome = orchestrator::deploy(
        &store,
        config,
        Arc::new(registries(false)),
        DeployRequest {
            environment: "staging".into(),
            version: Some("v1".into()),
            dry_run: false,
        },
    )
    .await
    .unwrap();

    assert!(outcome.executed);
    assert!(outcome.release.phases.all_completed());

    let current = store.get_current_release("staging").unwrap();
    assert_eq!(current.id, outcome.release.id);
}

#[tokio::test]
async fn rollout_failure_leaves_later_phases_skipped() {
    let dir = tempdir().unwrap();
    let store = ReleaseStore::open(Some(dir.path().join("releases.json")), dir.path());
    let config = Arc::new(single_service_config());

    let err = orchestrator::deploy(
        &store,
        config,
        Arc::new(registries(true)),
        DeployRequest {
            environment: "staging".into(),
            version: Some("v1".into()),
            dry_run: false,
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, StagecraftError::PhaseFailed(_)));

    let releases = store.list_releases("staging").unwrap();
    let release = &releases[0];
    assert_eq!(release.phases.build, PhaseStatus::Completed);
    assert_eq!(release.phases.push, PhaseStatus::Completed);
    assert_eq!(release.phases.rollout, PhaseStatus::Failed);
    assert_eq!(release.phases.migrate_post, PhaseStatus::Skipped);
    assert_eq!(release.phases.finalize, PhaseStatus::Skipped);

    assert!(store.get_current_release("staging").is_err());
}

#[tokio::test]
async fn planner_failure_marks_every_phase_failed() {
    let dir = tempdir().unwrap();
    let store = ReleaseStore::open(Some(dir.path().join("releases.json")), dir.path());
    let config = Arc::new(single_service_config());

    let err = orchestrator::deploy(
        &store,
        config,
        Arc::new(registries(false)),
        DeployRequest {
            environment: "nonexistent".into(),
            version: Some("v1".into()),
            dry_run: false,
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, StagecraftError::InvalidConfig(_)));

    let releases = store.list_releases("nonexistent").unwrap();
    let release = &releases[0];
    for phase in stagecraft::domain::PHASE_ORDER {
        assert_eq!(release.phases.get(phase), PhaseStatus::Failed);
    }
}

#[tokio::test]
async fn dry_run_deploy_creates_release_but_never_executes() {
    let dir = tempdir().unwrap();
    let store = ReleaseStore::open(Some(dir.path().join("releases.json")), dir.path());
    let config = Arc::new(single_service_config());

    let outcome = orchestrator::deploy(
        &store,
        config,
        Arc::new(registries(false)),
        DeployRequest {
            environment: "staging".into(),
            version: Some("v1".into()),
            dry_run: true,
        },
    )
    .await
    .unwrap();

    assert!(!outcome.executed);
    let fetched = store.get_release(&outcome.release.id).unwrap();
    assert_eq!(fetched.phases.build, PhaseStatus::Pending);
    assert!(store.get_current_release("staging").is_err());
}

#[tokio::test]
async fn rollback_to_previous_creates_a_new_release_at_the_old_version() {
    let dir = tempdir().unwrap();
    let store = ReleaseStore::open(Some(dir.path().join("releases.json")), dir.path());
    let config = Arc::new(single_service_config());

    orchestrator::deploy(
        &store,
        config.clone(),
        Arc::new(registries(false)),
        DeployRequest {
            environment: "staging".into(),
            version: Some("v1".into()),
            dry_run: false,
        },
    )
    .await
    .unwrap();

    orchestrator::deploy(
        &store,
        config.clone(),
        Arc::new(registries(false)),
        DeployRequest {
            environment: "staging".into(),
            version: Some("v2".into()),
            dry_run: false,
        },
    )
    .await
    .unwrap();

    let outcome = orchestrator::rollback(
        &store,
        config,
        Arc::new(registries(false)),
        RollbackRequest {
            environment: "staging".into(),
            target: RollbackTarget::Previous,
            dry_run: false,
        },
    )
    .await
    .unwrap();

    assert_eq!(outcome.target.version, "v1");
    let release = outcome.release.unwrap();
    assert_eq!(release.version, "v1");
    let current = store.get_current_release("staging").unwrap();
    assert_eq!(current.id, release.id);
}

#[tokio::test]
async fn rollback_dry_run_does_not_create_a_release() {
    let dir = tempdir().unwrap();
    let store = ReleaseStore::open(Some(dir.path().join("releases.json")), dir.path());
    let config = Arc::new(single_service_config());

    orchestrator::deploy(
        &store,
        config.clone(),
        Arc::new(registries(false)),
        DeployRequest {
            environment: "staging".into(),
            version: Some("v1".into()),
            dry_run: false,
        },
    )
    .await
    .unwrap();

    let before = store.list_releases("staging").unwrap().len();

    let outcome = orchestrator::rollback(
        &store,
        config,
        Arc::new(registries(false)),
        RollbackRequest {
            environment: "staging".into(),
            target: RollbackTarget::ByVersion("v1".into()),
            dry_run: true,
        },
    )
    .await
    .unwrap();

    assert!(outcome.release.is_none());
    let after = store.list_releases("staging").unwrap().len();
    assert_eq!(before, after);
}

#[tokio::test]
async fn cross_environment_listing_groups_by_environment() {
    let dir = tempdir().unwrap();
    let store = ReleaseStore::open(Some(dir.path().join("releases.json")), dir.path());
    let config = Arc::new(single_service_config());

    for env in ["staging", "prod"] {
        let mut cfg = (*config).clone();
        cfg.environments.insert(
            env.to_string(),
            EnvironmentConfig {
                roles: BTreeMap::from([("api".to_string(), vec!["host-a".to_string()])]),
            },
        );
        orchestrator::deploy(
            &store,
            Arc::new(cfg),
            Arc::new(registries(false)),
            DeployRequest {
                environment: env.into(),
                version: Some("v1".into()),
                dry_run: false,
            },
        )
        .await
        .unwrap();
    }

    let all = store.list_all_releases().unwrap();
    let envs: Vec<&str> = all.iter().map(|r| r.environment.as_str()).collect();
    assert_eq!(envs, vec!["prod", "staging"]);
}

#[tokio::test]
async fn migration_provider_runs_pre_and_post_deploy_migrations() {
    let dir = tempdir().unwrap();
    let store = ReleaseStore::open(Some(dir.path().join("releases.json")), dir.path());

    let mut config = single_service_config();
    config.databases.insert(
        "primary".to_string(),
        DatabaseConfig {
            migrations: Some(MigrationStrategyConfig {
                strategy: MigrationStrategy::PostDeploy,
            }),
        },
    );

    let ran = Arc::new(AtomicBool::new(false));
    struct TrackingMigration(Arc<AtomicBool>);
    #[async_trait]
    impl MigrationProvider for TrackingMigration {
        fn id(&self) -> &str {
            "noop"
        }
        async fn plan(&self, _ctx: &CancellationToken, _opts: &PlanOptions) -> Result<Vec<Migration>, StagecraftError> {
            Ok(vec![Migration {
                id: "0001_init".to_string(),
                description: "create primary tables".to_string(),
            }])
        }
        async fn run(&self, _ctx: &CancellationToken, _opts: &RunOptions) -> Result<(), StagecraftError> {
            self.0.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    let mut regs = registries(false);
    regs.migration = stagecraft::providers::ProviderRegistry::new("migration");
    regs.migration.register("noop", Arc::new(TrackingMigration(ran.clone()))).unwrap();

    orchestrator::deploy(
        &store,
        Arc::new(config),
        Arc::new(regs),
        DeployRequest {
            environment: "staging".into(),
            version: Some("v1".into()),
            dry_run: false,
        },
    )
    .await
    .unwrap();

    assert!(ran.load(Ordering::SeqCst));
}
