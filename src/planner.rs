//! The Planner: a pure function from configuration + environment name to a
//! topologically ordered `Plan` (spec.md §4.C).
//!
//! No I/O, no randomness, no clock reads — calling `plan` twice with the
//! same configuration and environment always produces the same `Plan`
//! value, operation-for-operation and ID-for-ID.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::{MigrationStrategy, ProjectConfig};
use crate::domain::{Operation, OperationKind, Plan};
use crate::error::StagecraftError;

pub fn plan(config: &ProjectConfig, env_name: &str) -> Result<Plan, StagecraftError> {
    let env = config.environments.get(env_name).ok_or_else(|| {
        StagecraftError::invalid_config(format!("environment '{env_name}' is not defined"))
    })?;

    let any_role_has_hosts = env.roles.values().any(|hosts| !hosts.is_empty());
    if !any_role_has_hosts {
        return Err(StagecraftError::invalid_config(format!(
            "environment '{env_name}' defines no role with any hosts"
        )));
    }
    if env.hosts_for_role(&config.gateway_role).is_empty() {
        return Err(StagecraftError::invalid_config(format!(
            "gateway role '{}' has no hosts in environment '{env_name}'",
            config.gateway_role
        )));
    }

    let mut plan = Plan::new(env_name);
    let mut build_ops_by_service: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut migrate_pre_ids: Vec<String> = Vec::new();

    // Step 1: one build operation per buildable component of every service.
    for (service_name, service) in &config.services {
        let mut ids = Vec::new();
        if let Some(backend) = &service.backend {
            if backend.buildable {
                let id = format!("build:{service_name}/backend");
                plan.operations.push(
                    Operation::new(
                        id.clone(),
                        OperationKind::Build,
                        format!("build backend for '{service_name}'"),
                    )
                    .with_service(service_name.clone()),
                );
                ids.push(id);
            }
        }
        if let Some(frontend) = &service.frontend {
            if frontend.buildable {
                let id = format!("build:{service_name}/frontend");
                plan.operations.push(
                    Operation::new(
                        id.clone(),
                        OperationKind::Build,
                        format!("build frontend for '{service_name}'"),
                    )
                    .with_service(service_name.clone()),
                );
                ids.push(id);
            }
        }
        if !ids.is_empty() {
            build_ops_by_service.insert(service_name.clone(), ids);
        }
    }

    // Step 2: one push operation per build operation (spec.md §4.C step 2 —
    // every build artifact gets pushed before rollout can use it).
    let build_ids: Vec<String> = plan
        .operations_of_kind(OperationKind::Build)
        .map(|op| op.id.clone())
        .collect();
    for build_id in &build_ids {
        let service = plan
            .find(build_id)
            .and_then(|op| op.services.iter().next().cloned())
            .unwrap_or_default();
        let push_id = build_id.replacen("build:", "push:", 1);
        plan.operations.push(
            Operation::new(
                push_id,
                OperationKind::Push,
                format!("push artifact for '{build_id}'"),
            )
            .with_service(service)
            .depending_on([build_id.clone()]),
        );
    }

    // Step 3: pre-deploy (and manual) migrations run before rollout.
    for (db_name, db) in &config.databases {
        let strategy = db
            .migrations
            .as_ref()
            .map(|m| m.strategy)
            .unwrap_or(MigrationStrategy::PreDeploy);
        if matches!(strategy, MigrationStrategy::PreDeploy | MigrationStrategy::Manual) {
            let id = format!("migrate:{db_name}:pre");
            plan.operations.push(Operation::new(
                id.clone(),
                OperationKind::Migrate,
                format!("run pre-deploy migrations for '{db_name}'"),
            ));
            migrate_pre_ids.push(id);
        }
    }

    // Step 4: one deploy operation per role with at least one host,
    // depending on that role's services' build+push operations and on all
    // pre-deploy migrations. Determining "that role's services" requires
    // matching service.role against the role name.
    let mut deploy_ids_non_gateway: Vec<String> = Vec::new();
    let mut gateway_deploy_id: Option<String> = None;

    for (role_name, hosts) in &env.roles {
        if hosts.is_empty() {
            continue;
        }
        let role_services: Vec<&String> = config
            .services
            .iter()
            .filter(|(_, svc)| &svc.role == role_name)
            .map(|(name, _)| name)
            .collect();

        let mut depends_on: Vec<String> = Vec::new();
        let mut services_for_op: BTreeSet<String> = BTreeSet::new();
        for service_name in &role_services {
            services_for_op.insert((*service_name).clone());
            if let Some(build_ids_for_service) = build_ops_by_service.get(*service_name) {
                for build_id in build_ids_for_service {
                    let push_id = build_id.replacen("build:", "push:", 1);
                    depends_on.push(push_id);
                }
            }
        }
        depends_on.extend(migrate_pre_ids.iter().cloned());
        depends_on.sort();
        depends_on.dedup();

        let id = format!("deploy:{role_name}");
        plan.operations.push(
            Operation::new(id.clone(), OperationKind::Deploy, format!("deploy role '{role_name}'"))
                .with_services(services_for_op)
                .with_hosts(hosts.iter().cloned())
                .depending_on(depends_on),
        );

        if role_name == &config.gateway_role {
            gateway_deploy_id = Some(id);
        } else {
            deploy_ids_non_gateway.push(id);
        }
    }

    // The gateway's deploy operation additionally depends on every
    // non-gateway deploy operation (spec.md §4.C step 4): the gateway must
    // not route traffic to a role until that role is deployed.
    if let Some(gateway_id) = gateway_deploy_id {
        if let Some(op) = plan.operations.iter_mut().find(|op| op.id == gateway_id) {
            for dep in &deploy_ids_non_gateway {
                if !op.depends_on.contains(dep) {
                    op.depends_on.push(dep.clone());
                }
            }
            op.depends_on.sort();
            op.depends_on.dedup();
        }
    }

    let all_deploy_ids: Vec<String> = plan
        .operations_of_kind(OperationKind::Deploy)
        .map(|op| op.id.clone())
        .collect();

    // Step 5: post-deploy migrations depend on every deploy operation.
    for (db_name, db) in &config.databases {
        let strategy = db
            .migrations
            .as_ref()
            .map(|m| m.strategy)
            .unwrap_or(MigrationStrategy::PreDeploy);
        if strategy == MigrationStrategy::PostDeploy {
            plan.operations.push(
                Operation::new(
                    format!("migrate:{db_name}:post"),
                    OperationKind::Migrate,
                    format!("run post-deploy migrations for '{db_name}'"),
                )
                .depending_on(all_deploy_ids.clone()),
            );
        }
    }

    // SPEC_FULL.md supplement: an optional health_check operation per role
    // whose services declare one, depending only on that role's deploy.
    // Structural only — the executor never binds a provider to it.
    for (role_name, hosts) in &env.roles {
        if hosts.is_empty() {
            continue;
        }
        let has_health_check = config
            .services
            .iter()
            .any(|(_, svc)| &svc.role == role_name && svc.health_check.is_some());
        if has_health_check {
            let deploy_id = format!("deploy:{role_name}");
            let id = format!("health_check:{role_name}");
            plan.operations.push(
                Operation::new(
                    id,
                    OperationKind::HealthCheck,
                    format!("verify health of role '{role_name}'"),
                )
                .with_hosts(hosts.iter().cloned())
                .depending_on([deploy_id]),
            );
        }
    }

    topologically_sort(&mut plan)?;
    Ok(plan)
}

/// Kahn's algorithm, always selecting the lexicographically-smallest
/// ready operation ID at each step. This is what makes planner output
/// deterministic across calls and across process runs.
fn topologically_sort(plan: &mut Plan) -> Result<(), StagecraftError> {
    let mut indegree: BTreeMap<String, usize> = BTreeMap::new();
    let mut dependents: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let by_id: BTreeMap<String, Operation> = plan
        .operations
        .drain(..)
        .map(|op| (op.id.clone(), op))
        .collect();

    for (id, op) in &by_id {
        indegree.entry(id.clone()).or_insert(0);
        for dep in &op.depends_on {
            if !by_id.contains_key(dep) {
                return Err(StagecraftError::invalid_config(format!(
                    "operation '{id}' depends on unknown operation '{dep}'"
                )));
            }
            *indegree.entry(id.clone()).or_insert(0) += 1;
            dependents.entry(dep.clone()).or_default().push(id.clone());
        }
    }

    let mut ready: BTreeSet<String> = indegree
        .iter()
        .filter(|(_, count)| **count == 0)
        .map(|(id, _)| id.clone())
        .collect();

    let mut ordered = Vec::with_capacity(by_id.len());
    while let Some(next_id) = ready.iter().next().cloned() {
        ready.remove(&next_id);
        ordered.push(by_id[&next_id].clone());
        if let Some(children) = dependents.get(&next_id) {
            for child in children {
                let entry = indegree.get_mut(child).expect("child tracked");
                *entry -= 1;
                if *entry == 0 {
                    ready.insert(child.clone());
                }
            }
        }
    }

    if ordered.len() != by_id.len() {
        return Err(StagecraftError::invalid_config(
            "dependency cycle detected while planning",
        ));
    }

    plan.operations = ordered;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        BackendServiceConfig, DatabaseConfig, EnvironmentConfig, FrontendServiceConfig,
        MigrationStrategyConfig, ProviderSelection, ProvidersConfig, ServiceConfig,
    };
    use std::collections::BTreeMap;

    fn noop_providers() -> ProvidersConfig {
        let sel = ProviderSelection {
            provider: "noop".into(),
            providers: BTreeMap::from([("noop".into(), serde_yaml::Value::Null)]),
        };
        ProvidersConfig {
            backend: sel.clone(),
            frontend: sel.clone(),
            network: sel.clone(),
            cloud: sel.clone(),
            migration: sel,
        }
    }

    fn basic_config() -> ProjectConfig {
        let mut environments = BTreeMap::new();
        environments.insert(
            "staging".to_string(),
            EnvironmentConfig {
                roles: BTreeMap::from([
                    ("api".to_string(), vec!["host-a".to_string()]),
                    ("gateway".to_string(), vec!["host-b".to_string()]),
                ]),
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
        services.insert(
            "gateway-svc".to_string(),
            ServiceConfig {
                role: "gateway".to_string(),
                backend: Some(BackendServiceConfig { buildable: true }),
                frontend: Some(FrontendServiceConfig { buildable: false }),
                health_check: None,
            },
        );

        let mut databases = BTreeMap::new();
        databases.insert(
            "primary".to_string(),
            DatabaseConfig {
                migrations: Some(MigrationStrategyConfig {
                    strategy: MigrationStrategy::PostDeploy,
                }),
            },
        );

        ProjectConfig {
            name: "demo".into(),
            gateway_role: "gateway".into(),
            environments,
            services,
            databases,
            providers: noop_providers(),
        }
    }

    #[test]
    fn unknown_environment_is_invalid_config() {
        let config = basic_config();
        let err = plan(&config, "nonexistent").unwrap_err();
        assert!(matches!(err, StagecraftError::InvalidConfig(_)));
    }

    #[test]
    fn gateway_without_hosts_is_invalid_config() {
        let mut config = basic_config();
        config
            .environments
            .get_mut("staging")
            .unwrap()
            .roles
            .insert("gateway".to_string(), vec![]);
        let err = plan(&config, "staging").unwrap_err();
        assert!(matches!(err, StagecraftError::InvalidConfig(_)));
    }

    #[test]
    fn builds_precede_their_pushes_and_deploys() {
        let config = basic_config();
        let result = plan(&config, "staging").unwrap();
        let build_pos = result.operations.iter().position(|o| o.id == "build:api-svc/backend").unwrap();
        let push_pos = result.operations.iter().position(|o| o.id == "push:api-svc/backend").unwrap();
        let deploy_pos = result.operations.iter().position(|o| o.id == "deploy:api").unwrap();
        assert!(build_pos < push_pos);
        assert!(push_pos < deploy_pos);
    }

    #[test]
    fn gateway_deploy_depends_on_all_other_deploys() {
        let config = basic_config();
        let result = plan(&config, "staging").unwrap();
        let gateway_deploy = result.find("deploy:gateway").unwrap();
        assert!(gateway_deploy.depends_on.contains(&"deploy:api".to_string()));
        let api_pos = result.operations.iter().position(|o| o.id == "deploy:api").unwrap();
        let gw_pos = result.operations.iter().position(|o| o.id == "deploy:gateway").unwrap();
        assert!(api_pos < gw_pos);
    }

    #[test]
    fn post_deploy_migration_depends_on_every_deploy() {
        let config = basic_config();
        let result = plan(&config, "staging").unwrap();
        let migrate = result.find("migrate:primary:post").unwrap();
        assert!(migrate.depends_on.contains(&"deploy:api".to_string()));
        assert!(migrate.depends_on.contains(&"deploy:gateway".to_string()));
    }

    #[test]
    fn planning_is_deterministic() {
        let config = basic_config();
        let first = plan(&config, "staging").unwrap();
        let second = plan(&config, "staging").unwrap();
        let first_ids: Vec<&str> = first.operations.iter().map(|o| o.id.as_str()).collect();
        let second_ids: Vec<&str> = second.operations.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(first_ids, second_ids);
    }

    #[test]
    fn health_check_operation_emitted_only_when_configured() {
        let mut config = basic_config();
        config
            .services
            .get_mut("api-svc")
            .unwrap()
            .health_check = Some(crate::config::HealthCheckConfig {
            path: "/healthz".into(),
            timeout_secs: 10,
        });
        let result = plan(&config, "staging").unwrap();
        let hc = result.find("health_check:api").unwrap();
        assert!(hc.depends_on.contains(&"deploy:api".to_string()));
        assert!(result.find("health_check:gateway").is_none());
    }

    #[test]
    fn manual_migration_runs_pre_deploy() {
        let mut config = basic_config();
        config.databases.insert(
            "ledger".to_string(),
            DatabaseConfig {
                migrations: Some(MigrationStrategyConfig {
                    strategy: MigrationStrategy::Manual,
                }),
            },
        );
        let result = plan(&config, "staging").unwrap();
        let migrate = result.find("migrate:ledger:pre").unwrap();
        let deploy = result.find("deploy:api").unwrap();
        assert!(deploy.depends_on.contains(&"migrate:ledger:pre".to_string()));
    }
}
