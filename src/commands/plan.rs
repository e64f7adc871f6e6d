//! `plan` command handler — computes and prints a plan without executing
//! it, optionally filtered per spec.md §4.G.

use crate::commands::plan_filter::{filter_plan, PlanFilter};
use crate::config::ProjectConfig;
use crate::domain::OperationKind;
use crate::error::StagecraftError;
use crate::planner;
use crate::ui;

pub fn execute(config: &ProjectConfig, environment: &str, filter: PlanFilter) -> Result<(), StagecraftError> {
    let plan = planner::plan(config, environment)?;
    let plan = filter_plan(&plan, &filter);

    ui::print_header(&format!("plan for '{environment}'"));
    if plan.operations.is_empty() {
        ui::print_info("no operations match the given filter");
        return Ok(());
    }

    for op in &plan.operations {
        let kind = match op.kind {
            OperationKind::Build => "build",
            OperationKind::Push => "push",
            OperationKind::Migrate => "migrate",
            OperationKind::Deploy => "deploy",
            OperationKind::HealthCheck => "health_check",
        };
        let deps = if op.depends_on.is_empty() {
            String::new()
        } else {
            format!(" (after {})", op.depends_on.join(", "))
        };
        println!("  [{kind:<11}] {:<28}{deps}", op.id);
    }
    Ok(())
}
