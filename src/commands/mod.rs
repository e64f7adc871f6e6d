//! Thin command handlers: parse-level concerns live in `cli.rs`, this
//! layer wires parsed arguments into the store/planner/orchestrator core.

pub mod build;
pub mod deploy;
pub mod plan;
pub mod plan_filter;
pub mod releases;
pub mod rollback;
pub mod status;
