//! CLI definitions for stagecraft.
//!
//! This module contains all CLI argument parsing structures using clap.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "stagecraft",
    version,
    about = "Deployment orchestrator for service infrastructure",
    long_about = "Moves a multi-service application from a developer's workstation to\nremote production hosts through a fixed six-phase release pipeline."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the project descriptor (default: ./stagecraft.yaml)
    #[arg(long, global = true, env = "STAGECRAFT_CONFIG")]
    pub config: Option<String>,

    /// Workspace directory override (used to resolve the default store path)
    #[arg(long, global = true, env = "STAGECRAFT_WORKSPACE")]
    pub workspace: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Deploy an environment through the full release pipeline
    Deploy {
        /// Environment to deploy (as declared in stagecraft.yaml)
        #[arg(long)]
        environment: String,

        /// Explicit version label. Falls back to the current git short hash,
        /// then to "unknown".
        #[arg(long)]
        version: Option<String>,

        /// Compute and record the plan without executing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Roll an environment back to a previously completed release
    Rollback {
        /// Environment to roll back
        #[arg(long)]
        environment: String,

        /// Roll back to the release before the current one
        #[arg(long, conflicts_with_all = ["to_release", "to_version"])]
        to_previous: bool,

        /// Roll back to a specific release ID
        #[arg(long, conflicts_with_all = ["to_previous", "to_version"])]
        to_release: Option<String>,

        /// Roll back to the most recent release with this version
        #[arg(long, conflicts_with_all = ["to_previous", "to_release"])]
        to_version: Option<String>,

        /// Resolve and validate the target without executing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Inspect release history
    Releases {
        #[command(subcommand)]
        command: ReleasesCommands,
    },

    /// Compute and print a plan without executing it
    Plan {
        /// Environment to plan for
        #[arg(long)]
        environment: String,

        /// Only include operations touching this service (plus their dependencies)
        #[arg(long)]
        service: Option<String>,

        /// Only include operations touching this host (plus their dependencies)
        #[arg(long)]
        host: Option<String>,

        /// Only include operations whose ID starts with this prefix (plus their dependencies)
        #[arg(long)]
        phase: Option<String>,
    },

    /// Build one or more services' artifacts without creating a release
    Build {
        /// Environment to build for (selects provider config)
        #[arg(long)]
        environment: String,

        /// Explicit version label, recorded as build metadata
        #[arg(long)]
        version: Option<String>,

        /// Comma-separated list of services to build. Defaults to all.
        #[arg(long)]
        services: Option<String>,

        /// Push built images after building
        #[arg(long)]
        push: bool,

        /// Compute what would be built without building it
        #[arg(long)]
        dry_run: bool,
    },

    /// Governance/introspection tooling
    Status {
        #[command(subcommand)]
        command: StatusCommands,
    },
}

#[derive(Subcommand)]
pub enum ReleasesCommands {
    /// List releases, optionally scoped to one environment
    List {
        #[arg(long)]
        environment: Option<String>,
    },
    /// Show full detail for a single release
    Show {
        /// Release ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum StatusCommands {
    /// Print the roadmap passthrough notice
    Roadmap,
}
