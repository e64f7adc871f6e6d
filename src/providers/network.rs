//! Network provider contract (spec.md §4.B).
//!
//! Responsible for getting a host onto the mesh overlay network ahead of
//! rollout and resolving the name rollout should route traffic to. Every
//! operation here is idempotent.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::StagecraftError;

#[async_trait]
pub trait NetworkProvider: Send + Sync {
    fn id(&self) -> &str;

    /// Ensure the mesh agent is installed on `host`.
    async fn ensure_installed(
        &self,
        ctx: &CancellationToken,
        host: &str,
        config: &serde_yaml::Value,
    ) -> Result<(), StagecraftError>;

    /// Ensure `host` has joined the mesh, carrying `tags`.
    async fn ensure_joined(
        &self,
        ctx: &CancellationToken,
        host: &str,
        tags: &[String],
        config: &serde_yaml::Value,
    ) -> Result<(), StagecraftError>;

    /// The fully-qualified mesh name rollout should address `host` by.
    fn node_fqdn(&self, host: &str) -> String;
}
