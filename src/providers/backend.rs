//! Backend provider contract (spec.md §4.B).

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::StagecraftError;
use crate::providers::types::{BuildOptions, DevOptions};

/// Runs a backend service locally and builds its container image.
///
/// Implementations are out of scope here — this crate ships only the
/// contract and the registry that dispatches to it.
#[async_trait]
pub trait BackendProvider: Send + Sync {
    fn id(&self) -> &str;

    /// Start (or attach to) a local development loop for this service.
    async fn dev(&self, ctx: &CancellationToken, opts: &DevOptions) -> Result<(), StagecraftError>;

    /// Build a container image for this service and return the tag it was
    /// built under. The push phase pushes exactly that tag.
    async fn build_docker(
        &self,
        ctx: &CancellationToken,
        opts: &BuildOptions,
    ) -> Result<String, StagecraftError>;
}
