//! Migration engine contract (spec.md §4.B).

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::StagecraftError;
use crate::providers::types::{Migration, PlanOptions, RunOptions};

#[async_trait]
pub trait MigrationProvider: Send + Sync {
    fn id(&self) -> &str;

    /// Compute the migrations that would run for this invocation, without
    /// running them.
    async fn plan(
        &self,
        ctx: &CancellationToken,
        opts: &PlanOptions,
    ) -> Result<Vec<Migration>, StagecraftError>;

    /// Run a previously planned set of migrations.
    async fn run(&self, ctx: &CancellationToken, opts: &RunOptions) -> Result<(), StagecraftError>;
}
