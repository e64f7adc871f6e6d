//! Cloud provider contract (spec.md §4.B).
//!
//! Infrastructure provisioning (`infra up/down`) is an external command
//! surface — spec.md §1 lists it as out of scope — so nothing in the
//! release pipeline binds a phase to this contract. It is carried because
//! the registry/contract set is still one of the five named in spec.md
//! §4.B; only its *implementations* and the `infra` command are out of
//! scope, not the contract itself.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::StagecraftError;
use crate::providers::types::InfraPlan;

#[async_trait]
pub trait CloudProvider: Send + Sync {
    fn id(&self) -> &str;

    /// Compute an infrastructure plan for `env`.
    async fn plan(&self, ctx: &CancellationToken, env: &str) -> Result<InfraPlan, StagecraftError>;

    /// Apply a previously computed plan.
    async fn apply(&self, ctx: &CancellationToken, infra_plan: &InfraPlan) -> Result<(), StagecraftError>;
}
