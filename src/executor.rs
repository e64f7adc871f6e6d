//! The Phase Executor: walks a `Release`'s six phases in canonical order,
//! invoking one callback per phase and recording every transition through
//! the Store before and after the callback runs (spec.md §4.D).

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::domain::{Phase, PhaseStatus, Plan, PHASE_ORDER};
use crate::error::StagecraftError;
use crate::store::ReleaseStore;

pub type PhaseFuture = Pin<Box<dyn Future<Output = Result<(), StagecraftError>> + Send>>;
pub type PhaseFn = Box<dyn Fn(Arc<Plan>, CancellationToken) -> PhaseFuture + Send + Sync>;

/// One callback per fixed phase. A phase with nothing to do (no operations
/// of its kind in the plan, or no provider bound) should still be given a
/// callback that returns `Ok(())` immediately — the executor always calls
/// all six.
pub struct PhaseFns {
    pub build: PhaseFn,
    pub push: PhaseFn,
    pub migrate_pre: PhaseFn,
    pub rollout: PhaseFn,
    pub migrate_post: PhaseFn,
    pub finalize: PhaseFn,
}

impl PhaseFns {
    fn get(&self, phase: Phase) -> &PhaseFn {
        match phase {
            Phase::Build => &self.build,
            Phase::Push => &self.push,
            Phase::MigratePre => &self.migrate_pre,
            Phase::Rollout => &self.rollout,
            Phase::MigratePost => &self.migrate_post,
            Phase::Finalize => &self.finalize,
        }
    }
}

/// Run every phase of `release_id` in canonical order against `plan`.
///
/// Protocol per phase:
/// 1. `store.update_phase(running)` — if this write itself fails, abort the
///    entire execution immediately with the store error; no further marks
///    are attempted for any phase.
/// 2. Invoke the bound phase callback.
/// 3. On success: `store.update_phase(completed)`, continue to the next
///    phase.
/// 4. On failure: `store.update_phase(failed)`, then `update_phase(skipped)`
///    for every phase after this one in canonical order, and return the
///    failure wrapped as `PhaseFailed`.
pub async fn execute(
    store: &ReleaseStore,
    release_id: &str,
    plan: Arc<Plan>,
    phase_fns: &PhaseFns,
    cancel: CancellationToken,
) -> Result<(), StagecraftError> {
    for (idx, phase) in PHASE_ORDER.iter().enumerate() {
        let phase = *phase;

        if cancel.is_cancelled() {
            skip_remaining(store, release_id, idx)?;
            return Err(StagecraftError::phase_failed(format!(
                "execution cancelled before phase '{phase}'"
            )));
        }

        store.update_phase(release_id, phase, PhaseStatus::Running)?;
        info!(release_id, %phase, "phase started");

        let callback = phase_fns.get(phase);
        match callback(plan.clone(), cancel.clone()).await {
            Ok(()) => {
                store.update_phase(release_id, phase, PhaseStatus::Completed)?;
                info!(release_id, %phase, "phase completed");
            }
            Err(e) => {
                error!(release_id, %phase, error = %e, "phase failed");
                store.update_phase(release_id, phase, PhaseStatus::Failed)?;
                skip_remaining(store, release_id, idx + 1)?;
                return Err(StagecraftError::phase_failed(format!(
                    "phase '{phase}' failed: {e}"
                )));
            }
        }
    }
    Ok(())
}

fn skip_remaining(
    store: &ReleaseStore,
    release_id: &str,
    from_index: usize,
) -> Result<(), StagecraftError> {
    for phase in PHASE_ORDER.iter().skip(from_index) {
        store.update_phase(release_id, *phase, PhaseStatus::Skipped)?;
    }
    Ok(())
}
