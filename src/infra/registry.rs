//! Ambient container-registry push helper.
//!
//! Container-registry publication isn't a pluggable provider capability
//! (spec.md §4.B doesn't name a registry contract), but the push phase
//! still needs to do something with a built image — this is the fixed,
//! non-pluggable implementation that phase calls, the way `forge`'s
//! `infrastructure/registry.rs` shells out to `skopeo`/`regctl` via
//! `tokio::process::Command` rather than linking a registry client crate.

use tokio::process::Command;
use tracing::{info, warn};

use crate::error::StagecraftError;

/// Push a locally-built image reference to `destination`, retrying up to
/// `retries` times on transient failure.
pub async fn push(image: &str, destination: &str, retries: u32) -> Result<(), StagecraftError> {
    let mut last_err = None;
    for attempt in 1..=retries.max(1) {
        info!(image, destination, attempt, "pushing image");
        let output = Command::new("docker")
            .args(["push", destination])
            .output()
            .await
            .map_err(|e| StagecraftError::phase_failed(format!("failed to spawn docker push: {e}")))?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        warn!(image, destination, attempt, %stderr, "push attempt failed");
        last_err = Some(stderr);
    }

    Err(StagecraftError::phase_failed(format!(
        "failed to push '{image}' to '{destination}' after {retries} attempts: {}",
        last_err.unwrap_or_default()
    )))
}
