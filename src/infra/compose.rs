//! Ambient compose-up helper.
//!
//! Rollout needs a fixed way to bring a role's containers up on a host in
//! addition to whatever the bound network provider does (e.g. load-balancer
//! registration) — the same division `forge` draws between Kubernetes
//! manifest application (pluggable) and the plain `tokio::process::Command`
//! shell-outs it uses for everything else.

use tokio::process::Command;
use tracing::info;

use crate::error::StagecraftError;

/// Run `docker compose up -d` for `compose_file` against `host`.
pub async fn up(host: &str, compose_file: &str) -> Result<(), StagecraftError> {
    info!(host, compose_file, "bringing up compose stack");
    let output = Command::new("ssh")
        .args([host, "docker", "compose", "-f", compose_file, "up", "-d"])
        .output()
        .await
        .map_err(|e| StagecraftError::phase_failed(format!("failed to spawn ssh/compose: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        return Err(StagecraftError::phase_failed(format!(
            "compose up on '{host}' failed: {stderr}"
        )));
    }
    Ok(())
}
