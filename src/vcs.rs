//! Minimal version control helpers: resolving the current commit's short
//! hash for a release's `commit_sha` field when the caller did not supply
//! one explicitly.

use tokio::process::Command;
use tracing::debug;

/// Returns the short hash of `HEAD`, or `None` if this isn't a git
/// worktree, git isn't on `PATH`, or the command otherwise fails. Callers
/// fall back to an empty string rather than failing the deploy over this —
/// spec.md §3 defines `CommitSHA` as "possibly empty," with `"unknown"`
/// reserved for the `Version` sentinel only.
pub async fn short_sha() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .await
        .ok()?;

    if !output.status.success() {
        debug!("git rev-parse failed, commit_sha will be 'unknown'");
        return None;
    }

    let sha = String::from_utf8(output.stdout).ok()?;
    let sha = sha.trim();
    if sha.is_empty() {
        None
    } else {
        Some(sha.to_string())
    }
}
