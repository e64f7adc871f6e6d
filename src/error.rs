//! Centralized error types for stagecraft.
//!
//! Uses thiserror for typed errors that can be matched on and mapped to
//! process exit codes; every fallible path in the crate returns
//! `Result<_, StagecraftError>` all the way to `main`, with no intermediate
//! boxed/erased error type at command boundaries.

use thiserror::Error;

/// Top-level error type for stagecraft operations.
///
/// Each variant corresponds to one of the release engine's error kinds;
/// `exit_code` maps a variant to the process exit code the CLI surfaces.
#[derive(Error, Debug)]
pub enum StagecraftError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("invalid format: {0}")]
    InvalidFormat(String),

    #[error("store error: {0}")]
    StoreError(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("phase failed: {0}")]
    PhaseFailed(String),

    #[error("invalid rollback target: {0}")]
    TargetInvalid(String),
}

impl StagecraftError {
    /// Exit code this error should produce when surfaced from `main`.
    ///
    /// Mirrors the kind → exit code table: 1 for user errors (bad
    /// arguments, missing things, an invalid rollback target), 2 for
    /// config validation failures, 3 for execution-time failures (a
    /// corrupt store, a malformed file, a failed phase). `AlreadyExists`
    /// is a startup-fatal condition (e.g. a release ID collision) and
    /// exits 1 alongside the other user errors since it always means the
    /// command was invoked wrong. Exit code 10 (partial multi-host
    /// failure within a single phase) has no dedicated variant yet — no
    /// phase implementation distinguishes partial from total host failure
    /// within one phase call, so it cannot be produced today.
    pub fn exit_code(&self) -> i32 {
        match self {
            StagecraftError::InvalidArgument(_) => 1,
            StagecraftError::NotFound(_) => 1,
            StagecraftError::AlreadyExists(_) => 1,
            StagecraftError::InvalidFormat(_) => 3,
            StagecraftError::StoreError(_) => 3,
            StagecraftError::InvalidConfig(_) => 2,
            StagecraftError::PhaseFailed(_) => 3,
            StagecraftError::TargetInvalid(_) => 1,
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        StagecraftError::NotFound(what.into())
    }

    pub fn already_exists(what: impl Into<String>) -> Self {
        StagecraftError::AlreadyExists(what.into())
    }

    pub fn invalid_config(what: impl Into<String>) -> Self {
        StagecraftError::InvalidConfig(what.into())
    }

    pub fn invalid_argument(what: impl Into<String>) -> Self {
        StagecraftError::InvalidArgument(what.into())
    }

    pub fn invalid_format(what: impl Into<String>) -> Self {
        StagecraftError::InvalidFormat(what.into())
    }

    pub fn target_invalid(what: impl Into<String>) -> Self {
        StagecraftError::TargetInvalid(what.into())
    }

    pub fn store_error(what: impl Into<String>) -> Self {
        StagecraftError::StoreError(what.into())
    }

    pub fn phase_failed(what: impl Into<String>) -> Self {
        StagecraftError::PhaseFailed(what.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_match_taxonomy() {
        assert_eq!(StagecraftError::InvalidArgument("x".into()).exit_code(), 1);
        assert_eq!(StagecraftError::NotFound("x".into()).exit_code(), 1);
        assert_eq!(StagecraftError::AlreadyExists("x".into()).exit_code(), 1);
        assert_eq!(StagecraftError::TargetInvalid("x".into()).exit_code(), 1);
        assert_eq!(StagecraftError::InvalidConfig("x".into()).exit_code(), 2);
        assert_eq!(StagecraftError::InvalidFormat("x".into()).exit_code(), 3);
        assert_eq!(StagecraftError::StoreError("x".into()).exit_code(), 3);
        assert_eq!(StagecraftError::PhaseFailed("x".into()).exit_code(), 3);
    }

    #[test]
    fn display_carries_message() {
        let err = StagecraftError::not_found("release rel-x");
        assert!(err.to_string().contains("release rel-x"));
    }
}
