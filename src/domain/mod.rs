//! Domain layer - pure business logic
//!
//! This module contains business logic with no external I/O.
//! Types and functions here can be unit tested without mocking.

pub mod operation;
pub mod release;

pub use operation::{Operation, OperationKind, Plan};
pub use release::{format_release_id, Phase, PhaseStatus, Phases, Release, PHASE_ORDER};
