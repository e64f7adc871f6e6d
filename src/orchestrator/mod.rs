//! Deploy and rollback workflows built on top of the store, planner, and
//! executor (spec.md §4.E–4.F).

pub mod bind;
pub mod deploy;
pub mod rollback;

pub use deploy::{deploy, DeployOutcome, DeployRequest};
pub use rollback::{rollback, RollbackOutcome, RollbackRequest, RollbackTarget};
