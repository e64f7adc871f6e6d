//! Provider contracts and registries (spec.md §4.B).
//!
//! Five independent provider kinds, each its own trait and its own
//! registry: backend, frontend, network, cloud, migration. The core never
//! reasons about what a provider does internally — it resolves an ID to an
//! `Arc<dyn Trait>` and calls the one method that phase needs.

pub mod backend;
pub mod cloud;
pub mod frontend;
pub mod migration;
pub mod network;
pub mod registry;
pub mod types;

pub use backend::BackendProvider;
pub use cloud::CloudProvider;
pub use frontend::FrontendProvider;
pub use migration::MigrationProvider;
pub use network::NetworkProvider;
pub use registry::ProviderRegistry;
pub use types::{BuildOptions, DevOptions, InfraPlan, Migration, PlanOptions, RunOptions};

pub type BackendRegistry = ProviderRegistry<dyn BackendProvider>;
pub type FrontendRegistry = ProviderRegistry<dyn FrontendProvider>;
pub type NetworkRegistry = ProviderRegistry<dyn NetworkProvider>;
pub type CloudRegistry = ProviderRegistry<dyn CloudProvider>;
pub type MigrationRegistry = ProviderRegistry<dyn MigrationProvider>;

/// The full set of provider registries a deploy or rollback binds phase
/// callbacks against.
pub struct Registries {
    pub backend: BackendRegistry,
    pub frontend: FrontendRegistry,
    pub network: NetworkRegistry,
    pub cloud: CloudRegistry,
    pub migration: MigrationRegistry,
}

impl Registries {
    pub fn new() -> Self {
        Registries {
            backend: ProviderRegistry::new("backend"),
            frontend: ProviderRegistry::new("frontend"),
            network: ProviderRegistry::new("network"),
            cloud: ProviderRegistry::new("cloud"),
            migration: ProviderRegistry::new("migration"),
        }
    }
}
