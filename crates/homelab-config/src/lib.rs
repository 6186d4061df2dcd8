//! homelab-config: Inventory model and validation
//!
//! Parses the declarative YAML inventory (environment, networks, VMs and
//! defaults) into strongly-typed entities. Validation is fail-fast: the first
//! violation aborts the load with a [`ConfigError`] naming the offending
//! field path.

pub mod checks;
pub mod error;
pub mod loader;
pub mod model;
mod value;

pub use checks::{ChecksOverride, VmChecks};
pub use error::ConfigError;
pub use loader::{load_config, parse_config};
pub use model::{Defaults, Environment, MachineType, Network, RootConfig, VmDefinition, VmNetwork};
