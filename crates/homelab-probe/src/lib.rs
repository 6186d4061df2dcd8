//! homelab-probe: Live system inspection and reachability probes
//!
//! Everything here is best-effort. Inspection degrades to empty or unknown
//! values when a tool or system file is missing, and reachability probes
//! report failures as values instead of aborting.

pub mod error;
pub mod local;
pub mod net;
pub mod os;
pub mod prober;
pub mod traits;
pub mod types;
pub mod virt;

pub use error::ProbeError;
pub use local::LocalInspector;
pub use prober::NetworkProber;
pub use traits::{HostInspector, ProbeResult, Reachability};
pub use types::{InterfaceInfo, OsInfo, VirtualizationInfo};
