//! homelab-exec: Local command execution
//!
//! Runs the external tools the diagnostics rely on (`ping`, `ip`,
//! `systemd-detect-virt`) with a bounded timeout per invocation.

pub mod error;
pub mod local;
pub mod result;
pub mod traits;

pub use error::ExecError;
pub use local::LocalExecutor;
pub use result::CommandResult;
pub use traits::CommandRunner;
