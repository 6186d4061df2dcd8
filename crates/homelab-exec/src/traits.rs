//! Command runner trait

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ExecError;
use crate::result::CommandResult;

/// Runs a program with arguments and captures its output
///
/// A non-zero exit status is not an error: it is reported through
/// [`CommandResult::status`]. Errors are reserved for the program not
/// starting at all or exceeding its timeout.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a program to completion
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandResult, ExecError>;

    /// Run a program, killing it once `timeout` elapses
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<CommandResult, ExecError>;
}
