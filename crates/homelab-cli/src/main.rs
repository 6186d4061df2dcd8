//! homelab CLI
//!
//! Validates the homelab inventory and runs read-only diagnostics against
//! the local host and the declared VMs.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use eyre::WrapErr;
use homelab_config::{RootConfig, load_config};
use homelab_core::{ConfigReport, Diagnostics, NetOptions, Report, VmsOptions};
use homelab_exec::{CommandRunner, LocalExecutor};
use homelab_probe::{LocalInspector, NetworkProber};
use tracing::{error, info};

mod logging;
mod paths;
mod render;

use render::OutputFormat;

/// Exit status for an unusable inventory file
const CONFIG_ERROR_EXIT: u8 = 2;

/// Largest accepted `--timeout`, in seconds
const MAX_PROBE_TIMEOUT: u64 = 300;

/// homelab environment diagnostics
#[derive(Parser, Debug)]
#[command(name = "homelab-cli", version, about, long_about = None)]
struct Cli {
    /// Inventory file (defaults to config.yaml next to the executable)
    #[arg(short, long, global = true, env = "HOMELAB_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show environment metadata and local host details
    Env,

    /// Check health of the declared VMs
    Vms {
        /// Only check this VM (case-insensitive, repeatable)
        #[arg(long = "name", value_name = "NAME")]
        names: Vec<String>,

        /// Do not ping
        #[arg(long)]
        skip_ping: bool,

        /// Do not probe the SSH port
        #[arg(long)]
        skip_ssh: bool,

        /// Per-probe timeout in seconds
        #[arg(long, value_name = "SECONDS", default_value_t = 2, value_parser = clap::value_parser!(u64).range(1..=MAX_PROBE_TIMEOUT))]
        timeout: u64,
    },

    /// Check local networking against the declared networks
    Net {
        /// Do not resolve the domain and expected hostnames
        #[arg(long)]
        skip_dns: bool,

        /// Host used for the external connectivity probe
        #[arg(long, default_value = "1.1.1.1")]
        external_host: String,

        /// Port used for the external connectivity probe
        #[arg(long, default_value_t = 443)]
        external_port: u16,

        /// Per-probe timeout in seconds
        #[arg(long, value_name = "SECONDS", default_value_t = 2, value_parser = clap::value_parser!(u64).range(1..=MAX_PROBE_TIMEOUT))]
        timeout: u64,
    },

    /// Validate the inventory and print its normalized form
    Config {
        /// Write the normalized inventory as JSON to this file
        #[arg(long, value_name = "PATH")]
        export: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_file.as_deref())?;

    let path = paths::resolve_config_path(cli.config.clone());
    let config = match load_config(&path) {
        Ok(config) => config,
        Err(err) => {
            error!(path = %path.display(), error = %err, "configuration error");
            eprintln!("Configuration error: {err}");
            return Ok(ExitCode::from(CONFIG_ERROR_EXIT));
        }
    };

    let report = run(cli.command, &config).await?;

    let mut stdout = io::stdout().lock();
    render::write_report(&mut stdout, report, cli.output)?;
    stdout.flush()?;

    Ok(ExitCode::SUCCESS)
}

async fn run(command: Commands, config: &RootConfig) -> Result<Report> {
    let runner: Arc<dyn CommandRunner> = Arc::new(LocalExecutor::new());
    let inspector = LocalInspector::new(Arc::clone(&runner));
    let prober = NetworkProber::new(runner);
    let diagnostics = Diagnostics::new(config, &inspector, &prober);

    let report: Report = match command {
        Commands::Env => diagnostics.env_report().await.into(),
        Commands::Vms {
            names,
            skip_ping,
            skip_ssh,
            timeout,
        } => {
            let options = VmsOptions {
                names,
                skip_ping,
                skip_ssh,
                probe_timeout: Duration::from_secs(timeout),
            };
            diagnostics.vms_report(&options).await.into()
        }
        Commands::Net {
            skip_dns,
            external_host,
            external_port,
            timeout,
        } => {
            let options = NetOptions {
                skip_dns,
                external_host,
                external_port,
                probe_timeout: Duration::from_secs(timeout),
            };
            diagnostics.net_report(&options).await.into()
        }
        Commands::Config { export } => {
            if let Some(target) = export {
                export_config(config, &target)?;
            }
            ConfigReport {
                config: config.clone(),
            }
            .into()
        }
    };

    Ok(report)
}

/// Write the normalized inventory as pretty JSON
fn export_config(config: &RootConfig, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)
            .wrap_err_with(|| format!("failed to create {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(target, json + "\n")
        .wrap_err_with(|| format!("failed to write {}", target.display()))?;

    info!(path = %target.display(), "exported normalized config");
    Ok(())
}
