//! Text and JSON rendering of reports

use std::io::{self, Write};

use clap::ValueEnum;
use color_eyre::Result;
use homelab_core::{ConfigReport, EnvReport, NetReport, Report, ReportEnvelope, VmsReport};

/// How reports are printed to stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Write `report` to `out` in the requested format
pub fn write_report(out: &mut impl Write, report: Report, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = ReportEnvelope::new(report).to_json()?;
            writeln!(out, "{json}")?;
        }
        OutputFormat::Text => match &report {
            Report::Env(env) => write_env(out, env)?,
            Report::Vms(vms) => write_vms(out, vms)?,
            Report::Net(net) => write_net(out, net)?,
            Report::Config(config) => write_config(out, config)?,
        },
    }
    Ok(())
}

fn write_env(out: &mut impl Write, report: &EnvReport) -> io::Result<()> {
    let env = &report.environment;
    let host = &report.host;

    writeln!(out, "Environment: {} ({})", env.name, env.domain)?;
    writeln!(out, "Description: {}", env.description)?;

    let kind = if host.virtualized {
        "virtualized"
    } else {
        "bare-metal"
    };
    let detail = host
        .virtualization_type
        .as_deref()
        .map(|t| format!(" ({t})"))
        .unwrap_or_default();
    writeln!(
        out,
        "Host OS: {} {}, {kind}{detail}",
        host.os_family, host.os_version
    )?;

    if let Some(hint) = &host.hint {
        writeln!(out, "Virtualization hint: {hint}")?;
    }
    Ok(())
}

fn write_vms(out: &mut impl Write, report: &VmsReport) -> io::Result<()> {
    for vm in &report.vms {
        writeln!(out, "{}: {} - {}", vm.name, vm.status, vm.reasons.join("; "))?;
    }
    Ok(())
}

fn write_net(out: &mut impl Write, report: &NetReport) -> io::Result<()> {
    writeln!(out, "Interfaces:")?;
    for iface in &report.interfaces {
        let addresses = if iface.addresses.is_empty() {
            "no addresses".to_string()
        } else {
            iface.addresses.join(", ")
        };
        writeln!(out, "  {}: {addresses}", iface.name)?;
    }

    if !report.routes.is_empty() {
        writeln!(out, "Routes:")?;
        for route in &report.routes {
            writeln!(out, "  {route}")?;
        }
    }

    if !report.dns_servers.is_empty() {
        writeln!(out, "DNS servers: {}", report.dns_servers.join(", "))?;
    }

    write_list(out, "Subnet warnings:", &report.subnet_warnings)?;
    write_list(out, "DNS failures:", &report.dns_failures)?;

    match &report.external_connectivity_error {
        Some(err) => writeln!(out, "External connectivity error: {err}"),
        None => writeln!(out, "External connectivity: ok"),
    }
}

fn write_list(out: &mut impl Write, heading: &str, items: &[String]) -> io::Result<()> {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(out, "{heading}")?;
    for item in items {
        writeln!(out, "  - {item}")?;
    }
    Ok(())
}

fn write_config(out: &mut impl Write, report: &ConfigReport) -> io::Result<()> {
    let config = &report.config;

    writeln!(
        out,
        "Environment: {} ({})",
        config.environment.name, config.environment.domain
    )?;
    writeln!(out, "Networks: {}", config.networks.len())?;
    for network in config.networks.values() {
        writeln!(out, "  {}: {}", network.name, network.cidr)?;
    }
    writeln!(out, "VMs: {}", config.vms.len())?;
    for vm in &config.vms {
        writeln!(out, "  {} ({}, {})", vm.name, vm.role, vm.machine_type)?;
    }
    Ok(())
}
