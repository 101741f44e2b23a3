//! # Command Line Interface
//!
//! Loads VirtualService manifests from disk, runs the host checkers per
//! namespace and prints the resulting validations.

pub mod output;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::{validate_namespace, AppConfig};
use crate::domain::VirtualService;
use crate::manifest;
use crate::observability::{init_logging, log_config_info};
use crate::validation::{run_checkers, Checker, IstioValidations, SingleHostChecker};

use output::OutputFormat;

/// Exit status used by `--fail-on-warning` when conflicts were found.
const EXIT_CONFLICTS: u8 = 2;

#[derive(Parser)]
#[command(name = "meshcheck")]
#[command(about = "Detect VirtualService host conflicts in Istio manifests")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report VirtualServices that claim the same host
    Hosts(HostsArgs),
}

#[derive(clap::Args, Debug)]
pub struct HostsArgs {
    /// Manifest files (YAML or JSON) to load
    #[arg(short, long = "file", required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,

    /// Namespace to check, and to assume for manifests without one
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Check every namespace found in the manifests
    #[arg(short = 'A', long, conflicts_with = "namespace")]
    pub all_namespaces: bool,

    /// Compare every pair of hosts instead of using the suffix index
    #[arg(long)]
    pub exhaustive: bool,

    /// Output format: json, yaml or table
    #[arg(short, long)]
    pub output: Option<String>,

    /// Exit with status 2 when any conflict is reported
    #[arg(long)]
    pub fail_on_warning: bool,
}

/// Run CLI commands
pub fn run_cli() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = AppConfig::from_env().context("Failed to load configuration")?;
    if cli.verbose {
        config.observability.log_level = "debug".to_string();
    }
    init_logging(&config.observability)?;
    log_config_info(&config);

    match cli.command {
        Commands::Hosts(args) => handle_hosts_command(args, &config),
    }
}

/// Checker that runs either the indexed or the exhaustive single host path.
struct HostsChecker {
    inner: SingleHostChecker,
    exhaustive: bool,
}

impl Checker for HostsChecker {
    fn name(&self) -> &'static str {
        if self.exhaustive {
            "single_host_exhaustive"
        } else {
            "single_host"
        }
    }

    fn check(&self) -> IstioValidations {
        let _span = crate::check_span!(self.name(), self.inner.namespace).entered();
        if self.exhaustive {
            self.inner.check_exhaustive()
        } else {
            self.inner.check_indexed()
        }
    }
}

fn handle_hosts_command(args: HostsArgs, config: &AppConfig) -> anyhow::Result<ExitCode> {
    let namespace = args.namespace.clone().unwrap_or_else(|| config.namespace.clone());
    validate_namespace(&namespace)
        .map_err(|_| anyhow::anyhow!("Invalid namespace '{}'", namespace))?;

    let format = match args.output.as_deref() {
        Some(output) => OutputFormat::from_str(output)?,
        None => OutputFormat::from_str(&config.output)?,
    };

    let reports = collect_reports(&args, &namespace)?;

    let conflicts: usize = reports.values().map(IstioValidations::len).sum();
    info!(
        namespaces = reports.len(),
        conflicted = conflicts,
        "Host check complete"
    );

    output::print_reports(&reports, format)?;

    if args.fail_on_warning && conflicts > 0 {
        return Ok(ExitCode::from(EXIT_CONFLICTS));
    }
    Ok(ExitCode::SUCCESS)
}

/// Load every manifest and check the namespaces selected by `args`.
///
/// Without `--all-namespaces` only `namespace` is reported, and it is
/// reported even when no manifest declares anything in it.
fn collect_reports(
    args: &HostsArgs,
    namespace: &str,
) -> anyhow::Result<BTreeMap<String, IstioValidations>> {
    let mut virtual_services = Vec::new();
    for path in &args.files {
        virtual_services.extend(manifest::load_file(path)?);
    }

    let mut groups = manifest::group_by_namespace(virtual_services, namespace);
    if !args.all_namespaces {
        groups.retain(|ns, _| ns == namespace);
        groups.entry(namespace.to_string()).or_default();
    }

    Ok(check_namespaces(groups, args.exhaustive))
}

/// Run the host checkers independently for each namespace.
pub fn check_namespaces(
    groups: BTreeMap<String, Vec<VirtualService>>,
    exhaustive: bool,
) -> BTreeMap<String, IstioValidations> {
    groups
        .into_iter()
        .map(|(namespace, virtual_services)| {
            let checker = HostsChecker {
                inner: SingleHostChecker::new(namespace.clone(), virtual_services),
                exhaustive,
            };
            let checkers: [&dyn Checker; 1] = [&checker];
            (namespace, run_checkers(&checkers))
        })
        .collect()
}
