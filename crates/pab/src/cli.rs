//! Command line interface
//!
//! | Command | Description |
//! |---------|-------------|
//! | `pab providers` | List the provider modules linked into the binary |
//! | `pab check` | Load configuration, bootstrap providers and report the instances |

use anyhow::Context;
use clap::{Parser, Subcommand};
use pab_domain::{AuthScheme, RuntimeType};
use pab_infrastructure::config::{ConfigLoader, LoadedConfig, LoggingConfig};
use pab_infrastructure::di::registry::provider_entries;
use pab_infrastructure::di::{Bootstrap, Host, RegisteredInstance};
use pab_infrastructure::logging::init_logging;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Command line interface for Provider Abstractions
#[derive(Parser, Debug)]
#[command(name = "pab")]
#[command(about = "Provider Abstractions - inspect and check provider registration")]
#[command(version)]
pub struct Cli {
    /// Override the configured log level
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Print reports as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the provider modules linked into this binary
    Providers,

    /// Load configuration and bootstrap every configured provider
    Check {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Hosting mode, overriding `runtime.type` from configuration
        #[arg(short, long, value_name = "web-api|web-app")]
        runtime: Option<RuntimeType>,
    },
}

/// One row of `pab providers`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderRow {
    /// Provider marker, `kind:name`
    pub marker: String,
    /// Configuration section under `providers`
    pub section: String,
    /// Human-readable description
    pub description: String,
}

/// Result of `pab check`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// Configuration file, if one was found
    pub source: Option<PathBuf>,
    /// Hosting mode the providers were registered for
    pub runtime_type: RuntimeType,
    /// Authentication scheme derived from the hosting mode
    pub auth_scheme: AuthScheme,
    /// Registered provider markers
    pub providers: Vec<String>,
    /// Registered provider instances
    pub instances: Vec<RegisteredInstance>,
}

impl CheckReport {
    /// Build the report of a bootstrapped host
    pub fn from_host(host: &Host) -> Self {
        Self {
            source: host.config().source().map(Path::to_path_buf),
            runtime_type: host.context().runtime_type(),
            auth_scheme: host.context().auth_scheme(),
            providers: host.registered().iter().map(ToString::to_string).collect(),
            instances: host.registered_instances(),
        }
    }
}

/// Rows for every linked provider module, sorted by marker
pub fn provider_rows() -> Vec<ProviderRow> {
    provider_entries()
        .into_iter()
        .map(|entry| ProviderRow {
            marker: entry.marker.to_string(),
            section: entry.section.to_string(),
            description: entry.description.to_string(),
        })
        .collect()
}

/// Bootstrap `config`, optionally forcing the hosting mode
pub fn check(
    config: LoadedConfig,
    runtime: Option<RuntimeType>,
) -> pab_domain::Result<CheckReport> {
    let mut bootstrap = Bootstrap::new(config);
    if let Some(runtime_type) = runtime {
        bootstrap = bootstrap.with_runtime_type(runtime_type)?;
    }
    let host = bootstrap.init()?;
    Ok(CheckReport::from_host(&host))
}

/// Render provider rows as an aligned table
pub fn render_providers(rows: &[ProviderRow]) -> String {
    if rows.is_empty() {
        return "No provider modules are linked\n".to_string();
    }
    let marker_width = rows.iter().map(|row| row.marker.len()).max().unwrap_or(0);
    let section_width = rows.iter().map(|row| row.section.len()).max().unwrap_or(0);

    rows.iter()
        .map(|row| {
            format!(
                "{:<marker_width$}  {:<section_width$}  {}\n",
                row.marker, row.section, row.description
            )
        })
        .collect()
}

/// Render a check report for humans
pub fn render_check(report: &CheckReport) -> String {
    let source = report.source.as_ref().map_or_else(
        || "defaults and environment".to_string(),
        |path| path.display().to_string(),
    );
    let mut out = format!(
        "Configuration: {source}\nRuntime type:  {} ({} authentication)\n",
        report.runtime_type, report.auth_scheme
    );

    if report.instances.is_empty() {
        out.push_str("No providers configured\n");
        return out;
    }
    out.push_str("Instances:\n");
    for record in &report.instances {
        let default = if record.is_default { " (default)" } else { "" };
        out.push_str(&format!("  {}{default}\n", record.key()));
    }
    out
}

/// Execute a parsed command line, returning the text to print
///
/// `check` uses `preloaded` when given instead of loading configuration
/// again.
pub fn execute(cli: &Cli, preloaded: Option<LoadedConfig>) -> anyhow::Result<String> {
    match &cli.command {
        Command::Providers => {
            let rows = provider_rows();
            if cli.json {
                Ok(serde_json::to_string_pretty(&rows)?)
            } else {
                Ok(render_providers(&rows))
            }
        }
        Command::Check { config, runtime } => {
            let loaded = match preloaded {
                Some(loaded) => loaded,
                None => load_config(config.as_deref())?,
            };
            let report = check(loaded, *runtime).context("Provider bootstrap failed")?;
            if cli.json {
                Ok(serde_json::to_string_pretty(&report)?)
            } else {
                Ok(render_check(&report))
            }
        }
    }
}

/// Entry point of the `pab` binary
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.command {
        Command::Check { config, .. } => Some(load_config(config.as_deref())?),
        Command::Providers => None,
    };

    let mut logging: LoggingConfig = config
        .as_ref()
        .map(|loaded| loaded.app().logging.clone())
        .unwrap_or_default();
    if let Some(level) = &cli.log_level {
        logging.level.clone_from(level);
    }
    init_logging(&logging).context("Failed to initialize logging")?;
    debug!(command = ?cli.command, "Running command");

    let output = execute(&cli, config)?;
    print!("{output}");
    if cli.json {
        println!();
    }
    Ok(())
}

/// Load configuration from `path`, or from the default locations
pub fn load_config(path: Option<&Path>) -> anyhow::Result<LoadedConfig> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = path {
        if !path.exists() {
            anyhow::bail!("Configuration file not found: {}", path.display());
        }
        loader = loader.with_config_path(path);
    }
    loader.load().context("Failed to load configuration")
}
