//! CLI arguments and subcommands for herakles-proc-inspector.
//!
//! This module defines the command-line interface structure using the clap library,
//! including all flags, options, and subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use std::net::IpAddr;
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Output format for configs and reports
#[derive(Debug, Clone, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "herakles-proc-inspector",
    about = "Live CPU, memory, I/O, descriptor and socket metrics for one Linux process",
    long_about = "Live CPU, memory, I/O, descriptor and socket metrics for one Linux process.\n\n\
                  Reads everything from /proc: no agents, no privileged calls. Serves the \
                  metrics for Prometheus by default, or prints one-shot reports.",
    author = "Michael Moll <exporter@herakles.now> - Herakles",
    version = "0.1.0",
    propagate_version = true,
    after_help = "Project: https://github.com/cansp-dev/herakles-proc-inspector - More info: https://www.herakles.now - Support: exporter@herakles.now"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Target process ID (defaults to this process)
    #[arg(long, global = true)]
    pub pid: Option<u32>,

    /// Root of the proc filesystem
    #[arg(long, global = true)]
    pub proc_root: Option<PathBuf>,

    /// Pause between the two CPU samples, in milliseconds
    #[arg(long)]
    pub sample_interval_ms: Option<u64>,

    /// Sampling-window hint in seconds
    #[arg(long)]
    pub window: Option<f64>,

    /// HTTP listen port
    #[arg(short = 'p', long)]
    pub port: Option<u16>,

    /// Bind to specific interface/IP
    #[arg(long)]
    pub bind: Option<IpAddr>,

    /// Log level (overrides the config file)
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,

    /// Reuse a snapshot for N seconds before sampling again
    #[arg(long)]
    pub cache_ttl: Option<u64>,

    /// Disable /health endpoint
    #[arg(long)]
    pub disable_health: bool,
}

/// Subcommands for additional functionality
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the target's metrics and exit
    Report {
        /// Number of reports to print
        #[arg(short = 'n', long, default_value_t = 1)]
        iterations: usize,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,
    },

    /// Check that the target's records and host constants are readable
    Check,

    /// Generate configuration files
    Config {
        /// Output file path ("-" for stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,

        /// Include comments and examples
        #[arg(long)]
        commented: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_report_with_global_pid() {
        let args = Args::parse_from([
            "herakles-proc-inspector",
            "report",
            "--pid",
            "1104",
            "--format",
            "json",
        ]);
        assert_eq!(args.pid, Some(1104));
        match args.command {
            Some(Commands::Report { iterations, format }) => {
                assert_eq!(iterations, 1);
                assert!(matches!(format, ConfigFormat::Json));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_server_flags() {
        let args = Args::parse_from([
            "herakles-proc-inspector",
            "--pid",
            "42",
            "-p",
            "9300",
            "--log-level",
            "debug",
            "--sample-interval-ms",
            "250",
        ]);
        assert!(args.command.is_none());
        assert_eq!(args.port, Some(9300));
        assert_eq!(args.sample_interval_ms, Some(250));
        assert!(matches!(args.log_level, Some(LogLevel::Debug)));
    }
}
