//! Report command implementation.
//!
//! Takes one or more snapshots of the target and prints them.

use std::time::Instant;

use herakles_proc_inspector::{ProcessInspector, ProcessSnapshot};

use crate::cli::ConfigFormat;
use crate::config::Config;

/// Prints `iterations` snapshots of the configured process.
pub fn command_report(
    iterations: usize,
    format: ConfigFormat,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let inspector = ProcessInspector::new(config.inspector_options())?;

    for iteration in 1..=iterations {
        let start = Instant::now();
        let snapshot = inspector.snapshot()?;
        tracing::debug!(
            "Report {}/{} for pid {} took {:.3}s",
            iteration,
            iterations,
            snapshot.pid,
            start.elapsed().as_secs_f64()
        );

        if iterations > 1 && matches!(format, ConfigFormat::Yaml) {
            println!("---");
        }
        println!("{}", render_snapshot(&snapshot, &format)?);
    }

    Ok(())
}

/// Renders a snapshot in the requested format.
pub fn render_snapshot(
    snapshot: &ProcessSnapshot,
    format: &ConfigFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(snapshot)?,
        ConfigFormat::Toml => toml::to_string_pretty(snapshot)?,
        ConfigFormat::Yaml => serde_yaml::to_string(snapshot)?,
    };
    Ok(output)
}
