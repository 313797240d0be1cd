//! herakles-proc-inspector - version 0.1.0
//!
//! Single-process resource inspector with a Prometheus endpoint.
//! This is the main entry point that initializes the server and handles subcommands.

mod cache;
mod cache_updater;
mod cli;
mod commands;
mod config;
mod handlers;
mod metrics;
mod startup_checks;
mod state;

use axum::{routing::get, Router};
use clap::Parser;
use herakles_proc_inspector::ProcessInspector;
use prometheus::Registry;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::{net::TcpListener, signal, sync::RwLock};
use tracing::{debug, error, info};
use tracing_subscriber::filter::LevelFilter;

use cache::SnapshotCache;
use cli::{Args, Commands};
use commands::{command_check, command_config, command_report};
use config::{
    resolve_config, show_config, validate_effective_config, Config, DEFAULT_BIND_ADDR,
    DEFAULT_CACHE_TTL, DEFAULT_LOG_LEVEL, DEFAULT_PORT,
};
use handlers::{config_handler, health_handler, metrics_handler, root_handler};
use metrics::ProcessMetrics;
use state::AppState;

/// Initializes tracing logging subsystem with configured log level.
///
/// Logs go to stderr so report output on stdout stays machine readable.
fn setup_logging(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let level_name = config.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL);
    let log_level = match level_name.to_ascii_lowercase().as_str() {
        "off" => LevelFilter::OFF,
        "error" => LevelFilter::ERROR,
        "warn" => LevelFilter::WARN,
        "debug" => LevelFilter::DEBUG,
        "trace" => LevelFilter::TRACE,
        _ => LevelFilter::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    debug!("Logging initialized with level: {}", level_name);
    Ok(())
}

/// Helper function to load and validate configuration.
/// Exits the process with error code 1 if validation fails.
fn load_validated_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let config = resolve_config(args)?;
    if let Err(e) = validate_effective_config(&config) {
        eprintln!("❌ Configuration invalid: {}", e);
        std::process::exit(1);
    }
    Ok(config)
}

/// Completes on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), shutting down gracefully...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }
}

/// Main application entry point.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Early config resolution for show/check modes
    if args.show_config || args.check_config {
        let config = resolve_config(&args)?;

        if args.check_config {
            if let Err(e) = validate_effective_config(&config) {
                eprintln!("❌ Configuration invalid: {}", e);
                std::process::exit(1);
            }
            println!("✅ Configuration is valid");
            return Ok(());
        }

        return show_config(&config, &args.config_format);
    }

    // Handle subcommands
    if let Some(command) = &args.command {
        if let Commands::Config {
            output,
            format,
            commented,
        } = command
        {
            return command_config(output.clone(), format.clone(), *commented);
        }

        let config = load_validated_config(&args)?;
        setup_logging(&config)?;

        return match command {
            Commands::Report { iterations, format } => {
                command_report(*iterations, format.clone(), &config)
            }
            Commands::Check => command_check(&config),
            Commands::Config { .. } => unreachable!("Config handled above"),
        };
    }

    // Load configuration for main server mode
    let config = load_validated_config(&args)?;
    setup_logging(&config)?;

    info!("Starting herakles-proc-inspector");

    let inspector = Arc::new(ProcessInspector::new(config.inspector_options())?);
    info!(
        "Inspecting pid {} (sample interval {} ms)",
        inspector.pid(),
        inspector.sample_interval().as_millis()
    );

    if let Err(e) = startup_checks::validate_requirements(&inspector) {
        error!("❌ Startup validation failed: {}", e);
        error!("   The exporter will start but /metrics will report failed snapshots");
    }

    let bind_ip_str = config.bind.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
    let port = config.port.unwrap_or(DEFAULT_PORT);
    let cache_ttl = Duration::from_secs(config.cache_ttl.unwrap_or(DEFAULT_CACHE_TTL));

    // Initialize Prometheus metrics registry
    let registry = Registry::new();
    let metrics = ProcessMetrics::new(&registry, inspector.pid())?;
    debug!("All metrics registered successfully");

    let state = Arc::new(AppState {
        registry,
        metrics,
        inspector,
        cache: RwLock::new(SnapshotCache::default()),
        config: Arc::new(config.clone()),
        cache_ttl,
        start_time: Instant::now(),
    });

    // Perform initial cache population
    info!("Performing initial snapshot");
    if let Err(e) = cache_updater::update_cache(&state).await {
        error!("Initial snapshot failed: {}", e);
    } else {
        info!("Initial snapshot completed successfully");
    }

    // Configure HTTP server routes
    let addr: SocketAddr = format!("{}:{}", bind_ip_str, port).parse()?;

    let mut app = Router::new()
        .route("/", get(root_handler))
        .route("/metrics", get(metrics_handler));

    if config.enable_health.unwrap_or(true) {
        app = app.route("/health", get(health_handler));
    }

    let app = app
        .route("/config", get(config_handler))
        .with_state(state.clone());

    let listener = TcpListener::bind(addr).await?;
    info!(
        "herakles-proc-inspector listening on http://{}:{}",
        bind_ip_str, port
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("Server error: {}", e);
            e
        })?;

    info!("herakles-proc-inspector stopped gracefully");
    Ok(())
}
