//! Wayfarer application binary - composition root.
//!
//! 1. Parse CLI arguments
//! 2. Load configuration from TOML and apply overrides
//! 3. Install the tracing subscriber
//! 4. Build the suggestion catalogs
//! 5. Serve the axum REST API until Ctrl-C

mod cli;

use clap::Parser;

use wayfarer_api::state::AppState;

use cli::CliArgs;

fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| tracing_subscriber::EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config. Loaded before tracing so the file's log level applies; a
    // load failure is reported once the subscriber is up, then aborts.
    let config_file = args.resolve_config_path();
    let loaded = args.load_config(&config_file);

    // Tracing.
    let log_level = match &loaded {
        Ok(config) => config.server.log_level.clone(),
        Err(_) => args.log_level.clone().unwrap_or_else(|| "info".to_string()),
    };
    init_tracing(&log_level);
    tracing::info!("Starting Wayfarer v{}", env!("CARGO_PKG_VERSION"));

    let config = match loaded {
        Ok(config) => {
            tracing::info!(path = %config_file.display(), "Configuration ready");
            config
        }
        Err(e) => {
            tracing::error!(
                path = %config_file.display(),
                error = %e,
                "Invalid configuration"
            );
            return Err(e.into());
        }
    };

    // Catalogs.
    let state = match AppState::from_config(config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build suggestion catalogs");
            return Err(e.into());
        }
    };
    tracing::info!(
        cities = state.resolver.catalogs().get(wayfarer_core::SuggestionKind::City).len(),
        "Suggestion catalogs ready"
    );

    // === API server ===
    if let Err(e) = wayfarer_api::start_server(state, shutdown_signal()).await {
        tracing::error!(error = %e, "API server failed, is another instance running?");
        return Err(e.into());
    }

    Ok(())
}
