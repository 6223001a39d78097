//! `pr-status` server entrypoint.

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use ortho_config::OrthoConfig;
use pr_status::telemetry::{StderrJsonlTelemetrySink, TelemetrySink, TracingTelemetrySink};
use pr_status::{
    DashboardAgent, DashboardError, DashboardSettings, MemorySessionStore,
    OctocrabGatewayFactory, PrStatusConfig, SessionStore, SignedCookieSessionStore,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), DashboardError> {
    let settings = load_config()?.into_settings()?;
    init_tracing(&settings.log_level)?;

    let agent = build_agent(&settings);
    let listener = TcpListener::bind(settings.listen_address)
        .await
        .map_err(|error| DashboardError::Io {
            message: format!("binding {}: {error}", settings.listen_address),
        })?;

    tracing::info!(
        address = %settings.listen_address,
        api_base = settings.api_base.as_str(),
        repositories = settings.scope.len(),
        "pr-status listening"
    );

    axum::serve(listener, agent.router())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|error| DashboardError::Io {
            message: error.to_string(),
        })
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`DashboardError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<PrStatusConfig, DashboardError> {
    PrStatusConfig::load().map_err(|error| DashboardError::Configuration {
        message: error.to_string(),
    })
}

fn init_tracing(default_level: &str) -> Result<(), DashboardError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|error| DashboardError::Configuration {
            message: format!("log_level `{default_level}` is invalid: {error}"),
        })?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| DashboardError::Configuration {
            message: format!("failed to initialise tracing: {error}"),
        })
}

fn build_agent(settings: &DashboardSettings) -> DashboardAgent {
    let store: Arc<dyn SessionStore> = match &settings.session_secret {
        Some(secret) => Arc::new(SignedCookieSessionStore::new(
            secret,
            settings.session_max_age_seconds,
        )),
        None => {
            tracing::warn!("session_secret is not set; sessions are kept in memory");
            Arc::new(MemorySessionStore::new(settings.session_max_age_seconds))
        }
    };

    let telemetry: Arc<dyn TelemetrySink> = if settings.telemetry_jsonl {
        Arc::new(StderrJsonlTelemetrySink)
    } else {
        Arc::new(TracingTelemetrySink)
    };

    DashboardAgent::new(
        settings.scope.clone(),
        store,
        Arc::new(OctocrabGatewayFactory::new(settings.api_base.clone())),
        telemetry,
    )
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(%error, "failed to listen for Ctrl-C; shutting down");
        return;
    }
    tracing::info!("shutdown signal received");
}
