//! lpal-web - LanguagePal conversation tutor service
//!
//! Serves the chat and vocabulary pages plus the JSON API. Language work is
//! delegated to Gemini; per-browser state lives in a signed session cookie.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use lpal_common::config::{load_toml_config_or_default, CliOverrides, ServerConfig};
use lpal_common::SessionCodec;
use lpal_web::tutor::GeminiTutor;
use lpal_web::{build_router, AppState};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for lpal-web
#[derive(Parser, Debug)]
#[command(name = "lpal-web")]
#[command(about = "LanguagePal conversation tutor web service")]
#[command(version)]
struct Args {
    /// TOML config file (default: <config dir>/languagepal/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level filter when RUST_LOG is unset (e.g. info, debug)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config file problems are reported before the real log level is known
    let bootstrap = tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).finish();
    let toml = tracing::subscriber::with_default(bootstrap, || {
        load_toml_config_or_default(args.config.as_deref())
    });

    let cli = CliOverrides {
        config_file: args.config.clone(),
        bind_address: args.bind.clone(),
        port: args.port,
        log_level: args.log_level.clone(),
    };
    let config = ServerConfig::resolve(&cli, &toml).context("Failed to resolve configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str())),
        )
        .init();

    info!(
        "Starting LanguagePal (lpal-web) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let secret = match config.session_secret.clone() {
        Some(secret) => secret,
        None => {
            warn!("SESSION_SECRET not set; using a random secret (sessions will not survive restarts)");
            SessionCodec::generate_secret()
        }
    };
    let sessions = SessionCodec::new(secret, config.session_max_age);

    let api_key = config.require_gemini_api_key()?;
    let tutor = GeminiTutor::new(api_key, &config.gemini_model);
    info!(model = %tutor.model(), "Gemini tutor configured");

    let state = AppState::new(Arc::new(tutor), sessions);
    let app = build_router(state);

    let address = config.socket_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("lpal-web listening on http://{}", address);
    info!("Health check: http://{}/health", address);

    axum::serve(listener, app).await?;

    Ok(())
}
