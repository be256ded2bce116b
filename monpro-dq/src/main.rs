//! monpro-dq - Diagnostic Pipeline Microservice
//!
//! Receives diagnostic wizard submissions, validates and throttles them,
//! and builds internal sales battlecards in the background via LLM
//! analysis with delivery fan-out to the vault, the automation webhook,
//! and the admin alert channel.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use monpro_common::config::{self, TomlConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use monpro_dq::services::{
    AlertBus, BattlecardGenerator, DeliveryFanout, OpenAiClient, SqliteCooldownStore,
    WebhookClient,
};
use monpro_dq::AppState;

/// Command-line arguments for monpro-dq
#[derive(Parser, Debug)]
#[command(name = "monpro-dq")]
#[command(about = "Diagnostic pipeline microservice for MonPro")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5730", env = "MONPRO_DQ_PORT")]
    port: u16,

    /// TOML configuration file
    #[arg(short, long, default_value = "monpro-dq.toml", env = "MONPRO_DQ_CONFIG")]
    config: PathBuf,

    /// SQLite database path (overrides the config file)
    #[arg(short, long, env = "MONPRO_DQ_DATABASE")]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "monpro_dq=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!("Starting monpro-dq (Diagnostic Pipeline) microservice");
    info!("Port: {}", args.port);
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let toml_config = TomlConfig::load(&args.config)
        .with_context(|| format!("Failed to load config: {}", args.config.display()))?;

    // Database: CLI > TOML > default path
    let db_path = args
        .database
        .or_else(|| toml_config.database_path.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("monpro.db"));

    let db_pool = monpro_dq::db::init_database_pool(&db_path)
        .await
        .context("Failed to initialize database")?;

    // LLM credential is optional; without it every battlecard takes the
    // fallback path
    let llm = config::resolve_openai_api_key(&toml_config).map(|key| {
        OpenAiClient::new(
            key,
            toml_config.openai_model.clone(),
            toml_config.openai_base_url.clone(),
        )
    });
    let generator = BattlecardGenerator::new(llm);

    let webhook = config::resolve_webhook_url(&toml_config).map(WebhookClient::new);
    let alerts = AlertBus::new(100);
    let delivery = DeliveryFanout::new(db_pool.clone(), webhook, alerts);

    // Durable cooldown store: survives restarts, atomic across instances
    // sharing the database
    let cooldown = Arc::new(SqliteCooldownStore::new(db_pool.clone()));

    let state = AppState::new(db_pool, cooldown, generator, delivery);
    let app = monpro_dq::build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", args.port)).await?;
    info!("Listening on http://127.0.0.1:{}", args.port);
    info!("Health check: http://127.0.0.1:{}/health", args.port);

    axum::serve(listener, app).await?;

    Ok(())
}
