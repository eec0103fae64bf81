//! Servidor axum para rotulagem de tokens com CRF

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use crfner_core::LabelingPipeline;
use crfner_web::{create_router, AppState, CliArgs, ServerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = CliArgs::parse();
    let config = ServerConfig::load(&cli).context("invalid configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // O modelo é carregado uma única vez; falhar aqui impede o servidor de subir
    let pipeline = LabelingPipeline::from_model_path(&config.model_path)
        .with_context(|| format!("failed to load model {}", config.model_path.display()))?;

    let address = config.bind_address();
    let state = Arc::new(AppState::new(pipeline, config));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!("🚀 Servidor de rotulagem iniciado em http://{address}");
    axum::serve(listener, app).await?;
    Ok(())
}
