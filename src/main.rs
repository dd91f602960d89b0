use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use murmur::application::services::TranscriptionService;
use murmur::infrastructure::audio::TranscriptionEngineFactory;
use murmur::infrastructure::llm::SummarizerFactory;
use murmur::infrastructure::observability::{TracingConfig, init_tracing};
use murmur::infrastructure::storage::LocalStagingStore;
use murmur::presentation::{AppState, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("Failed to load settings")?;

    init_tracing(
        &TracingConfig::from_settings(settings.environment, &settings.logging),
        settings.server.port,
    );

    let http_client = reqwest::Client::builder()
        .connect_timeout(settings.providers.connect_timeout())
        .build()
        .context("Failed to build HTTP client")?;

    let staging_store = Arc::new(
        LocalStagingStore::new(PathBuf::from(&settings.upload.staging_dir))
            .context("Failed to prepare staging directory")?,
    );

    let transcription_engine =
        TranscriptionEngineFactory::create(&settings.transcription, http_client.clone())
            .context("Failed to configure transcription provider")?;

    let mut transcription_service = TranscriptionService::new(
        staging_store,
        transcription_engine,
        settings.providers.timeout(),
    );

    if let Some(summarizer) = SummarizerFactory::create(&settings.summarization, http_client)
        .context("Failed to configure summarization provider")?
    {
        transcription_service =
            transcription_service.with_summarizer(summarizer, settings.summarization.on_failure);
    }

    tracing::info!(
        staging_dir = %settings.upload.staging_dir,
        summarization = transcription_service.summarization_enabled(),
        provider_timeout_secs = settings.providers.timeout_secs,
        "Transcription pipeline ready"
    );

    let state = AppState::new(
        Arc::new(transcription_service),
        settings.upload.max_file_size_bytes(),
    );
    let router = create_router(state);

    let host = settings
        .server
        .host
        .parse::<std::net::IpAddr>()
        .context("Invalid server.host")?;
    let addr = SocketAddr::new(host, settings.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
