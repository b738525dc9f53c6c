use anyhow::{Context, Result};
use quake_ingest::{
    app_state::AppState,
    classifier::GeminiClassifier,
    config::{Config, LogFormat},
    crawler::SelectorCrawler,
    fetcher::HttpFetcher,
    ingest::{IngestSettings, Ingestor},
    items::RecordSnapshot,
    repositories::{EventStore, PgEventStore},
    server,
};
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_format());

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(config.database_url())
        .await
        .context("failed to connect to the event store")?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let store: Arc<dyn EventStore> = Arc::new(PgEventStore::new(pool));
    let classifier = GeminiClassifier::new(config.classifier_api_key(), config.classifier_model())?
        .with_base_url(config.classifier_base_url());
    let crawler = SelectorCrawler::new(HttpFetcher::new()?, config.crawl().clone());
    let snapshot = Arc::new(RecordSnapshot::new());

    let mut ingestor = Ingestor::new(
        store.clone(),
        Arc::new(crawler),
        Arc::new(classifier),
        snapshot.clone(),
        IngestSettings::from(&config),
    );
    ingestor
        .bootstrap()
        .await
        .context("failed to read existing events")?;

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
                return;
            }
            info!("Received shutdown signal, initiating graceful shutdown...");
            shutdown.cancel();
        });
    }

    let listener = TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr()))?;
    info!(addr = config.bind_addr(), "Serving read API");

    let app = server::router(AppState::new(snapshot, store), config.static_dir());
    let server = tokio::spawn(server::serve(listener, app, shutdown.clone()));

    ingestor.run(shutdown).await;
    server.await??;

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
