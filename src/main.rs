//! Dot Feedback server binary.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dot_feedback::adapters::ai::{OpenAIConfig, OpenAIProvider};
use dot_feedback::adapters::http::{build_router, AppDependencies, AppState};
use dot_feedback::adapters::postgres::PostgresFeedbackStore;
use dot_feedback::adapters::scheduler::{
    FollowUpWorker, FollowUpWorkerConfig, InMemoryMessageQueue,
};
use dot_feedback::adapters::storage::InMemoryFeedbackStore;
use dot_feedback::config::{AppConfig, StorageBackend, StorageConfig, ValidationError};
use dot_feedback::ports::{AIProvider, MessageScheduler};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

fn build_ai(config: &AppConfig) -> Result<Arc<dyn AIProvider>, BoxError> {
    let api_key = config
        .ai
        .openai_api_key
        .clone()
        .ok_or(ValidationError::MissingRequired("ai.openai_api_key"))?;

    let provider = OpenAIProvider::new(
        OpenAIConfig::new(api_key)
            .with_model(config.ai.model.clone())
            .with_transcription_model(config.ai.transcription_model.clone())
            .with_base_url(config.ai.base_url.clone())
            .with_timeout(config.ai.timeout())
            .with_max_retries(config.ai.max_retries),
    )?;
    Ok(Arc::new(provider))
}

async fn build_dependencies(
    storage: &StorageConfig,
    scheduler: Arc<dyn MessageScheduler>,
    ai: Arc<dyn AIProvider>,
) -> Result<AppDependencies, BoxError> {
    match storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory storage; data is lost on restart");
            Ok(AppDependencies::from_store(
                Arc::new(InMemoryFeedbackStore::new()),
                scheduler,
                ai,
            ))
        }
        StorageBackend::Postgres => {
            let url = storage
                .database_url
                .as_deref()
                .ok_or(ValidationError::MissingRequired("storage.database_url"))?;

            let pool = PgPoolOptions::new()
                .min_connections(storage.min_connections)
                .max_connections(storage.max_connections)
                .acquire_timeout(storage.acquire_timeout())
                .connect(url)
                .await?;

            let store = PostgresFeedbackStore::new(pool);
            if storage.run_migrations {
                store.migrate().await?;
            }
            info!(max_connections = storage.max_connections, "Connected to PostgreSQL");
            Ok(AppDependencies::from_store(Arc::new(store), scheduler, ai))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let ai = build_ai(&config)?;
    let queue: Arc<dyn MessageScheduler> = Arc::new(InMemoryMessageQueue::new());
    let deps = build_dependencies(&config.storage, queue.clone(), ai)
        .await?
        .with_assistant_name(config.conversation.assistant_name.clone())
        .with_follow_up_delay(config.conversation.follow_up_delay())
        .with_ai_deadline(config.conversation.ai_deadline());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = FollowUpWorker::with_config(
        queue,
        deps.messages.clone(),
        deps.assistant(),
        FollowUpWorkerConfig::default().with_poll_interval(config.conversation.poll_interval()),
    );
    let worker_handle = tokio::spawn(async move { worker.run(shutdown_rx).await });

    let app = build_router(AppState::new(&deps), &config.server);
    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(
        %addr,
        environment = ?config.server.environment,
        storage = ?config.storage.backend,
        "Dot Feedback listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if shutdown_tx.send(true).is_err() {
        debug!("Follow-up worker already stopped");
    }
    if let Err(e) = worker_handle.await {
        error!(error = %e, "Follow-up worker task panicked");
    }
    info!("Server stopped");
    Ok(())
}
