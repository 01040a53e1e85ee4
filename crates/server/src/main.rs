//! Studio Concierge Server Entry Point

use std::net::SocketAddr;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use concierge_agent::ConversationConfig;
use concierge_config::{load_settings, Settings, ENV_VAR};
use concierge_server::{create_router, init_metrics, spawn_lead_worker, AppState, LeadQueue};

/// How long the lead worker may keep flushing after the server stops
const LEAD_FLUSH_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Priority: env vars > config/{env}.yaml > config/default.yaml > defaults
    let env = std::env::var(ENV_VAR).ok();
    let config = match load_settings(env.as_deref()) {
        Ok(settings) => {
            // Tracing not yet initialized
            eprintln!(
                "Loaded configuration from files (env: {})",
                env.as_deref().unwrap_or("default")
            );
            settings
        },
        Err(e) => {
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            Settings::default()
        },
    };

    init_tracing(&config);

    tracing::info!("Starting Studio Concierge v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        environment = ?config.environment,
        lead_store = ?config.leads.store,
        "Configuration loaded"
    );

    let conversation = ConversationConfig::load(config.agent.content_path.as_deref())?;
    tracing::info!(
        rules = conversation.matcher.rules().len(),
        custom_content = config.agent.content_path.is_some(),
        "Chatbot content loaded"
    );

    let store = concierge_persistence::init(&config.leads).await?;
    let (leads, lead_rx) = LeadQueue::new(config.leads.channel_capacity, &config.leads.source);
    let worker = spawn_lead_worker(lead_rx, store);

    let mut state = AppState::new(config.clone(), conversation, leads);
    if config.observability.metrics_enabled {
        if let Some(handle) = init_metrics() {
            tracing::info!("Initialized Prometheus metrics at /metrics");
            state = state.with_metrics(handle);
        }
    }

    let sessions = state.sessions.clone();
    let cleanup_shutdown = sessions.start_cleanup_task();

    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = cleanup_shutdown.send(true);

    // Dropping the sessions releases the last queue senders
    sessions.close_all();
    if tokio::time::timeout(LEAD_FLUSH_TIMEOUT, worker).await.is_err() {
        tracing::warn!("Timed out flushing queued leads");
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

fn init_tracing(config: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &config.observability.log_level;
        format!("concierge={},tower_http=debug", level).into()
    });

    let fmt_layer = if config.observability.log_json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
