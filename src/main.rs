//! Merge Relay server.
//!
//! Loads configuration from the environment, registers the configured
//! handlers and serves the GitLab webhook endpoint until Ctrl-C or SIGTERM.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use merge_relay::adapters::gitlab::GitLabClient;
use merge_relay::adapters::handlers::{StaticMessageHandler, UrlFileHandler, YouTrackIssueHandler};
use merge_relay::adapters::http::{webhook_router, WebhookState};
use merge_relay::adapters::youtrack::YouTrackClient;
use merge_relay::application::{HandlerRegistry, RelayMergeRequestHandler};
use merge_relay::config::{AppConfig, ServerConfig};
use merge_relay::ports::NotePublisher;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let registry = Arc::new(build_registry(&config)?);
    let publisher: Arc<dyn NotePublisher> = Arc::new(GitLabClient::new(
        &config.gitlab.base_url,
        config.gitlab.private_token.clone(),
    )?);
    let relay = Arc::new(RelayMergeRequestHandler::new(registry, publisher));

    let webhook_token = config.webhook.token().map(str::to_string);
    if webhook_token.is_none() {
        tracing::warn!("No webhook token configured, all requests will be accepted");
    }

    let shutdown = CancellationToken::new();
    let state = WebhookState::new(
        relay,
        webhook_token,
        config.server.webhook_timeout(),
        shutdown.clone(),
    );

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening for GitLab webhooks");

    axum::serve(listener, webhook_router(state))
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Registers handlers for every configured action. Registration order is
/// the order fragments appear in the note.
fn build_registry(config: &AppConfig) -> Result<HandlerRegistry, Box<dyn std::error::Error>> {
    let registry = HandlerRegistry::new();
    let actions = config.handlers.actions_list();

    if let Some(youtrack) = &config.youtrack {
        let tracker = Arc::new(YouTrackClient::new(
            &youtrack.base_url,
            youtrack.username.clone(),
            youtrack.password.clone(),
        )?);
        let pattern = youtrack.issue_id_pattern()?;
        registry.register_all(&actions, Arc::new(YouTrackIssueHandler::new(tracker, pattern)));
    }

    if let Some(url) = &config.handlers.url_file {
        registry.register_all(&actions, Arc::new(UrlFileHandler::new(url.clone())?));
    }

    if let Some(message) = &config.handlers.message {
        registry.register_all(&actions, Arc::new(StaticMessageHandler::new(message.clone())));
    }

    for action in registry.actions() {
        tracing::info!(
            action = %action,
            handlers = registry.handler_count(&action),
            "Registered merge request handlers"
        );
    }
    if registry.actions().is_empty() {
        tracing::warn!("No handlers configured, webhooks will be acknowledged without notes");
    }

    Ok(registry)
}

fn init_tracing(server: &ServerConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    if server.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

/// Resolves on Ctrl-C or SIGTERM and cancels `shutdown`, interrupting
/// relays in flight.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
    shutdown.cancel();
}
