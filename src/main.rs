// src/main.rs

use std::sync::Arc;

use dotenvy::dotenv;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use training_notifier::audit::FileAuditLog;
use training_notifier::config::Config;
use training_notifier::routes;
use training_notifier::state::AppState;
use training_notifier::mail;
use training_notifier::report::ReportRenderer;

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    tracing::info!(
        backend = ?config.mail_backend,
        to = %config.mail_to,
        audit_log = %config.audit_log_path,
        "Mail transport configured"
    );

    let state = AppState {
        mailer: mail::from_config(&config),
        audit_log: Arc::new(FileAuditLog::new(&config.audit_log_path)),
        renderer: Arc::new(ReportRenderer::new().expect("Failed to load report templates")),
        config: config.clone(),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind listening address");
    tracing::info!("Listening on {}", config.bind_addr);

    // Start the server
    axum::serve(listener, app)
        .await
        .expect("Server terminated unexpectedly");
}
