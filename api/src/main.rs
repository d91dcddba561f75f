use api::middleware::log_request;
use api::routes::routes;
use api::state::AppState;
use api::store::{MemoryStore, SubmissionStore};
use axum::{Router, middleware::from_fn};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_appender::rolling;
use util::config::{AppConfig, DEFAULT_LOG_LEVEL};

#[tokio::main]
async fn main() {
    let config = AppConfig::global().clone();
    let _log_guard = init_logging(&config.log_file, &config.log_level, config.log_to_stdout);
    config.report_malformed();

    let store: Arc<dyn SubmissionStore> = match &config.submissions_file {
        Some(path) => match MemoryStore::from_json_file(path) {
            Ok(store) => {
                info!(path = %path, "loaded submissions");
                Arc::new(store)
            }
            Err(e) => {
                error!(error = %e, "failed to load submissions file");
                std::process::exit(1);
            }
        },
        None => Arc::new(MemoryStore::default()),
    };

    let app_state = AppState::from_config(&config, store);

    let app = Router::new()
        .nest("/api", routes(app_state))
        .layer(from_fn(log_request))
        .layer(CorsLayer::very_permissive());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid address");

    info!(
        env = %config.env,
        model = %config.llm.model,
        threshold = config.plagiarism.threshold,
        "Starting {} on http://{}",
        config.project_name,
        addr
    );

    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app,
    )
    .await
    .expect("Server crashed");
}

fn init_logging(
    log_file: &str,
    log_level: &str,
    log_to_stdout: bool,
) -> tracing_appender::non_blocking::WorkerGuard {
    use std::fs;
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    fs::create_dir_all("logs").ok();

    let file_appender = rolling::daily("logs", log_file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    let stdout_layer = log_to_stdout.then(|| {
        fmt::layer()
            .with_writer(std::io::stdout)
            .with_ansi(true)
            .with_target(true)
    });

    let env_filter =
        EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    guard
}
