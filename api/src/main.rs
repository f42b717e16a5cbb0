use api::routes::routes;
use api::state::AppState;
use migration::Migrator;
use model::Regressor;
use sea_orm_migration::MigratorTrait;
use std::net::SocketAddr;
use std::path::Path;
use tower_http::cors::CorsLayer;
use tracing_appender::rolling;
use util::config;

#[tokio::main]
async fn main() {
    // Load configuration and initialize logging
    let _log_guard = init_logging(&config::log_file());

    // Set up dependencies. Startup is the one place allowed to die loudly:
    // an unreachable store or corrupt artifact must not serve half-initialized.
    let db = db::connect().await;
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db.ping().await.expect("Database ping failed");

    let model = load_model(&config::model_path());
    let app_state = AppState::new(db, model);

    // Configure middleware
    let cors = CorsLayer::very_permissive();

    // Build app router
    let app = routes(app_state).layer(cors);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config::host(), config::port())
        .parse()
        .expect("Invalid address");

    println!(
        "Starting {} on http://{}:{}",
        config::project_name(),
        config::host(),
        config::port()
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

/// Loads the model artifact once. A missing file is a degraded-but-running
/// state (predicts answer 503); an unreadable file aborts startup.
fn load_model(path: &str) -> Option<Regressor> {
    match model::artifact::load(Path::new(path)) {
        Ok(Some(m)) => {
            tracing::info!("Loaded {} model from {path}", m.family());
            Some(m)
        }
        Ok(None) => {
            tracing::warn!("Model file not found at {path}; /api/predict will answer 503");
            None
        }
        Err(e) => panic!("Failed to load model artifact at {path}: {e}"),
    }
}

fn init_logging(log_file: &str) -> tracing_appender::non_blocking::WorkerGuard {
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

    let log_to_stdout = config::log_to_stdout();

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_target(true)
        .with_thread_ids(true);

    let env_filter =
        EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("api=info"));

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer);

    if log_to_stdout {
        registry.with(stdout_layer).init();
    } else {
        registry.init();
    }

    guard
}
