// src/main.rs

use std::net::SocketAddr;
use std::sync::Arc;

use dotenvy::dotenv;
use ihk_trainer::ai::{FeedbackGateway, GeminiClient};
use ihk_trainer::config::Config;
use ihk_trainer::routes;
use ihk_trainer::state::AppState;
use ihk_trainer::store::QuestionStore;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
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

    // AI client
    let gemini = GeminiClient::from_config(&config).expect("Failed to build Gemini HTTP client");
    if !gemini.has_credential() {
        tracing::warn!("GEMINI_API_KEY is not set, AI features will answer with 503");
    }
    let gateway = Arc::new(FeedbackGateway::new(Arc::new(gemini)));

    // In-memory data with seed content
    let store = QuestionStore::seeded().into_shared();
    tracing::info!("Question store seeded");

    let state = AppState {
        store,
        config: config.clone(),
        gateway,
        http: reqwest::Client::new(),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("HOST and PORT must form a valid socket address");
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();

    // Start the server
    axum::serve(listener, app).await.unwrap();
}
