#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = questboard_api::config::config();
    tracing::info!("Starting QuestBoard API in {:?} mode", config.environment);

    // Allow tests or deployments to override port via env
    let port = std::env::var("QUESTBOARD_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    if let Err(e) = questboard_api::server::serve(port).await {
        eprintln!("server error: {e}");
        std::process::exit(1);
    }
}
