use std::sync::Arc;

use talent_scout::config::{RunMode, ScreeningConfig};
use talent_scout::screening::{
    Driver, FieldSpec, QuestionBank, QuestionSelector, ScreeningRouteState, SessionManager,
    screening_routes,
};
use talent_scout::store::{CandidateStore, JsonFileStore};
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = ScreeningConfig::from_env()?;

    // ── Question bank ───────────────────────────────────────────────────
    let bank = match &config.question_bank {
        Some(path) => QuestionBank::load(path).await?,
        None => QuestionBank::builtin(),
    };
    let bank_size = bank.len();

    let driver = Driver::new(FieldSpec::default(), QuestionSelector::new(Arc::new(bank)))
        .with_exit_keywords(&config.exit_keywords);

    // ── Store ───────────────────────────────────────────────────────────
    let store: Arc<dyn CandidateStore> = Arc::new(JsonFileStore::new(&config.data_file));
    let manager = Arc::new(SessionManager::new(Arc::new(driver), store));

    eprintln!("🤖 TalentScout v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Question bank: {} technologies", bank_size);
    eprintln!("   Data file: {}", config.data_file.display());
    eprintln!("   Exit keywords: {}", config.exit_keywords.join(", "));

    match config.mode {
        RunMode::Cli => {
            eprintln!();
            talent_scout::cli::run(manager).await?;
        }
        RunMode::Server => {
            let app = screening_routes(ScreeningRouteState { manager }).layer(CorsLayer::permissive());
            let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
            eprintln!("   API: http://0.0.0.0:{}/api/sessions\n", config.port);
            tracing::info!(port = config.port, "Screening server started");
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
