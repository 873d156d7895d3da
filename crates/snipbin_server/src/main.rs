//! API server entrypoint.

use snipbin_core::assist::assistant_from_config;
use snipbin_core::LanguageRegistry;
use snipbin_server::{resolve_bind_address, serve_router, AppState, Config, Database, DEFAULT_PORT};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snipbin=info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if std::env::args().any(|arg| arg == "--help") {
        print_help();
        return Ok(());
    }

    let config = Config::from_env();
    let database = Database::new(&config.db_path)?;
    let registry = LanguageRegistry::load(&config.languages_path);
    let assistant = assistant_from_config(&config);
    if assistant.is_remote() {
        tracing::info!("Remote code assistant enabled ({})", config.ai_base_url);
    } else {
        tracing::info!("No AI credential configured; assist endpoints run rule-based only");
    }

    let bind_addr = resolve_bind_address(&config);
    let state = AppState::new(config, database, registry, assistant);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let actual_addr = listener.local_addr().unwrap_or(bind_addr);
    tracing::info!("Snipbin running at http://{}", actual_addr);

    serve_router(listener, state, shutdown_signal()).await?;
    tracing::info!("Server stopped");
    Ok(())
}

fn print_help() {
    println!("Snipbin Server\n");
    println!("Usage: snipbin [OPTIONS]\n");
    println!("Options:");
    println!("  --help            Show this help message");
    println!("\nEnvironment variables:");
    println!("  DB_PATH           Database directory (default: data/snipbin)");
    println!("  PORT              Server port (default: {})", DEFAULT_PORT);
    println!("  MAX_PASTE_SIZE    Maximum paste size in bytes (default: 1MB)");
    println!("  LANGUAGES_PATH    Language registry JSON (default: languages.json)");
    println!("  AI_API_TOKEN      Credential for the remote code assistant (optional)");
    println!("  AI_BASE_URL       Remote inference base URL");
    println!("  BIND              Override bind address (e.g. 127.0.0.1:{})", DEFAULT_PORT);
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
