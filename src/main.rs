use clap::Parser;
use lxsts_server::{
    auth::{hash_password, StaticCredentials},
    build_router,
    cli::{Cli, Commands},
    config::ServerConfig,
    state::ServerState,
    storage::FileListStore,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::time;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = ServerConfig::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.default_log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Some(Commands::HashPassword { password }) => {
            let password = password.unwrap_or_else(|| config.login_password.clone());
            println!("{}", hash_password(&password)?);
            return Ok(());
        }
        Some(Commands::Serve) | None => {
            // Continue to run server
        }
    }

    info!("Starting LXSTS Server v{}", VERSION);
    info!("   Bind address: {}", config.bind_address());
    info!("   Data directory: {:?}", config.data_directory);
    info!("   Static directory: {:?}", config.static_directory);
    info!("   CORS origins: {:?}", config.cors_origins);
    info!("   Debug: {}", config.debug);
    if config.uses_default_password() {
        warn!("LOGIN_PASSWORD is not set; using the development default");
    }
    if config.uses_default_secret() {
        warn!("SECRET_KEY is not set; session cookies use the development secret");
    }

    let store = FileListStore::open(&config.data_directory)?;
    let credentials = StaticCredentials::from_config(&config)?;
    info!("   Login user: {}", credentials.username());

    let addr: SocketAddr = config.bind_address().parse()?;
    let state = ServerState::new(config, Arc::new(store), Arc::new(credentials));

    // Spawn background task to cleanup expired sessions
    {
        let sessions = state.sessions.clone();
        tokio::spawn(async move {
            let mut interval = time::interval(Duration::from_secs(300));
            loop {
                interval.tick().await;
                let cleaned = sessions.cleanup_expired();
                if cleaned > 0 {
                    info!("Cleaned up {} expired sessions", cleaned);
                }
            }
        });
    }

    let app = build_router(state);

    info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
