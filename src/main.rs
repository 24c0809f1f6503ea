use tracing::info;
use webhook_router::{config::RouterConfig, router::build_router, state::AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "webhook_router=info,tower_http=info".into()),
        )
        .json()
        .init();

    let config = RouterConfig::from_env()?;
    let state = AppState::from_config(&config)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_addr = %config.bind_addr,
        providers = ?state.providers.names(),
        log_capacity = config.log_capacity,
        forward_timeout_ms = config.forwarder.timeout_ms,
        "starting webhook router"
    );

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
