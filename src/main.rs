use payment_relay::config::AppConfig;
use payment_relay::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env()?;
    let bind_addr = cfg.bind_addr.clone();
    tracing::info!(
        adapter = ?cfg.gateway_adapter,
        sandbox = cfg.sandbox,
        public_base_url = %cfg.public_base_url,
        "configuration loaded"
    );

    let app = payment_relay::router(AppState::from_config(cfg));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on {}", bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
