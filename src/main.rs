use signal_app::{
    config::{log_filter, Config},
    load_data, router, AppState,
};
use tokio::fs;
use tracing::info;
use tracing_subscriber::fmt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = log_filter(std::env::var("RUST_LOG").ok().as_deref());
    fmt().with_env_filter(filter).init();

    let config = Config::from_env();
    if let Some(parent) = config.data_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let data = load_data(&config.data_path).await;
    info!(
        signals = data.signals.len(),
        daily_logs = data.daily_logs.len(),
        path = %config.data_path.display(),
        "loaded data"
    );
    let app = router(AppState::new(config.data_path, data));

    info!("listening on http://{}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
