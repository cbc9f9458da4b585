use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tokio::signal;
use tracing::{error, info};

use stock_insights_api as api;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = api::config::load_config().context("failed to load configuration")?;
    api::config::init_tracing(&cfg.log_level, cfg.log_json);
    api::handlers::health::init_start_time();

    let cors_layer = api::build_cors_layer(&cfg).map_err(|e| {
        error!("{}", e);
        e
    })?;

    let logger = api::logging::setup_logger(api::logging::LoggerConfig {
        use_color: !cfg.log_json,
        ..Default::default()
    });

    let addr: SocketAddr = format!("{}:{}", cfg.host, cfg.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", cfg.host, cfg.port))?;

    info!(
        environment = %cfg.environment,
        max_horizon_days = ?cfg.max_horizon_days,
        max_series_items = ?cfg.max_series_items,
        rotation_low = cfg.pricing.rotation_low,
        rotation_high = cfg.pricing.rotation_high,
        "configuration ready"
    );

    let state = api::AppState::new(cfg, Arc::new(api::clock::SystemClock), logger);
    let app = api::app_router(state, cors_layer);

    info!("stock-insights-api listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!("failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
