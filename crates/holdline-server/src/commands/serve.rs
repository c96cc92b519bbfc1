use crate::http::{self, AppState, ServiceSettings};
use anyhow::{Context as _, Result};
use clap::Args;
use holdline_config::AppConfig;
use holdline_core::PhoneNumberProcessor;
use holdline_store::Store;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to listen on (overrides server.bind)
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Directory with the dashboard and hold music (overrides server.assets_dir)
    #[arg(long)]
    pub assets_dir: Option<PathBuf>,
}

pub fn serve(config: &AppConfig, store: Store, args: ServeArgs) -> Result<()> {
    let key = config
        .phone_hash_key()
        .with_context(|| "load phone hash secret")?;
    let settings = ServiceSettings::from_config(config);
    if settings.auth_token.is_none() {
        warn!("twilio auth token not configured, webhook signatures will not be checked");
    }

    let bind = args.bind.unwrap_or(config.server.bind);
    let assets_dir = args
        .assets_dir
        .unwrap_or_else(|| config.server.assets_dir.clone());
    let state = AppState::new(store, PhoneNumberProcessor::new(key), settings);
    let app = http::router(state, &assets_dir);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .with_context(|| "start async runtime")?;

    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(bind)
            .await
            .with_context(|| format!("bind {bind}"))?;
        info!(%bind, assets = %assets_dir.display(), "listening");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .with_context(|| "serve http")?;
        info!("shut down");
        Ok::<_, anyhow::Error>(())
    })
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
