use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::{Router, response::IntoResponse, routing::get};
use clap::Parser as _;
use flannel_fixer_kubeapi::ClusterConfig;
use flannel_fixer_kubeapi::KubeApi;
use flannel_fixer_reconciler::Error as ReconcileError;
use flannel_fixer_reconciler::Reconciler;
use flannel_fixer_reconciler::Stats;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use config::Config;

mod config;
mod metrics;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::parse();
    tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .init();
    tracing::info!("Starting flannel-fixer");

    let cluster = config.cluster_config();
    let kubeapi = KubeApi::connect(&cluster)
        .await
        .inspect_err(|err| tracing::error!(%err, ?cluster, "cannot connect to cluster"))?;
    let reconciler = Reconciler::new(kubeapi.clone()).debug(config.debug);

    let listener = tokio::net::TcpListener::bind(config.metrics_addr).await?;
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Serving metrics on http://{addr}/metrics");
    }
    let app = metrics::router(reconciler.stats());
    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app).await {
            tracing::error!(%err, "metrics server failed");
        }
    });

    let (tx, rx) = mpsc::channel(config.queue_capacity.into());
    let watch = tokio::spawn(async move { kubeapi.forward_node_events(tx).await });

    // Failed passes are logged where they happen; only the exit status is left.
    let result = tokio::select! {
        result = reconciler.run(rx) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, shutting down");
            return Ok(());
        }
    };

    match result {
        Err(ReconcileError::EventSourceClosed) => {
            watch.await??;
            tracing::error!("node watch ended");
            Err(ReconcileError::EventSourceClosed.into())
        }
        Err(err) => Err(err.into()),
        Ok(()) => Ok(()),
    }
}
