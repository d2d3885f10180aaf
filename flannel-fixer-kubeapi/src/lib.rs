use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::pin::pin;

use flannel_fixer_ext as k8s;
use futures::StreamExt as _;
use kube::ResourceExt as _;
use kube::api;
use kube::runtime::WatchStreamExt as _;
use kube::runtime::watcher;
use tokio::sync::mpsc;

use k8s::corev1;

pub use error::Error;
pub use error::Result;
pub use watch::NodeCache;
pub use watch::NodeEvent;

mod error;
mod watch;

/// Where the cluster connection settings come from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClusterConfig {
    /// Service account token and CA mounted into the pod
    InCluster,
    /// A kubeconfig file, using its current context
    Kubeconfig(PathBuf),
}

#[derive(Clone)]
pub struct KubeApi {
    post_params: api::PostParams,
    watcher_config: watcher::Config,
    client: kube::Client,
}

impl KubeApi {
    /// Connects to the cluster described by `config`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use flannel_fixer_kubeapi::{ClusterConfig, KubeApi};
    /// # async fn run() -> flannel_fixer_kubeapi::Result<()> {
    /// let api = KubeApi::connect(&ClusterConfig::InCluster).await?;
    /// // use `api`...
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(config: &ClusterConfig) -> Result<Self> {
        let config = match config {
            ClusterConfig::InCluster => kube::Config::incluster()?,
            ClusterConfig::Kubeconfig(path) => {
                tracing::debug!(path = %path.display(), "using kubeconfig configuration");
                let kubeconfig = kube::config::Kubeconfig::read_from(path)?;
                let options = kube::config::KubeConfigOptions::default();
                kube::Config::from_custom_kubeconfig(kubeconfig, &options).await?
            }
        };
        let client = kube::Client::try_from(config)?;
        Ok(Self::with_client(client))
    }

    /// Create a KubeApi backed by the provided Kubernetes client.
    pub fn with_client(client: kube::Client) -> Self {
        Self {
            post_params: api::PostParams::default(),
            watcher_config: watcher::Config::default(),
            client,
        }
    }

    /// Writes the whole node object back to the cluster.
    ///
    /// The request carries the node's `metadata.resourceVersion`, so the API server
    /// rejects it with `409 Conflict` when the node changed since it was read.
    pub async fn replace_node(&self, node: &corev1::Node) -> kube::Result<corev1::Node> {
        let name = node.name_any();
        let pp = self.post_params();
        self.nodes().replace(&name, pp, node).await
    }

    /// Watches all nodes and forwards every added or updated node to `tx`.
    ///
    /// Transport failures are logged and retried with backoff. An object that
    /// does not decode as a node ends the watch with [`Error::MalformedNode`].
    /// Returns `Ok` once the receiving side of `tx` is gone.
    pub async fn forward_node_events(&self, tx: mpsc::Sender<NodeEvent>) -> Result<()> {
        let config = self.watcher_config().clone();
        let mut events = pin!(watcher(self.nodes(), config).default_backoff());
        let mut cache = NodeCache::default();

        while let Some(event) = events.next().await {
            match event {
                Ok(event) => {
                    let Some(event) = cache.observe(event) else {
                        continue;
                    };
                    if tx.send(event).await.is_err() {
                        tracing::debug!("node event receiver closed, stopping watch");
                        return Ok(());
                    }
                }
                Err(error) if watch::is_malformed(&error) => {
                    tracing::error!(%error, "list/watch returned non-node object");
                    return Err(Error::MalformedNode(error));
                }
                Err(error) => tracing::warn!(%error, "node watch failed, retrying"),
            }
        }

        Ok(())
    }

    fn nodes(&self) -> api::Api<corev1::Node> {
        api::Api::all(self.client.clone())
    }

    fn post_params(&self) -> &api::PostParams {
        &self.post_params
    }

    fn watcher_config(&self) -> &watcher::Config {
        &self.watcher_config
    }
}

impl fmt::Debug for KubeApi {
    /// Formats the `KubeApi` for debugging while redacting the `client`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KubeApi")
            .field("post_params", &self.post_params)
            .field("watcher_config", &self.watcher_config)
            .field("client", &"<kube::Client>")
            .finish()
    }
}
