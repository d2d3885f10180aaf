use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot build configuration from cluster role: {0}")]
    InCluster(#[from] kube::config::InClusterError),

    #[error("cannot build kubeconfig configuration: {0}")]
    Kubeconfig(#[from] kube::config::KubeconfigError),

    #[error("cannot connect to cluster: {0}")]
    Client(#[from] kube::Error),

    #[error("list/watch returned non-node object: {0}")]
    MalformedNode(#[source] kube::runtime::watcher::Error),
}
