use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use flannel_fixer::Annotations;
use flannel_fixer::FLANNEL_PUBLIC_IP_ANNOTATION;
use flannel_fixer::FLANNEL_PUBLIC_IP_OVERRIDE_ANNOTATION;
use flannel_fixer::RKE_EXTERNAL_IP_ANNOTATION;
use flannel_fixer_ext as k8s;
use flannel_fixer_kubeapi::KubeApi;
use flannel_fixer_kubeapi::NodeEvent;
use tokio::sync::mpsc;

use k8s::NodeExt as _;
use k8s::corev1;

pub use error::Error;
pub use error::Result;
pub use stats::Stats;

mod error;
mod stats;

/// The single write the reconciler performs against the cluster.
pub trait NodeClient {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Replaces the node, failing when its resource version is stale.
    fn replace_node(
        &self,
        node: &corev1::Node,
    ) -> impl Future<Output = Result<corev1::Node, Self::Error>> + Send;
}

impl NodeClient for KubeApi {
    type Error = kube::Error;

    async fn replace_node(&self, node: &corev1::Node) -> kube::Result<corev1::Node> {
        Self::replace_node(self, node).await
    }
}

/// What a single reconciliation pass did to a node
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Neither an external address nor the RKE annotation is present
    Skipped,
    /// The flannel annotations already carry the public IP
    Unchanged,
    /// Both flannel annotations were rewritten to `public_ip`
    Updated { public_ip: String },
}

#[derive(Debug)]
pub struct Reconciler<C> {
    client: C,
    debug: bool,
    stats: Arc<Stats>,
}

impl<C: NodeClient> Reconciler<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            debug: false,
            stats: Arc::default(),
        }
    }

    /// Log annotation changes carried by update events.
    pub fn debug(self, debug: bool) -> Self {
        Self { debug, ..self }
    }

    pub fn stats(&self) -> Arc<Stats> {
        Arc::clone(&self.stats)
    }

    #[cfg(test)]
    pub(crate) fn client(&self) -> &C {
        &self.client
    }

    /// Reconciles every delivered node, one at a time.
    ///
    /// Runs until a pass fails or the sending side of `events` is dropped,
    /// both of which end with an error.
    pub async fn run(&self, mut events: mpsc::Receiver<NodeEvent>) -> Result<()> {
        while let Some(event) = events.recv().await {
            self.handle(event).await?;
        }
        Err(Error::EventSourceClosed)
    }

    pub async fn handle(&self, event: NodeEvent) -> Result<Outcome> {
        self.stats.record_event();
        let node_name = event.node().metadata.name.as_deref().unwrap_or_default();

        match event.old() {
            None => tracing::info!(node_name, "checking node"),
            Some(old) if self.debug => {
                let changes = flannel_fixer::diff_annotations(
                    old.metadata.annotations.as_ref(),
                    event.node().metadata.annotations.as_ref(),
                );
                let change = changes
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                tracing::debug!(node_name, %change, "change");
            }
            Some(_) => {}
        }

        self.reconcile(event.into_node()).await
    }

    async fn reconcile(&self, mut node: corev1::Node) -> Result<Outcome> {
        let node_name = validate(&node)?;

        let Some(resolution) = node.resolve_public_ip() else {
            tracing::info!(
                %node_name,
                "node doesn't have public address or {RKE_EXTERNAL_IP_ANNOTATION} annotation, skipping"
            );
            self.stats.record_skipped();
            return Ok(Outcome::Skipped);
        };

        let annotations = node.metadata.annotations.as_ref();
        let old_flannel_public_ip = annotation(annotations, FLANNEL_PUBLIC_IP_ANNOTATION);
        let old_flannel_public_ip_override =
            annotation(annotations, FLANNEL_PUBLIC_IP_OVERRIDE_ANNOTATION);
        let public_ip = resolution.public_ip.clone();

        if !resolution.needs_update {
            tracing::debug!(%node_name, %public_ip, "node annotations up to date");
            self.stats.record_unchanged();
            return Ok(Outcome::Unchanged);
        }

        node.set_public_ip(&resolution);

        if let Err(err) = self.client.replace_node(&node).await {
            tracing::error!(%node_name, error = %err, "cannot update node annotation");
            return Err(Error::UpdateNode {
                node: node_name,
                source: Box::new(err),
            });
        }

        tracing::info!(
            %node_name,
            %public_ip,
            %old_flannel_public_ip,
            %old_flannel_public_ip_override,
            new_flannel_public_ip = %public_ip,
            new_flannel_public_ip_override = %public_ip,
            "updated node annotation"
        );
        self.stats.record_updated();
        Ok(Outcome::Updated { public_ip })
    }
}

/// Checks the node carries what a conditional write needs and returns its name.
fn validate(node: &corev1::Node) -> Result<String> {
    let uid = node.metadata.uid.as_deref().unwrap_or_default();
    let Some(name) = node.metadata.name.clone() else {
        tracing::error!(uid, "list/watch returned node without a name");
        return Err(Error::MalformedNode {
            node: None,
            reason: "missing metadata.name",
        });
    };
    if node.metadata.resource_version.is_none() {
        tracing::error!(
            node_name = %name,
            uid,
            "list/watch returned node without a resource version"
        );
        return Err(Error::MalformedNode {
            node: Some(name),
            reason: "missing metadata.resourceVersion",
        });
    }
    Ok(name)
}

fn annotation(annotations: Option<&Annotations>, key: &str) -> String {
    annotations
        .and_then(|annotations| annotations.get(key))
        .cloned()
        .unwrap_or_default()
}
