use super::*;

/// A full node snapshot delivered by the watch
#[derive(Clone, Debug)]
pub enum NodeEvent {
    /// First delivery of this node
    Added(Box<corev1::Node>),
    /// A newer copy of a node delivered before
    Updated {
        old: Box<corev1::Node>,
        new: Box<corev1::Node>,
    },
}

impl NodeEvent {
    fn new(old: Option<corev1::Node>, new: corev1::Node) -> Self {
        let new = Box::new(new);
        match old {
            Some(old) => Self::Updated {
                old: Box::new(old),
                new,
            },
            None => Self::Added(new),
        }
    }

    /// The node as it is now.
    pub fn node(&self) -> &corev1::Node {
        match self {
            Self::Added(node) | Self::Updated { new: node, .. } => node,
        }
    }

    /// The previously delivered copy, for updates.
    pub fn old(&self) -> Option<&corev1::Node> {
        match self {
            Self::Added(_) => None,
            Self::Updated { old, .. } => Some(old.as_ref()),
        }
    }

    pub fn into_node(self) -> corev1::Node {
        match self {
            Self::Added(node) | Self::Updated { new: node, .. } => *node,
        }
    }
}

/// Last delivered copy of every node, used to tell additions from updates.
///
/// Nodes absent from a relist and deleted nodes are forgotten, so a node that
/// comes back is reported as added again.
#[derive(Debug, Default)]
pub struct NodeCache {
    known: BTreeMap<String, corev1::Node>,
    relist: Option<BTreeMap<String, corev1::Node>>,
}

impl NodeCache {
    /// Folds one watcher event into the cache, returning the node event to deliver, if any.
    pub fn observe(&mut self, event: watcher::Event<corev1::Node>) -> Option<NodeEvent> {
        match event {
            watcher::Event::Init => {
                self.relist = Some(BTreeMap::new());
                None
            }
            watcher::Event::InitApply(node) => {
                let name = node.name_any();
                let old = self.known.get(&name).cloned();
                self.relist
                    .get_or_insert_with(BTreeMap::new)
                    .insert(name, node.clone());
                Some(NodeEvent::new(old, node))
            }
            watcher::Event::InitDone => {
                if let Some(relist) = self.relist.take() {
                    self.known = relist;
                }
                None
            }
            watcher::Event::Apply(node) => {
                let old = self.known.insert(node.name_any(), node.clone());
                Some(NodeEvent::new(old, node))
            }
            watcher::Event::Delete(node) => {
                self.known.remove(&node.name_any());
                None
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.known.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.known.is_empty()
    }
}

/// Whether the watch delivered something that does not decode as a node.
///
/// Retrying cannot help here, unlike transport and API failures.
pub(crate) fn is_malformed(error: &watcher::Error) -> bool {
    matches!(
        error,
        watcher::Error::InitialListFailed(kube::Error::SerdeError(_))
            | watcher::Error::WatchFailed(kube::Error::SerdeError(_))
    )
}
