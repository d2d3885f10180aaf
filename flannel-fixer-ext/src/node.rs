use super::*;

pub trait NodeExt {
    fn new(name: impl ToString) -> Self;
    fn with_metadata(self, metadata: metav1::ObjectMeta) -> Self;
    fn with_addresses(self, addresses: impl IntoIterator<Item = corev1::NodeAddress>) -> Self;
    fn addresses(&self) -> &[corev1::NodeAddress];
    fn resolve_public_ip(&self) -> Option<Resolution>;
    fn set_public_ip(&mut self, resolution: &Resolution);
}

impl NodeExt for corev1::Node {
    fn new(name: impl ToString) -> Self {
        let metadata = metav1::ObjectMeta::new(name);
        Self {
            metadata,
            ..default()
        }
    }

    fn with_metadata(self, metadata: metav1::ObjectMeta) -> Self {
        Self { metadata, ..self }
    }

    fn with_addresses(mut self, addresses: impl IntoIterator<Item = corev1::NodeAddress>) -> Self {
        self.status
            .get_or_insert_with(default)
            .addresses
            .get_or_insert_with(default)
            .extend(addresses);
        self
    }

    /// Status addresses in the order reported by the kubelet.
    fn addresses(&self) -> &[corev1::NodeAddress] {
        self.status
            .as_ref()
            .and_then(|status| status.addresses.as_deref())
            .unwrap_or_default()
    }

    /// Runs the annotation resolver over this node's current state.
    ///
    /// # Examples
    ///
    /// ```
    /// use flannel_fixer_ext::{NodeAddressExt as _, NodeExt as _, corev1};
    ///
    /// let node = corev1::Node::new("worker-1")
    ///     .with_addresses([corev1::NodeAddress::external("203.0.113.5")]);
    /// let resolution = node.resolve_public_ip().unwrap();
    /// assert_eq!(resolution.public_ip, "203.0.113.5");
    /// ```
    fn resolve_public_ip(&self) -> Option<Resolution> {
        let empty = Annotations::new();
        let annotations = self.metadata.annotations.as_ref().unwrap_or(&empty);
        flannel_fixer::resolve(self.addresses(), annotations)
    }

    fn set_public_ip(&mut self, resolution: &Resolution) {
        let annotations = self.metadata.annotations.get_or_insert_with(default);
        resolution.apply(annotations);
    }
}

pub trait NodeAddressExt: Sized {
    fn new(type_: impl ToString, address: impl ToString) -> Self;

    fn external(address: impl ToString) -> Self {
        Self::new(flannel_fixer::NODE_EXTERNAL_IP, address)
    }

    fn internal(address: impl ToString) -> Self {
        Self::new("InternalIP", address)
    }
}

impl NodeAddressExt for corev1::NodeAddress {
    fn new(type_: impl ToString, address: impl ToString) -> Self {
        Self {
            address: address.to_string(),
            type_: type_.to_string(),
        }
    }
}
