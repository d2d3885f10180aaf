use super::*;

/// The public IP a node should advertise to flannel, and whether its
/// annotations have to be rewritten to get there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub public_ip: String,
    pub needs_update: bool,
}

impl Resolution {
    /// Sets both flannel annotations to the resolved public IP.
    ///
    /// Resolving again over the mutated annotations yields `needs_update == false`.
    pub fn apply(&self, annotations: &mut Annotations) {
        for key in FLANNEL_ANNOTATIONS {
            annotations.insert(key.to_string(), self.public_ip.clone());
        }
    }
}

/// Resolves the public IP of a node from its status addresses and annotations.
///
/// The first `ExternalIP` address wins, later ones are ignored. The external
/// address is usually only reported when a cloud provider controller runs in
/// the cluster, so without one the RKE `external-ip` annotation is used instead.
///
/// The annotation is taken as-is, even when empty.
///
/// Returns `None` when neither source yields an address. This is the normal
/// state of nodes without a public address and they should be left alone.
///
/// # Examples
///
/// ```
/// # use flannel_fixer::*;
/// let annotations = Annotations::from([(
///     RKE_EXTERNAL_IP_ANNOTATION.to_string(),
///     "198.51.100.9".to_string(),
/// )]);
/// let resolution = resolve(&[], &annotations).unwrap();
/// assert_eq!(resolution.public_ip, "198.51.100.9");
/// assert!(resolution.needs_update);
/// ```
pub fn resolve(addresses: &[corev1::NodeAddress], annotations: &Annotations) -> Option<Resolution> {
    let public_ip = external_ip(addresses)
        .or_else(|| annotations.get(RKE_EXTERNAL_IP_ANNOTATION).map(String::as_str))?
        .to_string();

    let needs_update = FLANNEL_ANNOTATIONS
        .iter()
        .any(|key| annotations.get(*key) != Some(&public_ip));

    Some(Resolution {
        public_ip,
        needs_update,
    })
}

/// First `ExternalIP` entry of the address list.
///
/// An empty address counts as no address at all.
pub fn external_ip(addresses: &[corev1::NodeAddress]) -> Option<&str> {
    addresses
        .iter()
        .find(|address| address.type_ == NODE_EXTERNAL_IP)
        .map(|address| address.address.as_str())
        .filter(|address| !address.is_empty())
}

#[cfg(test)]
mod tests;
