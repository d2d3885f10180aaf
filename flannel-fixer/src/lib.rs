use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;

use constcat::concat;
use k8s_openapi::api::core::v1 as corev1;

pub use diff::AnnotationChange;
pub use diff::diff_annotations;
pub use resolver::Resolution;
pub use resolver::external_ip;
pub use resolver::resolve;

pub const RKE_ANNOTATION_PREFIX: &str = "rke.cattle.io";
pub const FLANNEL_ANNOTATION_PREFIX: &str = "flannel.alpha.coreos.com";

/// Set by RKE on nodes provisioned with an explicit external address
pub const RKE_EXTERNAL_IP_ANNOTATION: &str = concat!(RKE_ANNOTATION_PREFIX, "/external-ip");
pub const FLANNEL_PUBLIC_IP_ANNOTATION: &str = concat!(FLANNEL_ANNOTATION_PREFIX, "/public-ip");
pub const FLANNEL_PUBLIC_IP_OVERRIDE_ANNOTATION: &str =
    concat!(FLANNEL_ANNOTATION_PREFIX, "/public-ip-overwrite");

/// The annotations kept equal to the node's public IP
pub const FLANNEL_ANNOTATIONS: [&str; 2] = [
    FLANNEL_PUBLIC_IP_ANNOTATION,
    FLANNEL_PUBLIC_IP_OVERRIDE_ANNOTATION,
];

/// `NodeAddress.type` of an externally reachable address
pub const NODE_EXTERNAL_IP: &str = "ExternalIP";

pub type Annotations = BTreeMap<String, String>;

mod diff;
mod resolver;
