pub use k8s_openapi as openapi;
pub use k8s_openapi::api::core::v1 as corev1;
pub use k8s_openapi::apimachinery::pkg::apis::meta::v1 as metav1;

pub use node::NodeAddressExt;
pub use node::NodeExt;

use flannel_fixer::Annotations;
use flannel_fixer::Resolution;

mod node;

pub trait ObjectMetaExt {
    fn new(name: impl ToString) -> Self;
    fn annotated<K, V>(self, annotations: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: ToString,
        V: ToString;
    fn versioned(self, resource_version: impl ToString) -> Self;
}

impl ObjectMetaExt for metav1::ObjectMeta {
    fn new(name: impl ToString) -> Self {
        let name = Some(name.to_string());
        Self { name, ..default() }
    }

    fn annotated<K, V>(mut self, annotations: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: ToString,
        V: ToString,
    {
        self.annotations
            .get_or_insert_with(default)
            .extend(annotations.into_iter().map(|(k, v)| (k.to_string(), v.to_string())));
        self
    }

    fn versioned(self, resource_version: impl ToString) -> Self {
        Self {
            resource_version: Some(resource_version.to_string()),
            ..self
        }
    }
}

pub fn default<T: Default>() -> T {
    T::default()
}
