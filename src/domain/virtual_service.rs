//! VirtualService domain type
//!
//! A VirtualService is a named route declaration that advertises one or more
//! destination hosts. Only the fields the host checkers need are modelled.

use super::host::CanonicalHost;

/// Object type used in validation keys for VirtualServices.
pub const VIRTUAL_SERVICE_OBJECT_TYPE: &str = "virtualservice";

/// A route declaration advertising destination hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualService {
    pub name: String,

    /// Namespace from the manifest, if it carried one.
    pub namespace: Option<String>,

    pub hosts: Vec<String>,
}

impl VirtualService {
    pub fn new<N, I, H>(name: N, hosts: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = H>,
        H: Into<String>,
    {
        Self {
            name: name.into(),
            namespace: None,
            hosts: hosts.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_namespace<S: Into<String>>(mut self, namespace: S) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Hosts normalized against `namespace`, in declaration order.
    pub fn canonical_hosts<'a>(
        &'a self,
        namespace: &'a str,
    ) -> impl Iterator<Item = CanonicalHost> + 'a {
        self.hosts.iter().map(move |raw| CanonicalHost::parse(raw, namespace))
    }
}
