//! Hostname resolution for mesh traffic and config
//!
//! Istio hostnames show up in three shapes:
//!
//! - a bare service name (`reviews`), relative to the caller's namespace
//! - a cluster-internal FQDN (`reviews.bookinfo.svc.cluster.local`)
//! - an external or ServiceEntry host (`www.example.com`), which may contain
//!   any number of dots
//!
//! [`HostResolver`] classifies a raw hostname into a [`Host`]. A hostname is
//! only decomposed into service/namespace/cluster when the decomposition can
//! be confirmed, either by the trailing labels matching the mesh identity
//! domain or, for two-label names, by the second label naming a namespace
//! known to exist. Anything else is kept verbatim as an external host.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

/// A resolved logical service identity.
///
/// When `complete_input` is false the hostname could not be decomposed:
/// `service` holds the original hostname verbatim and `namespace`/`cluster`
/// are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Host {
    /// Short service name, or the full hostname for external hosts
    pub service: String,
    /// Namespace the service lives in; empty for external hosts
    pub namespace: String,
    /// Cluster identity domain; empty for external hosts
    pub cluster: String,
    /// Whether service, namespace and cluster decompose the input
    pub complete_input: bool,
}

impl Host {
    /// Host that could not be attributed to a namespace.
    fn external(hostname: &str) -> Self {
        Self {
            service: hostname.to_string(),
            namespace: String::new(),
            cluster: String::new(),
            complete_input: false,
        }
    }

    fn complete(service: &str, namespace: &str, cluster: &str) -> Self {
        Self {
            service: service.to_string(),
            namespace: namespace.to_string(),
            cluster: cluster.to_string(),
            complete_input: true,
        }
    }

    /// True when the hostname was kept opaque (ServiceEntry or unrelated host).
    pub fn is_external(&self) -> bool {
        !self.complete_input
    }
}

/// Renders `service.namespace.cluster`.
///
/// The projection is unconditional: an external host renders as
/// `"<hostname>.."`. Check `complete_input` before trusting it.
impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.service, self.namespace, self.cluster)
    }
}

/// Classifies hostnames against a mesh identity domain.
///
/// Holds only the configured identity domain (e.g. `svc.cluster.local`),
/// which stands in whenever a caller passes an empty cluster. Cheap to clone
/// and safe to share across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostResolver {
    identity_domain: String,
}

impl HostResolver {
    /// Create a resolver defaulting empty clusters to `identity_domain`.
    pub fn new(identity_domain: impl Into<String>) -> Self {
        Self {
            identity_domain: identity_domain.into(),
        }
    }

    /// The identity domain used when no cluster is given.
    pub fn identity_domain(&self) -> &str {
        &self.identity_domain
    }

    fn resolve_cluster<'a>(&'a self, cluster: &'a str) -> &'a str {
        if cluster.is_empty() {
            &self.identity_domain
        } else {
            cluster
        }
    }

    /// Parse a hostname relative to `namespace` and `cluster`.
    ///
    /// - one label: a short name in `namespace`
    /// - three or more labels whose tail equals the cluster domain: an FQDN
    /// - anything else, including every two-label name: an external host
    pub fn parse_host(&self, hostname: &str, namespace: &str, cluster: &str) -> Host {
        let cluster = self.resolve_cluster(cluster);
        let labels: Vec<&str> = hostname.split('.').collect();

        let host = match labels.as_slice() {
            [service] => Host::complete(service, namespace, cluster),
            [service, ns, rest @ ..] if is_cluster_suffix(rest, cluster) => {
                Host::complete(service, ns, cluster)
            }
            _ => Host::external(hostname),
        };

        trace!(
            hostname,
            service = %host.service,
            namespace = %host.namespace,
            complete = host.complete_input,
            "parsed host"
        );
        host
    }

    /// Parse a hostname, using the cluster's namespaces to settle two-label names.
    ///
    /// `service.namespace` and `host.externaldomain` look alike. When the second
    /// label is the context namespace or one of `known_namespaces`, the name is
    /// taken as an in-cluster service. Every other input goes through
    /// [`parse_host`](Self::parse_host).
    pub fn get_host(
        &self,
        hostname: &str,
        namespace: &str,
        cluster: &str,
        known_namespaces: &HashSet<String>,
    ) -> Host {
        let labels: Vec<&str> = hostname.split('.').collect();
        if let [service, ns] = labels.as_slice() {
            if *ns == namespace || known_namespaces.contains(*ns) {
                trace!(hostname, namespace = %ns, "two-label host matched a cluster namespace");
                return Host::complete(service, ns, self.resolve_cluster(cluster));
            }
        }

        self.parse_host(hostname, namespace, cluster)
    }

    /// Resolve a batch of hostnames with [`get_host`](Self::get_host), keeping order.
    pub fn resolve_all<S: AsRef<str>>(
        &self,
        hostnames: &[S],
        namespace: &str,
        cluster: &str,
        known_namespaces: &HashSet<String>,
    ) -> Vec<Host> {
        hostnames
            .iter()
            .map(|h| self.get_host(h.as_ref(), namespace, cluster, known_namespaces))
            .collect()
    }
}

/// The joined trailing labels must be non-empty and equal the cluster domain.
fn is_cluster_suffix(labels: &[&str], cluster: &str) -> bool {
    let suffix = labels.join(".");
    !suffix.is_empty() && suffix == cluster
}

/// Collect namespace names into the set [`HostResolver::get_host`] expects.
pub fn namespace_set<I, S>(namespaces: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    namespaces.into_iter().map(Into::into).collect()
}
