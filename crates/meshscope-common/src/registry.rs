//! Istio type registry
//!
//! Static tables mapping Istio API group-versions to the object kinds they
//! define, and REST plural names to singular kinds. Every string here is an
//! identifier understood by the Kubernetes API server (resource paths and
//! `kind` fields), so casing and pluralization must match byte-for-byte.

use kube::core::ApiResource;

// =============================================================================
// Group Versions
// =============================================================================

/// An API group paired with a version, e.g. `networking.istio.io` / `v1alpha3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupVersion {
    /// API group
    pub group: &'static str,
    /// API version within the group
    pub version: &'static str,
}

impl GroupVersion {
    /// Combined `group/version` string as used in an object's `apiVersion`.
    pub fn api_version(&self) -> String {
        format!("{}/{}", self.group, self.version)
    }
}

impl std::fmt::Display for GroupVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.group, self.version)
    }
}

/// Mixer config group (rules, quotas, adapters, templates).
pub const CONFIG_GROUP_VERSION: GroupVersion = GroupVersion {
    group: "config.istio.io",
    version: "v1alpha2",
};
/// `apiVersion` for [`CONFIG_GROUP_VERSION`].
pub const API_CONFIG_VERSION: &str = "config.istio.io/v1alpha2";

/// Traffic management group.
pub const NETWORKING_GROUP_VERSION: GroupVersion = GroupVersion {
    group: "networking.istio.io",
    version: "v1alpha3",
};
/// `apiVersion` for [`NETWORKING_GROUP_VERSION`].
pub const API_NETWORKING_VERSION: &str = "networking.istio.io/v1alpha3";

/// Authentication policy group.
pub const AUTHENTICATION_GROUP_VERSION: GroupVersion = GroupVersion {
    group: "authentication.istio.io",
    version: "v1alpha1",
};
/// `apiVersion` for [`AUTHENTICATION_GROUP_VERSION`].
pub const API_AUTHENTICATION_VERSION: &str = "authentication.istio.io/v1alpha1";

/// Legacy Istio RBAC group.
pub const RBAC_GROUP_VERSION: GroupVersion = GroupVersion {
    group: "rbac.istio.io",
    version: "v1alpha1",
};
/// `apiVersion` for [`RBAC_GROUP_VERSION`].
pub const API_RBAC_VERSION: &str = "rbac.istio.io/v1alpha1";

/// Maistra (OpenShift Service Mesh) authentication group.
pub const MAISTRA_AUTHENTICATION_GROUP_VERSION: GroupVersion = GroupVersion {
    group: "authentication.maistra.io",
    version: "v1",
};
/// `apiVersion` for [`MAISTRA_AUTHENTICATION_GROUP_VERSION`].
pub const API_MAISTRA_AUTHENTICATION_VERSION: &str = "authentication.maistra.io/v1";

/// Maistra (OpenShift Service Mesh) RBAC group.
pub const MAISTRA_RBAC_GROUP_VERSION: GroupVersion = GroupVersion {
    group: "rbac.maistra.io",
    version: "v1",
};
/// `apiVersion` for [`MAISTRA_RBAC_GROUP_VERSION`].
pub const API_MAISTRA_RBAC_VERSION: &str = "rbac.maistra.io/v1";

/// Security (authorization policy) group.
pub const SECURITY_GROUP_VERSION: GroupVersion = GroupVersion {
    group: "security.istio.io",
    version: "v1beta1",
};
/// `apiVersion` for [`SECURITY_GROUP_VERSION`].
pub const API_SECURITY_VERSION: &str = "security.istio.io/v1beta1";

// =============================================================================
// Kubernetes Workload Kinds
// =============================================================================

/// Built-in controller and workload kinds the console groups traffic by.
pub mod workload {
    /// batch/v1 CronJob
    pub const CRON_JOB: &str = "CronJob";
    /// apps/v1 Deployment
    pub const DEPLOYMENT: &str = "Deployment";
    /// OpenShift DeploymentConfig
    pub const DEPLOYMENT_CONFIG: &str = "DeploymentConfig";
    /// batch/v1 Job
    pub const JOB: &str = "Job";
    /// v1 Pod
    pub const POD: &str = "Pod";
    /// v1 ReplicationController
    pub const REPLICATION_CONTROLLER: &str = "ReplicationController";
    /// apps/v1 ReplicaSet
    pub const REPLICA_SET: &str = "ReplicaSet";
    /// v1 Service
    pub const SERVICE: &str = "Service";
    /// apps/v1 StatefulSet
    pub const STATEFUL_SET: &str = "StatefulSet";
}

// =============================================================================
// Istio Kinds
// =============================================================================

/// A registered Istio object kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IstioKind {
    /// Singular kind, as in an object's `kind` field
    pub kind: &'static str,
    /// Kind of the list wrapper returned by collection GETs
    pub list_kind: &'static str,
    /// REST resource (plural) name
    pub plural: &'static str,
}

const fn istio_kind(kind: &'static str, list_kind: &'static str, plural: &'static str) -> IstioKind {
    IstioKind {
        kind,
        list_kind,
        plural,
    }
}

// Networking
/// networking.istio.io Gateway
pub const GATEWAY: IstioKind = istio_kind("Gateway", "GatewayList", "gateways");
/// networking.istio.io VirtualService
pub const VIRTUAL_SERVICE: IstioKind =
    istio_kind("VirtualService", "VirtualServiceList", "virtualservices");
/// networking.istio.io DestinationRule
pub const DESTINATION_RULE: IstioKind =
    istio_kind("DestinationRule", "DestinationRuleList", "destinationrules");
/// networking.istio.io ServiceEntry
pub const SERVICE_ENTRY: IstioKind =
    istio_kind("ServiceEntry", "ServiceEntryList", "serviceentries");
/// networking.istio.io Sidecar
pub const SIDECAR: IstioKind = istio_kind("Sidecar", "SidecarList", "sidecars");

// Config
/// config.istio.io rule
pub const RULE: IstioKind = istio_kind("rule", "ruleList", "rules");
/// config.istio.io QuotaSpec
pub const QUOTA_SPEC: IstioKind = istio_kind("QuotaSpec", "QuotaSpecList", "quotaspecs");
/// config.istio.io QuotaSpecBinding
pub const QUOTA_SPEC_BINDING: IstioKind =
    istio_kind("QuotaSpecBinding", "QuotaSpecBindingList", "quotaspecbindings");

// Adapters
/// config.istio.io adapter
pub const ADAPTER: IstioKind = istio_kind("adapter", "adapterList", "adapters");
/// config.istio.io handler
pub const HANDLER: IstioKind = istio_kind("handler", "handlerList", "handlers");

// Templates
/// config.istio.io instance
pub const INSTANCE: IstioKind = istio_kind("instance", "instanceList", "instances");
/// config.istio.io template
pub const TEMPLATE: IstioKind = istio_kind("template", "templateList", "templates");

// Authentication
/// authentication.istio.io Policy
pub const POLICY: IstioKind = istio_kind("Policy", "PolicyList", "policies");
/// authentication.istio.io MeshPolicy
pub const MESH_POLICY: IstioKind = istio_kind("MeshPolicy", "MeshPolicyList", "meshpolicies");
/// authentication.maistra.io ServiceMeshPolicy
pub const SERVICE_MESH_POLICY: IstioKind = istio_kind(
    "ServiceMeshPolicy",
    "ServiceMeshPolicyList",
    "servicemeshpolicies",
);

// Security
/// security.istio.io AuthorizationPolicy
pub const AUTHORIZATION_POLICY: IstioKind = istio_kind(
    "AuthorizationPolicy",
    "AuthorizationPolicyList",
    "authorizationpolicies",
);

// Rbac
/// rbac.istio.io ClusterRbacConfig
pub const CLUSTER_RBAC_CONFIG: IstioKind = istio_kind(
    "ClusterRbacConfig",
    "ClusterRbacConfigList",
    "clusterrbacconfigs",
);
/// rbac.istio.io RbacConfig
pub const RBAC_CONFIG: IstioKind = istio_kind("RbacConfig", "RbacConfigList", "rbacconfigs");
/// rbac.istio.io ServiceRole
pub const SERVICE_ROLE: IstioKind = istio_kind("ServiceRole", "ServiceRoleList", "serviceroles");
/// rbac.istio.io ServiceRoleBinding
pub const SERVICE_ROLE_BINDING: IstioKind = istio_kind(
    "ServiceRoleBinding",
    "ServiceRoleBindingList",
    "servicerolebindings",
);
/// rbac.maistra.io ServiceMeshRbacConfig
pub const SERVICE_MESH_RBAC_CONFIG: IstioKind = istio_kind(
    "ServiceMeshRbacConfig",
    "ServiceMeshRbacConfigList",
    "servicemeshrbacconfigs",
);

const NETWORKING_KINDS: &[IstioKind] = &[
    GATEWAY,
    VIRTUAL_SERVICE,
    DESTINATION_RULE,
    SERVICE_ENTRY,
    SIDECAR,
];

// Quota specs depend on the quota template but are not templates themselves
const CONFIG_KINDS: &[IstioKind] = &[RULE, QUOTA_SPEC, QUOTA_SPEC_BINDING];

const AUTHENTICATION_KINDS: &[IstioKind] = &[POLICY, MESH_POLICY];

const MAISTRA_AUTHENTICATION_KINDS: &[IstioKind] = &[SERVICE_MESH_POLICY];

const SECURITY_KINDS: &[IstioKind] = &[AUTHORIZATION_POLICY];

const ADAPTER_KINDS: &[IstioKind] = &[ADAPTER, HANDLER];

const TEMPLATE_KINDS: &[IstioKind] = &[INSTANCE, TEMPLATE];

const RBAC_KINDS: &[IstioKind] = &[
    CLUSTER_RBAC_CONFIG,
    RBAC_CONFIG,
    SERVICE_ROLE,
    SERVICE_ROLE_BINDING,
];

const MAISTRA_RBAC_KINDS: &[IstioKind] = &[SERVICE_MESH_RBAC_CONFIG];

// =============================================================================
// Config Domains
// =============================================================================

/// Logical grouping of Istio config, each served under one group-version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigDomain {
    /// Gateways, VirtualServices, DestinationRules, ServiceEntries, Sidecars
    Networking,
    /// Mixer rules and quota specs
    Config,
    /// Mixer adapters and handlers
    Adapters,
    /// Mixer instances and templates
    Templates,
    /// Authentication policies
    Authentication,
    /// Maistra authentication policies
    MaistraAuthentication,
    /// Authorization policies
    Security,
    /// Legacy Istio RBAC
    Rbac,
    /// Maistra RBAC
    MaistraRbac,
}

impl ConfigDomain {
    /// Every domain, in registry order.
    pub const ALL: &'static [ConfigDomain] = &[
        Self::Networking,
        Self::Config,
        Self::Adapters,
        Self::Templates,
        Self::Authentication,
        Self::MaistraAuthentication,
        Self::Security,
        Self::Rbac,
        Self::MaistraRbac,
    ];

    /// The group-version serving this domain's kinds.
    pub fn group_version(&self) -> GroupVersion {
        match self {
            Self::Networking => NETWORKING_GROUP_VERSION,
            Self::Config | Self::Adapters | Self::Templates => CONFIG_GROUP_VERSION,
            Self::Authentication => AUTHENTICATION_GROUP_VERSION,
            Self::MaistraAuthentication => MAISTRA_AUTHENTICATION_GROUP_VERSION,
            Self::Security => SECURITY_GROUP_VERSION,
            Self::Rbac => RBAC_GROUP_VERSION,
            Self::MaistraRbac => MAISTRA_RBAC_GROUP_VERSION,
        }
    }

    /// Kinds registered under this domain.
    pub fn kinds(&self) -> &'static [IstioKind] {
        match self {
            Self::Networking => NETWORKING_KINDS,
            Self::Config => CONFIG_KINDS,
            Self::Adapters => ADAPTER_KINDS,
            Self::Templates => TEMPLATE_KINDS,
            Self::Authentication => AUTHENTICATION_KINDS,
            Self::MaistraAuthentication => MAISTRA_AUTHENTICATION_KINDS,
            Self::Security => SECURITY_KINDS,
            Self::Rbac => RBAC_KINDS,
            Self::MaistraRbac => MAISTRA_RBAC_KINDS,
        }
    }

    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Networking => "networking",
            Self::Config => "config",
            Self::Adapters => "adapters",
            Self::Templates => "templates",
            Self::Authentication => "authentication",
            Self::MaistraAuthentication => "maistra-authentication",
            Self::Security => "security",
            Self::Rbac => "rbac",
            Self::MaistraRbac => "maistra-rbac",
        }
    }
}

impl std::str::FromStr for ConfigDomain {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|d| d.as_str() == lower)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|d| d.as_str()).collect();
                crate::Error::validation(format!(
                    "invalid config domain: {s}, expected one of: {}",
                    names.join(", ")
                ))
            })
    }
}

impl std::fmt::Display for ConfigDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Lookups
// =============================================================================

/// Singular kind for a REST plural name, e.g. `virtualservices` -> `VirtualService`.
pub fn kind_for_plural(plural: &str) -> Option<&'static str> {
    ConfigDomain::ALL
        .iter()
        .flat_map(|d| d.kinds())
        .find(|k| k.plural == plural)
        .map(|k| k.kind)
}

/// Plural name for a singular kind.
///
/// Only adapter and template kinds are covered: the plural is needed to
/// fetch handler and instance details, and nothing else asks for it.
pub fn plural_for_kind(kind: &str) -> Option<&'static str> {
    ADAPTER_KINDS
        .iter()
        .chain(TEMPLATE_KINDS)
        .find(|k| k.kind == kind)
        .map(|k| k.plural)
}

/// Locate a kind's registry entry and the domain that owns it.
pub fn lookup_kind(kind: &str) -> Option<(ConfigDomain, &'static IstioKind)> {
    ConfigDomain::ALL.iter().find_map(|d| {
        d.kinds()
            .iter()
            .find(|k| k.kind == kind)
            .map(|entry| (*d, entry))
    })
}

/// Build a kube-rs [`ApiResource`] for a registered kind.
///
/// Returns `None` for kinds outside the registry; no API discovery is done.
pub fn api_resource(kind: &str) -> Option<ApiResource> {
    let (domain, entry) = lookup_kind(kind)?;
    let gv = domain.group_version();
    Some(ApiResource {
        group: gv.group.to_string(),
        version: gv.version.to_string(),
        api_version: gv.api_version(),
        kind: entry.kind.to_string(),
        plural: entry.plural.to_string(),
    })
}
