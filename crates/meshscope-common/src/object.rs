//! Istio config objects
//!
//! Objects are decoded into a single envelope whose `kind` is a closed enum
//! over the registry plus an [`ObjectKind::Other`] escape hatch for CRDs
//! meshscope doesn't know about. The `spec` stays untyped JSON so new or
//! unknown fields survive a decode/encode cycle.

use std::collections::HashSet;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::host::{Host, HostResolver};
use crate::registry::{self, IstioKind};
use crate::{Error, Result};

/// Kind of an Istio config object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ObjectKind {
    /// networking.istio.io Gateway
    Gateway,
    /// networking.istio.io VirtualService
    VirtualService,
    /// networking.istio.io DestinationRule
    DestinationRule,
    /// networking.istio.io ServiceEntry
    ServiceEntry,
    /// networking.istio.io Sidecar
    Sidecar,
    /// config.istio.io rule
    Rule,
    /// config.istio.io QuotaSpec
    QuotaSpec,
    /// config.istio.io QuotaSpecBinding
    QuotaSpecBinding,
    /// config.istio.io adapter
    Adapter,
    /// config.istio.io handler
    Handler,
    /// config.istio.io instance
    Instance,
    /// config.istio.io template
    Template,
    /// authentication.istio.io Policy
    Policy,
    /// authentication.istio.io MeshPolicy
    MeshPolicy,
    /// authentication.maistra.io ServiceMeshPolicy
    ServiceMeshPolicy,
    /// security.istio.io AuthorizationPolicy
    AuthorizationPolicy,
    /// rbac.istio.io ClusterRbacConfig
    ClusterRbacConfig,
    /// rbac.istio.io RbacConfig
    RbacConfig,
    /// rbac.istio.io ServiceRole
    ServiceRole,
    /// rbac.istio.io ServiceRoleBinding
    ServiceRoleBinding,
    /// rbac.maistra.io ServiceMeshRbacConfig
    ServiceMeshRbacConfig,
    /// Any kind outside the registry
    Other(String),
}

impl ObjectKind {
    /// Map a `kind` field to its variant. Matching is exact.
    pub fn from_kind(kind: &str) -> Self {
        match kind {
            "Gateway" => Self::Gateway,
            "VirtualService" => Self::VirtualService,
            "DestinationRule" => Self::DestinationRule,
            "ServiceEntry" => Self::ServiceEntry,
            "Sidecar" => Self::Sidecar,
            "rule" => Self::Rule,
            "QuotaSpec" => Self::QuotaSpec,
            "QuotaSpecBinding" => Self::QuotaSpecBinding,
            "adapter" => Self::Adapter,
            "handler" => Self::Handler,
            "instance" => Self::Instance,
            "template" => Self::Template,
            "Policy" => Self::Policy,
            "MeshPolicy" => Self::MeshPolicy,
            "ServiceMeshPolicy" => Self::ServiceMeshPolicy,
            "AuthorizationPolicy" => Self::AuthorizationPolicy,
            "ClusterRbacConfig" => Self::ClusterRbacConfig,
            "RbacConfig" => Self::RbacConfig,
            "ServiceRole" => Self::ServiceRole,
            "ServiceRoleBinding" => Self::ServiceRoleBinding,
            "ServiceMeshRbacConfig" => Self::ServiceMeshRbacConfig,
            other => Self::Other(other.to_string()),
        }
    }

    /// Registry entry for known kinds.
    pub fn registry_entry(&self) -> Option<&'static IstioKind> {
        let entry = match self {
            Self::Gateway => &registry::GATEWAY,
            Self::VirtualService => &registry::VIRTUAL_SERVICE,
            Self::DestinationRule => &registry::DESTINATION_RULE,
            Self::ServiceEntry => &registry::SERVICE_ENTRY,
            Self::Sidecar => &registry::SIDECAR,
            Self::Rule => &registry::RULE,
            Self::QuotaSpec => &registry::QUOTA_SPEC,
            Self::QuotaSpecBinding => &registry::QUOTA_SPEC_BINDING,
            Self::Adapter => &registry::ADAPTER,
            Self::Handler => &registry::HANDLER,
            Self::Instance => &registry::INSTANCE,
            Self::Template => &registry::TEMPLATE,
            Self::Policy => &registry::POLICY,
            Self::MeshPolicy => &registry::MESH_POLICY,
            Self::ServiceMeshPolicy => &registry::SERVICE_MESH_POLICY,
            Self::AuthorizationPolicy => &registry::AUTHORIZATION_POLICY,
            Self::ClusterRbacConfig => &registry::CLUSTER_RBAC_CONFIG,
            Self::RbacConfig => &registry::RBAC_CONFIG,
            Self::ServiceRole => &registry::SERVICE_ROLE,
            Self::ServiceRoleBinding => &registry::SERVICE_ROLE_BINDING,
            Self::ServiceMeshRbacConfig => &registry::SERVICE_MESH_RBAC_CONFIG,
            Self::Other(_) => return None,
        };
        Some(entry)
    }

    /// The `kind` string as it appears on the wire.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Other(kind) => kind,
            known => known.registry_entry().map(|e| e.kind).unwrap_or_default(),
        }
    }

    /// True for kinds outside the registry.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Other(_))
    }
}

impl From<String> for ObjectKind {
    fn from(kind: String) -> Self {
        match Self::from_kind(&kind) {
            Self::Other(_) => Self::Other(kind),
            known => known,
        }
    }
}

impl From<ObjectKind> for String {
    fn from(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Other(kind) => kind,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An Istio config object with an untyped spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IstioObject {
    /// `group/version` of the object
    #[serde(default)]
    pub api_version: String,
    /// Object kind
    pub kind: ObjectKind,
    /// Standard object metadata
    #[serde(default)]
    pub metadata: ObjectMeta,
    /// Spec payload, kept as raw JSON
    #[serde(default)]
    pub spec: Map<String, Value>,
}

impl IstioObject {
    /// Object name, or empty when unset.
    pub fn name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or_default()
    }

    /// Object namespace, or empty when unset.
    pub fn namespace(&self) -> &str {
        self.metadata.namespace.as_deref().unwrap_or_default()
    }

    /// Hostnames named by the spec.
    ///
    /// VirtualServices and ServiceEntries list them under `spec.hosts`;
    /// DestinationRules target a single `spec.host`. Other kinds have none.
    /// Non-string entries are skipped.
    pub fn spec_hosts(&self) -> Vec<&str> {
        match self.kind {
            ObjectKind::VirtualService | ObjectKind::ServiceEntry => self
                .spec
                .get("hosts")
                .and_then(Value::as_array)
                .map(|hosts| hosts.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default(),
            ObjectKind::DestinationRule => self
                .spec
                .get("host")
                .and_then(Value::as_str)
                .into_iter()
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Resolve every spec host relative to the object's own namespace.
    pub fn resolve_hosts(
        &self,
        resolver: &HostResolver,
        known_namespaces: &HashSet<String>,
    ) -> Vec<Host> {
        resolver.resolve_all(&self.spec_hosts(), self.namespace(), "", known_namespaces)
    }
}

/// A list wrapper as returned by collection GETs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IstioObjectList {
    /// `group/version` of the list
    #[serde(default)]
    pub api_version: String,
    /// List kind, e.g. `VirtualServiceList`
    #[serde(default)]
    pub kind: String,
    /// Items in the list
    #[serde(default)]
    pub items: Vec<IstioObject>,
}

/// Decode every object in a (possibly multi-document) YAML or JSON manifest.
///
/// List documents (`items:`) are flattened; empty documents are skipped.
pub fn parse_manifests(input: &str) -> Result<Vec<IstioObject>> {
    let mut objects = Vec::new();

    for document in serde_yaml::Deserializer::from_str(input) {
        let value = serde_yaml::Value::deserialize(document)?;
        if value.is_null() {
            continue;
        }

        let kind = value
            .get("kind")
            .and_then(serde_yaml::Value::as_str)
            .unwrap_or_default()
            .to_string();

        if value.get("items").is_some() {
            let list: IstioObjectList = serde_yaml::from_value(value)
                .map_err(|e| Error::serialization_for_kind(&kind, e.to_string()))?;
            objects.extend(list.items);
        } else {
            let object: IstioObject = serde_yaml::from_value(value)
                .map_err(|e| Error::serialization_for_kind(&kind, e.to_string()))?;
            objects.push(object);
        }
    }

    debug!(count = objects.len(), "parsed istio objects");
    Ok(objects)
}

// =============================================================================
// Grouping wrappers
// =============================================================================

/// Istio traffic objects related to a service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IstioDetails {
    /// VirtualServices
    #[serde(rename = "virtualservices")]
    pub virtual_services: Vec<IstioObject>,
    /// DestinationRules
    #[serde(rename = "destinationrules")]
    pub destination_rules: Vec<IstioObject>,
    /// ServiceEntries
    #[serde(rename = "serviceentries")]
    pub service_entries: Vec<IstioObject>,
    /// Gateways
    #[serde(rename = "gateways")]
    pub gateways: Vec<IstioObject>,
}

impl IstioDetails {
    /// File an object under its kind. Returns false for unrelated kinds.
    pub fn push(&mut self, object: IstioObject) -> bool {
        let bucket = match object.kind {
            ObjectKind::VirtualService => &mut self.virtual_services,
            ObjectKind::DestinationRule => &mut self.destination_rules,
            ObjectKind::ServiceEntry => &mut self.service_entries,
            ObjectKind::Gateway => &mut self.gateways,
            _ => return false,
        };
        bucket.push(object);
        true
    }
}

/// Objects that configure mTLS outside a single service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MtlsDetails {
    /// DestinationRules
    #[serde(rename = "destinationrules")]
    pub destination_rules: Vec<IstioObject>,
    /// MeshPolicies
    #[serde(rename = "meshpolicies")]
    pub mesh_policies: Vec<IstioObject>,
    /// ServiceMeshPolicies
    #[serde(rename = "servicemeshpolicies")]
    pub service_mesh_policies: Vec<IstioObject>,
    /// Policies
    #[serde(rename = "policies")]
    pub policies: Vec<IstioObject>,
}

impl MtlsDetails {
    /// File an object under its kind. Returns false for unrelated kinds.
    pub fn push(&mut self, object: IstioObject) -> bool {
        let bucket = match object.kind {
            ObjectKind::DestinationRule => &mut self.destination_rules,
            ObjectKind::MeshPolicy => &mut self.mesh_policies,
            ObjectKind::ServiceMeshPolicy => &mut self.service_mesh_policies,
            ObjectKind::Policy => &mut self.policies,
            _ => return false,
        };
        bucket.push(object);
        true
    }
}

/// Objects related to Istio RBAC and authorization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RbacDetails {
    /// ClusterRbacConfigs
    #[serde(rename = "clusterrbacconfigs")]
    pub cluster_rbac_configs: Vec<IstioObject>,
    /// ServiceMeshRbacConfigs
    #[serde(rename = "servicemeshrbacconfigs")]
    pub service_mesh_rbac_configs: Vec<IstioObject>,
    /// ServiceRoles
    #[serde(rename = "serviceroles")]
    pub service_roles: Vec<IstioObject>,
    /// ServiceRoleBindings
    #[serde(rename = "servicerolebindings")]
    pub service_role_bindings: Vec<IstioObject>,
    /// AuthorizationPolicies
    #[serde(rename = "authorizationpolicies")]
    pub authorization_policies: Vec<IstioObject>,
}

impl RbacDetails {
    /// File an object under its kind. Returns false for unrelated kinds.
    pub fn push(&mut self, object: IstioObject) -> bool {
        let bucket = match object.kind {
            ObjectKind::ClusterRbacConfig => &mut self.cluster_rbac_configs,
            ObjectKind::ServiceMeshRbacConfig => &mut self.service_mesh_rbac_configs,
            ObjectKind::ServiceRole => &mut self.service_roles,
            ObjectKind::ServiceRoleBinding => &mut self.service_role_bindings,
            ObjectKind::AuthorizationPolicy => &mut self.authorization_policies,
            _ => return false,
        };
        bucket.push(object);
        true
    }
}
