//! Hosts command - resolve every host referenced by a manifest
//!
//! Namespaces of the objects in the manifest count as known namespaces, on
//! top of any passed with `--known-namespace`. A VirtualService in
//! `bookinfo` that routes to `ratings.bookinfo` therefore resolves to the
//! in-cluster service even without extra flags.

use std::collections::HashSet;
use std::path::PathBuf;

use clap::Args;
use meshscope_common::object::parse_manifests;
use meshscope_common::{namespace_set, Host, HostResolver, IstioObject};
use serde::Serialize;
use tracing::{debug, info};

use super::format::{describe_host, print_table};
use super::OutputFormat;
use crate::Result;

/// Resolve hosts in a manifest
#[derive(Args, Debug)]
pub struct HostsArgs {
    /// Path to a YAML or JSON manifest of Istio objects
    pub manifest: PathBuf,

    /// Namespace known to exist in the cluster (repeatable)
    #[arg(long = "known-namespace")]
    pub known_namespaces: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// A spec host paired with the object that names it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedHost {
    /// Kind of the referencing object
    pub kind: String,
    /// Namespace of the referencing object
    pub namespace: String,
    /// Name of the referencing object
    pub name: String,
    /// Hostname as written in the spec
    pub hostname: String,
    /// Resolution result
    pub host: Host,
}

/// Namespaces given on the command line plus those the objects live in.
fn known_namespaces(extra: &[String], objects: &[IstioObject]) -> HashSet<String> {
    let mut known = namespace_set(extra.iter().cloned());
    known.extend(
        objects
            .iter()
            .map(|o| o.namespace())
            .filter(|ns| !ns.is_empty())
            .map(str::to_string),
    );
    known
}

/// Resolve every spec host of every object.
pub fn resolve_objects(
    objects: &[IstioObject],
    extra_namespaces: &[String],
    resolver: &HostResolver,
) -> Vec<ResolvedHost> {
    let known = known_namespaces(extra_namespaces, objects);
    debug!(known = known.len(), "resolving manifest hosts");

    objects
        .iter()
        .flat_map(|object| {
            let hosts = object.resolve_hosts(resolver, &known);
            object
                .spec_hosts()
                .into_iter()
                .zip(hosts)
                .map(|(hostname, host)| ResolvedHost {
                    kind: object.kind.to_string(),
                    namespace: object.namespace().to_string(),
                    name: object.name().to_string(),
                    hostname: hostname.to_string(),
                    host,
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Run the hosts command
pub async fn run(args: HostsArgs, resolver: &HostResolver) -> Result<()> {
    let input = tokio::fs::read_to_string(&args.manifest).await?;
    let objects = parse_manifests(&input)?;
    let resolved = resolve_objects(&objects, &args.known_namespaces, resolver);
    info!(
        manifest = %args.manifest.display(),
        objects = objects.len(),
        hosts = resolved.len(),
        "resolved manifest hosts"
    );

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&resolved)?),
        OutputFormat::Text => {
            let rows: Vec<Vec<String>> = resolved
                .iter()
                .map(|r| {
                    vec![
                        r.kind.clone(),
                        format!("{}/{}", r.namespace, r.name),
                        r.hostname.clone(),
                        describe_host(&r.host),
                    ]
                })
                .collect();
            print_table(&["KIND", "OBJECT", "HOST", "RESOLVED"], &rows);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MANIFEST: &str = r#"
apiVersion: networking.istio.io/v1alpha3
kind: VirtualService
metadata:
  name: reviews
  namespace: bookinfo
spec:
  hosts:
  - reviews
  - details.shop
  - api.example.com
---
apiVersion: networking.istio.io/v1alpha3
kind: Gateway
metadata:
  name: ingress
  namespace: istio-system
spec:
  servers: []
"#;

    #[test]
    fn manifest_namespaces_are_known() {
        let objects = parse_manifests(MANIFEST).unwrap();
        let known = known_namespaces(&["shop".to_string()], &objects);
        assert!(known.contains("bookinfo"));
        assert!(known.contains("istio-system"));
        assert!(known.contains("shop"));
    }

    #[test]
    fn resolves_each_spec_host() {
        let objects = parse_manifests(MANIFEST).unwrap();
        let resolver = HostResolver::new("svc.cluster.local");

        let resolved = resolve_objects(&objects, &[], &resolver);
        assert_eq!(resolved.len(), 3);
        assert!(resolved.iter().all(|r| r.kind == "VirtualService"));
        assert_eq!(resolved[0].host.to_string(), "reviews.bookinfo.svc.cluster.local");
        // "shop" is not a known namespace without the flag
        assert!(resolved[1].host.is_external());
        assert!(resolved[2].host.is_external());

        let resolved = resolve_objects(&objects, &["shop".to_string()], &resolver);
        assert_eq!(resolved[1].host.to_string(), "details.shop.svc.cluster.local");
    }

    #[tokio::test]
    async fn run_reads_manifest_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", MANIFEST).unwrap();

        let args = HostsArgs {
            manifest: file.path().to_path_buf(),
            known_namespaces: vec![],
            output: OutputFormat::Json,
        };
        run(args, &HostResolver::new("svc.cluster.local"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn run_fails_on_missing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let args = HostsArgs {
            manifest: dir.path().join("missing.yaml"),
            known_namespaces: vec![],
            output: OutputFormat::Text,
        };
        let err = run(args, &HostResolver::new("svc.cluster.local"))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }
}
