//! Host command - resolve a single hostname

use clap::Args;
use meshscope_common::{namespace_set, Host, HostResolver};

use super::format::{describe_host, print_table};
use super::OutputFormat;
use crate::Result;

/// Resolve a hostname
#[derive(Args, Debug)]
pub struct HostArgs {
    /// Hostname as seen in traffic or config
    pub hostname: String,

    /// Namespace the hostname is relative to
    #[arg(short, long, default_value = "default")]
    pub namespace: String,

    /// Cluster identity domain (default: configured domain)
    #[arg(long, default_value = "")]
    pub cluster: String,

    /// Namespace known to exist in the cluster (repeatable)
    #[arg(long = "known-namespace")]
    pub known_namespaces: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Resolve the hostname described by `args`.
pub fn resolve(args: &HostArgs, resolver: &HostResolver) -> Host {
    let known = namespace_set(args.known_namespaces.iter().cloned());
    resolver.get_host(&args.hostname, &args.namespace, &args.cluster, &known)
}

/// Run the host command
pub fn run(args: HostArgs, resolver: &HostResolver) -> Result<()> {
    let host = resolve(&args, resolver);

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&host)?),
        OutputFormat::Text => print_table(
            &["SERVICE", "NAMESPACE", "CLUSTER", "RESOLVED"],
            &[vec![
                host.service.clone(),
                host.namespace.clone(),
                host.cluster.clone(),
                describe_host(&host),
            ]],
        ),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(hostname: &str, known: &[&str]) -> HostArgs {
        HostArgs {
            hostname: hostname.to_string(),
            namespace: "default".to_string(),
            cluster: String::new(),
            known_namespaces: known.iter().map(|s| s.to_string()).collect(),
            output: OutputFormat::Text,
        }
    }

    #[test]
    fn known_namespace_flag_settles_two_labels() {
        let resolver = HostResolver::new("svc.cluster.local");

        let host = resolve(&args("reviews.bookinfo", &["bookinfo"]), &resolver);
        assert!(host.complete_input);
        assert_eq!(host.namespace, "bookinfo");

        let host = resolve(&args("reviews.bookinfo", &[]), &resolver);
        assert!(!host.complete_input);
    }

    #[test]
    fn empty_cluster_uses_configured_domain() {
        let resolver = HostResolver::new("mesh.internal");
        let host = resolve(&args("reviews", &[]), &resolver);
        assert_eq!(host.to_string(), "reviews.default.mesh.internal");
    }
}
