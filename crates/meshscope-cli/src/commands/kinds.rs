//! Registry lookups - kind, plural, kinds

use clap::Args;
use meshscope_common::registry::{self, ConfigDomain};

use super::format::print_table;
use crate::{Error, Result};

/// List registered kinds
#[derive(Args, Debug)]
pub struct KindsArgs {
    /// Only show one config domain (e.g. networking, rbac)
    #[arg(short, long)]
    pub domain: Option<ConfigDomain>,
}

/// Run the kind command
pub fn run_kind(plural: &str) -> Result<()> {
    let kind =
        registry::kind_for_plural(plural).ok_or_else(|| Error::not_found("plural", plural))?;
    println!("{kind}");
    Ok(())
}

/// Run the plural command
pub fn run_plural(kind: &str) -> Result<()> {
    let plural =
        registry::plural_for_kind(kind).ok_or_else(|| Error::not_found("kind", kind))?;
    println!("{plural}");
    Ok(())
}

/// Table rows for the given domains.
pub fn kind_rows(domains: &[ConfigDomain]) -> Vec<Vec<String>> {
    domains
        .iter()
        .flat_map(|domain| {
            let api_version = domain.group_version().api_version();
            domain.kinds().iter().map(move |k| {
                vec![
                    domain.to_string(),
                    api_version.clone(),
                    k.kind.to_string(),
                    k.list_kind.to_string(),
                    k.plural.to_string(),
                ]
            })
        })
        .collect()
}

/// Run the kinds command
pub fn run_list(args: KindsArgs) -> Result<()> {
    let domains = match args.domain {
        Some(domain) => vec![domain],
        None => ConfigDomain::ALL.to_vec(),
    };
    print_table(
        &["DOMAIN", "API VERSION", "KIND", "LIST KIND", "PLURAL"],
        &kind_rows(&domains),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_plural_is_not_found() {
        let err = run_kind("widgets").unwrap_err();
        assert_eq!(err.to_string(), "plural not found: widgets");
        assert!(run_kind("serviceentries").is_ok());
    }

    #[test]
    fn plural_only_for_adapters_and_templates() {
        assert!(run_plural("handler").is_ok());
        let err = run_plural("Gateway").unwrap_err();
        assert!(matches!(err, Error::NotFound { what: "kind", .. }));
    }

    #[test]
    fn rows_cover_domain_kinds() {
        let rows = kind_rows(&[ConfigDomain::Security]);
        assert_eq!(
            rows,
            vec![vec![
                "security".to_string(),
                "security.istio.io/v1beta1".to_string(),
                "AuthorizationPolicy".to_string(),
                "AuthorizationPolicyList".to_string(),
                "authorizationpolicies".to_string(),
            ]]
        );

        assert_eq!(kind_rows(ConfigDomain::ALL).len(), 21);
    }
}
