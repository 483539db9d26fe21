//! Mesh configuration
//!
//! The resolver needs one piece of mesh configuration: the identity domain
//! that in-cluster hostnames end with. It is read from (highest priority
//! first):
//!
//! 1. `MESHSCOPE_IDENTITY_DOMAIN` environment variable, when non-empty
//! 2. The explicit config file path (`--config`)
//! 3. The file named by `MESHSCOPE_CONFIG`
//! 4. The built-in default, `svc.cluster.local`
//!
//! Config files are YAML; JSON files parse too since JSON is valid YAML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::host::HostResolver;
use crate::{Error, Result};

/// Identity domain used when nothing else is configured.
pub const DEFAULT_IDENTITY_DOMAIN: &str = "svc.cluster.local";

/// Environment variable naming a config file.
pub const CONFIG_PATH_ENV: &str = "MESHSCOPE_CONFIG";

/// Environment variable overriding the identity domain.
pub const IDENTITY_DOMAIN_ENV: &str = "MESHSCOPE_IDENTITY_DOMAIN";

/// Mesh settings consumed by host resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshConfig {
    /// Trailing DNS suffix of in-cluster service hostnames
    #[serde(default = "default_identity_domain")]
    pub istio_identity_domain: String,
}

fn default_identity_domain() -> String {
    DEFAULT_IDENTITY_DOMAIN.to_string()
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            istio_identity_domain: default_identity_domain(),
        }
    }
}

impl MeshConfig {
    /// Parse config from YAML (or JSON) text.
    pub fn from_yaml(input: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| Error::config(path, format!("failed to read: {e}")))?;
        Self::from_yaml(&data).map_err(|e| Error::config(path, e.to_string()))
    }

    /// Load config following the documented priority chain.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match config_source(explicit) {
            Some(path) => {
                debug!(path = %path.display(), "loading mesh config");
                Self::from_file(&path)?
            }
            None => Self::default(),
        };

        if let Ok(domain) = std::env::var(IDENTITY_DOMAIN_ENV) {
            if !domain.is_empty() {
                debug!(domain = %domain, "identity domain overridden from environment");
                config.istio_identity_domain = domain;
            }
        }

        Ok(config)
    }

    /// Reject settings the resolver cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.istio_identity_domain.is_empty() {
            return Err(Error::validation_for_field(
                "istioIdentityDomain",
                "identity domain must not be empty",
            ));
        }
        Ok(())
    }

    /// Build a host resolver for this mesh.
    pub fn resolver(&self) -> HostResolver {
        HostResolver::new(self.istio_identity_domain.clone())
    }
}

fn config_source(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) if !path.is_empty() => Some(PathBuf::from(path)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_domain_is_cluster_local() {
        let config = MeshConfig::default();
        assert_eq!(config.istio_identity_domain, "svc.cluster.local");
        assert_eq!(config.resolver().identity_domain(), "svc.cluster.local");
    }

    #[test]
    fn parses_yaml() {
        let config = MeshConfig::from_yaml("istioIdentityDomain: mesh.internal\n").unwrap();
        assert_eq!(config.istio_identity_domain, "mesh.internal");
    }

    #[test]
    fn parses_json() {
        let config = MeshConfig::from_yaml(r#"{"istioIdentityDomain": "svc.east.local"}"#).unwrap();
        assert_eq!(config.istio_identity_domain, "svc.east.local");
    }

    #[test]
    fn missing_field_uses_default() {
        let config = MeshConfig::from_yaml("{}").unwrap();
        assert_eq!(config, MeshConfig::default());
    }

    #[test]
    fn empty_domain_is_rejected() {
        let err = MeshConfig::from_yaml("istioIdentityDomain: \"\"").unwrap_err();
        assert_eq!(err.field(), Some("istioIdentityDomain"));
    }

    #[test]
    fn malformed_yaml_is_a_serialization_error() {
        let err = MeshConfig::from_yaml("istioIdentityDomain: [").unwrap_err();
        assert!(matches!(err, Error::Serialization { .. }));
    }

    #[test]
    fn from_file_reads_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "istioIdentityDomain: svc.west.local").unwrap();

        let config = MeshConfig::from_file(file.path()).unwrap();
        assert_eq!(config.istio_identity_domain, "svc.west.local");
    }

    #[test]
    fn from_file_reports_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.yaml");

        let err = MeshConfig::from_file(&missing).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("absent.yaml"));
    }

    fn config_file(domain: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "istioIdentityDomain: {domain}").unwrap();
        file
    }

    /// Every step touches process-wide env vars, so they run in one test.
    #[test]
    fn load_follows_priority_chain() {
        std::env::remove_var(CONFIG_PATH_ENV);
        std::env::remove_var(IDENTITY_DOMAIN_ENV);

        let from_env = config_file("svc.env.local");
        let explicit = config_file("svc.explicit.local");

        // Nothing configured
        assert_eq!(MeshConfig::load(None).unwrap(), MeshConfig::default());

        // MESHSCOPE_CONFIG used without an explicit path
        std::env::set_var(CONFIG_PATH_ENV, from_env.path());
        let config = MeshConfig::load(None).unwrap();
        assert_eq!(config.istio_identity_domain, "svc.env.local");

        // Explicit path wins over MESHSCOPE_CONFIG
        let config = MeshConfig::load(Some(explicit.path())).unwrap();
        assert_eq!(config.istio_identity_domain, "svc.explicit.local");

        // Non-empty domain override beats any file
        std::env::set_var(IDENTITY_DOMAIN_ENV, "svc.override.local");
        let config = MeshConfig::load(Some(explicit.path())).unwrap();
        assert_eq!(config.istio_identity_domain, "svc.override.local");
        let config = MeshConfig::load(None).unwrap();
        assert_eq!(config.istio_identity_domain, "svc.override.local");

        // Empty override is ignored
        std::env::set_var(IDENTITY_DOMAIN_ENV, "");
        let config = MeshConfig::load(None).unwrap();
        assert_eq!(config.istio_identity_domain, "svc.env.local");

        // Empty MESHSCOPE_CONFIG falls back to the default
        std::env::set_var(CONFIG_PATH_ENV, "");
        assert_eq!(MeshConfig::load(None).unwrap(), MeshConfig::default());

        std::env::remove_var(CONFIG_PATH_ENV);
        std::env::remove_var(IDENTITY_DOMAIN_ENV);
    }

    #[test]
    fn explicit_path_takes_priority() {
        let path = Path::new("/tmp/explicit.yaml");
        assert_eq!(config_source(Some(path)), Some(path.to_path_buf()));
    }
}
