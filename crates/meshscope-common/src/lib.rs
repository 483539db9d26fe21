//! Common types for meshscope: host resolution, the Istio type registry,
//! config objects, and mesh configuration.

#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod host;
pub mod object;
pub mod registry;
pub mod telemetry;

pub use config::MeshConfig;
pub use error::Error;
pub use host::{namespace_set, Host, HostResolver};
pub use object::{IstioObject, ObjectKind};

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;
