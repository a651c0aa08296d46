//! Typed cluster configuration.
//!
//! Field names follow the YAML schema in camelCase. Every type lowers into
//! [`Value`](crate::value::Value) through `impl_to_value!` with `opt`
//! identity tags and `yaml` display names, so diffs report YAML paths while
//! rules are written against the Rust field names.

pub mod cluster;
pub mod host;
pub mod kubernetes;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::{KubitectError, Result};
use crate::impl_to_value;

pub use cluster::{
    Cluster, DataDisk, ForwardPort, Instance, LbInstance, LoadBalancer, Network, NodeDefault,
    NodePool, NodeTemplate, Nodes,
};
pub use host::{Connection, DataResourcePool, Host};
pub use kubernetes::{Addons, Kubernetes, Kubespray, Kubitect, Rook};

/// Root of a cluster configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub hosts: Vec<Host>,
    pub cluster: Option<Cluster>,
    pub kubernetes: Option<Kubernetes>,
    pub addons: Option<Addons>,
    pub kubitect: Option<Kubitect>,
}

impl_to_value!(Config {
    hosts => { yaml = "hosts" },
    cluster => { yaml = "cluster" },
    kubernetes => { yaml = "kubernetes" },
    addons => { yaml = "addons" },
    kubitect => { yaml = "kubitect" },
});

impl Config {
    /// # Errors
    ///
    /// Returns `KubitectError::Yaml` when the document does not match the
    /// configuration schema.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read and parse a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `KubitectError::Io` if the file cannot be read and
    /// `KubitectError::Yaml` if it cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| KubitectError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&raw)
    }
}
