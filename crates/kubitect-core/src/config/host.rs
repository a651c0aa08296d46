use serde::{Deserialize, Serialize};

use crate::impl_to_value;

/// A physical or virtual machine hosting cluster nodes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Host {
    pub name: String,
    pub default: bool,
    pub connection: Connection,
    pub main_resource_pool_path: Option<String>,
    pub data_resource_pools: Vec<DataResourcePool>,
}

impl_to_value!(Host {
    name => { yaml = "name", opt = ",id" },
    default => { yaml = "default" },
    connection => { yaml = "connection" },
    main_resource_pool_path => { yaml = "mainResourcePoolPath" },
    data_resource_pools => { yaml = "dataResourcePools" },
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Connection {
    pub ip: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub user: Option<String>,
    pub ssh: Option<HostSsh>,
}

impl_to_value!(Connection {
    ip => { yaml = "ip" },
    kind => { yaml = "type" },
    user => { yaml = "user" },
    ssh => { yaml = "ssh" },
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostSsh {
    pub keyfile: Option<String>,
    pub port: Option<u16>,
    pub verify: Option<bool>,
}

impl_to_value!(HostSsh {
    keyfile => { yaml = "keyfile" },
    port => { yaml = "port" },
    verify => { yaml = "verify" },
});

/// Additional storage location on a host, keyed by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataResourcePool {
    pub name: String,
    pub path: Option<String>,
}

impl_to_value!(DataResourcePool {
    name => { yaml = "name", opt = ",id" },
    path => { yaml = "path" },
});
