use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::impl_to_value;

pub type Labels = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Cluster {
    pub name: String,
    pub network: Network,
    pub node_template: NodeTemplate,
    pub nodes: Nodes,
}

impl_to_value!(Cluster {
    name => { yaml = "name" },
    network => { yaml = "network" },
    node_template => { yaml = "nodeTemplate" },
    nodes => { yaml = "nodes" },
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Network {
    pub mode: Option<String>,
    pub cidr: Option<String>,
    pub gateway: Option<String>,
    pub bridge: Option<String>,
}

impl_to_value!(Network {
    mode => { yaml = "mode" },
    cidr => { yaml = "cidr" },
    gateway => { yaml = "gateway" },
    bridge => { yaml = "bridge" },
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeTemplate {
    pub user: Option<String>,
    pub update_on_boot: bool,
    pub os: Os,
    pub ssh: NodeTemplateSsh,
    pub dns: Vec<String>,
}

impl_to_value!(NodeTemplate {
    user => { yaml = "user" },
    update_on_boot => { yaml = "updateOnBoot" },
    os => { yaml = "os" },
    ssh => { yaml = "ssh" },
    dns => { yaml = "dns" },
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Os {
    pub distro: Option<String>,
    pub network_interface: Option<String>,
    pub source: Option<String>,
}

impl_to_value!(Os {
    distro => { yaml = "distro" },
    network_interface => { yaml = "networkInterface" },
    source => { yaml = "source" },
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeTemplateSsh {
    pub add_to_known_hosts: bool,
    pub private_key_path: Option<String>,
}

impl_to_value!(NodeTemplateSsh {
    add_to_known_hosts => { yaml = "addToKnownHosts" },
    private_key_path => { yaml = "privateKeyPath" },
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Nodes {
    pub load_balancer: LoadBalancer,
    pub master: NodePool,
    pub worker: NodePool,
}

impl_to_value!(Nodes {
    load_balancer => { yaml = "loadBalancer" },
    master => { yaml = "master" },
    worker => { yaml = "worker" },
});

/// Physical properties shared by all instances of a pool
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeDefault {
    pub cpu: Option<u32>,
    pub ram: Option<u32>,
    pub main_disk_size: Option<u32>,
    pub labels: Labels,
    pub taints: Vec<String>,
}

impl_to_value!(NodeDefault {
    cpu => { yaml = "cpu" },
    ram => { yaml = "ram" },
    main_disk_size => { yaml = "mainDiskSize" },
    labels => { yaml = "labels" },
    taints => { yaml = "taints" },
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoadBalancer {
    pub vip: Option<String>,
    pub virtual_router_id: Option<u8>,
    pub default: NodeDefault,
    pub instances: Vec<LbInstance>,
    pub forward_ports: Vec<ForwardPort>,
}

impl_to_value!(LoadBalancer {
    vip => { yaml = "vip" },
    virtual_router_id => { yaml = "virtualRouterId" },
    default => { yaml = "default" },
    instances => { yaml = "instances" },
    forward_ports => { yaml = "forwardPorts" },
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LbInstance {
    pub id: String,
    pub host: Option<String>,
    pub ip: Option<String>,
    pub mac: Option<String>,
    pub cpu: Option<u32>,
    pub ram: Option<u32>,
    pub main_disk_size: Option<u32>,
    pub priority: Option<u8>,
}

impl_to_value!(LbInstance {
    id => { yaml = "id", opt = ",id" },
    host => { yaml = "host" },
    ip => { yaml = "ip" },
    mac => { yaml = "mac" },
    cpu => { yaml = "cpu" },
    ram => { yaml = "ram" },
    main_disk_size => { yaml = "mainDiskSize" },
    priority => { yaml = "priority" },
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ForwardPort {
    pub name: String,
    pub port: Option<u16>,
    pub target_port: Option<u16>,
    pub target: Option<String>,
}

impl_to_value!(ForwardPort {
    name => { yaml = "name", opt = ",id" },
    port => { yaml = "port" },
    target_port => { yaml = "targetPort" },
    target => { yaml = "target" },
});

/// Master or worker pool
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodePool {
    pub default: NodeDefault,
    pub instances: Vec<Instance>,
}

impl_to_value!(NodePool {
    default => { yaml = "default" },
    instances => { yaml = "instances" },
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Instance {
    pub id: String,
    pub host: Option<String>,
    pub ip: Option<String>,
    pub mac: Option<String>,
    pub cpu: Option<u32>,
    pub ram: Option<u32>,
    pub main_disk_size: Option<u32>,
    pub data_disks: Vec<DataDisk>,
    pub labels: Labels,
    pub taints: Vec<String>,
}

impl_to_value!(Instance {
    id => { yaml = "id", opt = ",id" },
    host => { yaml = "host" },
    ip => { yaml = "ip" },
    mac => { yaml = "mac" },
    cpu => { yaml = "cpu" },
    ram => { yaml = "ram" },
    main_disk_size => { yaml = "mainDiskSize" },
    data_disks => { yaml = "dataDisks" },
    labels => { yaml = "labels" },
    taints => { yaml = "taints" },
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataDisk {
    pub name: String,
    pub size: Option<u32>,
    pub pool: Option<String>,
}

impl_to_value!(DataDisk {
    name => { yaml = "name", opt = ",id" },
    size => { yaml = "size" },
    pool => { yaml = "pool" },
});
