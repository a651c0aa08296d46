use kubitect_core::config::{
    Cluster, Config, DataDisk, Host, Instance, Kubernetes, Kubespray, LbInstance, NodeDefault,
};
use kubitect_core::policy::{LifecycleExecutor, Plan, ScalePlan};
use kubitect_core::Result;

/// A running cluster: one host, one master, one worker `w1`
#[allow(dead_code)]
pub fn base_config() -> Config {
    let mut cluster = Cluster {
        name: "local".to_string(),
        ..Cluster::default()
    };
    cluster.network.mode = Some("nat".to_string());
    cluster.network.cidr = Some("192.168.113.0/24".to_string());
    cluster.nodes.master.default = NodeDefault {
        cpu: Some(2),
        ram: Some(4),
        main_disk_size: Some(32),
        ..NodeDefault::default()
    };
    cluster.nodes.master.instances = vec![instance("1", "192.168.113.10")];
    cluster.nodes.worker.instances = vec![instance("w1", "192.168.113.20")];

    Config {
        hosts: vec![Host {
            name: "localhost".to_string(),
            default: true,
            main_resource_pool_path: Some("/var/lib/kubitect".to_string()),
            ..Host::default()
        }],
        cluster: Some(cluster),
        kubernetes: Some(Kubernetes {
            version: Some("v1.24.0".to_string()),
            kubespray: Some(Kubespray {
                version: Some("v2.21.0".to_string()),
            }),
            ..Kubernetes::default()
        }),
        ..Config::default()
    }
}

#[allow(dead_code)]
pub fn instance(id: &str, ip: &str) -> Instance {
    Instance {
        id: id.to_string(),
        ip: Some(ip.to_string()),
        cpu: Some(2),
        ..Instance::default()
    }
}

#[allow(dead_code)]
pub fn lb_instance(id: &str) -> LbInstance {
    LbInstance {
        id: id.to_string(),
        ip: Some("192.168.113.5".to_string()),
        ..LbInstance::default()
    }
}

#[allow(dead_code)]
pub fn data_disk(name: &str, size: u32) -> DataDisk {
    DataDisk {
        name: name.to_string(),
        size: Some(size),
        pool: None,
    }
}

/// Mutable access to the cluster section of a fixture
#[allow(dead_code)]
pub fn cluster_mut(config: &mut Config) -> &mut Cluster {
    config.cluster.get_or_insert_with(Cluster::default)
}

#[allow(dead_code)]
pub fn set_kubernetes_version(config: &mut Config, version: &str) {
    config
        .kubernetes
        .get_or_insert_with(Kubernetes::default)
        .version = Some(version.to_string());
}

/// Executor remembering which pipeline ran
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    pub calls: Vec<String>,
    pub scales: Vec<ScalePlan>,
}

impl LifecycleExecutor for RecordingExecutor {
    fn create(&mut self, _plan: &Plan) -> Result<()> {
        self.calls.push("create".to_string());
        Ok(())
    }

    fn upgrade(&mut self, _plan: &Plan) -> Result<()> {
        self.calls.push("upgrade".to_string());
        Ok(())
    }

    fn scale(&mut self, _plan: &Plan, scale: &ScalePlan) -> Result<()> {
        self.calls.push("scale".to_string());
        self.scales.push(scale.clone());
        Ok(())
    }
}
