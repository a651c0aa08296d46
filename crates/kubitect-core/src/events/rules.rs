//! Rule tables per lifecycle action.
//!
//! Paths are generic struct paths of [`Config`](crate::config::Config):
//! schema field names joined by dots, list elements as `*`.

use crate::action::ApplyAction;
use crate::events::rule::{EventRule, RuleAction};

const POOLS: [&str; 3] = ["load_balancer", "master", "worker"];

fn per_pool(pools: &[&str], suffix: &str) -> Vec<String> {
    pools
        .iter()
        .map(|p| format!("cluster.nodes.{}.{}", p, suffix))
        .collect()
}

fn per_pool_fields(pools: &[&str], prefix: &str, fields: &[&str]) -> Vec<String> {
    pools
        .iter()
        .flat_map(|p| {
            fields
                .iter()
                .map(move |f| format!("cluster.nodes.{}.{}.{}", p, prefix, f))
        })
        .collect()
}

/// Rules evaluated for `action`, in declaration order.
pub fn rules_for(action: ApplyAction) -> Vec<EventRule> {
    match action {
        ApplyAction::Create => modify_rules(),
        ApplyAction::Upgrade => upgrade_rules(),
        ApplyAction::Scale => scale_rules(),
    }
}

/// Upgrade only touches versions.
pub fn upgrade_rules() -> Vec<EventRule> {
    vec![
        EventRule::ok().path("kubernetes.version"),
        EventRule::ok().path("kubernetes.kubespray.version"),
    ]
}

/// Scale adds or removes worker and load balancer instances.
pub fn scale_rules() -> Vec<EventRule> {
    vec![
        EventRule::ok()
            .on(RuleAction::Delete)
            .path("cluster.nodes.worker.instances.*"),
        EventRule::ok()
            .on(RuleAction::Create)
            .path("cluster.nodes.worker.instances.*"),
        EventRule::ok()
            .on(RuleAction::Delete)
            .path("cluster.nodes.load_balancer.instances.*"),
        EventRule::ok()
            .on(RuleAction::Create)
            .path("cluster.nodes.load_balancer.instances.*"),
    ]
}

/// Rules for re-applying `create` against an existing cluster.
pub fn modify_rules() -> Vec<EventRule> {
    let instances = per_pool(&POOLS, "instances.*");
    let disk_pools = ["master", "worker"];
    let data_disks = per_pool(&disk_pools, "instances.*.data_disks.*");

    vec![
        // Data destructive host changes
        EventRule::warn()
            .on(RuleAction::Modify)
            .path("hosts.*.main_resource_pool_path")
            .message("Changing main resource pool location will trigger recreation of all resources bound to that resource pool, such as virtual machines and data disks."),
        EventRule::warn()
            .on(RuleAction::Delete)
            .path("hosts.*.data_resource_pools.*")
            .message("Removing data resource pool will destroy all the data on that location."),
        EventRule::ok()
            .on(RuleAction::Create)
            .path("hosts.*.data_resource_pools.*"),
        EventRule::warn()
            .on(RuleAction::Modify)
            .path("hosts.*.data_resource_pools.*.path")
            .message("Changing data resource pool location will trigger recreation of all resources bound to that resource pool, such as virtual machines and data disks"),
        EventRule::ok().path("hosts"),
        EventRule::block()
            .path("cluster.network")
            .message("Once the cluster is created, further changes to the network properties are not allowed. Such action may render the cluster unusable."),
        EventRule::block()
            .path("cluster.node_template")
            .message("Once the cluster is created, further changes to the nodeTemplate properties are not allowed. Such action may render the cluster unusable."),
        EventRule::block()
            .on(RuleAction::Delete)
            .paths(instances.clone())
            .message("To remove existing nodes run apply command with '--action scale' flag."),
        EventRule::block()
            .on(RuleAction::Create)
            .paths(instances.clone())
            .message("To add new nodes run apply command with '--action scale' flag."),
        EventRule::block()
            .paths(per_pool_fields(&POOLS, "default", &["cpu", "ram", "main_disk_size"]))
            .message("Changing any default physical properties of nodes (cpu, ram, mainDiskSize) is not allowed. Such action may render the cluster unusable."),
        EventRule::block()
            .on(RuleAction::Modify)
            .paths(per_pool_fields(&POOLS, "instances.*", &["cpu", "ram", "main_disk_size"]))
            .message("Changing any physical properties of nodes (cpu, ram, mainDiskSize) is not allowed. Such action will recreate the node."),
        EventRule::block()
            .on(RuleAction::Modify)
            .paths(per_pool_fields(&POOLS, "instances.*", &["ip", "mac"]))
            .message("Changing IP or MAC address of the node is not allowed. Such action may render the cluster unusable."),
        EventRule::warn()
            .on(RuleAction::Modify)
            .paths(data_disks.clone())
            .message("Changing data disk properties, will recreate the disk (removing all of its content in the process)."),
        EventRule::warn()
            .on(RuleAction::Delete)
            .paths(data_disks.clone())
            .message("One or more data disks will be removed."),
        EventRule::ok().on(RuleAction::Create).paths(data_disks),
        EventRule::block()
            .path("cluster.nodes.load_balancer.vip")
            .message("Once the cluster is created, changing virtual IP (VIP) is not allowed. Such action may render the cluster unusable."),
        // Every other instance property may change
        EventRule::ok().paths(instances),
        EventRule::block()
            .paths(["kubernetes.version", "kubernetes.kubespray.version"])
            .message("Changing Kubernetes or Kubespray version is allowed only when upgrading the cluster.\nTo upgrade the cluster run apply command with '--action upgrade' flag."),
        EventRule::ok().path("addons"),
        EventRule::ok().path("kubitect"),
    ]
}
