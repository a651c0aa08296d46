#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{base_config, cluster_mut, instance, lb_instance};
use kubitect_core::config::Config;
use kubitect_core::events::{
    categorize_changes, rules_for, trigger_events, EngineOptions, EventRule, RuleAction, Severity,
    UnmatchedPolicy, DISALLOWED_MESSAGE,
};
use kubitect_core::{compare, ApplyAction, CompareOptions, DiffTree, ToValue};

fn tree(applied: &Config, new: &Config) -> DiffTree {
    compare(&applied.to_value(), &new.to_value(), &CompareOptions::kubitect()).unwrap()
}

fn with_workers(ids: &[&str]) -> Config {
    let mut config = base_config();
    cluster_mut(&mut config).nodes.worker.instances = ids
        .iter()
        .enumerate()
        .map(|(i, id)| instance(id, &format!("192.168.113.{}", 20 + i)))
        .collect();
    config
}

fn add_worker_rule() -> Vec<EventRule> {
    vec![EventRule::block()
        .on(RuleAction::Create)
        .path("cluster.nodes.worker.instances.*")
        .message("no new workers")]
}

// Scenario: a single rule catches an added worker
//   Given a rule blocking created worker instances
//   When one worker is added
//   Then exactly one blocking event is triggered, naming that worker
#[test]
fn test_added_worker_triggers_single_event() {
    let tree = tree(&with_workers(&["w1"]), &with_workers(&["w1", "w2"]));
    let events = trigger_events(&tree, &add_worker_rule(), &EngineOptions::default());

    assert_eq!(events.len(), 1);
    assert_eq!(events.0[0].severity(), Severity::Block);
    assert_eq!(events.0[0].message(), "no new workers");
    assert_eq!(events.0[0].paths(), vec!["cluster.nodes.worker.instances.w2"]);
}

// Scenario: the same rule meets a removed worker
//   Then the rule does not fire, and the removal is reported as conflicting
#[test]
fn test_removed_worker_conflicts_with_create_only_rule() {
    let tree = tree(&with_workers(&["w1", "w2"]), &with_workers(&["w1"]));
    let rules = add_worker_rule();

    let categories = categorize_changes(&tree, &rules);
    assert!(categories.matched.is_empty());
    assert!(categories.unmatched.is_empty());
    assert!(!categories.conflicting.is_empty());
    assert!(categories
        .conflicting
        .iter()
        .all(|c| c.path.starts_with("cluster.nodes.worker.instances.w2.")));

    let events = trigger_events(&tree, &rules, &EngineOptions::default());
    assert_eq!(events.len(), 1);
    assert_eq!(events.0[0].message(), DISALLOWED_MESSAGE);
}

#[test]
fn test_scale_rules_accept_worker_and_lb_changes() {
    let applied = with_workers(&["w1", "w2"]);
    let mut new = with_workers(&["w1", "w3"]);
    cluster_mut(&mut new)
        .nodes
        .load_balancer
        .instances
        .push(lb_instance("1"));

    let events = trigger_events(
        &tree(&applied, &new),
        &rules_for(ApplyAction::Scale),
        &EngineOptions::default(),
    );
    assert!(!events.has_blocking());
    let paths: Vec<String> = events.iter().flat_map(|e| e.paths()).collect();
    assert_eq!(
        paths,
        vec![
            "cluster.nodes.loadBalancer.instances.1",
            "cluster.nodes.worker.instances.w2",
            "cluster.nodes.worker.instances.w3",
        ]
    );
}

// Scenario: scale meets a new master node
//   Then no scale rule covers it, so it only blocks under the strict policy
#[test]
fn test_scale_rules_leave_master_changes_unmatched() {
    let applied = base_config();
    let mut new = base_config();
    cluster_mut(&mut new)
        .nodes
        .master
        .instances
        .push(instance("2", "192.168.113.11"));
    let tree = tree(&applied, &new);
    let rules = rules_for(ApplyAction::Scale);

    let categories = categorize_changes(&tree, &rules);
    assert!(categories.matched.is_empty());
    assert!(categories.conflicting.is_empty());
    assert!(categories
        .unmatched
        .iter()
        .all(|c| c.path.starts_with("cluster.nodes.master.instances.2.")));

    let strict = EngineOptions::default().with_unmatched(UnmatchedPolicy::Block);
    let events = trigger_events(&tree, &rules, &strict);
    let blocking: Vec<_> = events.blocking().collect();
    assert_eq!(blocking.len(), 1);
    assert_eq!(blocking[0].message(), DISALLOWED_MESSAGE);
    assert_eq!(blocking[0].changes.len(), categories.unmatched.len());
}

// Scenario: several blocked paths under the modify rule set
//   When the network and a node IP change together
//   Then each rule fires once, in document order
#[test]
fn test_modify_rules_fire_in_document_order() {
    let applied = base_config();
    let mut new = base_config();
    let cluster = cluster_mut(&mut new);
    cluster.network.cidr = Some("10.10.0.0/24".to_string());
    cluster.nodes.worker.instances[0].ip = Some("192.168.113.99".to_string());

    let events = trigger_events(
        &tree(&applied, &new),
        &rules_for(ApplyAction::Create),
        &EngineOptions::default(),
    );
    let blocking: Vec<_> = events.blocking().collect();
    assert_eq!(blocking.len(), 2);
    assert!(blocking[0].message().contains("network properties"));
    assert!(blocking[1].message().contains("IP or MAC"));
    assert_eq!(
        blocking[1].paths(),
        vec!["cluster.nodes.worker.instances.w1.ip"]
    );
}

#[test]
fn test_instance_property_change_is_allowed() {
    let applied = base_config();
    let mut new = base_config();
    cluster_mut(&mut new).nodes.worker.instances[0]
        .labels
        .insert("disk".to_string(), "ssd".to_string());

    let events = trigger_events(
        &tree(&applied, &new),
        &rules_for(ApplyAction::Create),
        &EngineOptions::default(),
    );
    assert!(!events.has_blocking());
    assert!(!events.has_warnings());
    assert_eq!(events.len(), 1);
    assert_eq!(events.0[0].severity(), Severity::Ok);
}
