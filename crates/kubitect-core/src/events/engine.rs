//! Tree-walking matcher binding changes to event rules.

use serde::Serialize;

use crate::diff::{Change, Changes, DiffTree, NodeId};
use crate::events::rule::{EventRule, Severity};

/// Message of the synthetic event collecting disallowed changes
pub const DISALLOWED_MESSAGE: &str = "Disallowed changes.";

/// What to do with changes no rule path covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmatchedPolicy {
    /// Unmatched changes are unrestricted
    #[default]
    Allow,
    /// Unmatched changes join the disallowed set
    Block,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineOptions {
    pub unmatched: UnmatchedPolicy,
}

impl EngineOptions {
    pub fn with_unmatched(mut self, unmatched: UnmatchedPolicy) -> Self {
        self.unmatched = unmatched;
        self
    }
}

/// A rule bound to the changes that triggered it in one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggeredEvent {
    pub rule: EventRule,
    pub changes: Changes,
}

impl TriggeredEvent {
    pub fn severity(&self) -> Severity {
        self.rule.severity()
    }

    pub fn message(&self) -> &str {
        self.rule.text()
    }

    pub fn paths(&self) -> Vec<String> {
        self.changes.paths()
    }
}

/// Triggered events in first-trigger order, the synthetic disallowed
/// event (if any) last.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TriggeredEvents(pub Vec<TriggeredEvent>);

impl TriggeredEvents {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TriggeredEvent> {
        self.0.iter()
    }

    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &TriggeredEvent> {
        self.0.iter().filter(move |e| e.severity() == severity)
    }

    pub fn blocking(&self) -> impl Iterator<Item = &TriggeredEvent> {
        self.with_severity(Severity::Block)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &TriggeredEvent> {
        self.with_severity(Severity::Warn)
    }

    pub fn has_blocking(&self) -> bool {
        self.blocking().next().is_some()
    }

    pub fn has_warnings(&self) -> bool {
        self.warnings().next().is_some()
    }
}

impl<'a> IntoIterator for &'a TriggeredEvents {
    type Item = &'a TriggeredEvent;
    type IntoIter = std::slice::Iter<'a, TriggeredEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Changed leaves split by how the rule set treats them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeCategories {
    /// Covered by a rule that accepts the change
    pub matched: Changes,
    /// Covered, but every covering rule requires a different action
    pub conflicting: Changes,
    /// No rule path covers the change at all
    pub unmatched: Changes,
}

/// Walk the tree in document order and bind changed nodes to rules.
///
/// Each changed node feeds the first rule (in declaration order) whose
/// pattern equals its generic path and whose action accepts the node's
/// action. Matches of the same rule accumulate into one event. Children are
/// visited whether or not their parent matched.
pub fn trigger_events(
    tree: &DiffTree,
    rules: &[EventRule],
    options: &EngineOptions,
) -> TriggeredEvents {
    let mut order: Vec<usize> = Vec::new();
    let mut bound: Vec<Vec<Change>> = vec![Vec::new(); rules.len()];

    for id in tree.preorder() {
        if tree.is_root(id) || !tree.has_changed(id) {
            continue;
        }
        let generic = tree.generic_path(id);
        let action = tree.action(id);
        let Some(idx) = rules.iter().position(|r| r.triggers(&generic, action)) else {
            continue;
        };
        if bound[idx].is_empty() {
            order.push(idx);
        }
        bound[idx].push(tree.to_change(id));
    }

    let mut events: Vec<TriggeredEvent> = order
        .into_iter()
        .map(|idx| TriggeredEvent {
            rule: rules[idx].clone(),
            changes: Changes(std::mem::take(&mut bound[idx])),
        })
        .collect();

    let categories = categorize_changes(tree, rules);
    let disallowed: Vec<Change> = match options.unmatched {
        UnmatchedPolicy::Allow => categories.conflicting.into_inner(),
        UnmatchedPolicy::Block => {
            // Keep document order across both sets.
            let mut all = categories.conflicting.into_inner();
            all.extend(categories.unmatched.into_inner());
            let order = leaf_order(tree);
            all.sort_by_key(|c| order.iter().position(|p| *p == c.path));
            all
        }
    };

    if !disallowed.is_empty() {
        events.push(TriggeredEvent {
            rule: EventRule::block().message(DISALLOWED_MESSAGE),
            changes: Changes(disallowed),
        });
    }

    TriggeredEvents(events)
}

/// Classify every changed leaf as matched, conflicting or unmatched.
///
/// A leaf conflicts when a changed ancestor has a generic path that some
/// rule names while none of the naming rules accepts that ancestor's
/// action. The leaf's own path is never tested for conflicts, only for
/// coverage: a leaf is unmatched when no rule path is a segment prefix of
/// its generic path.
pub fn categorize_changes(tree: &DiffTree, rules: &[EventRule]) -> ChangeCategories {
    let mut categories = ChangeCategories::default();

    for id in changed_leaves(tree) {
        let change = tree.to_change(id);
        let conflicting = tree
            .ancestors(id)
            .into_iter()
            .filter(|n| tree.has_changed(*n))
            .any(|n| conflicts(tree, n, rules));

        if conflicting {
            categories.conflicting.0.push(change);
        } else if rules.iter().any(|r| r.covers_prefix(&change.generic_path)) {
            categories.matched.0.push(change);
        } else {
            categories.unmatched.0.push(change);
        }
    }
    categories
}

fn conflicts(tree: &DiffTree, id: NodeId, rules: &[EventRule]) -> bool {
    let generic = tree.generic_path(id);
    let action = tree.action(id);
    let mut covered = false;
    for rule in rules.iter().filter(|r| r.covers(&generic)) {
        if rule.action().accepts(action) {
            return false;
        }
        covered = true;
    }
    covered
}

fn changed_leaves(tree: &DiffTree) -> Vec<NodeId> {
    tree.preorder()
        .into_iter()
        .filter(|id| !tree.is_root(*id) && tree.is_leaf(*id) && tree.has_changed(*id))
        .collect()
}

fn leaf_order(tree: &DiffTree) -> Vec<String> {
    changed_leaves(tree)
        .into_iter()
        .map(|id| tree.path(id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmp::{compare, CompareOptions};
    use crate::diff::Action;
    use crate::events::rule::RuleAction;
    use crate::value::{StructValue, Value};

    fn instance(id: &str, cpu: u32) -> Value {
        Value::Struct(
            StructValue::new("Instance")
                .tagged_field("id", &[("cmp", ",id")], id)
                .field("cpu", cpu),
        )
    }

    fn config(workers: Vec<Value>, version: &str) -> Value {
        Value::Struct(
            StructValue::new("Config")
                .field("workers", Value::List(workers))
                .field("version", version),
        )
    }

    fn diff(a: &Value, b: &Value) -> DiffTree {
        compare(a, b, &CompareOptions::default()).unwrap()
    }

    #[test]
    fn test_identical_trees_trigger_nothing() {
        let a = config(vec![instance("w1", 2)], "v1");
        let rules = vec![EventRule::block().path("workers.*")];
        let events = trigger_events(&diff(&a, &a), &rules, &EngineOptions::default());
        assert!(events.is_empty());
    }

    #[test]
    fn test_matches_accumulate_per_rule() {
        let a = config(vec![], "v1");
        let b = config(
            vec![instance("w1", 1), instance("w2", 1), instance("w3", 1)],
            "v1",
        );
        let rules = vec![EventRule::ok().on(RuleAction::Create).path("workers.*")];
        let events = trigger_events(&diff(&a, &b), &rules, &EngineOptions::default());

        assert_eq!(events.len(), 1);
        assert_eq!(events.0[0].paths(), vec!["workers.w1", "workers.w2", "workers.w3"]);
    }

    #[test]
    fn test_first_matching_rule_wins_node() {
        let a = config(vec![], "v1");
        let b = config(vec![], "v2");
        let rules = vec![
            EventRule::warn().path("version").message("first"),
            EventRule::block().path("version").message("second"),
        ];
        let events = trigger_events(&diff(&a, &b), &rules, &EngineOptions::default());
        assert_eq!(events.len(), 1);
        assert_eq!(events.0[0].message(), "first");
    }

    #[test]
    fn test_parent_and_child_trigger_independently() {
        let a = config(vec![instance("w1", 1)], "v1");
        let b = config(vec![instance("w1", 2)], "v1");
        let rules = vec![
            EventRule::warn().path("workers.*").message("instance"),
            EventRule::block().path("workers.*.cpu").message("cpu"),
        ];
        let events = trigger_events(&diff(&a, &b), &rules, &EngineOptions::default());
        let messages: Vec<&str> = events.iter().map(|e| e.message()).collect();
        assert_eq!(messages, vec!["instance", "cpu"]);
    }

    #[test]
    fn test_rejected_action_is_disallowed() {
        let a = config(vec![instance("w1", 1)], "v1");
        let b = config(vec![], "v1");
        let rules = vec![EventRule::block().on(RuleAction::Create).path("workers.*")];
        let tree = diff(&a, &b);

        let events = trigger_events(&tree, &rules, &EngineOptions::default());
        assert_eq!(events.len(), 1);
        let disallowed = &events.0[0];
        assert_eq!(disallowed.message(), DISALLOWED_MESSAGE);
        assert_eq!(disallowed.severity(), Severity::Block);
        assert!(disallowed
            .changes
            .iter()
            .all(|c| c.action == Action::Delete && c.path.starts_with("workers.w1.")));
    }

    #[test]
    fn test_unmatched_allowed_by_default_blocked_on_request() {
        let a = config(vec![], "v1");
        let b = config(vec![], "v2");
        let rules = vec![EventRule::ok().path("workers")];
        let tree = diff(&a, &b);

        let allowed = trigger_events(&tree, &rules, &EngineOptions::default());
        assert!(allowed.is_empty());

        let strict = EngineOptions::default().with_unmatched(UnmatchedPolicy::Block);
        let blocked = trigger_events(&tree, &rules, &strict);
        assert!(blocked.has_blocking());
        assert_eq!(blocked.0[0].paths(), vec!["version"]);
    }

    #[test]
    fn test_categories() {
        let a = config(vec![instance("w1", 1)], "v1");
        let b = config(vec![instance("w2", 1)], "v2");
        let rules = vec![EventRule::ok().on(RuleAction::Create).path("workers.*")];
        let cats = categorize_changes(&diff(&a, &b), &rules);

        assert!(cats.matched.iter().all(|c| c.path.starts_with("workers.w2")));
        assert!(cats.conflicting.iter().all(|c| c.path.starts_with("workers.w1")));
        assert_eq!(cats.unmatched.paths(), vec!["version"]);
    }

    #[test]
    fn test_leaf_rule_for_other_action_does_not_conflict() {
        let a = config(vec![], "v1");
        let b = config(vec![instance("w1", 2)], "v1");
        let rules = vec![
            EventRule::ok().on(RuleAction::Create).path("workers.*"),
            EventRule::block().on(RuleAction::Modify).path("workers.*.cpu"),
        ];
        let tree = diff(&a, &b);

        let cats = categorize_changes(&tree, &rules);
        assert!(cats.conflicting.is_empty());
        assert_eq!(cats.matched.paths(), vec!["workers.w1.id", "workers.w1.cpu"]);

        let events = trigger_events(&tree, &rules, &EngineOptions::default());
        assert!(!events.has_blocking());
    }
}
