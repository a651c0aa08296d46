//! Diff tree storage and action propagation.
//!
//! Nodes live in an arena owned by [`DiffTree`]; `parent` is a plain index
//! so the tree has a single owner and back references carry no ownership.

use serde::{Deserialize, Serialize};

use crate::diff::change::{Change, Changes};
use crate::value::{Kind, Value};

/// Change classification of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    None,
    Create,
    Delete,
    Modify,
    /// Composite node that has not received any contributing child yet
    Unknown,
}

impl Action {
    /// Join of two actions: CREATE/DELETE only when exclusive, NONE only
    /// when nothing changed, MODIFY otherwise. `Unknown` is the identity.
    pub fn join(self, other: Action) -> Action {
        match (self, other) {
            (a, Action::Unknown) => a,
            (Action::Unknown, b) => b,
            (a, b) if a == b => a,
            _ => Action::Modify,
        }
    }

    pub fn is_change(self) -> bool {
        matches!(self, Action::Create | Action::Delete | Action::Modify)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::None => "none",
            Action::Create => "create",
            Action::Delete => "delete",
            Action::Modify => "modify",
            Action::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of the compared values at a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Leaf,
    Struct,
    List,
    Map,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct DiffNode {
    pub(crate) key: String,
    pub(crate) struct_key: String,
    pub(crate) kind: NodeKind,
    pub(crate) value_kind: Kind,
    pub(crate) action: Action,
    pub(crate) before: Option<Value>,
    pub(crate) after: Option<Value>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) is_slice_identity_element: bool,
    pub(crate) identity_key: Option<String>,
    /// At least one non-empty leaf lives in this subtree
    pub(crate) contributes: bool,
}

impl DiffNode {
    /// Leaf for a scalar pair. `None` on a side means "absent".
    pub fn leaf(action: Action, before: Option<Value>, after: Option<Value>) -> Self {
        let value_kind = before
            .as_ref()
            .or(after.as_ref())
            .map(Value::kind)
            .unwrap_or(Kind::Null);
        let contributes = before.is_some() || after.is_some();
        Self {
            key: String::new(),
            struct_key: String::new(),
            kind: NodeKind::Leaf,
            value_kind,
            action,
            before,
            after,
            children: Vec::new(),
            parent: None,
            is_slice_identity_element: false,
            identity_key: None,
            contributes,
        }
    }

    /// Leaf for a pair where both sides are absent.
    pub fn empty() -> Self {
        Self::leaf(Action::None, None, None)
    }

    /// Composite node whose action is derived from its children.
    pub fn composite(kind: NodeKind, value_kind: Kind) -> Self {
        Self {
            key: String::new(),
            struct_key: String::new(),
            kind,
            value_kind,
            action: Action::Unknown,
            before: None,
            after: None,
            children: Vec::new(),
            parent: None,
            is_slice_identity_element: false,
            identity_key: None,
            contributes: false,
        }
    }

    /// Mark this node as a list element matched by identity.
    pub fn with_identity(mut self, identity_key: impl Into<String>) -> Self {
        self.is_slice_identity_element = true;
        self.identity_key = Some(identity_key.into());
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn struct_key(&self) -> &str {
        &self.struct_key
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn value_kind(&self) -> Kind {
        self.value_kind
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn before(&self) -> Option<&Value> {
        self.before.as_ref()
    }

    pub fn after(&self) -> Option<&Value> {
        self.after.as_ref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_slice_identity_element(&self) -> bool {
        self.is_slice_identity_element
    }

    /// Display name of the identity field, for identity-matched elements
    pub fn identity_key(&self) -> Option<&str> {
        self.identity_key.as_deref()
    }

    pub fn has_changed(&self) -> bool {
        self.action.is_change()
    }

    /// Leaf comparing two absent values
    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.before.is_none() && self.after.is_none()
    }
}

/// Result of one comparison.
#[derive(Debug, Clone)]
pub struct DiffTree {
    nodes: Vec<DiffNode>,
}

impl DiffTree {
    /// Create a tree whose root is `root`.
    pub fn with_root(root: DiffNode) -> Self {
        Self { nodes: vec![root] }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &DiffNode {
        &self.nodes[id.0]
    }

    /// Attach `node` under `parent` and propagate its action to the root.
    ///
    /// Propagation stops at the first ancestor whose action and
    /// contribution flag are already up to date, so the cost of an insert
    /// is bounded by the depth of the tree.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        key: impl Into<String>,
        struct_key: impl Into<String>,
        mut node: DiffNode,
    ) -> NodeId {
        node.key = key.into();
        node.struct_key = struct_key.into();
        node.parent = Some(parent);

        let id = NodeId(self.nodes.len());
        let contributes = node.contributes;
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);

        if contributes {
            self.propagate(id);
        }
        id
    }

    fn propagate(&mut self, from: NodeId) {
        let mut child = from;
        while let Some(pid) = self.nodes[child.0].parent {
            let child_action = self.nodes[child.0].action;
            let parent = &mut self.nodes[pid.0];
            let joined = parent.action.join(child_action);
            // Ancestors only move up the join lattice, so an unchanged
            // ancestor means everything above it is already consistent.
            if joined == parent.action && parent.contributes {
                break;
            }
            parent.action = joined;
            parent.contributes = true;
            child = pid;
        }
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn child_by_key(&self, id: NodeId, key: &str) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|c| self.nodes[c.0].key == key)
    }

    /// Resolve a dotted display path (root excluded) to a node.
    pub fn find(&self, path: &str) -> Option<NodeId> {
        if path.is_empty() {
            return Some(self.root());
        }
        path.split('.')
            .try_fold(self.root(), |id, key| self.child_by_key(id, key))
    }

    pub fn is_root(&self, id: NodeId) -> bool {
        self.nodes[id.0].parent.is_none()
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.nodes[id.0].children.is_empty()
    }

    pub fn is_slice_element(&self, id: NodeId) -> bool {
        self.nodes[id.0]
            .parent
            .is_some_and(|p| self.nodes[p.0].kind == NodeKind::List)
    }

    pub fn action(&self, id: NodeId) -> Action {
        self.nodes[id.0].action
    }

    /// O(1): actions are kept up to date on every insertion.
    pub fn has_changed(&self, id: NodeId) -> bool {
        self.nodes[id.0].has_changed()
    }

    /// Display path built from tag-resolved keys, root excluded.
    pub fn path(&self, id: NodeId) -> String {
        self.join_segments(id, |tree, n| tree.nodes[n.0].key.clone())
    }

    /// Path built from schema field names.
    pub fn struct_path(&self, id: NodeId) -> String {
        self.join_segments(id, |tree, n| tree.nodes[n.0].struct_key.clone())
    }

    /// Struct path with every list-element segment replaced by `*`.
    pub fn generic_path(&self, id: NodeId) -> String {
        self.join_segments(id, |tree, n| {
            if tree.is_slice_element(n) {
                "*".to_string()
            } else {
                tree.nodes[n.0].struct_key.clone()
            }
        })
    }

    fn join_segments<F>(&self, id: NodeId, segment: F) -> String
    where
        F: Fn(&Self, NodeId) -> String,
    {
        let mut segments = Vec::new();
        let mut current = id;
        while let Some(parent) = self.nodes[current.0].parent {
            segments.push(segment(self, current));
            current = parent;
        }
        segments.reverse();
        segments.join(".")
    }

    /// Nodes in document (pre-order) order, root first.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// Ancestors of `id`, nearest first, root excluded.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.nodes[id.0].parent;
        while let Some(p) = current {
            if self.nodes[p.0].parent.is_none() {
                break;
            }
            out.push(p);
            current = self.nodes[p.0].parent;
        }
        out
    }

    /// Flatten a node into a change record.
    pub fn to_change(&self, id: NodeId) -> Change {
        let node = &self.nodes[id.0];
        Change {
            path: self.path(id),
            struct_path: self.struct_path(id),
            generic_path: self.generic_path(id),
            before: node.before.clone(),
            after: node.after.clone(),
            value_type: node.value_kind,
            action: node.action,
        }
    }

    /// Every changed leaf of the tree, depth-first in insertion order.
    pub fn changes(&self) -> Changes {
        self.changes_under(self.root())
    }

    pub fn changes_under(&self, id: NodeId) -> Changes {
        let mut out = Vec::new();
        self.collect_changes(id, &mut out);
        Changes(out)
    }

    fn collect_changes(&self, id: NodeId, out: &mut Vec<Change>) {
        let node = &self.nodes[id.0];
        if !node.has_changed() {
            return;
        }
        if node.children.is_empty() {
            out.push(self.to_change(id));
            return;
        }
        for &child in &node.children {
            self.collect_changes(child, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(action: Action) -> DiffNode {
        let (before, after) = match action {
            Action::Create => (None, Some(Value::UInt(1))),
            Action::Delete => (Some(Value::UInt(1)), None),
            Action::Modify => (Some(Value::UInt(1)), Some(Value::UInt(2))),
            _ => (Some(Value::UInt(1)), Some(Value::UInt(1))),
        };
        DiffNode::leaf(action, before, after)
    }

    #[test]
    fn test_join_table() {
        assert_eq!(Action::Unknown.join(Action::Create), Action::Create);
        assert_eq!(Action::Create.join(Action::Create), Action::Create);
        assert_eq!(Action::Create.join(Action::None), Action::Modify);
        assert_eq!(Action::None.join(Action::Delete), Action::Modify);
        assert_eq!(Action::Delete.join(Action::Unknown), Action::Delete);
    }

    #[test]
    fn test_exclusive_create_stays_create() {
        let mut tree = DiffTree::with_root(DiffNode::composite(NodeKind::Struct, Kind::Struct));
        let root = tree.root();
        let s = tree.add_child(
            root,
            "a",
            "a",
            DiffNode::composite(NodeKind::Struct, Kind::Struct),
        );
        tree.add_child(s, "x", "x", leaf(Action::Create));
        tree.add_child(s, "y", "y", leaf(Action::Create));
        tree.add_child(s, "z", "z", DiffNode::empty());

        assert_eq!(tree.action(s), Action::Create);
        assert_eq!(tree.action(root), Action::Create);
    }

    #[test]
    fn test_mixed_children_propagate_modify_to_root() {
        let mut tree = DiffTree::with_root(DiffNode::composite(NodeKind::Struct, Kind::Struct));
        let root = tree.root();
        let a = tree.add_child(
            root,
            "a",
            "a",
            DiffNode::composite(NodeKind::Struct, Kind::Struct),
        );
        let b = tree.add_child(
            a,
            "b",
            "b",
            DiffNode::composite(NodeKind::Struct, Kind::Struct),
        );
        tree.add_child(b, "x", "x", leaf(Action::None));
        assert_eq!(tree.action(root), Action::None);
        assert!(!tree.has_changed(root));

        tree.add_child(b, "y", "y", leaf(Action::Delete));
        assert_eq!(tree.action(b), Action::Modify);
        assert_eq!(tree.action(a), Action::Modify);
        assert_eq!(tree.action(root), Action::Modify);
    }

    #[test]
    fn test_generic_path_wildcards_list_elements_only() {
        let mut tree = DiffTree::with_root(DiffNode::composite(NodeKind::Struct, Kind::Struct));
        let root = tree.root();
        let items = tree.add_child(
            root,
            "items",
            "items",
            DiffNode::composite(NodeKind::List, Kind::List),
        );
        let elem = tree.add_child(
            items,
            "w1",
            "w1",
            DiffNode::composite(NodeKind::Struct, Kind::Struct).with_identity("id"),
        );
        let labels = tree.add_child(
            elem,
            "labels",
            "labels",
            DiffNode::composite(NodeKind::Map, Kind::Map),
        );
        let name = tree.add_child(labels, "zone", "zone", leaf(Action::Modify));

        assert_eq!(tree.path(name), "items.w1.labels.zone");
        assert_eq!(tree.generic_path(name), "items.*.labels.zone");
        assert_eq!(tree.find("items.w1.labels"), Some(labels));
        assert_eq!(tree.ancestors(name), vec![labels, elem, items]);
    }

    #[test]
    fn test_changes_skip_unchanged_and_empty_leaves() {
        let mut tree = DiffTree::with_root(DiffNode::composite(NodeKind::Struct, Kind::Struct));
        let root = tree.root();
        tree.add_child(root, "same", "same", leaf(Action::None));
        tree.add_child(root, "gone", "gone", DiffNode::empty());
        tree.add_child(root, "new", "new", leaf(Action::Create));

        let changes = tree.changes();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].path, "new");
        assert_eq!(changes[0].action, Action::Create);
    }
}
