//! YAML-like and JSON projections of a diff tree.
//!
//! Rendering never re-derives changes: it only reads node actions and the
//! before/after values stored on leaves.

use nu_ansi_term::Color;
use serde_json::{Map, Value as Json};

use crate::diff::tree::{Action, DiffTree, NodeId, NodeKind};
use crate::errors::Result;
use crate::value::Value;

/// Rendering switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatOptions {
    /// Only render changed nodes (plus identity fields of changed elements)
    pub diff_only: bool,
    /// Color keys and values by action
    pub color: bool,
    /// Prefix each line with `+`, `-`, `~` or a blank plus a gutter
    pub action_prefix: bool,
}

impl FormatOptions {
    pub fn diff_only() -> Self {
        Self {
            diff_only: true,
            ..Self::default()
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_action_prefix(mut self, action_prefix: bool) -> Self {
        self.action_prefix = action_prefix;
        self
    }
}

struct Line {
    action: Action,
    text: String,
}

impl DiffTree {
    /// Render the tree in a YAML-like layout with children sorted by key.
    pub fn to_yaml(&self, opts: &FormatOptions) -> String {
        let mut lines = Vec::new();
        self.render_node(self.root(), 0, false, opts, &mut lines);
        lines
            .into_iter()
            .map(|l| {
                if opts.action_prefix {
                    format!("{} │ {}", prefix_symbol(l.action), l.text)
                } else {
                    l.text
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render the tree as pretty JSON.
    ///
    /// Leaves become `{action, before, after}` objects, composites become
    /// objects keyed by child key.
    pub fn to_json(&self, diff_only: bool) -> Result<String> {
        let json = self.json_node(self.root(), diff_only);
        Ok(serde_json::to_string_pretty(&json)?)
    }

    fn is_different(&self, id: NodeId) -> bool {
        if self.has_changed(id) {
            return true;
        }
        // Identity field of an identity-matched element stays visible so
        // the reader can tell which element changed.
        self.parent(id).is_some_and(|p| {
            let parent = self.node(p);
            parent.is_slice_identity_element()
                && parent.identity_key() == Some(self.node(id).key())
        })
    }

    fn sorted_children(&self, id: NodeId) -> Vec<NodeId> {
        let mut children = self.children(id).to_vec();
        children.sort_by(|a, b| self.node(*a).key().cmp(self.node(*b).key()));
        children
    }

    fn render_node(
        &self,
        id: NodeId,
        depth: usize,
        bullet: bool,
        opts: &FormatOptions,
        out: &mut Vec<Line>,
    ) {
        if opts.diff_only && !self.is_different(id) {
            return;
        }

        let node = self.node(id);
        let is_root = self.is_root(id);
        let is_elem = self.is_slice_element(id);
        let is_leaf = self.is_leaf(id);

        let key = if !is_elem && !is_root {
            format!("{}:", paint_key(node.key(), node.action(), opts.color))
        } else {
            String::new()
        };

        let mut indent = " ".repeat(depth * 2);
        if bullet || (is_elem && is_leaf) {
            indent.truncate(indent.len().saturating_sub(2));
            indent.push_str("- ");
        }

        if is_leaf {
            let value = match node.kind() {
                NodeKind::Leaf => leaf_value(node.action(), node.before(), node.after(), opts.color),
                NodeKind::List => "[]".to_string(),
                NodeKind::Struct | NodeKind::Map => "{}".to_string(),
            };
            let text = if key.is_empty() {
                format!("{}{}", indent, value)
            } else {
                format!("{}{} {}", indent, key, value)
            };
            out.push(Line {
                action: node.action(),
                text,
            });
            return;
        }

        if !key.is_empty() {
            out.push(Line {
                action: node.action(),
                text: format!("{}{}", indent, key),
            });
        }

        let child_depth = if is_root { depth } else { depth + 1 };
        let mut first = true;
        for child in self.sorted_children(id) {
            if opts.diff_only && !self.is_different(child) {
                continue;
            }
            self.render_node(child, child_depth, is_elem && first, opts, out);
            first = false;
        }
    }

    fn json_node(&self, id: NodeId, diff_only: bool) -> Json {
        let node = self.node(id);
        if self.is_leaf(id) && node.kind() == NodeKind::Leaf {
            let mut obj = Map::new();
            obj.insert("action".into(), Json::String(node.action().to_string()));
            if let Some(before) = node.before() {
                obj.insert("before".into(), to_json_value(before));
            }
            if let Some(after) = node.after() {
                obj.insert("after".into(), to_json_value(after));
            }
            return Json::Object(obj);
        }

        let mut obj = Map::new();
        for child in self.sorted_children(id) {
            if diff_only && !self.is_different(child) {
                continue;
            }
            obj.insert(
                self.node(child).key().to_string(),
                self.json_node(child, diff_only),
            );
        }
        Json::Object(obj)
    }
}

fn to_json_value(v: &Value) -> Json {
    serde_json::to_value(v).unwrap_or(Json::Null)
}

fn prefix_symbol(action: Action) -> char {
    match action {
        Action::Create => '+',
        Action::Delete => '-',
        Action::Modify => '~',
        Action::None | Action::Unknown => ' ',
    }
}

fn paint_key(key: &str, action: Action, color: bool) -> String {
    if !color {
        return key.to_string();
    }
    match action {
        Action::Create => Color::LightGreen.paint(key).to_string(),
        Action::Delete => Color::Red.paint(key).to_string(),
        _ => key.to_string(),
    }
}

fn leaf_value(action: Action, before: Option<&Value>, after: Option<&Value>, color: bool) -> String {
    let show = |v: Option<&Value>| v.map_or_else(|| Value::Null.to_string(), Value::to_string);
    let (text, paint) = match action {
        Action::Create => (show(after), Some(Color::LightGreen)),
        Action::Delete => (show(before), Some(Color::Red)),
        Action::Modify => (
            format!("{} -> {}", show(before), show(after)),
            Some(Color::Yellow),
        ),
        Action::None | Action::Unknown => (show(before), None),
    };
    match (color, paint) {
        (true, Some(c)) => c.paint(text).to_string(),
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmp::{compare, CompareOptions};
    use crate::value::StructValue;

    fn worker(id: &str, cpu: u32) -> Value {
        Value::Struct(
            StructValue::new("Instance")
                .tagged_field("id", &[("cmp", ",id")], id)
                .field("cpu", cpu),
        )
    }

    fn cluster(workers: Vec<Value>, version: &str) -> Value {
        Value::Struct(
            StructValue::new("Config")
                .field("workers", Value::List(workers))
                .field("version", version),
        )
    }

    #[test]
    fn test_diff_only_keeps_identity_field_of_changed_element() {
        let a = cluster(vec![worker("w1", 2), worker("w2", 2)], "v1");
        let b = cluster(vec![worker("w1", 2), worker("w2", 4)], "v1");
        let tree = compare(&a, &b, &CompareOptions::default()).unwrap();

        let out = tree.to_yaml(&FormatOptions::diff_only());
        assert_eq!(out, "workers:\n  - cpu: 2 -> 4\n    id: \"w2\"");
    }

    #[test]
    fn test_full_render_sorts_keys() {
        let a = cluster(vec![], "v1");
        let b = cluster(vec![], "v2");
        let tree = compare(&a, &b, &CompareOptions::default()).unwrap();

        let out = tree.to_yaml(&FormatOptions::default());
        assert_eq!(out, "version: \"v1\" -> \"v2\"\nworkers: []");
    }

    #[test]
    fn test_action_prefix_marks_each_line() {
        let a = cluster(vec![worker("w1", 2)], "v1");
        let b = cluster(vec![worker("w1", 2), worker("w2", 1)], "v1");
        let tree = compare(&a, &b, &CompareOptions::default()).unwrap();

        let out = tree.to_yaml(&FormatOptions::diff_only().with_action_prefix(true));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "~ │ workers:");
        assert!(lines[1..].iter().all(|l| l.starts_with("+ │ ")));
    }

    #[test]
    fn test_color_wraps_changed_values_in_ansi() {
        let a = cluster(vec![], "v1");
        let b = cluster(vec![], "v2");
        let tree = compare(&a, &b, &CompareOptions::default()).unwrap();

        let out = tree.to_yaml(&FormatOptions::diff_only().with_color(true));
        assert!(out.contains("\u{1b}["));
    }

    #[test]
    fn test_json_diff_only() {
        let a = cluster(vec![], "v1");
        let b = cluster(vec![], "v2");
        let tree = compare(&a, &b, &CompareOptions::default()).unwrap();

        let json: Json = serde_json::from_str(&tree.to_json(true).unwrap()).unwrap();
        assert_eq!(json["version"]["action"], "modify");
        assert_eq!(json["version"]["after"], "v2");
        assert!(json.get("workers").is_none());
    }
}
