//! Recursive structural comparison over [`Value`] trees.

use std::collections::{BTreeMap, BTreeSet};

use crate::cmp::options::{CompareOptions, TagSpec, ID_OPTION};
use crate::diff::{Action, DiffNode, DiffTree, NodeId, NodeKind};
use crate::errors::CmpError;
use crate::value::{Field, Kind, StructValue, Value};

static NULL: Value = Value::Null;

/// Compare `a` (applied) against `b` (new) with the given options.
///
/// # Errors
///
/// Returns [`CmpError`] when two present values of different kinds meet at
/// the same path. The comparison is aborted and no partial tree is returned.
pub fn compare(a: &Value, b: &Value, options: &CompareOptions) -> Result<DiffTree, CmpError> {
    Comparator::new(options.clone()).compare(a, b)
}

/// Shape of one value pair, decided once before a node is created.
enum Shape<'a> {
    Empty,
    Scalar {
        action: Action,
        before: Option<&'a Value>,
        after: Option<&'a Value>,
    },
    Struct(Option<&'a StructValue>, Option<&'a StructValue>),
    List(&'a [Value], &'a [Value]),
    Map(
        Option<&'a BTreeMap<String, Value>>,
        Option<&'a BTreeMap<String, Value>>,
    ),
}

impl Shape<'_> {
    fn node(&self) -> DiffNode {
        match self {
            Shape::Empty => DiffNode::empty(),
            Shape::Scalar {
                action,
                before,
                after,
            } => DiffNode::leaf(*action, before.cloned(), after.cloned()),
            Shape::Struct(..) => DiffNode::composite(NodeKind::Struct, Kind::Struct),
            Shape::List(..) => DiffNode::composite(NodeKind::List, Kind::List),
            Shape::Map(..) => DiffNode::composite(NodeKind::Map, Kind::Map),
        }
    }
}

/// Where the next node goes.
struct Slot<'k> {
    parent: NodeId,
    key: &'k str,
    struct_key: &'k str,
    identity: Option<&'k str>,
}

/// Structural comparator.
#[derive(Debug, Clone, Default)]
pub struct Comparator {
    options: CompareOptions,
}

impl Comparator {
    pub fn new(options: CompareOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompareOptions {
        &self.options
    }

    /// Compare two values and build the diff tree.
    ///
    /// # Errors
    ///
    /// Returns [`CmpError`] on a kind mismatch anywhere in the tree.
    pub fn compare(&self, a: &Value, b: &Value) -> Result<DiffTree, CmpError> {
        let shape = self.shape(a, b, "")?;
        let mut tree = DiffTree::with_root(shape.node());
        let root = tree.root();
        self.descend(&mut tree, root, shape, "")?;
        Ok(tree)
    }

    fn shape<'a>(&self, a: &'a Value, b: &'a Value, path: &str) -> Result<Shape<'a>, CmpError> {
        let shape = match (a, b) {
            (Value::Null, Value::Null) => Shape::Empty,

            (Value::Struct(x), Value::Struct(y)) => {
                if x.type_name != y.type_name {
                    return Err(CmpError::StructMismatch {
                        path: path.to_string(),
                        left: x.type_name.clone(),
                        right: y.type_name.clone(),
                    });
                }
                Shape::Struct(Some(x), Some(y))
            }
            (Value::Struct(x), Value::Null) => Shape::Struct(Some(x), None),
            (Value::Null, Value::Struct(y)) => Shape::Struct(None, Some(y)),

            (Value::List(x), Value::List(y)) => Shape::List(x, y),
            (Value::List(x), Value::Null) => Shape::List(x, &[]),
            (Value::Null, Value::List(y)) => Shape::List(&[], y),

            (Value::Map(x), Value::Map(y)) => Shape::Map(Some(x), Some(y)),
            (Value::Map(x), Value::Null) => Shape::Map(Some(x), None),
            (Value::Null, Value::Map(y)) => Shape::Map(None, Some(y)),

            (x, Value::Null) if x.is_scalar() => Shape::Scalar {
                action: Action::Delete,
                before: Some(x),
                after: None,
            },
            (Value::Null, y) if y.is_scalar() => Shape::Scalar {
                action: Action::Create,
                before: None,
                after: Some(y),
            },
            (x, y) if x.is_scalar() && x.kind() == y.kind() => Shape::Scalar {
                action: if x == y { Action::None } else { Action::Modify },
                before: Some(x),
                after: Some(y),
            },

            (x, y) => {
                return Err(CmpError::TypeMismatch {
                    path: path.to_string(),
                    left: x.kind(),
                    right: y.kind(),
                })
            }
        };
        Ok(shape)
    }

    fn diff_child(
        &self,
        tree: &mut DiffTree,
        slot: Slot<'_>,
        a: &Value,
        b: &Value,
        parent_path: &str,
    ) -> Result<(), CmpError> {
        let path = join_path(parent_path, slot.key);
        let shape = self.shape(a, b, &path)?;
        if matches!(shape, Shape::Empty) && self.options.ignore_empty_changes {
            return Ok(());
        }

        let mut node = shape.node();
        if let Some(identity) = slot.identity {
            node = node.with_identity(identity);
        }
        let id = tree.add_child(slot.parent, slot.key, slot.struct_key, node);
        self.descend(tree, id, shape, &path)
    }

    fn descend(
        &self,
        tree: &mut DiffTree,
        id: NodeId,
        shape: Shape<'_>,
        path: &str,
    ) -> Result<(), CmpError> {
        match shape {
            Shape::Empty | Shape::Scalar { .. } => Ok(()),
            Shape::Struct(a, b) => self.diff_struct(tree, id, a, b, path),
            Shape::List(a, b) => self.diff_list(tree, id, a, b, path),
            Shape::Map(a, b) => self.diff_map(tree, id, a, b, path),
        }
    }

    fn diff_struct(
        &self,
        tree: &mut DiffTree,
        id: NodeId,
        a: Option<&StructValue>,
        b: Option<&StructValue>,
        path: &str,
    ) -> Result<(), CmpError> {
        let fields: &[Field] = a.or(b).map_or(&[], |s| s.fields.as_slice());

        for field in fields {
            let Some(name) = self.field_name(field) else {
                continue;
            };
            let av = field_value(a, &field.name);
            let bv = field_value(b, &field.name);
            let slot = Slot {
                parent: id,
                key: &name,
                struct_key: &field.name,
                identity: None,
            };
            self.diff_child(tree, slot, av, bv, path)?;
        }
        Ok(())
    }

    /// Resolve the display name of a field, `None` when it is skipped.
    fn field_name(&self, field: &Field) -> Option<String> {
        for tag in self.options.name_tags() {
            if let Some(raw) = field.tag(tag) {
                let spec = TagSpec::parse(raw);
                if spec.is_skip() {
                    return None;
                }
                if !spec.name.is_empty() {
                    return Some(spec.name.to_string());
                }
            }
        }
        Some(field.name.clone())
    }

    /// Struct field carrying the `id` option in the primary tag, as
    /// `(field name, display name)`.
    fn identity_field(&self, sample: &StructValue) -> Option<(String, String)> {
        sample.fields.iter().find_map(|f| {
            let raw = f.tag(&self.options.tag)?;
            if !TagSpec::parse(raw).has_option(ID_OPTION) {
                return None;
            }
            let display = self.field_name(f).unwrap_or_else(|| f.name.clone());
            Some((f.name.clone(), display))
        })
    }

    fn diff_list(
        &self,
        tree: &mut DiffTree,
        id: NodeId,
        a: &[Value],
        b: &[Value],
        path: &str,
    ) -> Result<(), CmpError> {
        if let Some(Value::Struct(sample)) = a.first().or(b.first()) {
            if let Some((field, display)) = self.identity_field(sample) {
                match (key_by_identity(a, &field), key_by_identity(b, &field)) {
                    (Ok(ka), Ok(kb)) => {
                        return self.pair_by_identity(tree, id, &ka, &kb, &display, path);
                    }
                    (Err(reason), _) | (_, Err(reason)) => {
                        tracing::warn!(
                            component = module_path!(),
                            path = %path,
                            identity_field = %field,
                            reason = %reason,
                            "identity matching unavailable, falling back to index matching"
                        );
                    }
                }
            }
        }

        if self.options.respect_slice_order {
            self.pair_by_position(tree, id, a, b, path)
        } else {
            self.pair_by_equality(tree, id, a, b, path)
        }
    }

    fn pair_by_identity(
        &self,
        tree: &mut DiffTree,
        id: NodeId,
        a: &[(String, &Value)],
        b: &[(String, &Value)],
        identity: &str,
        path: &str,
    ) -> Result<(), CmpError> {
        let b_lookup: BTreeMap<&str, &Value> = b.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        let a_keys: BTreeSet<&str> = a.iter().map(|(k, _)| k.as_str()).collect();

        for (key, av) in a {
            let slot = Slot {
                parent: id,
                key,
                struct_key: key,
                identity: Some(identity),
            };
            match b_lookup.get(key.as_str()) {
                Some(bv) => self.diff_child(tree, slot, av, bv, path)?,
                None => self.diff_child(tree, slot, av, &av.zero_of(), path)?,
            }
        }

        for (key, bv) in b.iter().filter(|(k, _)| !a_keys.contains(k.as_str())) {
            let slot = Slot {
                parent: id,
                key,
                struct_key: key,
                identity: Some(identity),
            };
            self.diff_child(tree, slot, &bv.zero_of(), bv, path)?;
        }
        Ok(())
    }

    /// Order-insensitive matching: greedy first-equal pairing with a
    /// matched marker per side. Unmatched B elements get keys after A.
    fn pair_by_equality(
        &self,
        tree: &mut DiffTree,
        id: NodeId,
        a: &[Value],
        b: &[Value],
        path: &str,
    ) -> Result<(), CmpError> {
        let mut matched_b = vec![false; b.len()];
        for (i, av) in a.iter().enumerate() {
            let key = i.to_string();
            let slot = index_slot(id, &key);
            match claim_equal(b, av, &mut matched_b) {
                Some(j) => self.diff_child(tree, slot, av, &b[j], path)?,
                None => self.diff_child(tree, slot, av, &av.zero_of(), path)?,
            }
        }

        let mut matched_a = vec![false; a.len()];
        let mut next = a.len();
        for bv in b {
            if claim_equal(a, bv, &mut matched_a).is_some() {
                continue;
            }
            let key = next.to_string();
            self.diff_child(tree, index_slot(id, &key), &bv.zero_of(), bv, path)?;
            next += 1;
        }
        Ok(())
    }

    /// Order-respecting matching: elements pair by index.
    fn pair_by_position(
        &self,
        tree: &mut DiffTree,
        id: NodeId,
        a: &[Value],
        b: &[Value],
        path: &str,
    ) -> Result<(), CmpError> {
        for i in 0..a.len().max(b.len()) {
            let key = i.to_string();
            let slot = index_slot(id, &key);
            match (a.get(i), b.get(i)) {
                (Some(av), Some(bv)) => self.diff_child(tree, slot, av, bv, path)?,
                (Some(av), None) => self.diff_child(tree, slot, av, &av.zero_of(), path)?,
                (None, Some(bv)) => self.diff_child(tree, slot, &bv.zero_of(), bv, path)?,
                (None, None) => {}
            }
        }
        Ok(())
    }

    fn diff_map(
        &self,
        tree: &mut DiffTree,
        id: NodeId,
        a: Option<&BTreeMap<String, Value>>,
        b: Option<&BTreeMap<String, Value>>,
        path: &str,
    ) -> Result<(), CmpError> {
        let keys: BTreeSet<&String> = a
            .into_iter()
            .flat_map(BTreeMap::keys)
            .chain(b.into_iter().flat_map(BTreeMap::keys))
            .collect();

        for key in keys {
            let av = a.and_then(|m| m.get(key));
            let bv = b.and_then(|m| m.get(key));
            let slot = Slot {
                parent: id,
                key,
                struct_key: key,
                identity: None,
            };
            match (av, bv) {
                (Some(av), Some(bv)) => self.diff_child(tree, slot, av, bv, path)?,
                (Some(av), None) => self.diff_child(tree, slot, av, &av.zero_of(), path)?,
                (None, Some(bv)) => self.diff_child(tree, slot, &bv.zero_of(), bv, path)?,
                (None, None) => {}
            }
        }
        Ok(())
    }
}

fn index_slot(parent: NodeId, key: &str) -> Slot<'_> {
    Slot {
        parent,
        key,
        struct_key: key,
        identity: None,
    }
}

fn field_value<'a>(s: Option<&'a StructValue>, name: &str) -> &'a Value {
    s.and_then(|s| s.get(name)).map_or(&NULL, |f| &f.value)
}

fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

/// Index of the first unclaimed element equal to `x`, claiming it.
fn claim_equal(items: &[Value], x: &Value, matched: &mut [bool]) -> Option<usize> {
    let j = items
        .iter()
        .enumerate()
        .position(|(j, item)| !matched[j] && item == x)?;
    matched[j] = true;
    Some(j)
}

/// Key each element by its identity value.
///
/// Fails when an element is not a struct, lacks a scalar identity, or when
/// two elements share one identity.
fn key_by_identity<'a>(items: &'a [Value], field: &str) -> Result<Vec<(String, &'a Value)>, String> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::with_capacity(items.len());

    for (i, item) in items.iter().enumerate() {
        let Value::Struct(s) = item else {
            return Err(format!("element {} is a {}, not a struct", i, item.kind()));
        };
        let key = s
            .get(field)
            .and_then(|f| f.value.as_key())
            .ok_or_else(|| format!("element {} has no readable '{}'", i, field))?;
        if !seen.insert(key.clone()) {
            return Err(format!("duplicate identity '{}'", key));
        }
        out.push((key, item));
    }
    Ok(out)
}
