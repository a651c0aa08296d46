#![allow(clippy::unwrap_used, clippy::expect_used)]

use kubitect_core::diff::Action;
use kubitect_core::value::StructValue;
use kubitect_core::{compare, CompareOptions, Value};
use proptest::prelude::*;

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        "[a-z]{1,8}".prop_map(Value::String),
    ]
}

fn node(values: Vec<Value>) -> Value {
    let s = values
        .into_iter()
        .enumerate()
        .fold(StructValue::new("Node"), |s, (i, v)| s.field(format!("f{}", i), v));
    Value::Struct(s)
}

fn value() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::List),
            prop::collection::btree_map("[a-z]{1,4}", inner.clone(), 0..4).prop_map(Value::Map),
            prop::collection::vec(inner, 1..4).prop_map(node),
        ]
    })
}

/// Every generated document has a struct root.
fn document() -> impl Strategy<Value = Value> {
    prop::collection::vec(value(), 1..4).prop_map(node)
}

fn member(id: &str, size: i64) -> Value {
    Value::Struct(
        StructValue::new("Member")
            .tagged_field("name", &[("cmp", ",id")], id)
            .field("size", size),
    )
}

fn root(items: Vec<Value>) -> Value {
    Value::Struct(StructValue::new("Root").field("items", Value::List(items)))
}

proptest! {
    #[test]
    fn prop_self_comparison_has_no_changes(doc in document()) {
        let tree = compare(&doc, &doc, &CompareOptions::default()).unwrap();
        prop_assert!(tree.changes().is_empty());
        prop_assert!(!tree.has_changed(tree.root()));
    }

    #[test]
    fn prop_creation_mirrors_deletion(doc in document()) {
        let opts = CompareOptions::default();
        let created = compare(&Value::Null, &doc, &opts).unwrap().changes();
        let deleted = compare(&doc, &Value::Null, &opts).unwrap().changes();

        prop_assert!(created.iter().all(|c| c.action == Action::Create));
        prop_assert!(deleted.iter().all(|c| c.action == Action::Delete));
        prop_assert_eq!(created.paths(), deleted.paths());
        for (c, d) in created.iter().zip(deleted.iter()) {
            prop_assert_eq!(&c.after, &d.before);
        }
    }

    #[test]
    fn prop_unordered_permutation_has_no_changes(
        (items, shuffled) in prop::collection::vec(scalar(), 0..8)
            .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
    ) {
        let tree = compare(&root(items), &root(shuffled), &CompareOptions::default()).unwrap();
        prop_assert!(tree.changes().is_empty());
    }

    #[test]
    fn prop_identity_reorder_has_no_changes(
        (members, shuffled) in prop::collection::btree_map("[a-z]{1,6}", any::<i64>(), 1..6)
            .prop_map(|m| m.into_iter().map(|(id, size)| member(&id, size)).collect::<Vec<_>>())
            .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
    ) {
        let opts = CompareOptions::default().respect_slice_order(true);
        let tree = compare(&root(members), &root(shuffled), &opts).unwrap();
        prop_assert!(tree.changes().is_empty());
    }
}

#[test]
fn test_ordered_slices_pair_by_position() {
    let opts = CompareOptions::default().respect_slice_order(true);
    let a = root(vec![Value::Int(1), Value::Int(2)]);
    let b = root(vec![Value::Int(2), Value::Int(1)]);

    let changes = compare(&a, &b, &opts).unwrap().changes();
    assert_eq!(changes.paths(), vec!["items.0", "items.1"]);
    assert!(changes.iter().all(|c| c.action == Action::Modify));
}

#[test]
fn test_identity_elements_diff_in_place() {
    let a = root(vec![member("a", 1), member("b", 1)]);
    let b = root(vec![member("b", 2), member("c", 1)]);
    let tree = compare(&a, &b, &CompareOptions::default()).unwrap();

    assert_eq!(tree.action(tree.find("items.a").unwrap()), Action::Delete);
    assert_eq!(tree.action(tree.find("items.b").unwrap()), Action::Modify);
    assert_eq!(tree.action(tree.find("items.c").unwrap()), Action::Create);
    assert_eq!(
        tree.changes()
            .with_action(Action::Modify)
            .map(|c| c.path.as_str())
            .collect::<Vec<_>>(),
        vec!["items.b.size"]
    );
}

#[test]
fn test_duplicate_identities_fall_back_to_matching_by_value() {
    let a = root(vec![member("a", 1), member("a", 2)]);
    let b = root(vec![member("a", 2), member("a", 1)]);
    let tree = compare(&a, &b, &CompareOptions::default()).unwrap();
    assert!(tree.changes().is_empty());
    assert!(tree.find("items.0").is_some());
}

#[test]
fn test_kind_mismatch_aborts() {
    let a = Value::Struct(StructValue::new("Root").field("x", 1_i64));
    let b = Value::Struct(StructValue::new("Root").field("x", "one"));
    let err = compare(&a, &b, &CompareOptions::default()).unwrap_err();
    assert!(err.to_string().contains("'x'"));
}
