//! Diff tree produced by the comparator.
//!
//! ## Entry point
//!
//! ```
//! use kubitect_core::cmp::{compare, CompareOptions};
//! use kubitect_core::diff::FormatOptions;
//! use kubitect_core::value::Value;
//!
//! let tree = compare(&Value::UInt(1), &Value::UInt(2), &CompareOptions::default()).unwrap();
//! assert!(tree.has_changed(tree.root()));
//! println!("{}", tree.to_yaml(&FormatOptions::diff_only()));
//! ```
//!
//! ## Guarantees
//!
//! - **O(1) change checks**: every insertion propagates the action join to
//!   the root, so `has_changed` never walks the subtree.
//! - **Leaf granularity**: `changes()` only emits changed leaves; a created
//!   object yields one CREATE record per populated field.
//! - **Deterministic rendering**: children are sorted by key when rendered.

pub mod change;
pub mod render;
pub mod tree;

pub use change::{Change, Changes};
pub use render::FormatOptions;
pub use tree::{Action, DiffNode, DiffTree, NodeId, NodeKind};
