//! Structural comparator.
//!
//! Compares two values of the same shape and produces a [`DiffTree`](crate::diff::DiffTree).
//! Dispatch is on the kind of whichever side is present:
//!
//! - scalars become leaves (CREATE, DELETE, MODIFY or NONE);
//! - structs recurse field by field in declaration order;
//! - lists pair elements by identity field when the element type declares
//!   one, otherwise by equality (or by position with `respect_slice_order`);
//! - maps pair entries by key.
//!
//! Unmatched elements are diffed against their zero value, so every
//! populated leaf under them is classified on its own.

pub mod comparator;
pub mod options;

pub use comparator::{compare, Comparator};
pub use options::CompareOptions;
