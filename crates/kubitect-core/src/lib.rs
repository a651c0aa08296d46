//! Kubitect core: configuration diffing and apply policy.
//!
//! This crate compares an applied cluster configuration with a new one and
//! decides whether the change may be applied:
//! - [`value`]: closed value model every configuration lowers into
//! - [`cmp`]: structural comparator with identity-based list matching
//! - [`diff`]: the resulting diff tree, flattened changes and rendering
//! - [`events`]: rules over generic paths and the engine triggering them
//! - [`policy`]: planning, enforcement and hand-off to lifecycle executors
//! - [`config`]: typed cluster configuration model

pub mod action;
pub mod cmp;
pub mod config;
pub mod diff;
pub mod digest;
pub mod errors;
pub mod events;
pub mod logging_facility;
pub mod policy;
pub mod value;

pub use action::ApplyAction;
pub use cmp::{compare, CompareOptions, Comparator};
pub use config::Config;
pub use diff::{Action, Change, Changes, DiffTree, FormatOptions};
pub use errors::{CmpError, ExError, ExErrorKind, KubitectError, PolicyError, Result};
pub use events::{EngineOptions, EventRule, Severity, TriggeredEvents, UnmatchedPolicy};
pub use policy::{Decision, Pipeline, Plan, Planner, PolicyEnforcer, ScalePlan};
pub use value::{ToValue, Value};
