//! Event rules and the engine binding diff changes to them.
//!
//! A rule names generic struct paths (list elements as `*`), the node
//! action it reacts to, a severity and a message. The engine walks a
//! [`DiffTree`](crate::diff::DiffTree) in document order and groups the
//! triggering changes per rule.

pub mod engine;
pub mod rule;
pub mod rules;

pub use engine::{
    categorize_changes, trigger_events, ChangeCategories, EngineOptions, TriggeredEvent,
    TriggeredEvents, UnmatchedPolicy, DISALLOWED_MESSAGE,
};
pub use rule::{EventRule, RuleAction, Severity};
pub use rules::rules_for;
