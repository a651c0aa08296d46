//! Policy enforcement around an apply.
//!
//! [`Planner`] compares configurations and triggers events,
//! [`PolicyEnforcer`] turns the result into a [`Decision`] through a
//! [`Ui`], and [`LifecycleExecutor`] receives the approved pipeline.

pub mod enforcer;
pub mod executor;
pub mod plan;
pub mod ui;

pub use enforcer::{Decision, NodeRef, Pipeline, PolicyEnforcer, ScalePlan};
pub use executor::{apply, DryRunExecutor, LifecycleExecutor};
pub use plan::{Plan, Planner};
pub use ui::{confirm, parse_answer, BlockLevel, MessageBlock, ScriptedUi, Ui};
