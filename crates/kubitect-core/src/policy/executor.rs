//! Hand-off from an approved plan to the provisioning pipelines.

use crate::errors::Result;
use crate::policy::enforcer::{Decision, Pipeline, PolicyEnforcer, ScalePlan};
use crate::policy::plan::Plan;
use crate::policy::ui::{confirm, Ui, CONTINUE_PROMPT};

pub const REMOVAL_HEADER: &str = "The following nodes will get removed:";

/// The provisioning side of an apply: infrastructure, Kubernetes install,
/// node scaling. Called only after the plan was approved.
pub trait LifecycleExecutor {
    /// # Errors
    ///
    /// Returns `KubitectError::Executor` when provisioning fails.
    fn create(&mut self, plan: &Plan) -> Result<()>;

    /// # Errors
    ///
    /// Returns `KubitectError::Executor` when the upgrade fails.
    fn upgrade(&mut self, plan: &Plan) -> Result<()>;

    /// # Errors
    ///
    /// Returns `KubitectError::Executor` when scaling fails.
    fn scale(&mut self, plan: &Plan, scale: &ScalePlan) -> Result<()>;
}

/// Executor that only logs what would be handed off.
#[derive(Debug, Default)]
pub struct DryRunExecutor;

impl LifecycleExecutor for DryRunExecutor {
    fn create(&mut self, plan: &Plan) -> Result<()> {
        tracing::info!(
            op = "create",
            request_id = plan.request_id.as_str(),
            cluster = plan.cluster_name.as_str(),
            "dry run, provisioning skipped"
        );
        Ok(())
    }

    fn upgrade(&mut self, plan: &Plan) -> Result<()> {
        tracing::info!(
            op = "upgrade",
            request_id = plan.request_id.as_str(),
            cluster = plan.cluster_name.as_str(),
            "dry run, provisioning skipped"
        );
        Ok(())
    }

    fn scale(&mut self, plan: &Plan, scale: &ScalePlan) -> Result<()> {
        tracing::info!(
            op = "scale",
            request_id = plan.request_id.as_str(),
            cluster = plan.cluster_name.as_str(),
            add = scale.add.len(),
            remove = scale.remove.len(),
            "dry run, provisioning skipped"
        );
        Ok(())
    }
}

impl PolicyEnforcer<'_> {
    /// Enforce `plan` and run the selected pipeline on `executor`.
    ///
    /// Removing nodes asks for one more confirmation listing the machines
    /// that go away.
    ///
    /// # Errors
    ///
    /// Returns `KubitectError::Policy` when the plan is refused and
    /// whatever the executor reports otherwise.
    pub fn apply(&self, plan: &Plan, executor: &mut dyn LifecycleExecutor) -> Result<Decision> {
        let decision = self.enforce(plan)?;

        if let Decision::Proceed(pipeline) = &decision {
            match pipeline {
                Pipeline::Create => executor.create(plan)?,
                Pipeline::Upgrade => executor.upgrade(plan)?,
                Pipeline::Scale(scale) => {
                    if !scale.remove.is_empty() {
                        self.ui().println(REMOVAL_HEADER);
                        for node in &scale.remove {
                            self.ui()
                                .println(&format!("- {}", node.name(&plan.cluster_name)));
                        }
                        confirm(self.ui(), CONTINUE_PROMPT)?;
                    }
                    executor.scale(plan, scale)?;
                }
            }
        }
        Ok(decision)
    }
}

/// [`PolicyEnforcer::apply`] with default diff formatting.
///
/// # Errors
///
/// Same as [`PolicyEnforcer::apply`].
pub fn apply(plan: &Plan, ui: &dyn Ui, executor: &mut dyn LifecycleExecutor) -> Result<Decision> {
    PolicyEnforcer::new(ui).apply(plan, executor)
}
