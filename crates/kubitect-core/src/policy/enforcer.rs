//! Turns a [`Plan`] into a go/no-go decision.

use serde::Serialize;

use crate::action::ApplyAction;
use crate::diff::{Action, DiffTree, FormatOptions};
use crate::errors::PolicyError;
use crate::events::{Severity, TriggeredEvent};
use crate::policy::plan::Plan;
use crate::policy::ui::{confirm, MessageBlock, Ui, CONTINUE_PROMPT};
use crate::{log_op_end, log_op_error, log_op_start};

pub const MISSING_CLUSTER_PROMPT: &str = "Cluster does not exist. Would you like to create it instead?";
pub const NO_CHANGES: &str = "No changes detected.";
pub const CHANGES_HEADER: &str = "Following changes have been detected:";
pub const WARNINGS_FOOTER: &str = "Above warnings indicate potentially dangerous actions.";

/// A node instance added or removed by a scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeRef {
    /// Pool field name: `load_balancer`, `master` or `worker`
    pub pool: String,
    pub id: String,
}

impl NodeRef {
    pub fn new(pool: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            pool: pool.into(),
            id: id.into(),
        }
    }

    /// Machine name of the node within `cluster`
    pub fn name(&self, cluster: &str) -> String {
        let kind = match self.pool.as_str() {
            "load_balancer" => "lb",
            other => other,
        };
        format!("{}-{}-{}", cluster, kind, self.id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScalePlan {
    pub add: Vec<NodeRef>,
    pub remove: Vec<NodeRef>,
}

impl ScalePlan {
    /// Partition created and deleted instance elements of `tree`.
    pub fn from_tree(tree: &DiffTree) -> Self {
        let mut plan = ScalePlan::default();
        for id in tree.preorder() {
            let action = tree.action(id);
            if !matches!(action, Action::Create | Action::Delete) {
                continue;
            }
            let generic = tree.generic_path(id);
            let Some(pool) = instance_pool(&generic) else {
                continue;
            };
            let node = NodeRef::new(pool, tree.node(id).key());
            if action == Action::Create {
                plan.add.push(node);
            } else {
                plan.remove.push(node);
            }
        }
        plan
    }

    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }
}

/// `cluster.nodes.<pool>.instances.*` -> `<pool>`
fn instance_pool(generic_path: &str) -> Option<&str> {
    generic_path
        .strip_prefix("cluster.nodes.")?
        .strip_suffix(".instances.*")
        .filter(|pool| !pool.contains('.'))
}

/// Downstream lifecycle run selected by the enforcer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "pipeline", rename_all = "lowercase")]
pub enum Pipeline {
    Create,
    Upgrade,
    Scale(ScalePlan),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    NoChanges,
    Proceed(Pipeline),
}

pub struct PolicyEnforcer<'a> {
    ui: &'a dyn Ui,
    format: FormatOptions,
}

impl<'a> PolicyEnforcer<'a> {
    pub fn new(ui: &'a dyn Ui) -> Self {
        Self {
            ui,
            format: FormatOptions::diff_only(),
        }
    }

    pub fn ui(&self) -> &'a dyn Ui {
        self.ui
    }

    /// Options used to print the detected changes
    pub fn with_format(mut self, format: FormatOptions) -> Self {
        self.format = format;
        self
    }

    /// Decide whether `plan` may proceed and which pipeline it runs.
    ///
    /// # Errors
    ///
    /// `PolicyError::Blocked` when a blocking event fired,
    /// `PolicyError::Declined` when a confirmation was refused and
    /// `PolicyError::Ui` when no answer could be read.
    pub fn enforce(&self, plan: &Plan) -> Result<Decision, PolicyError> {
        let request_id = plan.request_id.as_str();
        log_op_start!("enforce", request_id = request_id, action = plan.action.as_str());
        let start = std::time::Instant::now();

        let decision = self.enforce_impl(plan).map_err(|e| {
            log_op_error!(
                "enforce",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = request_id
            );
            e
        })?;

        log_op_end!(
            "enforce",
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = request_id,
            decision = ?decision
        );
        Ok(decision)
    }

    fn enforce_impl(&self, plan: &Plan) -> Result<Decision, PolicyError> {
        if plan.is_fresh() {
            if plan.action != ApplyAction::Create {
                confirm(self.ui, MISSING_CLUSTER_PROMPT)?;
            }
            return Ok(Decision::Proceed(Pipeline::Create));
        }

        let Some(tree) = plan.tree.as_ref().filter(|_| plan.has_changes()) else {
            self.ui.println(NO_CHANGES);
            return Ok(Decision::NoChanges);
        };

        self.ui.println(CHANGES_HEADER);
        self.ui.println("");
        self.ui.println(&tree.to_yaml(&self.format));
        self.ui.println("");

        if plan.events.has_blocking() {
            let blocking: Vec<&TriggeredEvent> = plan.events.blocking().collect();
            self.ui.print_blocks(&blocks(&blocking));
            return Err(PolicyError::Blocked {
                messages: blocking.iter().map(|e| e.message().to_string()).collect(),
            });
        }

        if plan.events.has_warnings() {
            let warnings: Vec<&TriggeredEvent> = plan.events.warnings().collect();
            self.ui.print_blocks(&blocks(&warnings));
            self.ui.println(WARNINGS_FOOTER);
            confirm(self.ui, CONTINUE_PROMPT)?;
        }

        let pipeline = match plan.action {
            ApplyAction::Create => Pipeline::Create,
            ApplyAction::Upgrade => Pipeline::Upgrade,
            ApplyAction::Scale => Pipeline::Scale(ScalePlan::from_tree(tree)),
        };
        Ok(Decision::Proceed(pipeline))
    }
}

fn blocks(events: &[&TriggeredEvent]) -> Vec<MessageBlock> {
    events
        .iter()
        .map(|e| {
            let paths = e.paths();
            match e.severity() {
                Severity::Block => MessageBlock::config_change_error(e.message(), &paths),
                _ => MessageBlock::config_change_warning(e.message(), &paths),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_pool_extraction() {
        assert_eq!(instance_pool("cluster.nodes.worker.instances.*"), Some("worker"));
        assert_eq!(
            instance_pool("cluster.nodes.load_balancer.instances.*"),
            Some("load_balancer")
        );
        assert_eq!(instance_pool("cluster.nodes.worker.instances.*.cpu"), None);
        assert_eq!(instance_pool("cluster.nodes.worker.default"), None);
    }

    #[test]
    fn test_node_names() {
        assert_eq!(NodeRef::new("worker", "w2").name("local"), "local-worker-w2");
        assert_eq!(NodeRef::new("load_balancer", "1").name("local"), "local-lb-1");
    }
}
