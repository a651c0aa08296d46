//! Planning: compare the applied configuration with the new one and bind
//! the resulting changes to the rules of the requested action.

use kubitect_core_types::{RequestContext, RequestId, TraceId};

use crate::action::ApplyAction;
use crate::cmp::{compare, CompareOptions};
use crate::config::Config;
use crate::diff::{Changes, DiffTree};
use crate::digest::config_digest;
use crate::errors::Result;
use crate::events::{rules_for, trigger_events, EngineOptions, TriggeredEvents};
use crate::value::ToValue;
use crate::{log_op_end, log_op_error, log_op_start};

/// Everything the enforcer needs to decide on one apply.
#[derive(Debug, Clone)]
pub struct Plan {
    pub request_id: RequestId,
    pub trace_id: Option<TraceId>,
    pub action: ApplyAction,
    /// Name of the cluster in the new configuration
    pub cluster_name: String,
    /// `None` when no configuration was applied before
    pub applied_digest: Option<String>,
    pub new_digest: String,
    /// Present only when both sides exist and differ
    pub tree: Option<DiffTree>,
    pub changes: Changes,
    pub events: TriggeredEvents,
}

impl Plan {
    /// No cluster exists yet
    pub fn is_fresh(&self) -> bool {
        self.applied_digest.is_none()
    }

    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Planner {
    compare: CompareOptions,
    engine: EngineOptions,
}

impl Default for Planner {
    fn default() -> Self {
        Self {
            compare: CompareOptions::kubitect(),
            engine: EngineOptions::default(),
        }
    }
}

impl Planner {
    pub fn new(compare: CompareOptions, engine: EngineOptions) -> Self {
        Self { compare, engine }
    }

    pub fn with_engine_options(mut self, engine: EngineOptions) -> Self {
        self.engine = engine;
        self
    }

    pub fn compare_options(&self) -> &CompareOptions {
        &self.compare
    }

    /// Build the plan for applying `new` over `applied` with `action`.
    ///
    /// # Errors
    ///
    /// Returns `KubitectError::Compare` if the two configurations cannot be
    /// compared and `KubitectError::Json` if a digest cannot be computed.
    pub fn plan(&self, applied: Option<&Config>, new: &Config, action: ApplyAction) -> Result<Plan> {
        self.plan_in(&RequestContext::new(), applied, new, action)
    }

    /// [`plan`](Self::plan) under a caller-provided correlation context.
    ///
    /// # Errors
    ///
    /// Same as [`plan`](Self::plan).
    pub fn plan_in(
        &self,
        ctx: &RequestContext,
        applied: Option<&Config>,
        new: &Config,
        action: ApplyAction,
    ) -> Result<Plan> {
        let request_id = ctx.request_id.as_str();
        log_op_start!("plan", request_id = request_id, action = action.as_str());
        let start = std::time::Instant::now();

        let plan = self.plan_impl(ctx, applied, new, action).map_err(|e| {
            log_op_error!(
                "plan",
                &e,
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = request_id
            );
            e
        })?;

        log_op_end!(
            "plan",
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = request_id,
            change_count = plan.changes.len(),
            event_count = plan.events.len()
        );
        Ok(plan)
    }

    fn plan_impl(
        &self,
        ctx: &RequestContext,
        applied: Option<&Config>,
        new: &Config,
        action: ApplyAction,
    ) -> Result<Plan> {
        let new_value = new.to_value();
        let new_digest = config_digest(&new_value)?;

        let mut plan = Plan {
            request_id: ctx.request_id.clone(),
            trace_id: ctx.trace_id.clone(),
            action,
            cluster_name: new
                .cluster
                .as_ref()
                .map(|c| c.name.clone())
                .unwrap_or_default(),
            applied_digest: None,
            new_digest,
            tree: None,
            changes: Changes::default(),
            events: TriggeredEvents::default(),
        };

        let Some(applied) = applied else {
            tracing::debug!(request_id = plan.request_id.as_str(), "no applied configuration");
            return Ok(plan);
        };

        let applied_value = applied.to_value();
        let applied_digest = config_digest(&applied_value)?;
        let unchanged = applied_digest == plan.new_digest;
        plan.applied_digest = Some(applied_digest);
        if unchanged {
            return Ok(plan);
        }

        let tree = compare(&applied_value, &new_value, &self.compare)?;
        plan.changes = tree.changes();
        if plan.has_changes() {
            plan.events = trigger_events(&tree, &rules_for(action), &self.engine);
            plan.tree = Some(tree);
        }
        Ok(plan)
    }
}
