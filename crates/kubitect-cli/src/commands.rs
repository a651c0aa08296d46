//! Subcommands and the inputs they share

pub mod apply;
pub mod plan;

use clap::{Args, ValueEnum};
use kubitect_core::{ApplyAction, Config, EngineOptions, Plan, Planner, UnmatchedPolicy};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InputArgs {
    /// Configuration of the running cluster; omit when the cluster does not exist
    #[arg(long)]
    pub applied: Option<PathBuf>,

    /// New cluster configuration
    #[arg(long, short = 'c')]
    pub config: PathBuf,

    /// Lifecycle action: create, upgrade or scale
    #[arg(long, short = 'a', default_value = "create")]
    pub action: ApplyAction,

    /// Treatment of changes no rule mentions
    #[arg(long, value_enum, default_value_t = Unmatched::Allow)]
    pub unmatched: Unmatched,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Unmatched {
    Allow,
    Block,
}

impl From<Unmatched> for UnmatchedPolicy {
    fn from(value: Unmatched) -> Self {
        match value {
            Unmatched::Allow => UnmatchedPolicy::Allow,
            Unmatched::Block => UnmatchedPolicy::Block,
        }
    }
}

impl InputArgs {
    /// Load both configurations and plan the apply.
    pub fn plan(&self) -> Result<Plan, Box<dyn std::error::Error>> {
        tracing::debug!(
            config = %self.config.display(),
            applied = ?self.applied,
            action = self.action.as_str(),
            "loading configurations"
        );
        let applied = self.applied.as_ref().map(Config::load).transpose()?;
        let new = Config::load(&self.config)?;

        let planner = Planner::default()
            .with_engine_options(EngineOptions::default().with_unmatched(self.unmatched.into()));
        Ok(planner.plan(applied.as_ref(), &new, self.action)?)
    }
}
