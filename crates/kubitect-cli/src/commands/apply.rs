//! Apply command

use clap::Args;
use kubitect_core::policy::{DryRunExecutor, PolicyEnforcer};
use kubitect_core::{Decision, FormatOptions, Pipeline};
use std::io::IsTerminal;

use super::InputArgs;
use crate::ui::TerminalUi;

#[derive(Debug, Args)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Answer every confirmation with yes
    #[arg(long)]
    pub auto_approve: bool,

    #[arg(long)]
    pub no_color: bool,
}

pub fn execute(args: ApplyArgs) -> Result<(), Box<dyn std::error::Error>> {
    let color = !args.no_color && std::io::stdout().is_terminal();
    let plan = args.input.plan()?;

    let ui = TerminalUi::new(args.auto_approve, color);
    let enforcer = PolicyEnforcer::new(&ui).with_format(
        FormatOptions::diff_only()
            .with_color(color)
            .with_action_prefix(true),
    );

    let mut executor = DryRunExecutor;
    match enforcer.apply(&plan, &mut executor)? {
        Decision::NoChanges => {}
        Decision::Proceed(Pipeline::Create) => {
            println!("Cluster '{}' approved for creation.", plan.cluster_name);
        }
        Decision::Proceed(Pipeline::Upgrade) => {
            println!("Cluster '{}' approved for upgrade.", plan.cluster_name);
        }
        Decision::Proceed(Pipeline::Scale(scale)) => {
            println!(
                "Cluster '{}' approved for scaling: {} node(s) added, {} removed.",
                plan.cluster_name,
                scale.add.len(),
                scale.remove.len()
            );
        }
    }
    Ok(())
}
