//! Plan command

use clap::{Args, ValueEnum};
use kubitect_core::events::Severity;
use kubitect_core::policy::MessageBlock;
use kubitect_core::{FormatOptions, Plan};
use std::io::IsTerminal;

use super::InputArgs;

#[derive(Debug, Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,

    /// Render unchanged entries as well
    #[arg(long)]
    pub full: bool,

    #[arg(long)]
    pub no_color: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

pub fn execute(args: PlanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let plan = args.input.plan()?;

    match args.format {
        OutputFormat::Json => print_json(&plan, args.full),
        OutputFormat::Yaml => {
            let color = !args.no_color && std::io::stdout().is_terminal();
            print_yaml(&plan, args.full, color);
            Ok(())
        }
    }
}

fn print_yaml(plan: &Plan, full: bool, color: bool) {
    if plan.is_fresh() {
        println!("No applied configuration: cluster '{}' will be created.", plan.cluster_name);
        return;
    }
    let Some(tree) = plan.tree.as_ref() else {
        println!("No changes detected.");
        return;
    };

    let format = FormatOptions {
        diff_only: !full,
        color,
        action_prefix: true,
    };
    println!("{}", tree.to_yaml(&format));

    for event in &plan.events {
        let paths = event.paths();
        let block = match event.severity() {
            Severity::Block => MessageBlock::config_change_error(event.message(), &paths),
            Severity::Warn => MessageBlock::config_change_warning(event.message(), &paths),
            Severity::Ok => continue,
        };
        println!("{}", block.render(color));
    }

    println!(
        "Plan {} for '{}': {} change(s), {} blocking, {} warning(s).",
        plan.request_id,
        plan.action,
        plan.changes.len(),
        plan.events.blocking().count(),
        plan.events.warnings().count()
    );
}

fn print_json(plan: &Plan, full: bool) -> Result<(), Box<dyn std::error::Error>> {
    let diff = match plan.tree.as_ref() {
        Some(tree) => serde_json::from_str(&tree.to_json(!full)?)?,
        None => serde_json::Value::Null,
    };

    let out = serde_json::json!({
        "request_id": plan.request_id.as_str(),
        "action": plan.action,
        "applied_digest": plan.applied_digest,
        "new_digest": plan.new_digest,
        "changes": plan.changes,
        "events": plan.events,
        "diff": diff,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
