pub mod apply;
pub mod destroy;
pub mod import;
pub mod plan;
pub mod refresh;
pub mod show;

use colored::Colorize;
use userflow_cloud::{ActionType, Plan};

/// Print a plan the way plan and apply show it
pub fn print_plan(plan: &Plan, id: &str) {
    let (symbol, label) = match plan.action_type {
        ActionType::Create => ("+".green(), "will be created".green()),
        ActionType::Update => ("~".yellow(), "will be updated in-place".yellow()),
        ActionType::Delete => ("-".red(), "will be destroyed".red()),
        ActionType::NoOp => (" ".normal(), "is up to date".normal()),
    };
    println!("{} {} {}", symbol, id.cyan(), label);

    for change in &plan.changes {
        let line = format!(
            "    {}: {} => {}",
            change.attribute, change.old, change.new
        );
        if change.immutable && plan.action_type == ActionType::Update {
            println!("{} {}", line.red(), "(immutable, cannot be updated)".red());
        } else {
            println!("{}", line);
        }
    }
}
