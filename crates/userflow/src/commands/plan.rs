use crate::runtime::Runtime;
use colored::Colorize;
use userflow_b2c::RESOURCE_TYPE;

pub async fn handle(rt: &Runtime) -> anyhow::Result<()> {
    if let Some(path) = &rt.config_path {
        println!("Configuration: {}", path.display().to_string().cyan());
    }

    let state = rt.state.load().await?;
    let data = rt.resource_data(&state);
    let plan = rt.resource.plan(&data);

    let id = data
        .id()
        .map(str::to_string)
        .or_else(|| data.config().map(|c| c.id()))
        .unwrap_or_else(|| RESOURCE_TYPE.to_string());
    println!();
    super::print_plan(&plan, &id);

    let immutable = plan.immutable_changes();
    if !immutable.is_empty() {
        println!();
        println!(
            "{}",
            "Apply will fail: destroy and recreate the user flow to change these attributes."
                .red()
                .bold()
        );
    } else if !plan.has_changes() {
        println!();
        println!("{}", "No changes.".green());
    }
    Ok(())
}
