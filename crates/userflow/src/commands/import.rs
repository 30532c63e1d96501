use crate::runtime::Runtime;
use colored::Colorize;
use userflow_cloud::Operation;

pub async fn handle(rt: &Runtime, id: &str) -> anyhow::Result<()> {
    let lock = rt.state.acquire_lock().await?;
    let mut state = rt.state.load().await?;
    let mut data = rt.resource_data(&state);

    if let Some(tracked) = data.id() {
        anyhow::bail!(
            "state already tracks {}; destroy it or remove the state file before importing",
            tracked
        );
    }

    // reject malformed identifiers before touching credentials
    userflow_b2c::validate_import_id(id)?;

    let client = rt.client()?;
    let ctx = rt.resource.timeouts().context(Operation::Read);
    rt.resource.import(&ctx, id, &mut data, &client).await?;
    println!("{} {}", "✓ Imported".green(), id.cyan());

    let plan = rt.resource.plan(&data);
    if data.config().is_some() && plan.has_changes() {
        println!();
        super::print_plan(&plan, id);
    }

    rt.commit(&mut state, data).await?;
    lock.release().await?;
    Ok(())
}
