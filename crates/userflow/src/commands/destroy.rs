use crate::runtime::Runtime;
use colored::Colorize;
use userflow_cloud::Operation;

pub async fn handle(rt: &Runtime) -> anyhow::Result<()> {
    let lock = rt.state.acquire_lock().await?;
    let mut state = rt.state.load().await?;
    let mut data = rt.resource_data(&state);

    let Some(id) = data.id().map(str::to_string) else {
        println!("{}", "Nothing tracked in state.".yellow());
        lock.release().await?;
        return Ok(());
    };

    println!("{} {}", "Destroying".yellow(), id.cyan());
    let client = rt.client()?;
    let ctx = rt.resource.timeouts().context(Operation::Delete);
    rt.resource.delete(&ctx, &mut data, &client).await?;
    println!("{} {}", "✓ Destroyed".green(), id.cyan());

    rt.commit(&mut state, data).await?;
    lock.release().await?;
    Ok(())
}
