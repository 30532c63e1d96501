use crate::runtime::Runtime;
use colored::Colorize;
use userflow_cloud::{ActionType, Operation};

pub async fn handle(rt: &Runtime) -> anyhow::Result<()> {
    let lock = rt.state.acquire_lock().await?;
    let mut state = rt.state.load().await?;
    let mut data = rt.resource_data(&state);
    let plan = rt.resource.plan(&data);

    let id = data
        .id()
        .map(str::to_string)
        .or_else(|| data.config().map(|c| c.id()))
        .unwrap_or_default();
    super::print_plan(&plan, &id);

    if !plan.has_changes() {
        println!("{}", "No changes.".green());
        lock.release().await?;
        return Ok(());
    }

    let client = rt.client()?;
    let timeouts = rt.resource.timeouts();
    let outcome = match plan.action_type {
        ActionType::Create => {
            let ctx = timeouts.context(Operation::Create);
            rt.resource
                .create(&ctx, &mut data, &client)
                .await
                .map(|id| println!("{} {}", "✓ Created".green(), id.cyan()))
        }
        ActionType::Update => {
            let ctx = timeouts.context(Operation::Update);
            rt.resource
                .update(&ctx, &mut data, &client)
                .await
                .map(|()| println!("{} {}", "✓ Updated".green(), id.cyan()))
        }
        ActionType::Delete => {
            let ctx = timeouts.context(Operation::Delete);
            rt.resource
                .delete(&ctx, &mut data, &client)
                .await
                .map(|()| println!("{} {}", "✓ Destroyed".green(), id.cyan()))
        }
        ActionType::NoOp => Ok(()),
    };

    if let Err(e) = outcome {
        // a flow that exists remotely stays tracked even when the follow-up read failed
        if data.id().is_some() {
            rt.commit(&mut state, data).await?;
        }
        lock.release().await?;
        return Err(e.into());
    }

    rt.commit(&mut state, data).await?;
    lock.release().await?;
    Ok(())
}
