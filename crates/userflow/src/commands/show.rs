use std::path::Path;
use userflow_cloud::StateManager;

pub async fn handle_state(state_dir: &Path) -> anyhow::Result<()> {
    let state = StateManager::new(state_dir).load().await?;
    match state.resource {
        Some(resource) => println!("{}", serde_json::to_string_pretty(&resource)?),
        None => println!("null"),
    }
    Ok(())
}

pub fn handle_schema() -> anyhow::Result<()> {
    let schema = userflow_b2c::user_flow_schema();
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
