//! B2C user flow resource lifecycle
//!
//! Translates declared configuration into calls against a [`UserFlowApi`]
//! and reconciles the remote object back into [`ResourceData`]. Every
//! operation receives the client explicitly and is bounded by the deadline
//! of its [`OperationContext`].

use std::future::Future;
use tokio::time::timeout_at;
use userflow_cloud::action::diff;
use userflow_cloud::{
    B2cUserFlow, CloudError, OperationContext, Plan, PollConfig, ResourceData, Result, Timeouts,
    UserFlowApi, UserFlowConfig, UserFlowState, user_flow_name, wait_for_deletion,
};

/// Lifecycle controller for `azuread_b2c_user_flow`
#[derive(Debug, Clone, Default)]
pub struct UserFlowResource {
    timeouts: Timeouts,
    polling: PollConfig,
}

impl UserFlowResource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn with_polling(mut self, polling: PollConfig) -> Self {
        self.polling = polling;
        self
    }

    pub fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    /// Field-level changes between declared configuration and state
    pub fn plan(&self, data: &ResourceData) -> Plan {
        Plan::compute(data.config(), data.state())
    }

    /// Create the user flow and return its identifier
    pub async fn create(
        &self,
        ctx: &OperationContext,
        data: &mut ResourceData,
        client: &dyn UserFlowApi,
    ) -> Result<String> {
        let config = data.require_config()?.clone();
        validate(&config)?;

        let flow = B2cUserFlow {
            id: Some(config.name.clone()),
            user_flow_type: Some(config.user_flow_type),
            user_flow_type_version: Some(config.user_flow_type_version),
            default_language_tag: config.default_language_tag.clone(),
            is_language_customization_enabled: Some(config.is_language_customization_enabled),
        };

        tracing::info!(
            "Creating user flow {} ({} v{})",
            config.name,
            config.user_flow_type,
            config.user_flow_type_version
        );
        let created = within(ctx, client.create(&flow))
            .await
            .map_err(|e| e.context(format!("Creating user flow {:?}", config.name)))?;

        if created.id.as_deref().is_none_or(str::is_empty) {
            return Err(CloudError::BadResponse("API returned nil object ID".to_string()));
        }

        let id = config.id();
        data.set_state(UserFlowState::from_config(&config));
        self.read(ctx, data, client).await?;

        if data.id().is_none() {
            return Err(CloudError::BadResponse(format!(
                "user flow {:?} was not found right after creation",
                id
            )));
        }
        Ok(id)
    }

    /// Refresh state from the remote object, clearing it if the object is gone
    pub async fn read(
        &self,
        ctx: &OperationContext,
        data: &mut ResourceData,
        client: &dyn UserFlowApi,
    ) -> Result<()> {
        let Some(id) = data.id().map(str::to_string) else {
            return Ok(());
        };

        let flow = match within(ctx, client.get(&id)).await {
            Ok(flow) => flow,
            Err(e) if e.is_not_found() => {
                tracing::debug!(
                    "User flow with object ID {:?} was not found - removing from state",
                    id
                );
                data.clear();
                return Ok(());
            }
            Err(e) => {
                return Err(e.context(format!("Retrieving user flow with object ID {:?}", id)));
            }
        };

        let name = data
            .state()
            .map(|s| s.name.clone())
            .filter(|name| !name.is_empty())
            .or_else(|| user_flow_name(&id).map(str::to_string))
            .unwrap_or_default();
        data.set_state(state_from_remote(&id, name, flow)?);
        Ok(())
    }

    /// Apply changes of the mutable attributes
    pub async fn update(
        &self,
        ctx: &OperationContext,
        data: &mut ResourceData,
        client: &dyn UserFlowApi,
    ) -> Result<()> {
        let config = data.require_config()?.clone();
        let state = data.state().ok_or_else(|| {
            CloudError::Validation("no user flow is tracked in state, create it first".to_string())
        })?;

        if let Some(change) = diff(&config, state).into_iter().find(|c| c.immutable) {
            return Err(CloudError::ImmutableField(change.attribute));
        }

        let id = state.id.clone();
        let flow = B2cUserFlow {
            id: Some(id.clone()),
            default_language_tag: config.default_language_tag.clone(),
            is_language_customization_enabled: Some(config.is_language_customization_enabled),
            ..Default::default()
        };

        tracing::info!("Updating user flow {}", id);
        within(ctx, client.update(&flow))
            .await
            .map_err(|e| e.context(format!("Could not update user flow with ID {:?}", id)))?;

        self.read(ctx, data, client).await
    }

    /// Delete the user flow and wait until the service stops returning it
    ///
    /// State is cleared once the object is confirmed gone, or right away if
    /// it was already gone. On failure state is left as it was.
    pub async fn delete(
        &self,
        ctx: &OperationContext,
        data: &mut ResourceData,
        client: &dyn UserFlowApi,
    ) -> Result<()> {
        let Some(id) = data.id().map(str::to_string) else {
            return Ok(());
        };

        tracing::info!("Deleting user flow {}", id);
        match within(ctx, client.delete(&id)).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                tracing::debug!(
                    "User flow with object ID {:?} was not found - removing from state",
                    id
                );
                data.clear();
                return Ok(());
            }
            Err(e) => {
                let status = e
                    .status()
                    .map_or_else(|| "none".to_string(), |s| s.to_string());
                return Err(e.context(format!(
                    "Deleting user flow with object ID {:?}, got status {}",
                    id, status
                )));
            }
        }

        let retries_were_disabled = client.retries_disabled();
        client.set_retries_disabled(true);
        let waited = wait_for_deletion(ctx, &self.polling, {
            let id = id.as_str();
            move || async move {
                match client.get(id).await {
                    Ok(_) => Ok(true),
                    Err(e) if e.is_not_found() => Ok(false),
                    Err(e) => Err(e),
                }
            }
        })
        .await;
        client.set_retries_disabled(retries_were_disabled);

        waited.map_err(|e| {
            e.context(format!(
                "Waiting for deletion of user flow with object ID {:?}",
                id
            ))
        })?;

        data.clear();
        Ok(())
    }

    /// Start tracking an existing user flow
    pub async fn import(
        &self,
        ctx: &OperationContext,
        id: &str,
        data: &mut ResourceData,
        client: &dyn UserFlowApi,
    ) -> Result<()> {
        let name = validate_import_id(id)?;

        let flow = within(ctx, client.get(id)).await.map_err(|e| {
            if e.is_not_found() {
                e.context(format!("Cannot import non-existent remote object {:?}", id))
            } else {
                e.context(format!("Retrieving user flow with object ID {:?}", id))
            }
        })?;

        data.set_state(state_from_remote(id, name.to_string(), flow)?);
        Ok(())
    }
}

/// Reject configuration that can never be created
pub fn validate(config: &UserFlowConfig) -> Result<()> {
    if config.name.trim().is_empty() {
        return Err(CloudError::Validation(
            "name must not be empty or whitespace".to_string(),
        ));
    }
    if !is_valid_name(&config.name) {
        return Err(CloudError::Validation(format!(
            "name {:?} may only contain ASCII letters, digits, '_' and '-'",
            config.name
        )));
    }
    if !config.user_flow_type_version.is_finite() {
        return Err(CloudError::Validation(format!(
            "user_flow_type_version must be a finite number, got {}",
            config.user_flow_type_version
        )));
    }
    Ok(())
}

/// Check an identifier given to import and return the user flow name in it
///
/// Accepts the same `B2C_1_<name>` form create produces.
pub fn validate_import_id(id: &str) -> Result<&str> {
    user_flow_name(id)
        .filter(|name| is_valid_name(name))
        .ok_or_else(|| {
            CloudError::Validation(format!(
                "specified ID ({:?}) is not valid: expected B2C_1_<name>",
                id
            ))
        })
}

/// Names become a URL path segment of the item endpoint
fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn state_from_remote(id: &str, name: String, flow: B2cUserFlow) -> Result<UserFlowState> {
    let missing = |field: &str| {
        CloudError::BadResponse(format!("user flow {:?} returned without {}", id, field))
    };

    Ok(UserFlowState {
        id: id.to_string(),
        object_id: flow.id.filter(|v| !v.is_empty()).ok_or_else(|| missing("id"))?,
        name,
        user_flow_type: flow.user_flow_type.ok_or_else(|| missing("userFlowType"))?,
        user_flow_type_version: flow
            .user_flow_type_version
            .ok_or_else(|| missing("userFlowTypeVersion"))?,
        default_language_tag: flow.default_language_tag,
        is_language_customization_enabled: flow.is_language_customization_enabled.unwrap_or(false),
    })
}

async fn within<T>(ctx: &OperationContext, call: impl Future<Output = Result<T>>) -> Result<T> {
    timeout_at(ctx.deadline(), call).await.map_err(|_| {
        CloudError::Timeout(format!("{} exceeded its deadline", ctx.operation()))
    })?
}
