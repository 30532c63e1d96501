use anyhow::Context;
use std::path::{Path, PathBuf};
use userflow_b2c::{GraphClient, GraphConfig, UserFlowResource};
use userflow_cloud::{ResourceData, StateFile, StateManager};
use userflow_config::{ConfigError, ProjectConfig};

/// Everything a command needs: declared configuration, the resource
/// controller tuned by it, and the state store
pub struct Runtime {
    pub config: ProjectConfig,
    pub config_path: Option<PathBuf>,
    pub resource: UserFlowResource,
    pub state: StateManager,
}

impl Runtime {
    /// Load with a configuration file that must exist
    pub fn load(config: Option<&Path>, state_dir: &Path) -> anyhow::Result<Self> {
        let path = match config {
            Some(path) => path.to_path_buf(),
            None => userflow_config::find_config_file()?,
        };
        let project = userflow_config::load_config(&path)
            .with_context(|| format!("loading {}", path.display()))?;
        Ok(Self::new(project, Some(path), state_dir))
    }

    /// Load, falling back to an empty configuration when none is found
    pub fn load_optional(config: Option<&Path>, state_dir: &Path) -> anyhow::Result<Self> {
        if config.is_some() {
            return Self::load(config, state_dir);
        }
        match userflow_config::find_config_file() {
            Ok(path) => {
                let project = userflow_config::load_config(&path)
                    .with_context(|| format!("loading {}", path.display()))?;
                Ok(Self::new(project, Some(path), state_dir))
            }
            Err(ConfigError::ConfigFileNotFound) => {
                tracing::debug!("No configuration file, using defaults");
                Ok(Self::new(ProjectConfig::default(), None, state_dir))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn new(config: ProjectConfig, config_path: Option<PathBuf>, state_dir: &Path) -> Self {
        let resource = UserFlowResource::new()
            .with_timeouts(config.timeouts)
            .with_polling(config.polling.clone());
        Self {
            config,
            config_path,
            resource,
            state: StateManager::new(state_dir),
        }
    }

    /// Graph client configured from the environment
    pub fn client(&self) -> anyhow::Result<GraphClient> {
        let config = GraphConfig::from_env()?;
        Ok(GraphClient::new(config)?)
    }

    pub fn resource_data(&self, state: &StateFile) -> ResourceData {
        ResourceData::new(self.config.user_flow.clone(), state.resource.clone())
    }

    /// Persist the outcome of an operation
    pub async fn commit(&self, state: &mut StateFile, data: ResourceData) -> anyhow::Result<()> {
        state.set_resource(data.into_state());
        self.state
            .save(state)
            .await
            .context("saving state")?;
        Ok(())
    }
}
