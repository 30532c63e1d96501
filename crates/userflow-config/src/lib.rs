pub mod error;

pub use error::*;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use userflow_cloud::{PollConfig, Timeouts, UserFlowConfig};

const CANDIDATES: [&str; 2] = ["userflow.local.yaml", "userflow.yaml"];

/// Contents of a userflow configuration file
///
/// ```yaml
/// user_flow:
///   name: promo
///   user_flow_type: signUp
///   user_flow_type_version: 1.0
///   is_language_customization_enabled: true
/// timeouts:
///   delete: 600
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Declared user flow; absent means it should not exist
    #[serde(default)]
    pub user_flow: Option<UserFlowConfig>,

    /// Per-operation timeouts in seconds
    #[serde(default)]
    pub timeouts: Timeouts,

    /// Deletion confirmation polling
    #[serde(default)]
    pub polling: PollConfig,
}

/// Find the project's configuration file
///
/// Search order:
/// 1. `USERFLOW_CONFIG_PATH` environment variable
/// 2. current directory: userflow.local.yaml, userflow.yaml
/// 3. `./.userflow/` with the same names
/// 4. `~/.config/userflow/userflow.yaml`
pub fn find_config_file() -> Result<PathBuf> {
    if let Ok(config_path) = std::env::var("USERFLOW_CONFIG_PATH") {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(path);
        }
    }

    let current_dir = std::env::current_dir()?;

    for filename in &CANDIDATES {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(path);
        }
    }

    let project_dir = current_dir.join(".userflow");
    if project_dir.is_dir() {
        for filename in &CANDIDATES {
            let path = project_dir.join(filename);
            if path.exists() {
                return Ok(path);
            }
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let global_config = config_dir.join("userflow").join("userflow.yaml");
        if global_config.exists() {
            return Ok(global_config);
        }
    }

    Err(ConfigError::ConfigFileNotFound)
}

/// Load and parse a configuration file
pub fn load_config(path: &Path) -> Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content, path)
}

/// Parse configuration text; `path` is only used in error messages
pub fn parse_config(content: &str, path: &Path) -> Result<ProjectConfig> {
    serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
