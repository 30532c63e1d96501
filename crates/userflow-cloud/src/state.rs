//! State management for the managed user flow
//!
//! [`ResourceData`] is the in-memory handle a lifecycle operation reads and
//! writes. [`StateManager`] persists it to `.userflow/state.json`.

use crate::error::{CloudError, Result};
use crate::model::{UserFlowConfig, UserFlowState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

const STATE_VERSION: u32 = 1;
const STATE_DIR: &str = ".userflow";
const STATE_FILE: &str = "state.json";
const STATE_BACKUP: &str = "state.json.backup";
const LOCK_FILE: &str = "lock.json";

/// Declared configuration plus persisted state of one resource
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceData {
    config: Option<UserFlowConfig>,
    state: Option<UserFlowState>,
}

impl ResourceData {
    pub fn new(config: Option<UserFlowConfig>, state: Option<UserFlowState>) -> Self {
        Self { config, state }
    }

    pub fn config(&self) -> Option<&UserFlowConfig> {
        self.config.as_ref()
    }

    /// Declared configuration, required by create and update
    pub fn require_config(&self) -> Result<&UserFlowConfig> {
        self.config
            .as_ref()
            .ok_or_else(|| CloudError::Validation("no user flow configuration declared".into()))
    }

    pub fn state(&self) -> Option<&UserFlowState> {
        self.state.as_ref()
    }

    /// Local identifier, `None` when nothing is tracked
    pub fn id(&self) -> Option<&str> {
        self.state
            .as_ref()
            .map(|s| s.id.as_str())
            .filter(|id| !id.is_empty())
    }

    pub fn set_state(&mut self, state: UserFlowState) {
        self.state = Some(state);
    }

    /// Forget the tracked resource
    pub fn clear(&mut self) {
        self.state = None;
    }

    pub fn into_state(self) -> Option<UserFlowState> {
        self.state
    }
}

/// Contents of the state file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateFile {
    /// State file version
    pub version: u32,

    /// Last modified timestamp
    pub updated_at: DateTime<Utc>,

    /// Tracked user flow, absent once destroyed
    #[serde(default)]
    pub resource: Option<UserFlowState>,
}

impl Default for StateFile {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            updated_at: Utc::now(),
            resource: None,
        }
    }
}

impl StateFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the tracked resource
    pub fn set_resource(&mut self, resource: Option<UserFlowState>) {
        self.resource = resource;
        self.updated_at = Utc::now();
    }
}

/// State manager for reading/writing state files
pub struct StateManager {
    /// Project root directory
    project_root: PathBuf,
}

impl StateManager {
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            project_root: project_root.as_ref().to_path_buf(),
        }
    }

    fn state_dir(&self) -> PathBuf {
        self.project_root.join(STATE_DIR)
    }

    /// Path of the state file
    pub fn state_path(&self) -> PathBuf {
        self.state_dir().join(STATE_FILE)
    }

    fn backup_path(&self) -> PathBuf {
        self.state_dir().join(STATE_BACKUP)
    }

    fn lock_path(&self) -> PathBuf {
        self.state_dir().join(LOCK_FILE)
    }

    async fn ensure_state_dir(&self) -> Result<()> {
        let dir = self.state_dir();
        if !dir.exists() {
            fs::create_dir_all(&dir).await?;
            tracing::debug!("Created state directory: {}", dir.display());
        }
        Ok(())
    }

    /// Load the current state
    pub async fn load(&self) -> Result<StateFile> {
        let path = self.state_path();
        if !path.exists() {
            tracing::debug!("State file not found, returning empty state");
            return Ok(StateFile::new());
        }

        let content = fs::read_to_string(&path).await?;
        let state: StateFile = serde_json::from_str(&content)?;

        if state.version > STATE_VERSION {
            return Err(CloudError::StateError(format!(
                "State file version {} is newer than supported version {}",
                state.version, STATE_VERSION
            )));
        }

        tracing::debug!(
            "Loaded state (tracking {})",
            state.resource.as_ref().map_or("nothing", |r| r.id.as_str())
        );
        Ok(state)
    }

    /// Save the state, keeping the previous file as a backup
    pub async fn save(&self, state: &StateFile) -> Result<()> {
        self.ensure_state_dir().await?;

        let path = self.state_path();
        let backup = self.backup_path();

        if path.exists() {
            if backup.exists() {
                fs::remove_file(&backup).await?;
            }
            fs::rename(&path, &backup).await?;
            tracing::debug!("Created state backup");
        }

        let content = serde_json::to_string_pretty(state)?;
        fs::write(&path, content).await?;

        tracing::debug!("Saved state");
        Ok(())
    }

    /// Acquire a lock for exclusive access
    pub async fn acquire_lock(&self) -> Result<StateLock> {
        self.ensure_state_dir().await?;

        let lock_path = self.lock_path();

        if lock_path.exists() {
            let content = fs::read_to_string(&lock_path).await?;
            let lock_info: LockInfo = serde_json::from_str(&content)?;

            // Locks older than an hour are considered stale
            let age = Utc::now().signed_duration_since(lock_info.acquired_at);
            if age.num_hours() < 1 {
                return Err(CloudError::LockError(format!(
                    "State is locked by {} since {}",
                    lock_info.holder, lock_info.acquired_at
                )));
            }

            tracing::warn!("Removing stale lock from {}", lock_info.holder);
        }

        let lock_info = LockInfo {
            holder: std::env::var("HOSTNAME")
                .or_else(|_| std::env::var("HOST"))
                .unwrap_or_else(|_| "unknown".to_string()),
            acquired_at: Utc::now(),
        };

        let content = serde_json::to_string_pretty(&lock_info)?;
        fs::write(&lock_path, content).await?;

        tracing::debug!("Acquired state lock");
        Ok(StateLock {
            lock_path,
            released: false,
        })
    }
}

/// Lock information
#[derive(Debug, Serialize, Deserialize)]
struct LockInfo {
    holder: String,
    acquired_at: DateTime<Utc>,
}

/// RAII guard for state lock
pub struct StateLock {
    lock_path: PathBuf,
    released: bool,
}

impl StateLock {
    /// Release the lock
    pub async fn release(mut self) -> Result<()> {
        if !self.released {
            if self.lock_path.exists() {
                fs::remove_file(&self.lock_path).await?;
                tracing::debug!("Released state lock");
            }
            self.released = true;
        }
        Ok(())
    }
}

impl Drop for StateLock {
    fn drop(&mut self) {
        if !self.released && self.lock_path.exists() {
            let _ = std::fs::remove_file(&self.lock_path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserFlowType;
    use tempfile::tempdir;

    fn promo_state() -> UserFlowState {
        UserFlowState::from_config(&UserFlowConfig::new("promo", UserFlowType::SignUp, 1.0))
    }

    #[tokio::test]
    async fn test_state_save_load() {
        let temp_dir = tempdir().unwrap();
        let manager = StateManager::new(temp_dir.path());

        let mut state = StateFile::new();
        state.set_resource(Some(promo_state()));
        manager.save(&state).await.unwrap();

        let loaded = manager.load().await.unwrap();
        assert_eq!(loaded.resource, Some(promo_state()));
    }

    #[tokio::test]
    async fn test_save_keeps_backup() {
        let temp_dir = tempdir().unwrap();
        let manager = StateManager::new(temp_dir.path());

        let mut state = StateFile::new();
        state.set_resource(Some(promo_state()));
        manager.save(&state).await.unwrap();

        state.set_resource(None);
        manager.save(&state).await.unwrap();

        assert!(temp_dir.path().join(".userflow/state.json.backup").exists());
        assert!(manager.load().await.unwrap().resource.is_none());
    }

    #[tokio::test]
    async fn test_empty_state() {
        let temp_dir = tempdir().unwrap();
        let manager = StateManager::new(temp_dir.path());

        let state = manager.load().await.unwrap();
        assert!(state.resource.is_none());
    }

    #[tokio::test]
    async fn test_newer_version_rejected() {
        let temp_dir = tempdir().unwrap();
        let manager = StateManager::new(temp_dir.path());
        std::fs::create_dir_all(temp_dir.path().join(STATE_DIR)).unwrap();
        std::fs::write(
            manager.state_path(),
            r#"{"version": 99, "updated_at": "2026-01-01T00:00:00Z"}"#,
        )
        .unwrap();

        let result = manager.load().await;
        assert!(matches!(result, Err(CloudError::StateError(_))));
    }

    #[tokio::test]
    async fn test_lock_is_exclusive() {
        let temp_dir = tempdir().unwrap();
        let manager = StateManager::new(temp_dir.path());

        let lock = manager.acquire_lock().await.unwrap();
        assert!(matches!(
            manager.acquire_lock().await,
            Err(CloudError::LockError(_))
        ));

        lock.release().await.unwrap();
        let relock = manager.acquire_lock().await.unwrap();
        drop(relock);
        assert!(!temp_dir.path().join(".userflow/lock.json").exists());
    }

    #[test]
    fn test_resource_data_id() {
        let mut data = ResourceData::new(None, Some(promo_state()));
        assert_eq!(data.id(), Some("B2C_1_promo"));
        assert!(data.require_config().is_err());

        data.clear();
        assert_eq!(data.id(), None);
    }
}
