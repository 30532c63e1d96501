use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use userflow_cloud::{B2cUserFlow, CloudError, Result, USER_FLOW_ID_PREFIX, UserFlowApi};

/// In-memory user flow service recording every call it receives
#[derive(Default)]
pub struct FakeUserFlowApi {
    flows: Mutex<HashMap<String, B2cUserFlow>>,
    calls: Mutex<Vec<String>>,
    retries_disabled: AtomicBool,
    /// Retry flag observed by each `get`
    get_retry_flags: Mutex<Vec<bool>>,
    /// Deleted flows keep being returned by `get`
    pub linger_after_delete: AtomicBool,
    /// `create` answers without an identifier
    pub create_returns_no_id: AtomicBool,
    /// Status returned by every `delete`
    pub delete_status: Mutex<Option<u16>>,
    /// Status returned by every `get`
    pub get_status: Mutex<Option<u16>>,
}

#[allow(dead_code)]
impl FakeUserFlowApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, flow: B2cUserFlow) {
        let id = flow.id.clone().unwrap();
        self.flows.lock().unwrap().insert(id, flow);
    }

    pub fn remote(&self, id: &str) -> Option<B2cUserFlow> {
        self.flows.lock().unwrap().get(id).cloned()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn get_retry_flags(&self) -> Vec<bool> {
        self.get_retry_flags.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn error_for(status: u16, id: &str) -> CloudError {
    if status == 404 {
        CloudError::NotFound(id.to_string())
    } else {
        CloudError::Api {
            status,
            message: format!("injected failure for {}", id),
        }
    }
}

#[async_trait]
impl UserFlowApi for FakeUserFlowApi {
    async fn create(&self, flow: &B2cUserFlow) -> Result<B2cUserFlow> {
        let name = flow.id.clone().unwrap_or_default();
        self.record(format!("create {}", name));

        let id = format!("{}{}", USER_FLOW_ID_PREFIX, name);
        let stored = B2cUserFlow {
            id: Some(id.clone()),
            ..flow.clone()
        };
        self.flows.lock().unwrap().insert(id, stored.clone());

        if self.create_returns_no_id.load(Ordering::SeqCst) {
            return Ok(B2cUserFlow {
                id: None,
                ..stored
            });
        }
        Ok(stored)
    }

    async fn get(&self, id: &str) -> Result<B2cUserFlow> {
        self.record(format!("get {}", id));
        self.get_retry_flags
            .lock()
            .unwrap()
            .push(self.retries_disabled.load(Ordering::SeqCst));

        if let Some(status) = *self.get_status.lock().unwrap() {
            return Err(error_for(status, id));
        }
        self.flows
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| CloudError::NotFound(id.to_string()))
    }

    async fn update(&self, flow: &B2cUserFlow) -> Result<()> {
        let id = flow.id.clone().unwrap_or_default();
        self.record(format!("update {}", id));

        let mut flows = self.flows.lock().unwrap();
        let existing = flows
            .get_mut(&id)
            .ok_or_else(|| CloudError::NotFound(id.clone()))?;
        if flow.user_flow_type.is_some() || flow.user_flow_type_version.is_some() {
            return Err(CloudError::Api {
                status: 400,
                message: "immutable property in update payload".to_string(),
            });
        }
        if let Some(tag) = &flow.default_language_tag {
            existing.default_language_tag = Some(tag.clone());
        }
        if let Some(enabled) = flow.is_language_customization_enabled {
            existing.is_language_customization_enabled = Some(enabled);
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.record(format!("delete {}", id));

        if let Some(status) = *self.delete_status.lock().unwrap() {
            return Err(error_for(status, id));
        }
        if self.linger_after_delete.load(Ordering::SeqCst) {
            return if self.flows.lock().unwrap().contains_key(id) {
                Ok(())
            } else {
                Err(CloudError::NotFound(id.to_string()))
            };
        }
        self.flows
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| CloudError::NotFound(id.to_string()))
    }

    fn set_retries_disabled(&self, disabled: bool) {
        self.retries_disabled.store(disabled, Ordering::SeqCst);
    }

    fn retries_disabled(&self) -> bool {
        self.retries_disabled.load(Ordering::SeqCst)
    }
}
