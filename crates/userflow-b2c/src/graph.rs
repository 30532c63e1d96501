//! Microsoft Graph client for B2C user flows
//!
//! Direct REST implementation of [`UserFlowApi`] against
//! `/identity/b2cUserFlows`, authenticated with a bearer token.

use crate::error::{B2cError, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use userflow_cloud::{B2cUserFlow, CloudError, RetryConfig, UserFlowApi};

const GRAPH_API_BASE: &str = "https://graph.microsoft.com/beta";
const USER_FLOWS_PATH: &str = "identity/b2cUserFlows";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the Graph client
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub access_token: String,
    pub endpoint: String,
    pub retry: RetryConfig,
}

impl GraphConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            endpoint: GRAPH_API_BASE.to_string(),
            retry: RetryConfig::default(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Create GraphConfig from environment variables
    pub fn from_env() -> Result<Self> {
        let access_token = std::env::var("USERFLOW_GRAPH_TOKEN")
            .map_err(|_| B2cError::MissingEnvVar("USERFLOW_GRAPH_TOKEN".to_string()))?;
        if access_token.trim().is_empty() {
            return Err(B2cError::InvalidConfig(
                "USERFLOW_GRAPH_TOKEN is empty".to_string(),
            ));
        }

        let mut config = Self::new(access_token);
        if let Ok(endpoint) = std::env::var("USERFLOW_GRAPH_ENDPOINT") {
            config.endpoint = endpoint;
        }
        Ok(config)
    }
}

/// Graph API client for the user flow collection
pub struct GraphClient {
    client: reqwest::Client,
    access_token: String,
    endpoint: String,
    retry: RetryConfig,
    retries_disabled: AtomicBool,
}

impl GraphClient {
    pub fn new(config: GraphConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            access_token: config.access_token,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            retry: config.retry,
            retries_disabled: AtomicBool::new(false),
        })
    }

    fn collection_url(&self) -> String {
        format!("{}/{}", self.endpoint, USER_FLOWS_PATH)
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/{}/{}", self.endpoint, USER_FLOWS_PATH, id)
    }

    /// Send a request, retrying transient failures unless retries are disabled
    ///
    /// `retry_not_found` also retries 404s, which a freshly written object
    /// can return until directory replication catches up.
    async fn send<F>(&self, build: F, retry_not_found: bool) -> userflow_cloud::Result<reqwest::Response>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        let attempts = if self.retries_disabled() {
            1
        } else {
            self.retry.max_attempts.max(1)
        };

        let mut attempt = 0;
        loop {
            let last = attempt + 1 >= attempts;
            match build().bearer_auth(&self.access_token).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }
                    if last || !is_retryable(status, retry_not_found) {
                        return Err(api_error(response).await);
                    }
                    tracing::debug!(
                        "Graph request returned {}, retrying ({}/{})",
                        status,
                        attempt + 1,
                        attempts
                    );
                }
                Err(e) => {
                    if last {
                        return Err(CloudError::Transport(e.to_string()));
                    }
                    tracing::debug!("Graph request failed: {}, retrying", e);
                }
            }

            tokio::time::sleep(self.retry.delay_for_attempt(attempt)).await;
            attempt += 1;
        }
    }
}

#[async_trait]
impl UserFlowApi for GraphClient {
    async fn create(&self, flow: &B2cUserFlow) -> userflow_cloud::Result<B2cUserFlow> {
        let url = self.collection_url();
        let response = self
            .send(|| self.client.post(&url).json(flow), false)
            .await?;

        response
            .json()
            .await
            .map_err(|e| CloudError::BadResponse(format!("decoding created user flow: {}", e)))
    }

    async fn get(&self, id: &str) -> userflow_cloud::Result<B2cUserFlow> {
        let url = self.item_url(id);
        let response = self.send(|| self.client.get(&url), true).await?;

        response
            .json()
            .await
            .map_err(|e| CloudError::BadResponse(format!("decoding user flow {:?}: {}", id, e)))
    }

    async fn update(&self, flow: &B2cUserFlow) -> userflow_cloud::Result<()> {
        let id = flow
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| CloudError::Validation("cannot update a user flow without an ID".into()))?;

        let url = self.item_url(id);
        let request_body = UpdateUserFlowRequest {
            default_language_tag: flow.default_language_tag.clone(),
            is_language_customization_enabled: flow.is_language_customization_enabled,
        };

        self.send(|| self.client.patch(&url).json(&request_body), false)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> userflow_cloud::Result<()> {
        let url = self.item_url(id);
        self.send(|| self.client.delete(&url), false).await?;
        Ok(())
    }

    fn set_retries_disabled(&self, disabled: bool) {
        self.retries_disabled.store(disabled, Ordering::SeqCst);
    }

    fn retries_disabled(&self) -> bool {
        self.retries_disabled.load(Ordering::SeqCst)
    }
}

fn is_retryable(status: StatusCode, retry_not_found: bool) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
        || status.is_server_error()
        || (retry_not_found && status == StatusCode::NOT_FOUND)
}

/// Turn a non-success response into a [`CloudError`]
async fn api_error(response: reqwest::Response) -> CloudError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<GraphErrorResponse>(&body)
        .map(|r| format!("{}: {}", r.error.code, r.error.message))
        .unwrap_or_else(|_| {
            if body.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            } else {
                body
            }
        });

    if status == StatusCode::NOT_FOUND {
        CloudError::NotFound(message)
    } else {
        CloudError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

// ============ API Types ============

#[derive(Debug, Deserialize)]
struct GraphErrorResponse {
    error: GraphError,
}

#[derive(Debug, Deserialize)]
struct GraphError {
    code: String,
    message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateUserFlowRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    default_language_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_language_customization_enabled: Option<bool>,
}
