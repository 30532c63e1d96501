//! Remote entity model for B2C user flows

use crate::error::CloudError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Prefix the directory service prepends to every user flow name
pub const USER_FLOW_ID_PREFIX: &str = "B2C_1_";

/// Kind of customer-identity interaction a user flow drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UserFlowType {
    SignUp,
    SignIn,
    SignUpOrSignIn,
    PasswordReset,
    ProfileUpdate,
    ResourceOwner,
}

impl UserFlowType {
    pub const ALL: [UserFlowType; 6] = [
        UserFlowType::SignUp,
        UserFlowType::SignIn,
        UserFlowType::SignUpOrSignIn,
        UserFlowType::PasswordReset,
        UserFlowType::ProfileUpdate,
        UserFlowType::ResourceOwner,
    ];

    /// Wire representation used by the API
    pub fn as_str(&self) -> &'static str {
        match self {
            UserFlowType::SignUp => "signUp",
            UserFlowType::SignIn => "signIn",
            UserFlowType::SignUpOrSignIn => "signUpOrSignIn",
            UserFlowType::PasswordReset => "passwordReset",
            UserFlowType::ProfileUpdate => "profileUpdate",
            UserFlowType::ResourceOwner => "resourceOwner",
        }
    }
}

impl std::fmt::Display for UserFlowType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserFlowType {
    type Err = CloudError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserFlowType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                let expected: Vec<&str> = UserFlowType::ALL.iter().map(|t| t.as_str()).collect();
                CloudError::Validation(format!(
                    "expected user_flow_type to be one of [{}], got {:?}",
                    expected.join(", "),
                    s
                ))
            })
    }
}

/// User flow as exchanged with the remote API
///
/// Every field is optional so that partial payloads (updates) only carry
/// what they mean to change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct B2cUserFlow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_flow_type: Option<UserFlowType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_flow_type_version: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_language_tag: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_language_customization_enabled: Option<bool>,
}

/// Declared configuration of a user flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserFlowConfig {
    pub name: String,
    pub user_flow_type: UserFlowType,
    pub user_flow_type_version: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_language_tag: Option<String>,
    #[serde(default)]
    pub is_language_customization_enabled: bool,
}

impl UserFlowConfig {
    pub fn new(name: impl Into<String>, user_flow_type: UserFlowType, version: f64) -> Self {
        Self {
            name: name.into(),
            user_flow_type,
            user_flow_type_version: version,
            default_language_tag: None,
            is_language_customization_enabled: false,
        }
    }

    pub fn with_default_language_tag(mut self, tag: impl Into<String>) -> Self {
        self.default_language_tag = Some(tag.into());
        self
    }

    pub fn with_language_customization(mut self, enabled: bool) -> Self {
        self.is_language_customization_enabled = enabled;
        self
    }

    /// Identifier the user flow gets once created
    pub fn id(&self) -> String {
        user_flow_id(&self.name)
    }
}

/// Persisted state of a managed user flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserFlowState {
    /// Local identifier, always `B2C_1_<name>`
    pub id: String,

    /// Identifier reported by the API (computed)
    #[serde(default)]
    pub object_id: String,

    pub name: String,
    pub user_flow_type: UserFlowType,
    pub user_flow_type_version: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_language_tag: Option<String>,

    #[serde(default)]
    pub is_language_customization_enabled: bool,
}

impl UserFlowState {
    /// State recorded right after creation, before the first read
    pub fn from_config(config: &UserFlowConfig) -> Self {
        Self {
            id: config.id(),
            object_id: String::new(),
            name: config.name.clone(),
            user_flow_type: config.user_flow_type,
            user_flow_type_version: config.user_flow_type_version,
            default_language_tag: config.default_language_tag.clone(),
            is_language_customization_enabled: config.is_language_customization_enabled,
        }
    }
}

/// Compose the identifier the service assigns to a user flow called `name`
pub fn user_flow_id(name: &str) -> String {
    format!("{}{}", USER_FLOW_ID_PREFIX, name)
}

/// Recover the user flow name from a prefixed identifier
pub fn user_flow_name(id: &str) -> Option<&str> {
    id.strip_prefix(USER_FLOW_ID_PREFIX)
        .filter(|name| !name.is_empty())
}
