//! Field-level change detection between declared configuration and state

use crate::model::{UserFlowConfig, UserFlowState};
use serde::{Deserialize, Serialize};

/// Type of action to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Create a new resource
    Create,
    /// Update an existing resource
    Update,
    /// Delete a resource
    Delete,
    /// No changes needed
    NoOp,
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionType::Create => write!(f, "create"),
            ActionType::Update => write!(f, "update"),
            ActionType::Delete => write!(f, "delete"),
            ActionType::NoOp => write!(f, "no-op"),
        }
    }
}

/// A single attribute whose declared value differs from state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeChange {
    pub attribute: String,
    pub old: serde_json::Value,
    pub new: serde_json::Value,
    /// Write-once attribute: the change cannot be applied in place
    pub immutable: bool,
}

/// Planned action for the resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub action_type: ActionType,
    pub changes: Vec<AttributeChange>,
}

impl Plan {
    /// Compare declared configuration with persisted state
    pub fn compute(config: Option<&UserFlowConfig>, state: Option<&UserFlowState>) -> Self {
        match (config, state) {
            (Some(config), None) => Self {
                action_type: ActionType::Create,
                changes: creation_changes(config),
            },
            (Some(config), Some(state)) => {
                let changes = diff(config, state);
                let action_type = if changes.is_empty() {
                    ActionType::NoOp
                } else {
                    ActionType::Update
                };
                Self {
                    action_type,
                    changes,
                }
            }
            (None, Some(_)) => Self {
                action_type: ActionType::Delete,
                changes: Vec::new(),
            },
            (None, None) => Self {
                action_type: ActionType::NoOp,
                changes: Vec::new(),
            },
        }
    }

    pub fn has_changes(&self) -> bool {
        self.action_type != ActionType::NoOp
    }

    /// Changes that an in-place update would have to reject
    pub fn immutable_changes(&self) -> Vec<&AttributeChange> {
        match self.action_type {
            ActionType::Update => self.changes.iter().filter(|c| c.immutable).collect(),
            _ => Vec::new(),
        }
    }
}

/// Attributes whose declared value differs from state
///
/// Write-once attributes come first, in the order update checks them. An
/// undeclared `default_language_tag` keeps whatever the service reports.
pub fn diff(config: &UserFlowConfig, state: &UserFlowState) -> Vec<AttributeChange> {
    let mut changes = Vec::new();

    if config.user_flow_type != state.user_flow_type {
        changes.push(change(
            "user_flow_type",
            &state.user_flow_type,
            &config.user_flow_type,
            true,
        ));
    }
    if config.user_flow_type_version != state.user_flow_type_version {
        changes.push(change(
            "user_flow_type_version",
            &state.user_flow_type_version,
            &config.user_flow_type_version,
            true,
        ));
    }
    if config.name != state.name {
        changes.push(change("name", &state.name, &config.name, true));
    }
    if let Some(tag) = &config.default_language_tag {
        if state.default_language_tag.as_ref() != Some(tag) {
            changes.push(change(
                "default_language_tag",
                &state.default_language_tag,
                tag,
                false,
            ));
        }
    }
    if config.is_language_customization_enabled != state.is_language_customization_enabled {
        changes.push(change(
            "is_language_customization_enabled",
            &state.is_language_customization_enabled,
            &config.is_language_customization_enabled,
            false,
        ));
    }

    changes
}

fn creation_changes(config: &UserFlowConfig) -> Vec<AttributeChange> {
    let null = serde_json::Value::Null;
    let mut changes = vec![
        AttributeChange {
            attribute: "name".into(),
            old: null.clone(),
            new: serde_json::json!(config.name),
            immutable: true,
        },
        AttributeChange {
            attribute: "user_flow_type".into(),
            old: null.clone(),
            new: serde_json::json!(config.user_flow_type),
            immutable: true,
        },
        AttributeChange {
            attribute: "user_flow_type_version".into(),
            old: null.clone(),
            new: serde_json::json!(config.user_flow_type_version),
            immutable: true,
        },
    ];
    if let Some(tag) = &config.default_language_tag {
        changes.push(AttributeChange {
            attribute: "default_language_tag".into(),
            old: null.clone(),
            new: serde_json::json!(tag),
            immutable: false,
        });
    }
    changes.push(AttributeChange {
        attribute: "is_language_customization_enabled".into(),
        old: null,
        new: serde_json::json!(config.is_language_customization_enabled),
        immutable: false,
    });
    changes
}

fn change<O: Serialize, N: Serialize>(
    attribute: &str,
    old: &O,
    new: &N,
    immutable: bool,
) -> AttributeChange {
    AttributeChange {
        attribute: attribute.to_string(),
        old: serde_json::to_value(old).unwrap_or_default(),
        new: serde_json::to_value(new).unwrap_or_default(),
        immutable,
    }
}
