//! Configuration schema of the user flow resource

use serde::Serialize;
use userflow_cloud::{Timeouts, UserFlowType};

/// Resource type name used in plans and output
pub const RESOURCE_TYPE: &str = "azuread_b2c_user_flow";

/// Value kind of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    String,
    Float,
    Bool,
}

/// How an attribute participates in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    Required,
    Optional,
    /// Set by the service, never by configuration
    Computed,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttributeSchema {
    pub name: &'static str,
    pub kind: AttributeKind,
    pub presence: Presence,
    /// Only settable at creation
    pub immutable: bool,
    /// Closed set of accepted values, when the attribute is an enum
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed_values: Vec<&'static str>,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceSchema {
    pub resource_type: &'static str,
    pub attributes: Vec<AttributeSchema>,
    /// Default per-operation timeouts in seconds
    pub timeouts: Timeouts,
}

impl ResourceSchema {
    pub fn attribute(&self, name: &str) -> Option<&AttributeSchema> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Names of write-once attributes, in the order update checks them
    pub fn immutable_attributes(&self) -> Vec<&'static str> {
        self.attributes
            .iter()
            .filter(|a| a.immutable)
            .map(|a| a.name)
            .collect()
    }
}

/// Schema of the B2C user flow resource
pub fn user_flow_schema() -> ResourceSchema {
    ResourceSchema {
        resource_type: RESOURCE_TYPE,
        attributes: vec![
            AttributeSchema {
                name: "object_id",
                kind: AttributeKind::String,
                presence: Presence::Computed,
                immutable: false,
                allowed_values: Vec::new(),
                description: "The object ID of the user flow",
            },
            AttributeSchema {
                name: "user_flow_type",
                kind: AttributeKind::String,
                presence: Presence::Required,
                immutable: true,
                allowed_values: UserFlowType::ALL.iter().map(|t| t.as_str()).collect(),
                description: "The type of user flow",
            },
            AttributeSchema {
                name: "user_flow_type_version",
                kind: AttributeKind::Float,
                presence: Presence::Required,
                immutable: true,
                allowed_values: Vec::new(),
                description: "The version of the user flow",
            },
            AttributeSchema {
                name: "name",
                kind: AttributeKind::String,
                presence: Presence::Required,
                immutable: true,
                allowed_values: Vec::new(),
                description: "The name of the user flow. It is prefixed with B2C_1_ after creation.",
            },
            AttributeSchema {
                name: "default_language_tag",
                kind: AttributeKind::String,
                presence: Presence::Optional,
                immutable: false,
                allowed_values: Vec::new(),
                description: "RFC 5646 language used when no ui_locales is specified in the request",
            },
            AttributeSchema {
                name: "is_language_customization_enabled",
                kind: AttributeKind::Bool,
                presence: Presence::Optional,
                immutable: false,
                allowed_values: Vec::new(),
                description: "Whether language customization is enabled. Disabled by default.",
            },
        ],
        timeouts: Timeouts::default(),
    }
}
