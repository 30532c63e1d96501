//! B2C user flow provider for userflow
//!
//! This crate implements the `azuread_b2c_user_flow` resource: a policy
//! configuration for sign-up, sign-in, password reset and profile update
//! interactions in an Azure AD B2C tenant.
//!
//! # Features
//!
//! - Create / read / update / delete / import of a user flow
//! - Immutable attribute enforcement before any network call
//! - Deletion confirmed by polling until the service reports the flow gone
//! - Microsoft Graph client with automatic retries that can be switched off
//!
//! # Requirements
//!
//! - `USERFLOW_GRAPH_TOKEN`: bearer token with `IdentityUserFlow.ReadWrite.All`
//! - `USERFLOW_GRAPH_ENDPOINT` (optional): defaults to `https://graph.microsoft.com/beta`
//!
//! # Example
//!
//! ```ignore
//! use userflow_b2c::{GraphClient, GraphConfig, UserFlowResource};
//! use userflow_cloud::{Operation, ResourceData, UserFlowConfig, UserFlowType};
//!
//! let client = GraphClient::new(GraphConfig::from_env()?)?;
//! let resource = UserFlowResource::new();
//!
//! let config = UserFlowConfig::new("promo", UserFlowType::SignUp, 1.0);
//! let mut data = ResourceData::new(Some(config), None);
//!
//! let ctx = resource.timeouts().context(Operation::Create);
//! let id = resource.create(&ctx, &mut data, &client).await?;
//! assert_eq!(id, "B2C_1_promo");
//! ```

pub mod error;
pub mod graph;
pub mod resource;
pub mod schema;

pub use error::{B2cError, Result};
pub use graph::{GraphClient, GraphConfig};
pub use resource::{UserFlowResource, validate, validate_import_id};
pub use schema::{RESOURCE_TYPE, ResourceSchema, user_flow_schema};
