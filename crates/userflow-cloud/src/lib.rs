//! userflow resource lifecycle abstractions
//!
//! This crate holds everything a user flow resource needs that does not
//! depend on how the remote API is reached:
//!
//! - the entity model and declared configuration ([`model`])
//! - the remote API contract ([`UserFlowApi`])
//! - per-operation deadlines ([`OperationContext`], [`Timeouts`])
//! - the poll-until-done waiter ([`waiter`])
//! - local state handling ([`ResourceData`], [`StateManager`])
//! - field-level change detection ([`Plan`])
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  userflow CLI                    │
//! │        (plan / apply / refresh / destroy)        │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                 userflow-b2c                     │
//! │   UserFlowResource (create/read/update/delete)   │
//! │   GraphClient (impl UserFlowApi)                 │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                userflow-cloud                    │
//! │  ┌──────────────┐ ┌─────────┐ ┌──────────────┐  │
//! │  │ UserFlowApi  │ │ waiter  │ │  State Mgmt  │  │
//! │  └──────────────┘ └─────────┘ └──────────────┘  │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod action;
pub mod context;
pub mod error;
pub mod model;
pub mod provider;
pub mod state;
pub mod waiter;

// Re-exports
pub use action::{ActionType, AttributeChange, Plan};
pub use context::{Operation, OperationContext, Timeouts};
pub use error::{CloudError, Result};
pub use model::{
    B2cUserFlow, USER_FLOW_ID_PREFIX, UserFlowConfig, UserFlowState, UserFlowType, user_flow_id,
    user_flow_name,
};
pub use provider::{RetryConfig, UserFlowApi};
pub use state::{ResourceData, StateFile, StateLock, StateManager};
pub use waiter::{Poll, PollConfig, wait_for_deletion, wait_until};
