//! Per-operation context and timeouts

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Lifecycle operation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "create"),
            Operation::Read => write!(f, "read"),
            Operation::Update => write!(f, "update"),
            Operation::Delete => write!(f, "delete"),
        }
    }
}

/// Time allowed for each lifecycle operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeouts {
    #[serde(with = "secs", default = "default_timeout")]
    pub create: Duration,
    #[serde(with = "secs", default = "default_timeout")]
    pub read: Duration,
    #[serde(with = "secs", default = "default_timeout")]
    pub update: Duration,
    #[serde(with = "secs", default = "default_timeout")]
    pub delete: Duration,
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            create: DEFAULT_TIMEOUT,
            read: DEFAULT_TIMEOUT,
            update: DEFAULT_TIMEOUT,
            delete: DEFAULT_TIMEOUT,
        }
    }
}

impl Timeouts {
    pub fn for_operation(&self, op: Operation) -> Duration {
        match op {
            Operation::Create => self.create,
            Operation::Read => self.read,
            Operation::Update => self.update,
            Operation::Delete => self.delete,
        }
    }

    /// Start a context for `op` whose deadline is its configured timeout from now
    pub fn context(&self, op: Operation) -> OperationContext {
        OperationContext::with_timeout(op, self.for_operation(op))
    }
}

/// Context handed to a lifecycle operation
#[derive(Debug, Clone)]
pub struct OperationContext {
    operation: Operation,
    deadline: Instant,
}

impl OperationContext {
    pub fn with_timeout(operation: Operation, timeout: Duration) -> Self {
        Self {
            operation,
            deadline: Instant::now() + timeout,
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Time left before the deadline, zero once it has passed
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }
}

mod secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}
