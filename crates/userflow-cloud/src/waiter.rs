//! Poll-until-done waiting bounded by an operation deadline

use crate::context::OperationContext;
use crate::error::{CloudError, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, sleep_until, timeout_at};

/// Outcome of a single check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    /// The awaited condition holds
    Ready,
    /// Not there yet, check again after the interval
    Pending,
}

/// Polling behaviour of [`wait_until`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollConfig {
    /// Delay between two checks (milliseconds)
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Consecutive `Ready` observations required before the wait succeeds
    #[serde(default = "default_confirmations")]
    pub confirmations: u32,
}

fn default_interval_ms() -> u64 {
    1000
}

fn default_confirmations() -> u32 {
    1
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            confirmations: default_confirmations(),
        }
    }
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Repeatedly run `check` until it reports [`Poll::Ready`]
///
/// Fails with [`CloudError::Timeout`] once the context deadline elapses and
/// returns the check's error verbatim as soon as one occurs.
pub async fn wait_until<F, Fut>(
    ctx: &OperationContext,
    config: &PollConfig,
    mut check: F,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Poll>>,
{
    let required = config.confirmations.max(1);
    let mut observed = 0;
    let mut checks = 0u32;

    loop {
        let outcome = timeout_at(ctx.deadline(), check())
            .await
            .map_err(|_| timeout_error(ctx, checks))??;
        checks += 1;

        match outcome {
            Poll::Ready => {
                observed += 1;
                if observed >= required {
                    tracing::debug!("{} wait completed after {} checks", ctx.operation(), checks);
                    return Ok(());
                }
            }
            Poll::Pending => observed = 0,
        }

        let wake = Instant::now() + config.interval();
        if wake >= ctx.deadline() {
            sleep_until(ctx.deadline()).await;
            return Err(timeout_error(ctx, checks));
        }
        sleep_until(wake).await;
    }
}

/// Wait until `exists` reports that the target is gone
///
/// The closure yields `Ok(true)` while the target still exists and `Ok(false)`
/// once it has disappeared.
pub async fn wait_for_deletion<F, Fut>(
    ctx: &OperationContext,
    config: &PollConfig,
    mut exists: F,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    wait_until(ctx, config, || {
        let check = exists();
        async move {
            Ok(if check.await? {
                Poll::Pending
            } else {
                Poll::Ready
            })
        }
    })
    .await
}

fn timeout_error(ctx: &OperationContext, checks: u32) -> CloudError {
    CloudError::Timeout(format!(
        "{} did not complete before the deadline ({} checks)",
        ctx.operation(),
        checks
    ))
}
