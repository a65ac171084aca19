//! Waiting for asynchronous requests to finish.
//!
//! Mutating calls are accepted immediately and processed out-of-band. The
//! `location` header of the accepted response names a status resource that
//! moves from `QUEUED` through `RUNNING` to `DONE` or `FAILED`. [`Waiter`]
//! polls that resource until it is terminal, the deadline passes or the
//! caller cancels.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use profitbricks::{Delete, ProfitBricksClient, Snapshot, WaitConfig, Waiter};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> profitbricks::Result<()> {
//! let client = ProfitBricksClient::from_env()?;
//! let accepted = Snapshot::delete(&client, "snapshot-id".to_string()).await?;
//!
//! let config = WaitConfig::default()
//!     .with_timeout(Duration::from_secs(120))
//!     .with_poll_interval(Duration::from_secs(2));
//! let cancel = CancellationToken::new();
//! Waiter::new(&client, config)
//!     .wait(accepted.status_url()?, &cancel)
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{sleep, sleep_until, Instant};
use tokio_util::sync::CancellationToken;

use crate::client::ProfitBricksClient;
use crate::error::{ProfitBricksError, Result};
use crate::models::{RequestState, RequestStatus};
use crate::traits::Get;

/// Default time to wait for a request (10 minutes).
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(600);

/// Default delay between two polls of the status resource.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Deadline used when the timeout does not fit into an [`Instant`].
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Returns `duration`, or `default` if `duration` is zero.
pub fn duration_or_default(duration: Duration, default: Duration) -> Duration {
    if duration.is_zero() {
        default
    } else {
        duration
    }
}

/// Timing of a wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitConfig {
    /// Overall deadline, measured from the start of the wait.
    pub timeout: Duration,
    /// Delay before the second poll.
    pub poll_interval: Duration,
    /// Each delay is the previous one times this factor; 1 keeps it fixed.
    pub backoff_factor: u32,
    /// Upper bound for the delay when backing off.
    pub max_poll_interval: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_WAIT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            backoff_factor: 1,
            max_poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl WaitConfig {
    /// Set the deadline; zero selects [`DEFAULT_WAIT_TIMEOUT`].
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = duration_or_default(timeout, DEFAULT_WAIT_TIMEOUT);
        self
    }

    /// Set a fixed delay between polls; zero selects [`DEFAULT_POLL_INTERVAL`].
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        let interval = duration_or_default(interval, DEFAULT_POLL_INTERVAL);
        self.poll_interval = interval;
        self.max_poll_interval = self.max_poll_interval.max(interval);
        self
    }

    /// Grow the delay by `factor` after every poll, up to `max`.
    #[must_use]
    pub fn with_backoff(mut self, factor: u32, max: Duration) -> Self {
        self.backoff_factor = factor.max(1);
        self.max_poll_interval = max.max(self.poll_interval);
        self
    }

    /// The instant `timeout` after `start`, capped for huge timeouts.
    fn deadline_from(&self, start: Instant) -> Instant {
        start
            .checked_add(self.timeout)
            .unwrap_or_else(|| start + FAR_FUTURE)
    }

    fn next_interval(&self, current: Duration) -> Duration {
        current
            .saturating_mul(self.backoff_factor)
            .min(self.max_poll_interval)
            .max(self.poll_interval)
    }
}

/// Something that can report the status of a request.
///
/// Implemented by [`ProfitBricksClient`]; tests drive the waiter with
/// scripted sources.
#[async_trait]
pub trait RequestStatusSource: Send + Sync {
    /// Fetch the status resource at `url`.
    async fn fetch_status(&self, url: &str) -> Result<RequestStatus>;
}

#[async_trait]
impl RequestStatusSource for ProfitBricksClient {
    async fn fetch_status(&self, url: &str) -> Result<RequestStatus> {
        RequestStatus::get(self, url.to_string()).await
    }
}

/// Polls one request status until it is terminal.
///
/// A waiter runs a single polling loop per [`wait`](Self::wait) call; wait
/// on several requests by running several calls concurrently.
pub struct Waiter<'a, S: ?Sized> {
    source: &'a S,
    config: WaitConfig,
}

impl<'a, S: RequestStatusSource + ?Sized> Waiter<'a, S> {
    /// Create a waiter polling `source`.
    pub fn new(source: &'a S, config: WaitConfig) -> Self {
        Self { source, config }
    }

    /// The timing in use.
    pub fn config(&self) -> &WaitConfig {
        &self.config
    }

    /// Poll `status_url` until the request is DONE.
    ///
    /// The first poll is immediate. Returns the final status on DONE.
    ///
    /// # Errors
    ///
    /// - [`ProfitBricksError::ProviderFailure`] when the request is FAILED
    /// - [`ProfitBricksError::Timeout`] when the deadline passes first
    /// - [`ProfitBricksError::Cancelled`] when `cancel` fires first
    /// - any error of the status fetch, unchanged
    ///
    /// A fetch in progress when the deadline passes or `cancel` fires is
    /// dropped.
    #[tracing::instrument(skip(self, cancel), fields(timeout = ?self.config.timeout))]
    pub async fn wait(&self, status_url: &str, cancel: &CancellationToken) -> Result<RequestStatus> {
        let deadline = self.config.deadline_from(Instant::now());
        let mut interval = self.config.poll_interval;
        let mut polls: u32 = 0;

        loop {
            let status = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(self.cancelled(status_url)),
                () = sleep_until(deadline) => return Err(self.timed_out(status_url)),
                fetched = self.source.fetch_status(status_url) => fetched?,
            };
            polls += 1;

            match status.state() {
                RequestState::Done => {
                    tracing::debug!(polls, "request done");
                    return Ok(status);
                }
                RequestState::Failed => {
                    let message = status
                        .message()
                        .unwrap_or("request failed without a message")
                        .to_string();
                    tracing::debug!(polls, %message, "request failed");
                    return Err(ProfitBricksError::ProviderFailure {
                        url: status_url.to_string(),
                        message,
                    });
                }
                state @ (RequestState::Queued | RequestState::Running) => {
                    tracing::debug!(polls, %state, next_poll = ?interval, "request pending");
                }
            }

            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(self.cancelled(status_url)),
                () = sleep_until(deadline) => return Err(self.timed_out(status_url)),
                () = sleep(interval) => {}
            }
            interval = self.config.next_interval(interval);
        }
    }

    fn cancelled(&self, status_url: &str) -> ProfitBricksError {
        ProfitBricksError::Cancelled {
            url: status_url.to_string(),
        }
    }

    fn timed_out(&self, status_url: &str) -> ProfitBricksError {
        ProfitBricksError::Timeout {
            url: status_url.to_string(),
            timeout: self.config.timeout,
        }
    }
}

impl ProfitBricksClient {
    /// Wait for the request behind `status_url` to finish.
    ///
    /// A zero `timeout` waits for the default ten minutes. Polls every
    /// [`DEFAULT_POLL_INTERVAL`].
    ///
    /// # Errors
    ///
    /// See [`Waiter::wait`]; this variant is never cancelled.
    pub async fn wait_till_provisioned_or_canceled(
        &self,
        status_url: &str,
        timeout: Duration,
    ) -> Result<RequestStatus> {
        let config = WaitConfig::default().with_timeout(timeout);
        self.wait_for_request(status_url, config, &CancellationToken::new())
            .await
    }

    /// Wait for the request behind `status_url` with explicit timing and
    /// cancellation.
    ///
    /// # Errors
    ///
    /// See [`Waiter::wait`].
    pub async fn wait_for_request(
        &self,
        status_url: &str,
        config: WaitConfig,
        cancel: &CancellationToken,
    ) -> Result<RequestStatus> {
        Waiter::new(self, config).wait(status_url, cancel).await
    }
}
