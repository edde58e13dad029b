//! Server-State Cache
//!
//! A single cache entry for the grocery collection plus the fetch driver that
//! fills it. The entry is a disposable projection of server state: it is only
//! ever replaced wholesale by a completed fetch, never patched locally.
//!
//! Every fetch gets a ticket. Starting a new fetch supersedes the previous
//! one, and results carrying an outdated ticket are dropped.

use std::cell::RefCell;
use std::future::Future;

use serde::Deserialize;

use crate::api::{ApiError, ApiResult};

/// Key of the only cache entry
pub const GROCERIES_KEY: &str = "groceries";

/// Poll interval while waiting for someone else's fetch to settle
pub const SETTLE_POLL_MS: u32 = 50;

/// How failed reads are retried before the error is surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure
    pub retries: u32,
    pub base_delay_ms: u32,
    pub max_delay_ms: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 2,
            base_delay_ms: 1000,
            max_delay_ms: 30_000,
        }
    }
}

impl RetryPolicy {
    /// Backoff before retry number `attempt` (0-based): `base * 2^attempt`, capped
    pub fn delay_ms(&self, attempt: u32) -> u32 {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay_ms.saturating_mul(factor).min(self.max_delay_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// No data and no final error yet
    Pending,
    Success,
    Error,
}

/// Identifies one fetch; only the latest ticket may write results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Start even if a fetch is in flight, superseding it
    Supersede,
    /// Skip when a fetch is already in flight
    IfIdle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Success,
    Failed,
    /// A newer fetch took over, or the cache went away
    Superseded,
    /// `FetchMode::IfIdle` found a fetch in flight
    Skipped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryState<T> {
    data: Option<T>,
    error: Option<ApiError>,
    status: QueryStatus,
    fetching: bool,
    stale: bool,
    failure_count: u32,
    failure_reason: Option<ApiError>,
    generation: u64,
    success_count: u64,
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            status: QueryStatus::Pending,
            fetching: false,
            stale: true,
            failure_count: 0,
            failure_reason: None,
            generation: 0,
            success_count: 0,
        }
    }
}

impl<T> QueryState<T> {
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    pub fn status(&self) -> QueryStatus {
        self.status
    }

    /// First load: nothing cached yet and a fetch is running
    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Pending && self.fetching
    }

    /// Any fetch in flight, including background refetches
    pub fn is_fetching(&self) -> bool {
        self.fetching
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }

    #[cfg(test)]
    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Failures of the current fetch (retries included)
    pub fn failure_count(&self) -> u32 {
        self.failure_count
    }

    #[cfg(test)]
    pub fn failure_reason(&self) -> Option<&ApiError> {
        self.failure_reason.as_ref()
    }

    /// Number of fetches that delivered data
    #[cfg(test)]
    pub fn success_count(&self) -> u64 {
        self.success_count
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        self.generation == ticket.0
    }

    pub fn begin_fetch(&mut self, mode: FetchMode) -> Option<FetchTicket> {
        if mode == FetchMode::IfIdle && self.fetching {
            return None;
        }
        self.generation += 1;
        self.fetching = true;
        if self.data.is_none() {
            // Nothing to show yet: a retried first load is loading again, not failed
            self.status = QueryStatus::Pending;
            self.error = None;
        }
        self.failure_count = 0;
        self.failure_reason = None;
        Some(FetchTicket(self.generation))
    }

    /// Note a failed attempt that will be retried. Returns false if superseded.
    pub fn record_retry(&mut self, ticket: FetchTicket, err: ApiError) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.failure_count += 1;
        self.failure_reason = Some(err);
        true
    }

    /// Store the final result of a fetch. Returns false if superseded.
    pub fn resolve(&mut self, ticket: FetchTicket, result: ApiResult<T>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.fetching = false;
        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
                self.status = QueryStatus::Success;
                self.stale = false;
                self.failure_count = 0;
                self.failure_reason = None;
                self.success_count += 1;
            }
            Err(err) => {
                // Previously fetched data stays readable
                self.failure_count += 1;
                self.failure_reason = Some(err.clone());
                self.error = Some(err);
                self.status = QueryStatus::Error;
            }
        }
        true
    }

    /// Mark the entry stale; the caller starts the refetch
    pub fn invalidate(&mut self) {
        self.stale = true;
    }
}

impl<U> QueryState<Vec<U>> {
    /// Fetched and empty
    pub fn is_empty(&self) -> bool {
        matches!(&self.data, Some(items) if items.is_empty())
    }
}

/// Somewhere a `QueryState` lives. `None` means the cell is gone and the
/// update was dropped.
pub trait QueryCell<T> {
    fn update_state<R>(&self, f: impl FnOnce(&mut QueryState<T>) -> R) -> Option<R>;
}

impl<T> QueryCell<T> for RefCell<QueryState<T>> {
    fn update_state<R>(&self, f: impl FnOnce(&mut QueryState<T>) -> R) -> Option<R> {
        Some(f(&mut self.borrow_mut()))
    }
}

/// Run one fetch (with retries) and write its result into `cell`.
///
/// `sleep` receives the backoff in milliseconds.
pub async fn run_fetch<T, C, F, Fut, S, SFut>(
    cell: &C,
    mode: FetchMode,
    policy: RetryPolicy,
    mut fetch: F,
    mut sleep: S,
) -> FetchOutcome
where
    C: QueryCell<T>,
    F: FnMut() -> Fut,
    Fut: Future<Output = ApiResult<T>>,
    S: FnMut(u32) -> SFut,
    SFut: Future<Output = ()>,
{
    let ticket = match cell.update_state(|state| state.begin_fetch(mode)) {
        Some(Some(ticket)) => ticket,
        Some(None) => return FetchOutcome::Skipped,
        None => return FetchOutcome::Superseded,
    };
    tracing::debug!(key = GROCERIES_KEY, ?mode, "fetch started");

    let mut attempt = 0;
    loop {
        match fetch().await {
            Ok(data) => {
                let applied = cell
                    .update_state(|state| state.resolve(ticket, Ok(data)))
                    .unwrap_or(false);
                if !applied {
                    return FetchOutcome::Superseded;
                }
                tracing::debug!(key = GROCERIES_KEY, attempt, "fetch succeeded");
                return FetchOutcome::Success;
            }
            Err(err) if attempt < policy.retries => {
                let delay = policy.delay_ms(attempt);
                tracing::warn!(key = GROCERIES_KEY, attempt, delay, error = %err, "fetch failed, retrying");
                let current = cell
                    .update_state(|state| state.record_retry(ticket, err))
                    .unwrap_or(false);
                if !current {
                    return FetchOutcome::Superseded;
                }
                sleep(delay).await;
                attempt += 1;
                let current = cell
                    .update_state(|state| state.is_current(ticket))
                    .unwrap_or(false);
                if !current {
                    return FetchOutcome::Superseded;
                }
            }
            Err(err) => {
                tracing::error!(key = GROCERIES_KEY, attempt, error = %err, "fetch failed");
                let applied = cell
                    .update_state(|state| state.resolve(ticket, Err(err)))
                    .unwrap_or(false);
                if !applied {
                    return FetchOutcome::Superseded;
                }
                return FetchOutcome::Failed;
            }
        }
    }
}

/// Wait until no fetch is in flight, e.g. after `run_fetch` reported
/// `Superseded` and the replacing fetch is still running.
pub async fn await_settled<T, C, S, SFut>(cell: &C, mut sleep: S)
where
    C: QueryCell<T>,
    S: FnMut(u32) -> SFut,
    SFut: Future<Output = ()>,
{
    while cell.update_state(|state| state.is_fetching()).unwrap_or(false) {
        sleep(SETTLE_POLL_MS).await;
    }
}
