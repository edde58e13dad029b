//! Application Context
//!
//! The grocery query (server-state cache) and the mutation actions, provided
//! to all components via the Leptos Context API.

use std::future::Future;

use async_trait::async_trait;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{ApiError, ApiResult, HttpGroceryApi};
use crate::models::{GroceryItem, GroceryUpdate, NewGroceryItem};
use crate::mutations::{InvalidateCache, MutationKind, Mutations};
use crate::query::{await_settled, run_fetch, FetchMode, FetchOutcome, QueryCell, QueryState, QueryStatus, RetryPolicy};

impl<T: Send + Sync + 'static> QueryCell<T> for RwSignal<QueryState<T>> {
    fn update_state<R>(&self, f: impl FnOnce(&mut QueryState<T>) -> R) -> Option<R> {
        // A disposed signal means the view is gone; drop the update
        self.try_update(f)
    }
}

/// Reactive handle to the `"groceries"` cache entry
#[derive(Clone, Copy)]
pub struct GroceryQuery {
    state: RwSignal<QueryState<Vec<GroceryItem>>>,
    api: StoredValue<HttpGroceryApi, LocalStorage>,
    retry: RetryPolicy,
}

impl GroceryQuery {
    pub fn new(api: HttpGroceryApi, retry: RetryPolicy) -> Self {
        Self {
            state: RwSignal::new(QueryState::default()),
            api: StoredValue::new_local(api),
            retry,
        }
    }

    pub fn api(&self) -> HttpGroceryApi {
        self.api.get_value()
    }

    /// Cached items; `None` until the first successful fetch
    pub fn items(&self) -> Option<Vec<GroceryItem>> {
        self.state.with(|s| s.data().cloned())
    }

    /// No data and no final error yet, including before the first fetch starts
    pub fn is_pending(&self) -> bool {
        self.state.with(|s| s.status() == QueryStatus::Pending)
    }

    pub fn is_fetching(&self) -> bool {
        self.state.with(|s| s.is_fetching())
    }

    pub fn is_error(&self) -> bool {
        self.state.with(|s| s.is_error())
    }

    pub fn error(&self) -> Option<ApiError> {
        self.state.with(|s| s.error().cloned())
    }

    pub fn is_empty(&self) -> bool {
        self.state.with(|s| s.is_empty())
    }

    /// Fetch and wait for the result
    pub async fn fetch(self, mode: FetchMode) -> FetchOutcome {
        let api = self.api();
        run_fetch(
            &self.state,
            mode,
            self.retry,
            || crate::api::GroceryApi::get_all(&api),
            TimeoutFuture::new,
        )
        .await
    }

    /// Manual re-trigger, e.g. the "Try Again" button
    pub fn refetch(&self) {
        let this = *self;
        spawn_local(async move {
            this.fetch(FetchMode::Supersede).await;
        });
    }

    /// Mount / focus refetch; skipped while a fetch is in flight
    pub fn refetch_if_idle(&self) {
        let this = *self;
        spawn_local(async move {
            this.fetch(FetchMode::IfIdle).await;
        });
    }
}

#[async_trait(?Send)]
impl InvalidateCache for GroceryQuery {
    async fn invalidate(&self) {
        self.state.try_update(|s| s.invalidate());
        if self.fetch(FetchMode::Supersede).await == FetchOutcome::Superseded {
            await_settled(&self.state, TimeoutFuture::new).await;
        }
    }
}

/// Pending flag and last error of one action
///
/// Runs of the same action may overlap; the action is pending until the last
/// one settles. A run starting while others are in flight keeps their error.
#[derive(Clone, Copy)]
pub struct MutationState {
    in_flight: RwSignal<u32>,
    error: RwSignal<Option<ApiError>>,
}

impl MutationState {
    pub fn new() -> Self {
        Self {
            in_flight: RwSignal::new(0),
            error: RwSignal::new(None),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.get() > 0
    }

    pub fn error(&self) -> Option<ApiError> {
        self.error.get()
    }

    pub fn clear_error(&self) {
        self.error.set(None);
    }

    /// Pending for the whole of `operation`, including the refetch it awaits
    pub async fn run<T>(self, operation: impl Future<Output = ApiResult<T>>) -> ApiResult<T> {
        let idle = self.in_flight.try_with_untracked(|count| *count == 0).unwrap_or(true);
        if idle {
            self.error.try_set(None);
        }
        self.in_flight.try_update(|count| *count += 1);

        let result = operation.await;

        if let Err(err) = &result {
            self.error.try_set(Some(err.clone()));
        }
        self.in_flight.try_update(|count| *count = count.saturating_sub(1));
        result
    }
}

/// One dispatchable action per write operation
#[derive(Clone, Copy)]
pub struct GroceryActions {
    query: GroceryQuery,
    states: [MutationState; 7],
}

impl GroceryActions {
    pub fn new(query: GroceryQuery) -> Self {
        Self {
            query,
            states: MutationKind::ALL.map(|_| MutationState::new()),
        }
    }

    pub fn state(&self, kind: MutationKind) -> MutationState {
        self.states[kind.index()]
    }

    pub fn is_pending(&self, kind: MutationKind) -> bool {
        self.state(kind).is_pending()
    }

    /// Latest failures, one per action that has one
    pub fn errors(&self) -> Vec<(MutationKind, ApiError)> {
        MutationKind::ALL
            .iter()
            .filter_map(|kind| self.state(*kind).error().map(|err| (*kind, err)))
            .collect()
    }

    fn mutations(&self) -> Mutations<HttpGroceryApi, GroceryQuery> {
        Mutations::new(self.query.api(), self.query)
    }

    pub fn add(&self, payload: NewGroceryItem) {
        let state = self.state(MutationKind::Add);
        let m = self.mutations();
        spawn_local(async move {
            let _ = state.run(m.add(payload)).await;
        });
    }

    pub fn update(&self, id: String, update: GroceryUpdate) {
        let state = self.state(MutationKind::Update);
        let m = self.mutations();
        spawn_local(async move {
            let _ = state.run(m.update(&id, update)).await;
        });
    }

    pub fn delete(&self, id: String) {
        let state = self.state(MutationKind::Delete);
        let m = self.mutations();
        spawn_local(async move {
            let _ = state.run(m.delete(&id)).await;
        });
    }

    pub fn toggle_bought(&self, item: GroceryItem) {
        let state = self.state(MutationKind::ToggleBought);
        let m = self.mutations();
        spawn_local(async move {
            let _ = state.run(m.toggle_bought(&item)).await;
        });
    }

    pub fn bulk_add(&self) {
        let state = self.state(MutationKind::BulkAdd);
        let m = self.mutations();
        spawn_local(async move {
            let _ = state.run(m.bulk_add()).await;
        });
    }

    pub fn bulk_delete(&self) {
        let state = self.state(MutationKind::BulkDelete);
        let m = self.mutations();
        spawn_local(async move {
            let _ = state.run(m.bulk_delete()).await;
        });
    }

    /// No-op for an empty slice
    pub fn bulk_mark(&self, items: Vec<GroceryItem>, is_bought: bool) {
        if items.is_empty() {
            return;
        }
        let state = self.state(MutationKind::BulkMark);
        let m = self.mutations();
        spawn_local(async move {
            let _ = state.run(m.bulk_mark(&items, is_bought)).await;
        });
    }
}

/// Get the grocery query from context
pub fn use_grocery_query() -> GroceryQuery {
    use_context::<GroceryQuery>().expect("GroceryQuery should be provided")
}

/// Get the grocery actions from context
pub fn use_grocery_actions() -> GroceryActions {
    use_context::<GroceryActions>().expect("GroceryActions should be provided")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockGroceryApi;
    use futures::channel::oneshot;
    use std::cell::Cell;

    /// Records whether the action was still pending when invalidation ran
    struct PendingProbe {
        state: MutationState,
        pending_during_invalidate: Cell<Option<bool>>,
    }

    #[async_trait(?Send)]
    impl InvalidateCache for PendingProbe {
        async fn invalidate(&self) {
            self.pending_during_invalidate
                .set(Some(self.state.in_flight.get_untracked() > 0));
        }
    }

    #[tokio::test]
    async fn test_pending_until_refetch_settles() {
        let owner = Owner::new();
        owner.set();

        let state = MutationState::new();
        let probe = PendingProbe { state, pending_during_invalidate: Cell::new(None) };
        let m = Mutations::new(MockGroceryApi::with_items(&[("Milk", 2.0, false)]), probe);
        let item = m.api().snapshot()[0].clone();

        let updated = state.run(m.toggle_bought(&item)).await.unwrap();

        assert!(updated.is_bought);
        assert_eq!(m.cache().pending_during_invalidate.get(), Some(true));
        assert_eq!(state.in_flight.get_untracked(), 0);
        assert!(state.error.get_untracked().is_none());
    }

    #[tokio::test]
    async fn test_failure_is_kept_for_display() {
        let owner = Owner::new();
        owner.set();

        let state = MutationState::new();
        let probe = PendingProbe { state, pending_during_invalidate: Cell::new(None) };
        let m = Mutations::new(MockGroceryApi::with_items(&[("Milk", 2.0, false)]), probe);
        let item = m.api().snapshot()[0].clone();
        m.api().fail_id(&item.id);

        assert!(state.run(m.delete(&item.id)).await.is_err());

        assert_eq!(state.in_flight.get_untracked(), 0);
        assert!(matches!(state.error.get_untracked(), Some(ApiError::Status { status: 500, .. })));
        assert_eq!(m.cache().pending_during_invalidate.get(), None);
    }

    #[tokio::test]
    async fn test_overlapping_runs_stay_pending_until_last_settles() {
        let owner = Owner::new();
        owner.set();

        let state = MutationState::new();
        let (release_first, first_gate) = oneshot::channel::<()>();
        let (release_second, second_gate) = oneshot::channel::<()>();

        let first = state.run(async move {
            let _ = first_gate.await;
            Err::<(), _>(ApiError::Status { method: "PATCH", url: "mock://groceries/1".into(), status: 500 })
        });
        let second = state.run(async move {
            let _ = second_gate.await;
            Ok::<(), ApiError>(())
        });
        let driver = async move {
            tokio::task::yield_now().await;
            assert_eq!(state.in_flight.get_untracked(), 2);

            release_first.send(()).unwrap();
            tokio::task::yield_now().await;
            // First settled with an error, second still running
            assert_eq!(state.in_flight.get_untracked(), 1);
            assert!(state.error.get_untracked().is_some());

            release_second.send(()).unwrap();
        };

        let (first, second, _) = futures::join!(first, second, driver);

        assert!(first.is_err());
        assert!(second.is_ok());
        assert_eq!(state.in_flight.get_untracked(), 0);
        // The later success does not hide the failure from the same burst
        assert!(state.error.get_untracked().is_some());
    }

    #[tokio::test]
    async fn test_new_burst_clears_previous_error() {
        let owner = Owner::new();
        owner.set();

        let state = MutationState::new();
        let failed = state
            .run(async { Err::<(), _>(ApiError::Status { method: "DELETE", url: "mock://groceries/1".into(), status: 500 }) })
            .await;
        assert!(failed.is_err());
        assert!(state.error.get_untracked().is_some());

        state.run(async { Ok::<(), ApiError>(()) }).await.unwrap();
        assert!(state.error.get_untracked().is_none());
    }

    #[test]
    fn test_disposed_signal_drops_updates() {
        let owner = Owner::new();
        owner.set();
        let signal = RwSignal::new(QueryState::<Vec<GroceryItem>>::default());
        signal.dispose();

        assert!(signal.update_state(|s| s.begin_fetch(FetchMode::IfIdle)).is_none());
    }
}
