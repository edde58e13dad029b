//! Grocery API
//!
//! Typed access to the grocery REST resource, organized as a trait so the
//! mutation layer can run against the HTTP client or a test double.

mod error;
mod http;
#[cfg(test)]
pub(crate) mod mock;

use std::future::Future;

use async_trait::async_trait;
use futures::future::join_all;

use crate::models::{GroceryItem, GroceryUpdate, NewGroceryItem};

pub use error::{ApiError, ApiResult};
pub use http::HttpGroceryApi;

/// One method per endpoint; bulk operations are composed from them.
///
/// Futures are `?Send`: everything runs on the browser event loop.
#[async_trait(?Send)]
pub trait GroceryApi {
    /// `GET /groceries`
    async fn get_all(&self) -> ApiResult<Vec<GroceryItem>>;

    /// `POST /groceries`, always with `isBought: false`
    async fn add(&self, item: &NewGroceryItem) -> ApiResult<GroceryItem>;

    /// `PATCH /groceries/:id`
    async fn update(&self, id: &str, update: &GroceryUpdate) -> ApiResult<GroceryItem>;

    /// `DELETE /groceries/:id`
    async fn delete(&self, id: &str) -> ApiResult<()>;

    /// Flip `isBought` and nothing else
    async fn toggle_bought(&self, item: &GroceryItem) -> ApiResult<GroceryItem> {
        self.update(&item.id, &GroceryUpdate::bought(!item.is_bought)).await
    }

    async fn add_bulk(&self, items: &[NewGroceryItem]) -> ApiResult<Vec<GroceryItem>> {
        settle_all(items.iter().map(|item| self.add(item))).await
    }

    async fn delete_all(&self, items: &[GroceryItem]) -> ApiResult<()> {
        settle_all(items.iter().map(|item| self.delete(&item.id)))
            .await
            .map(|_| ())
    }

    async fn mark_all(&self, items: &[GroceryItem], is_bought: bool) -> ApiResult<Vec<GroceryItem>> {
        let update = GroceryUpdate::bought(is_bought);
        settle_all(items.iter().map(|item| self.update(&item.id, &update))).await
    }
}

/// Run every request concurrently and wait until all of them settle.
///
/// Succeeds only if every request did. Otherwise reports the first failure in
/// submission order together with the failure count; requests that succeeded
/// are not rolled back.
pub async fn settle_all<T, F>(requests: impl IntoIterator<Item = F>) -> ApiResult<Vec<T>>
where
    F: Future<Output = ApiResult<T>>,
{
    let results = join_all(requests).await;
    let total = results.len();

    let mut values = Vec::with_capacity(total);
    let mut first_error = None;
    let mut failed = 0;
    for result in results {
        match result {
            Ok(value) => values.push(value),
            Err(err) => {
                failed += 1;
                first_error.get_or_insert(err);
            }
        }
    }

    match first_error {
        None => Ok(values),
        Some(first) => {
            tracing::warn!(failed, total, error = %first, "bulk request failed");
            Err(ApiError::Batch { failed, total, first: Box::new(first) })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::{Call, MockGroceryApi};
    use super::*;

    #[tokio::test]
    async fn test_toggle_twice_restores_value() {
        let api = MockGroceryApi::with_items(&[("Milk", 2.0, false)]);
        let item = api.snapshot()[0].clone();

        let once = api.toggle_bought(&item).await.unwrap();
        assert!(once.is_bought);
        let twice = api.toggle_bought(&once).await.unwrap();
        assert_eq!(twice, item);
    }

    #[tokio::test]
    async fn test_toggle_only_sends_bought_flag() {
        let api = MockGroceryApi::with_items(&[("Milk", 2.0, true)]);
        let item = api.snapshot()[0].clone();
        api.toggle_bought(&item).await.unwrap();

        assert_eq!(api.calls(), vec![Call::Update(item.id.clone(), GroceryUpdate::bought(false))]);
    }

    #[tokio::test]
    async fn test_add_bulk_posts_each_item() {
        let api = MockGroceryApi::default();
        let items = vec![NewGroceryItem::new("Milk", 1.0), NewGroceryItem::new("Milk", 1.0), NewGroceryItem::new("Eggs", 6.0)];

        let created = api.add_bulk(&items).await.unwrap();
        assert_eq!(created.len(), 3);
        assert!(created.iter().all(|item| !item.is_bought));
        assert_eq!(api.calls().iter().filter(|c| matches!(c, Call::Add(_))).count(), 3);
        assert_eq!(api.snapshot().len(), 3);
    }

    #[tokio::test]
    async fn test_batch_reports_first_failure_after_all_settle() {
        let api = MockGroceryApi::with_items(&[("Milk", 1.0, false), ("Eggs", 6.0, false), ("Bread", 1.0, false)]);
        let items = api.snapshot();
        api.fail_id(&items[1].id);

        let err = api.delete_all(&items).await.unwrap_err();
        match err {
            ApiError::Batch { failed, total, first } => {
                assert_eq!(failed, 1);
                assert_eq!(total, 3);
                assert!(matches!(*first, ApiError::Status { status: 500, .. }));
            }
            other => panic!("expected batch error, got {:?}", other),
        }
        // The other two deletes still went through
        let remaining = api.snapshot();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, items[1].id);
    }

    #[tokio::test]
    async fn test_mark_all_touches_only_given_items() {
        let api = MockGroceryApi::with_items(&[("Milk", 1.0, false), ("Eggs", 6.0, false), ("Bread", 1.0, false)]);
        let all = api.snapshot();

        api.mark_all(&all[..2], true).await.unwrap();

        let after = api.snapshot();
        assert!(after[0].is_bought);
        assert!(after[1].is_bought);
        assert!(!after[2].is_bought);
    }

    /// Run `op` while writes are held; assert all `expected` requests were
    /// issued before any of them was allowed to finish
    async fn all_in_flight_at_once<T>(api: &MockGroceryApi, expected: usize, op: impl Future<Output = T>) -> T {
        let release = api.hold_writes();
        let check = async move {
            tokio::task::yield_now().await;
            assert_eq!(api.peak_in_flight(), expected);
            let _ = release.send(());
        };
        let (output, _) = futures::join!(op, check);
        output
    }

    #[tokio::test]
    async fn test_bulk_requests_run_concurrently() {
        let api = MockGroceryApi::default();
        let new_items: Vec<NewGroceryItem> = (0..5).map(|i| NewGroceryItem::new(format!("Item {}", i), 1.0)).collect();
        let created = all_in_flight_at_once(&api, 5, api.add_bulk(&new_items)).await.unwrap();
        assert_eq!(created.len(), 5);

        let api = MockGroceryApi::with_items(&[("Milk", 1.0, false), ("Eggs", 6.0, false), ("Bread", 1.0, false)]);
        let items = api.snapshot();
        let marked = all_in_flight_at_once(&api, 3, api.mark_all(&items, true)).await.unwrap();
        assert!(marked.iter().all(|item| item.is_bought));

        let api = MockGroceryApi::with_items(&[("Milk", 1.0, false), ("Eggs", 6.0, false), ("Bread", 1.0, false), ("Rice", 2.0, false)]);
        let items = api.snapshot();
        all_in_flight_at_once(&api, 4, api.delete_all(&items)).await.unwrap();
        assert!(api.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_empty_batch_succeeds() {
        let api = MockGroceryApi::default();
        assert!(api.delete_all(&[]).await.is_ok());
        assert!(api.calls().is_empty());
    }
}
