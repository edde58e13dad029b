//! Mutation Orchestrator
//!
//! Every write goes through here: call the API, then invalidate the cache so
//! the list is refetched from the server. Nothing is applied locally.

use async_trait::async_trait;

use crate::api::{ApiResult, GroceryApi};
use crate::models::{GroceryItem, GroceryUpdate, NewGroceryItem};
use crate::sample_items::{random_batch, BULK_ADD_COUNT};

/// Something that can discard cached server state and refetch it.
///
/// `invalidate` resolves once the refetch has settled.
#[async_trait(?Send)]
pub trait InvalidateCache {
    async fn invalidate(&self);
}

/// One kind of write, used for pending flags and log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Add,
    Update,
    Delete,
    ToggleBought,
    BulkAdd,
    BulkDelete,
    BulkMark,
}

impl MutationKind {
    pub const ALL: [MutationKind; 7] = [
        MutationKind::Add,
        MutationKind::Update,
        MutationKind::Delete,
        MutationKind::ToggleBought,
        MutationKind::BulkAdd,
        MutationKind::BulkDelete,
        MutationKind::BulkMark,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            MutationKind::Add => "add",
            MutationKind::Update => "update",
            MutationKind::Delete => "delete",
            MutationKind::ToggleBought => "toggle_bought",
            MutationKind::BulkAdd => "bulk_add",
            MutationKind::BulkDelete => "bulk_delete",
            MutationKind::BulkMark => "bulk_mark",
        }
    }

    /// Text shown next to a failure
    pub fn failure_message(self) -> &'static str {
        match self {
            MutationKind::Add => "Failed to add item",
            MutationKind::Update => "Failed to save changes",
            MutationKind::Delete => "Failed to delete item",
            MutationKind::ToggleBought => "Failed to update item",
            MutationKind::BulkAdd => "Failed to add bulk items",
            MutationKind::BulkDelete => "Failed to delete all items",
            MutationKind::BulkMark => "Failed to toggle all items",
        }
    }
}

pub struct Mutations<A, C> {
    api: A,
    cache: C,
}

impl<A: GroceryApi, C: InvalidateCache> Mutations<A, C> {
    pub fn new(api: A, cache: C) -> Self {
        Self { api, cache }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub async fn add(&self, payload: NewGroceryItem) -> ApiResult<GroceryItem> {
        let result = self.api.add(&payload).await;
        self.settle(MutationKind::Add, result).await
    }

    pub async fn update(&self, id: &str, update: GroceryUpdate) -> ApiResult<GroceryItem> {
        let result = self.api.update(id, &update).await;
        self.settle(MutationKind::Update, result).await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        let result = self.api.delete(id).await;
        self.settle(MutationKind::Delete, result).await
    }

    pub async fn toggle_bought(&self, item: &GroceryItem) -> ApiResult<GroceryItem> {
        let result = self.api.toggle_bought(item).await;
        self.settle(MutationKind::ToggleBought, result).await
    }

    /// Post [`BULK_ADD_COUNT`] random items from the sample pool
    pub async fn bulk_add(&self) -> ApiResult<Vec<GroceryItem>> {
        let items = random_batch(&mut rand::thread_rng(), BULK_ADD_COUNT);
        let result = self.api.add_bulk(&items).await;
        self.settle(MutationKind::BulkAdd, result).await
    }

    /// Delete everything the server currently has, not just what is cached
    pub async fn bulk_delete(&self) -> ApiResult<()> {
        let items = match self.api.get_all().await {
            Ok(items) => items,
            Err(err) => {
                tracing::error!(action = MutationKind::BulkDelete.name(), error = %err, "could not list items to delete");
                return Err(err);
            }
        };
        let result = self.api.delete_all(&items).await;
        self.settle(MutationKind::BulkDelete, result).await
    }

    /// Set `isBought` on exactly `items`
    pub async fn bulk_mark(&self, items: &[GroceryItem], is_bought: bool) -> ApiResult<Vec<GroceryItem>> {
        let result = self.api.mark_all(items, is_bought).await;
        self.settle(MutationKind::BulkMark, result).await
    }

    async fn settle<T>(&self, kind: MutationKind, result: ApiResult<T>) -> ApiResult<T> {
        match result {
            Ok(value) => {
                tracing::info!(action = kind.name(), "mutation succeeded");
                self.cache.invalidate().await;
                Ok(value)
            }
            Err(err) => {
                tracing::error!(action = kind.name(), error = %err, "mutation failed");
                if err.may_have_partially_applied() {
                    self.cache.invalidate().await;
                }
                Err(err)
            }
        }
    }
}
