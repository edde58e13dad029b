//! In-memory `GroceryApi` used by tests

use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use async_trait::async_trait;
use futures::channel::oneshot;
use futures::future::{FutureExt, Shared};

use super::{ApiError, ApiResult, GroceryApi};
use crate::models::{GroceryItem, GroceryUpdate, NewGroceryItem};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetAll,
    Add(String),
    Update(String, GroceryUpdate),
    Delete(String),
}

#[derive(Default)]
pub struct MockGroceryApi {
    items: RefCell<Vec<GroceryItem>>,
    next_id: Cell<u32>,
    calls: RefCell<Vec<Call>>,
    failing_ids: RefCell<HashSet<String>>,
    get_all_failures: Cell<u32>,
    fail_adds: Cell<bool>,
    gate: RefCell<Option<Shared<oneshot::Receiver<()>>>>,
    in_flight: Cell<usize>,
    peak_in_flight: Cell<usize>,
}

impl MockGroceryApi {
    pub fn with_items(items: &[(&str, f64, bool)]) -> Self {
        let api = Self::default();
        for (name, amount, is_bought) in items {
            let id = api.next_id();
            api.items.borrow_mut().push(GroceryItem {
                id,
                name: name.to_string(),
                amount: *amount,
                is_bought: *is_bought,
            });
        }
        api
    }

    pub fn snapshot(&self) -> Vec<GroceryItem> {
        self.items.borrow().clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Requests touching this id answer 500
    pub fn fail_id(&self, id: &str) {
        self.failing_ids.borrow_mut().insert(id.to_string());
    }

    /// The next `count` list requests fail
    pub fn fail_next_get_all(&self, count: u32) {
        self.get_all_failures.set(count);
    }

    pub fn fail_adds(&self) {
        self.fail_adds.set(true);
    }

    /// Writes wait until the returned sender fires (or is dropped)
    pub fn hold_writes(&self) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        *self.gate.borrow_mut() = Some(gate.shared());
        release
    }

    /// Most writes that were waiting at the same time
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.get()
    }

    async fn enter(&self) {
        let in_flight = self.in_flight.get() + 1;
        self.in_flight.set(in_flight);
        self.peak_in_flight.set(self.peak_in_flight.get().max(in_flight));
        let gate = self.gate.borrow().clone();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.in_flight.set(self.in_flight.get() - 1);
    }

    fn next_id(&self) -> String {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id.to_string()
    }

    fn server_error(method: &'static str, id: &str) -> ApiError {
        ApiError::Status {
            method,
            url: format!("mock://groceries/{}", id),
            status: 500,
        }
    }

    fn check(&self, method: &'static str, id: &str) -> ApiResult<()> {
        if self.failing_ids.borrow().contains(id) {
            Err(Self::server_error(method, id))
        } else {
            Ok(())
        }
    }
}

#[async_trait(?Send)]
impl GroceryApi for MockGroceryApi {
    async fn get_all(&self) -> ApiResult<Vec<GroceryItem>> {
        self.calls.borrow_mut().push(Call::GetAll);
        let remaining = self.get_all_failures.get();
        if remaining > 0 {
            self.get_all_failures.set(remaining - 1);
            return Err(ApiError::Transport {
                method: "GET",
                url: "mock://groceries".to_string(),
                message: "connection refused".to_string(),
            });
        }
        Ok(self.snapshot())
    }

    async fn add(&self, item: &NewGroceryItem) -> ApiResult<GroceryItem> {
        self.calls.borrow_mut().push(Call::Add(item.name.clone()));
        self.enter().await;
        if self.fail_adds.get() {
            return Err(Self::server_error("POST", ""));
        }
        let created = GroceryItem {
            id: self.next_id(),
            name: item.name.clone(),
            amount: item.amount,
            is_bought: false,
        };
        self.items.borrow_mut().push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: &str, update: &GroceryUpdate) -> ApiResult<GroceryItem> {
        self.calls.borrow_mut().push(Call::Update(id.to_string(), update.clone()));
        self.enter().await;
        self.check("PATCH", id)?;
        let mut items = self.items.borrow_mut();
        let item = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| ApiError::Status {
                method: "PATCH",
                url: format!("mock://groceries/{}", id),
                status: 404,
            })?;
        update.apply_to(item);
        Ok(item.clone())
    }

    async fn delete(&self, id: &str) -> ApiResult<()> {
        self.calls.borrow_mut().push(Call::Delete(id.to_string()));
        self.enter().await;
        self.check("DELETE", id)?;
        self.items.borrow_mut().retain(|item| item.id != id);
        Ok(())
    }
}
