//! List View State Store
//!
//! Sorting, filter and page index of the grocery table. Ephemeral UI state,
//! kept in a `reactive_stores` store for field-level reactivity.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::table::{toggle_sorting, SortColumn, Sorting, TableState};

#[derive(Clone, Debug, Default, Store)]
pub struct ListViewState {
    pub sorting: Option<Sorting>,
    pub name_filter: String,
    pub page_index: usize,
    pub page_size: usize,
}

impl ListViewState {
    pub fn new(page_size: usize) -> Self {
        Self { page_size, ..Default::default() }
    }
}

pub type ListViewStore = Store<ListViewState>;

/// Get the list view store from context
pub fn use_list_store() -> ListViewStore {
    expect_context::<ListViewStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Snapshot as a `TableState` (tracks every field)
pub fn table_state(store: &ListViewStore) -> TableState {
    TableState {
        sorting: store.sorting().get(),
        name_filter: store.name_filter().get(),
        page_index: store.page_index().get(),
        page_size: store.page_size().get(),
    }
}

pub fn sort_by(store: &ListViewStore, column: SortColumn) {
    let next = toggle_sorting(store.sorting().get_untracked(), column);
    store.sorting().set(Some(next));
}

/// New filter text; jumps back to the first page
pub fn set_name_filter(store: &ListViewStore, filter: String) {
    store.name_filter().set(filter);
    store.page_index().set(0);
}

/// `current` is the clamped index the table actually shows
pub fn previous_page(store: &ListViewStore, current: usize) {
    store.page_index().set(current.saturating_sub(1));
}

pub fn next_page(store: &ListViewStore, current: usize, page_count: usize) {
    if current + 1 < page_count {
        store.page_index().set(current + 1);
    }
}
