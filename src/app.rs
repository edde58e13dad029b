//! Grocery List App
//!
//! Root component: wires the query cache, the actions and the list view store,
//! then renders the page.

use leptos::prelude::*;
use reactive_stores::Store;
use wasm_bindgen::JsCast;

use crate::api::HttpGroceryApi;
use crate::components::{AddGroceryItem, ErrorBanner, GroceryEditModal, GroceryHeader, GroceryList, LogPanel};
use crate::config::AppConfig;
use crate::context::{GroceryActions, GroceryQuery};
use crate::models::GroceryItem;
use crate::store::ListViewState;

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    let api = HttpGroceryApi::new(&config);
    tracing::info!(endpoint = api.endpoint(), "Starting grocery list");

    let query = GroceryQuery::new(api, config.retry);
    let actions = GroceryActions::new(query);
    let (editing, set_editing) = signal::<Option<GroceryItem>>(None);

    // Provide context to all children
    provide_context(query);
    provide_context(actions);
    provide_context(Store::new(ListViewState::new(config.page_size)));

    // Initial load
    Effect::new(move |_| query.refetch_if_idle());

    // Refetch when the window regains focus
    if let Some(win) = web_sys::window() {
        let on_focus = wasm_bindgen::closure::Closure::<dyn FnMut(web_sys::FocusEvent)>::new(
            move |_ev: web_sys::FocusEvent| {
                tracing::debug!("Window focused, refetching");
                query.refetch_if_idle();
            },
        );
        let _ = win.add_event_listener_with_callback("focus", on_focus.as_ref().unchecked_ref());
        on_focus.forget();
    }

    view! {
        <div class="app-layout">
            <main class="page">
                <GroceryHeader />
                <AddGroceryItem />
                <ErrorBanner />
                {move || {
                    if query.is_pending() {
                        view! {
                            <div class="status loading">
                                <span class="spinner"></span>
                            </div>
                        }
                        .into_any()
                    } else if query.is_error() {
                        view! {
                            <div class="status error">
                                <p>"Failed to load grocery items"</p>
                                <p class="error-detail">{query.error().map(|err| err.to_string())}</p>
                                <button class="btn outline" on:click=move |_| query.refetch()>
                                    "Try Again"
                                </button>
                            </div>
                        }
                        .into_any()
                    } else if query.is_empty() {
                        view! {
                            <div class="status empty">
                                <p>"Your grocery list is empty. Add some items above!"</p>
                            </div>
                        }
                        .into_any()
                    } else {
                        view! { <GroceryList on_edit=move |item: GroceryItem| set_editing.set(Some(item)) /> }
                            .into_any()
                    }
                }}
                <LogPanel />
            </main>
            <GroceryEditModal editing=editing on_close=move |_| set_editing.set(None) />
        </div>
    }
}
