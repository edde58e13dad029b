//! Grocery Edit Modal Component
//!
//! Dialog that edits the name and amount of one item.

use leptos::prelude::*;

use crate::components::GroceryForm;
use crate::context::use_grocery_actions;
use crate::form::GroceryFormValues;
use crate::models::{GroceryItem, NewGroceryItem};
use crate::mutations::MutationKind;

/// Shown while `editing` holds an item
///
/// Saving dispatches the update and closes the dialog right away; the list
/// refreshes once the server answers. Escape or a click on the overlay
/// closes it without saving.
#[component]
pub fn GroceryEditModal(
    editing: ReadSignal<Option<GroceryItem>>,
    #[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
    let actions = use_grocery_actions();
    let pending = Signal::derive(move || actions.is_pending(MutationKind::Update));

    view! {
        <Show when=move || editing.with(|e| e.is_some())>
            {move || editing.get().map(|item| {
                let id = StoredValue::new(item.id.clone());
                let initial = GroceryFormValues::from_item(&item.name, item.amount);
                view! {
                    <div
                        class="modal-overlay"
                        on:click=move |_| on_close.run(())
                        on:keydown=move |ev: web_sys::KeyboardEvent| {
                            if ev.key() == "Escape" {
                                on_close.run(());
                            }
                        }
                    >
                        <div
                            class="modal-dialog"
                            role="dialog"
                            aria-modal="true"
                            on:click=|ev| ev.stop_propagation()
                        >
                            <div class="modal-header">
                                <h2 class="modal-title">"Edit Item"</h2>
                                <p class="modal-description">
                                    "Make changes to your product. Click save when you're done."
                                </p>
                                <button class="modal-close" title="Close" on:click=move |_| on_close.run(())>
                                    "×"
                                </button>
                            </div>
                            <GroceryForm
                                initial=initial
                                on_submit=move |payload: NewGroceryItem| {
                                    actions.update(id.get_value(), payload.into());
                                    on_close.run(());
                                }
                                pending=pending
                                submit_label="Save changes"
                                loading_label="Saving..."
                            />
                        </div>
                    </div>
                }
            })}
        </Show>
    }
}
