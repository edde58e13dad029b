//! Add Grocery Item Component
//!
//! Inline create form above the list.

use leptos::prelude::*;

use crate::components::GroceryForm;
use crate::context::use_grocery_actions;
use crate::models::NewGroceryItem;
use crate::mutations::MutationKind;

#[component]
pub fn AddGroceryItem() -> impl IntoView {
    let actions = use_grocery_actions();
    let pending = Signal::derive(move || actions.is_pending(MutationKind::Add));

    view! {
        <div class="add-grocery-item">
            <GroceryForm
                on_submit=move |payload: NewGroceryItem| actions.add(payload)
                pending=pending
                submit_label="Add"
                loading_label="Adding..."
                compact=true
            />
        </div>
    }
}
