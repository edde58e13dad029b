//! Grocery Header Component
//!
//! Page title plus the avatar dropdown with the bulk actions.

use leptos::prelude::*;

use crate::components::UserAvatar;
use crate::context::use_grocery_actions;
use crate::mutations::MutationKind;

#[component]
pub fn GroceryHeader() -> impl IntoView {
    let actions = use_grocery_actions();
    let (menu_open, set_menu_open) = signal(false);

    let adding = move || actions.is_pending(MutationKind::BulkAdd);
    let deleting = move || actions.is_pending(MutationKind::BulkDelete);
    let busy = move || adding() || deleting();

    view! {
        <header class="grocery-header">
            <h1 class="page-title">"Grocery List"</h1>
            <div class="dropdown">
                <button
                    class="avatar-trigger"
                    disabled=busy
                    on:click=move |ev| {
                        ev.stop_propagation();
                        set_menu_open.update(|open| *open = !*open);
                    }
                >
                    <UserAvatar />
                </button>
                <Show when=move || menu_open.get()>
                    <div class="dropdown-backdrop" on:click=move |_| set_menu_open.set(false)></div>
                    <div class="dropdown-menu">
                        <button
                            class="dropdown-item"
                            disabled=busy
                            on:click=move |_| {
                                set_menu_open.set(false);
                                actions.bulk_add();
                            }
                        >
                            {move || if adding() { "Adding items..." } else { "Add 10 random items" }}
                        </button>
                        <button
                            class="dropdown-item danger"
                            disabled=busy
                            on:click=move |_| {
                                set_menu_open.set(false);
                                actions.bulk_delete();
                            }
                        >
                            {move || if deleting() { "Deleting items..." } else { "Delete all items" }}
                        </button>
                    </div>
                </Show>
            </div>
        </header>
    }
}
