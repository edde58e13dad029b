//! Row Actions Menu Component
//!
//! Per-row "⋯" menu with Edit and Delete.

use leptos::prelude::*;

/// Inline row menu
///
/// Shows a ⋯ button initially. When clicked, shows Edit / Delete buttons; either
/// one closes the menu again.
///
/// # Arguments
/// * `on_edit` - Open the edit dialog for this row
/// * `on_delete` - Delete this row
#[component]
pub fn RowActionsMenu(
    #[prop(into)] on_edit: Callback<()>,
    #[prop(into)] on_delete: Callback<()>,
) -> impl IntoView {
    let (open, set_open) = signal(false);

    view! {
        <div class="row-actions">
            <button
                class="row-actions-trigger"
                title="Open menu"
                on:click=move |ev| {
                    ev.stop_propagation();
                    set_open.update(|o| *o = !*o);
                }
            >
                "⋯"
            </button>
            <Show when=move || open.get()>
                <div class="dropdown-backdrop" on:click=move |_| set_open.set(false)></div>
                <div class="dropdown-menu row-menu">
                    <button
                        class="dropdown-item"
                        on:click=move |ev| {
                            ev.stop_propagation();
                            set_open.set(false);
                            on_edit.run(());
                        }
                    >
                        "Edit"
                    </button>
                    <button
                        class="dropdown-item danger"
                        on:click=move |ev| {
                            ev.stop_propagation();
                            set_open.set(false);
                            on_delete.run(());
                        }
                    >
                        "Delete"
                    </button>
                </div>
            </Show>
        </div>
    }
}
