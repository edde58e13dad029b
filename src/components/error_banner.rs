//! Error Banner Component
//!
//! Lists the latest failure of each action with a dismiss button.

use leptos::prelude::*;

use crate::context::use_grocery_actions;

#[component]
pub fn ErrorBanner() -> impl IntoView {
    let actions = use_grocery_actions();

    view! {
        <Show when=move || !actions.errors().is_empty()>
            <div class="error-banner" role="alert">
                <For
                    each=move || actions.errors()
                    key=|(kind, err)| (kind.index(), err.to_string())
                    children=move |(kind, err)| {
                        view! {
                            <div class="error-banner-item">
                                <span class="error-title">{kind.failure_message()}</span>
                                <span class="error-detail">{err.to_string()}</span>
                                <button
                                    class="error-dismiss"
                                    title="Dismiss"
                                    on:click=move |_| actions.state(kind).clear_error()
                                >
                                    "×"
                                </button>
                            </div>
                        }
                    }
                />
            </div>
        </Show>
    }
}
