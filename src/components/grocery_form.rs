//! Grocery Form Component
//!
//! Name + amount form shared by the inline add row and the edit dialog.

use leptos::prelude::*;

use crate::form::{validate, FieldErrors, GroceryFormValues};
use crate::models::NewGroceryItem;

/// Validated name/amount form
///
/// Errors show after the first submit attempt and follow every keystroke from
/// then on. Nothing is submitted while a field is invalid or `pending` is set.
/// After a successful submit the fields reset to `initial`.
///
/// # Arguments
/// * `initial` - Prefilled values (empty when omitted)
/// * `on_submit` - Receives the trimmed, parsed payload
/// * `pending` - Disables the inputs and shows `loading_label`
/// * `compact` - Single inline row instead of the labelled dialog layout
#[component]
pub fn GroceryForm(
    #[prop(optional)] initial: Option<GroceryFormValues>,
    #[prop(into)] on_submit: Callback<NewGroceryItem>,
    pending: Signal<bool>,
    #[prop(into)] submit_label: String,
    #[prop(into)] loading_label: String,
    #[prop(optional)] compact: bool,
) -> impl IntoView {
    let initial = StoredValue::new(initial.unwrap_or_default());
    let labels = StoredValue::new((submit_label, loading_label));

    let name = RwSignal::new(initial.with_value(|v| v.name.clone()));
    let amount = RwSignal::new(initial.with_value(|v| v.amount.clone()));
    let errors = RwSignal::new(FieldErrors::default());
    let submitted = RwSignal::new(false);

    let current_values = move || GroceryFormValues::new(name.get_untracked(), amount.get_untracked());

    let revalidate = move || {
        if submitted.get_untracked() {
            errors.set(validate(&current_values()).err().unwrap_or_default());
        }
    };

    let handle_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }
        submitted.set(true);
        match validate(&current_values()) {
            Ok(payload) => {
                on_submit.run(payload);
                initial.with_value(|v| {
                    name.set(v.name.clone());
                    amount.set(v.amount.clone());
                });
                errors.set(FieldErrors::default());
                submitted.set(false);
            }
            Err(field_errors) => errors.set(field_errors),
        }
    };

    let blocked = move || pending.get() || errors.with(|e| !e.is_empty());
    let button_label = move || {
        labels.with_value(|(submit, loading)| if pending.get() { loading.clone() } else { submit.clone() })
    };
    let name_class = move || if errors.with(|e| e.name.is_some()) { "input invalid" } else { "input" };
    let amount_class = move || if errors.with(|e| e.amount.is_some()) { "input invalid" } else { "input" };
    let name_error = move || errors.with(|e| e.name.clone()).map(|msg| view! { <span class="field-error">{msg}</span> });
    let amount_error = move || errors.with(|e| e.amount.clone()).map(|msg| view! { <span class="field-error">{msg}</span> });

    if compact {
        view! {
            <form class="grocery-form compact" on:submit=handle_submit>
                <div class="compact-fields">
                    <div class="field name-field">
                        <input
                            type="text"
                            class=name_class
                            placeholder="Item"
                            autofocus=true
                            disabled=move || pending.get()
                            prop:value=move || name.get()
                            on:input=move |ev| {
                                name.set(event_target_value(&ev));
                                revalidate();
                            }
                        />
                        {name_error}
                    </div>
                    <div class="field amount-field">
                        <input
                            type="text"
                            inputmode="decimal"
                            class=amount_class
                            placeholder="Amount"
                            disabled=move || pending.get()
                            prop:value=move || amount.get()
                            on:input=move |ev| {
                                amount.set(event_target_value(&ev));
                                revalidate();
                            }
                        />
                        {amount_error}
                    </div>
                </div>
                <button type="submit" class="btn primary" disabled=blocked>
                    {button_label}
                </button>
            </form>
        }
        .into_any()
    } else {
        view! {
            <form class="grocery-form dialog-layout" on:submit=handle_submit>
                <div class="form-row">
                    <label for="grocery-name">"Name"</label>
                    <div class="field">
                        <input
                            id="grocery-name"
                            type="text"
                            class=name_class
                            disabled=move || pending.get()
                            prop:value=move || name.get()
                            on:input=move |ev| {
                                name.set(event_target_value(&ev));
                                revalidate();
                            }
                        />
                        {name_error}
                    </div>
                </div>
                <div class="form-row">
                    <label for="grocery-amount">"Amount"</label>
                    <div class="field">
                        <input
                            id="grocery-amount"
                            type="number"
                            step="any"
                            class=amount_class
                            disabled=move || pending.get()
                            prop:value=move || amount.get()
                            on:input=move |ev| {
                                amount.set(event_target_value(&ev));
                                revalidate();
                            }
                        />
                        {amount_error}
                    </div>
                </div>
                <div class="form-actions">
                    <button type="submit" class="btn primary" disabled=blocked>
                        {button_label}
                    </button>
                </div>
            </form>
        }
        .into_any()
    }
}
