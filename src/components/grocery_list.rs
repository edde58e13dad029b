//! Grocery List Component
//!
//! Filterable, sortable, paginated table over the cached items.

use leptos::prelude::*;

use crate::components::RowActionsMenu;
use crate::context::{use_grocery_actions, use_grocery_query};
use crate::form::format_amount;
use crate::models::GroceryItem;
use crate::mutations::MutationKind;
use crate::store::{
    next_page, previous_page, set_name_filter, sort_by, table_state, use_list_store,
    ListViewStateStoreFields,
};
use crate::table::{page_view, SortColumn, SortDirection};

/// Table of grocery items
///
/// # Arguments
/// * `on_edit` - Open the edit dialog for an item
#[component]
pub fn GroceryList(#[prop(into)] on_edit: Callback<GroceryItem>) -> impl IntoView {
    let query = use_grocery_query();
    let actions = use_grocery_actions();
    let store = use_list_store();

    let view_model = Memo::new(move |_| {
        let state = table_state(&store);
        let items = query.items().unwrap_or_default();
        page_view(&items, &state)
    });

    let sort_indicator = move |column: SortColumn| {
        match store.sorting().get() {
            Some(s) if s.column == column => match s.direction {
                SortDirection::Asc => "↑",
                SortDirection::Desc => "↓",
            },
            _ => "↕",
        }
    };

    let on_header_toggle = move |ev: web_sys::Event| {
        let header = view_model.with_untracked(|v| v.header_state());
        // The browser already flipped the box; the model decides what it shows
        let input = event_target::<web_sys::HtmlInputElement>(&ev);
        input.set_checked(header.is_checked());
        input.set_indeterminate(header.is_indeterminate());

        let rows = view_model.with_untracked(|v| v.rows.clone());
        actions.bulk_mark(rows, header.toggle_target());
    };

    view! {
        <div class="grocery-list">
            <div class="table-toolbar">
                <input
                    type="text"
                    class="input filter-input"
                    placeholder="Filter names..."
                    prop:value=move || store.name_filter().get()
                    on:input=move |ev| set_name_filter(&store, event_target_value(&ev))
                />
                <Show when=move || query.is_fetching()>
                    <span class="refreshing">"Refreshing..."</span>
                </Show>
            </div>

            <table class="grocery-table">
                <thead>
                    <tr>
                        <th class="col-check">
                            <input
                                type="checkbox"
                                aria-label="Select all"
                                prop:checked=move || view_model.with(|v| v.header_state().is_checked())
                                prop:indeterminate=move || view_model.with(|v| v.header_state().is_indeterminate())
                                disabled=move || actions.is_pending(MutationKind::BulkMark)
                                on:change=on_header_toggle
                            />
                        </th>
                        <th class="col-name">
                            <button class="sort-button" on:click=move |_| sort_by(&store, SortColumn::Name)>
                                "Name "
                                <span class="sort-indicator">{move || sort_indicator(SortColumn::Name)}</span>
                            </button>
                        </th>
                        <th class="col-amount">
                            <button class="sort-button" on:click=move |_| sort_by(&store, SortColumn::Amount)>
                                "Amount "
                                <span class="sort-indicator">{move || sort_indicator(SortColumn::Amount)}</span>
                            </button>
                        </th>
                        <th class="col-actions"></th>
                    </tr>
                </thead>
                <tbody>
                    <Show
                        when=move || view_model.with(|v| !v.rows.is_empty())
                        fallback=|| view! {
                            <tr>
                                <td class="no-results" colspan="4">"No results."</td>
                            </tr>
                        }
                    >
                        <For
                            each=move || view_model.with(|v| v.rows.clone())
                            key=|item| (item.id.clone(), item.is_bought, item.name.clone(), item.amount.to_bits())
                            children=move |item| view! { <GroceryRow item=item on_edit=on_edit /> }
                        />
                    </Show>
                </tbody>
            </table>

            <div class="pagination">
                <span class="page-label">{move || view_model.with(|v| v.page_label())}</span>
                <div class="page-buttons">
                    <button
                        class="btn outline"
                        disabled=move || !view_model.with(|v| v.can_previous())
                        on:click=move |_| previous_page(&store, view_model.with_untracked(|v| v.page_index))
                    >
                        "Previous"
                    </button>
                    <button
                        class="btn outline"
                        disabled=move || !view_model.with(|v| v.can_next())
                        on:click=move |_| {
                            let (current, count) = view_model.with_untracked(|v| (v.page_index, v.page_count));
                            next_page(&store, current, count);
                        }
                    >
                        "Next"
                    </button>
                </div>
            </div>
        </div>
    }
}

#[component]
fn GroceryRow(item: GroceryItem, on_edit: Callback<GroceryItem>) -> impl IntoView {
    let actions = use_grocery_actions();
    let item = StoredValue::new(item);
    let is_bought = item.with_value(|i| i.is_bought);
    let name_class = if is_bought { "item-name bought" } else { "item-name" };
    let row_class = if is_bought { "grocery-row bought-row" } else { "grocery-row" };

    view! {
        <tr class=row_class>
            <td class="col-check">
                <input
                    type="checkbox"
                    aria-label="Toggle bought"
                    prop:checked=is_bought
                    on:change=move |ev| {
                        // Keep showing the cached value; a successful toggle re-renders the row
                        event_target::<web_sys::HtmlInputElement>(&ev).set_checked(is_bought);
                        actions.toggle_bought(item.get_value());
                    }
                />
            </td>
            <td class="col-name">
                <span class=name_class>{item.with_value(|i| i.name.clone())}</span>
            </td>
            <td class="col-amount">{item.with_value(|i| format_amount(i.amount))}</td>
            <td class="col-actions">
                <RowActionsMenu
                    on_edit=move |_| on_edit.run(item.get_value())
                    on_delete=move |_| actions.delete(item.with_value(|i| i.id.clone()))
                />
            </td>
        </tr>
    }
}
