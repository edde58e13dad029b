//! Log Panel Component
//!
//! Collapsible view of the most recent log lines kept by the rolling logger.

use leptos::prelude::*;

#[component]
pub fn LogPanel() -> impl IntoView {
    let (lines, set_lines) = signal(Vec::<String>::new());
    let refresh = move || set_lines.set(rolling_logger::recent_lines());

    view! {
        <details class="log-panel" on:toggle=move |_| refresh()>
            <summary>"Recent log"</summary>
            <div class="log-toolbar">
                <button class="btn outline" on:click=move |_| refresh()>"Refresh"</button>
                <span class="log-count">{move || format!("{} lines", lines.with(Vec::len))}</span>
            </div>
            <pre class="log-lines">{move || lines.get().join("\n")}</pre>
        </details>
    }
}
