//! User Avatar Component

use leptos::prelude::*;

const AVATAR_URL: &str = "https://github.com/shadcn.png";
const AVATAR_FALLBACK: &str = "CN";

/// Round avatar image; shows initials when the image fails to load
#[component]
pub fn UserAvatar() -> impl IntoView {
    let (failed, set_failed) = signal(false);

    view! {
        <span class="avatar">
            <Show
                when=move || !failed.get()
                fallback=|| view! { <span class="avatar-fallback">{AVATAR_FALLBACK}</span> }
            >
                <img
                    class="avatar-image"
                    src=AVATAR_URL
                    alt="@shadcn"
                    on:error=move |_| set_failed.set(true)
                />
            </Show>
        </span>
    }
}
