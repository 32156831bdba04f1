//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <h1>"🐾 TrackScout"</h1>
            <p class="text-muted">"AI animal track identification"</p>
        </header>
    }
}
