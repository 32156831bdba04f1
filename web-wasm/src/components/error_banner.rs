//! エラー表示コンポーネント

use leptos::prelude::*;

#[component]
pub fn ErrorBanner<F>(message: String, on_dismiss: F) -> impl IntoView
where
    F: Fn(()) + 'static + Clone,
{
    view! {
        <div class="error-banner" role="alert">
            <h3>"Analysis Error"</h3>
            <p>{message}</p>
            <button class="btn btn-link" on:click=move |_| on_dismiss(())>
                "Try Again"
            </button>
        </div>
    }
}
