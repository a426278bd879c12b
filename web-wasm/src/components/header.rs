//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header<F>(on_share: F) -> impl IntoView
where
    F: Fn(()) + 'static + Clone,
{
    view! {
        <header class="header">
            <h1>"QR Scanner"</h1>
            <button class="btn-icon" title="Share App" on:click=move |_| on_share(())>
                "共有"
            </button>
        </header>
    }
}
