//! 操作ボタンコンポーネント

use leptos::prelude::*;

#[component]
pub fn Controls<FT, FD, FC>(
    is_scanning: ReadSignal<bool>,
    has_results: Signal<bool>,
    on_toggle_scan: FT,
    on_download: FD,
    on_copy_all: FC,
) -> impl IntoView
where
    FT: Fn(()) + 'static + Clone,
    FD: Fn(()) + 'static + Clone,
    FC: Fn(()) + 'static + Clone,
{
    view! {
        <div class="controls">
            <button
                class=move || if is_scanning.get() { "btn btn-danger" } else { "btn btn-primary" }
                on:click=move |_| on_toggle_scan(())
            >
                {move || if is_scanning.get() { "Stop Scanning" } else { "Start Scanning" }}
            </button>

            <button
                class="btn btn-secondary"
                disabled=move || !has_results.get()
                on:click=move |_| on_download(())
            >
                "CSV"
            </button>

            <button
                class="btn btn-secondary"
                disabled=move || !has_results.get()
                on:click=move |_| on_copy_all(())
            >
                "Copy List"
            </button>
        </div>
    }
}
