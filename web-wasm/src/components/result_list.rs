//! スキャン結果一覧コンポーネント

use gloo::timers::callback::Timeout;
use leptos::prelude::*;
use qr_scan_common::{is_url, ScanRecord};

/// コピー済み表示の時間
const COPIED_MARK_MS: u32 = 2000;

/// 件数の表示 ("1 Item", "3 Items")
pub fn item_count_label(count: usize) -> String {
    if count == 1 {
        "1 Item".to_string()
    } else {
        format!("{} Items", count)
    }
}

#[component]
pub fn ResultList<FD, FC, FA>(
    results: ReadSignal<Vec<ScanRecord>>,
    on_delete: FD,
    on_copy: FC,
    on_clear_all: FA,
) -> impl IntoView
where
    FD: Fn(u64) + 'static + Clone + Send + Sync,
    FC: Fn(String) + 'static + Clone + Send + Sync,
    FA: Fn(()) + 'static + Clone + Send + Sync,
{
    let (copied_id, set_copied_id) = signal(None::<u64>);

    view! {
        <div class="result-list">
            <Show
                when=move || !results.get().is_empty()
                fallback=|| view! {
                    <div class="empty-state">
                        <p>"No codes scanned yet."</p>
                        <p class="text-muted">"Start scanning to build your list."</p>
                    </div>
                }
            >
                <div class="list-header">
                    <span class="list-count">{move || item_count_label(results.get().len())}</span>
                    <button
                        class="btn-text"
                        on:click={
                            let on_clear_all = on_clear_all.clone();
                            move |_| on_clear_all(())
                        }
                    >
                        "Clear All"
                    </button>
                </div>
                <div class="scan-items">
                    <For
                        each=move || results.get()
                        key=|item| item.id
                        children={
                            let on_delete = on_delete.clone();
                            let on_copy = on_copy.clone();
                            move |item| {
                                let on_delete = on_delete.clone();
                                let on_copy = on_copy.clone();
                                view! {
                                    <ScanItem
                                        item=item
                                        copied_id=copied_id
                                        set_copied_id=set_copied_id
                                        on_delete=on_delete
                                        on_copy=on_copy
                                    />
                                }
                            }
                        }
                    />
                </div>
            </Show>
        </div>
    }
}

#[component]
fn ScanItem<FD, FC>(
    item: ScanRecord,
    copied_id: ReadSignal<Option<u64>>,
    set_copied_id: WriteSignal<Option<u64>>,
    on_delete: FD,
    on_copy: FC,
) -> impl IntoView
where
    FD: Fn(u64) + 'static + Clone + Send + Sync,
    FC: Fn(String) + 'static + Clone + Send + Sync,
{
    let id = item.id;
    let link = is_url(&item.text).then(|| item.text.clone());
    let text = item.text.clone();

    let handle_copy = move |_: leptos::ev::MouseEvent| {
        on_copy(text.clone());
        set_copied_id.set(Some(id));
        Timeout::new(COPIED_MARK_MS, move || {
            set_copied_id.update(|current| {
                if *current == Some(id) {
                    *current = None;
                }
            });
        })
        .forget();
    };

    view! {
        <div class="scan-item">
            <div class="scan-content">
                <div class="scan-text" title=item.text.clone()>{item.text.clone()}</div>
                <div class="scan-meta">{item.timestamp.clone()}</div>
            </div>
            <div class="scan-actions">
                {link.map(|href| view! {
                    <a href=href target="_blank" rel="noopener noreferrer" class="btn-icon" title="Open URL">
                        "開く"
                    </a>
                })}
                <button class="btn-icon" title="Copy text" on:click=handle_copy>
                    {move || if copied_id.get() == Some(id) { "✓" } else { "コピー" }}
                </button>
                <button class="btn-icon btn-delete" title="Delete item" on:click=move |_| on_delete(id)>
                    "削除"
                </button>
            </div>
        </div>
    }
}
