//! スキャナコンポーネント
//!
//! カメラ映像の描画先 (`#reader`) と、停止中・権限拒否・読み取り結果のオーバーレイ。

use crate::decoder::READER_ELEMENT_ID;
use leptos::prelude::*;
use qr_scan_common::{CameraState, Feedback};

#[component]
pub fn Scanner<F>(
    is_scanning: ReadSignal<bool>,
    camera_state: ReadSignal<CameraState>,
    camera_count: ReadSignal<usize>,
    feedback: ReadSignal<Option<Feedback>>,
    on_switch_camera: F,
) -> impl IntoView
where
    F: Fn(()) + 'static + Clone + Send + Sync,
{
    let can_switch = move || {
        is_scanning.get() && camera_state.get() == CameraState::Bound && camera_count.get() > 1
    };

    view! {
        <div class="scanner-container">
            <div id=READER_ELEMENT_ID></div>

            <Show when=move || !is_scanning.get()>
                <div class="scanner-overlay">
                    <p>"Scanner Paused"</p>
                </div>
            </Show>

            <Show when=move || camera_state.get() == CameraState::PermissionDenied>
                <div class="scanner-overlay scanner-denied">
                    <p>"Camera access required."</p>
                </div>
            </Show>

            {move || feedback.get().map(|f| view! {
                <div class=format!("scan-feedback scan-feedback-{}", f.kind.as_str())>
                    {f.message}
                </div>
            })}

            <Show when=can_switch>
                <button
                    class="btn-icon switch-camera"
                    title="Switch Camera"
                    on:click={
                        let on_switch_camera = on_switch_camera.clone();
                        move |_| on_switch_camera(())
                    }
                >
                    "カメラ切替"
                </button>
            </Show>
        </div>
    }
}
