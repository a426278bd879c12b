//! メインアプリケーションコンポーネント
//!
//! コントローラとカメラセッションは `StoredValue` に置き、
//! 画面に出す値（結果一覧・フィードバック・トースト・カメラ状態）だけをシグナルにする。

use crate::components::{
    controls::Controls, header::Header, result_list::ResultList, scanner::Scanner,
};
use crate::decoder::Html5QrcodeDecoder;
use crate::platform::{
    console_error, console_warn, page_url, BrowserClipboard, BrowserShareSheet, JsClock,
    LocalStoragePersistence, WebBeep,
};
use crate::bridge;
use futures::StreamExt;
use gloo::timers::callback::Timeout;
use leptos::prelude::*;
use leptos::task::spawn_local;
use qr_scan_common::controller::{COPIED_ALL_MESSAGE, STORE_UNREADABLE_MESSAGE};
use qr_scan_common::export::CSV_MIME_TYPE;
use qr_scan_common::{
    copy_all_text, share_app, to_csv, CameraError, CameraSession, CameraState, Clipboard,
    ControllerSettings, Feedback, FeedbackKind, ScanController, ScanOutcome, ShareData,
    CSV_FILE_NAME,
};
use std::rc::Rc;

type Controller = ScanController<LocalStoragePersistence, WebBeep, JsClock>;
type Session = CameraSession<Html5QrcodeDecoder>;

/// `ms` 後に表示を更新する
fn refresh_after(ms: u64, refresh: impl Fn() + 'static) {
    Timeout::new(ms.min(u64::from(u32::MAX)) as u32, refresh).forget();
}

/// カメラ操作の失敗後もスキャン中の表示を続けるか
///
/// 後続の操作に取り消されただけなら表示はその操作に任せる。
fn keeps_scanning(err: &CameraError) -> bool {
    *err == CameraError::Cancelled
}

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let settings = ControllerSettings::default();
    let initial: Controller =
        ScanController::new(LocalStoragePersistence::default(), WebBeep, JsClock, settings);
    let controller = StoredValue::new_local(initial);
    let (session, mut events) = CameraSession::new(Html5QrcodeDecoder::default());
    let session = StoredValue::new_local(Rc::new(session));

    // アプリケーション状態
    let (records, set_records) = signal(controller.with_value(|c| c.records().to_vec()));
    let (feedback, set_feedback) = signal(None::<Feedback>);
    let (toast, set_toast) = signal(None::<Feedback>);
    let (is_scanning, set_is_scanning) = signal(false);
    let (camera_state, set_camera_state) = signal(CameraState::Idle);
    let (camera_count, set_camera_count) = signal(0usize);

    // コントローラの内容を画面に反映（期限切れの通知はここで消える）
    let sync = move || {
        controller.with_value(|c| {
            set_records.set(c.records().to_vec());
            set_feedback.set(c.feedback().cloned());
            set_toast.set(c.toast().cloned());
        });
    };

    let show_toast = move |message: &str, kind: FeedbackKind| {
        controller.update_value(|c| c.notify(message, kind));
        sync();
        refresh_after(settings.toast_ms, sync);
    };

    let sync_camera = move |session: &Session| {
        set_camera_state.set(session.state());
        set_camera_count.set(session.devices().len());
    };

    // デコードイベントを到着順に処理
    spawn_local(async move {
        while let Some(event) = events.next().await {
            let mut outcome = ScanOutcome::Ignored;
            controller.update_value(|c| outcome = c.on_event(event));
            if outcome != ScanOutcome::Ignored {
                sync();
                refresh_after(settings.scan_feedback_ms, sync);
            }
        }
    });

    // 保存データが読めなかった場合は上書きせずに知らせる
    if controller.with_value(|c| c.persistence_disabled()) {
        console_error("保存済みの結果を読み込めませんでした");
        show_toast(STORE_UNREADABLE_MESSAGE, FeedbackKind::Error);
    }

    let report_camera_error = move |err: CameraError| {
        if keeps_scanning(&err) {
            return;
        }
        set_is_scanning.set(false);
        console_error(&err.to_string());
        show_toast(err.user_message(), FeedbackKind::Error);
    };

    // スキャン開始・停止
    let on_toggle_scan = move |_: ()| {
        let session = session.get_value();
        if is_scanning.get_untracked() {
            set_is_scanning.set(false);
            spawn_local(async move {
                session.stop().await;
                sync_camera(&session);
            });
        } else {
            set_is_scanning.set(true);
            set_camera_state.set(CameraState::Requesting);
            spawn_local(async move {
                let result = session.start(None).await;
                sync_camera(&session);
                if let Err(e) = result {
                    report_camera_error(e);
                }
            });
        }
    };

    let on_switch_camera = move |_: ()| {
        let session = session.get_value();
        spawn_local(async move {
            let result = session.switch_camera().await;
            sync_camera(&session);
            if let Err(e) = result {
                report_camera_error(e);
            }
        });
    };

    let on_delete = move |id: u64| {
        controller.update_value(|c| {
            c.delete(id);
        });
        sync();
    };

    let on_clear_all = move |_: ()| {
        controller.update_value(|c| {
            c.clear_all();
        });
        sync();
        refresh_after(settings.toast_ms, sync);
    };

    let on_copy = move |text: String| {
        spawn_local(async move {
            if let Err(e) = BrowserClipboard.copy_text(&text).await {
                console_warn(&format!("コピー失敗: {}", e));
            }
        });
    };

    let on_copy_all = move |_: ()| {
        let text = controller.with_value(|c| copy_all_text(c.records()));
        spawn_local(async move {
            match BrowserClipboard.copy_text(&text).await {
                Ok(()) => show_toast(COPIED_ALL_MESSAGE, FeedbackKind::Info),
                Err(e) => console_warn(&format!("コピー失敗: {}", e)),
            }
        });
    };

    let on_download = move |_: ()| {
        let csv = controller.with_value(|c| to_csv(c.records()));
        bridge::download_text_js(&csv, CSV_FILE_NAME, CSV_MIME_TYPE);
    };

    let on_share = move |_: ()| {
        spawn_local(async move {
            let data = ShareData::app(page_url());
            let outcome = share_app(&BrowserShareSheet, &BrowserClipboard, &data).await;
            if let Some(message) = outcome.toast_message() {
                show_toast(message, FeedbackKind::Info);
            }
        });
    };

    let has_results = Signal::derive(move || records.with(|r| !r.is_empty()));

    view! {
        <div class="container">
            <Header on_share=on_share />

            <Scanner
                is_scanning=is_scanning
                camera_state=camera_state
                camera_count=camera_count
                feedback=feedback
                on_switch_camera=on_switch_camera
            />

            <Controls
                is_scanning=is_scanning
                has_results=has_results
                on_toggle_scan=on_toggle_scan
                on_download=on_download
                on_copy_all=on_copy_all
            />

            <ResultList
                results=records
                on_delete=on_delete
                on_copy=on_copy
                on_clear_all=on_clear_all
            />

            {move || toast.get().map(|t| view! {
                <div class=format!("toast toast-{}", t.kind.as_str())>{t.message}</div>
            })}
        </div>
    }
}
