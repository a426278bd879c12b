//! スキャンループ
//!
//! カメラセッションを開始し、デコードイベントを1件ずつコントローラに渡す。
//! 終了要求（フィード終端・Ctrl-C）が来たら、届いている分を処理してから停止する。

use crate::error::Result;
use futures::StreamExt;
use qr_scan_common::{
    AudioCue, CameraSession, Clock, DecodeEvents, DecoderCapability, Feedback, FeedbackKind,
    Persistence, ScanController, ScanOutcome,
};
use std::future::Future;

/// スキャン結果の集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub added: usize,
    pub duplicates: usize,
    pub noise: usize,
}

impl ScanSummary {
    fn record(&mut self, outcome: &ScanOutcome) {
        match outcome {
            ScanOutcome::Added(_) => self.added += 1,
            ScanOutcome::Duplicate { .. } => self.duplicates += 1,
            ScanOutcome::Ignored => self.noise += 1,
        }
    }
}

pub async fn run_scan<C, P, A, K, F, R>(
    camera: &CameraSession<C>,
    events: &mut DecodeEvents,
    controller: &mut ScanController<P, A, K>,
    camera_index: Option<usize>,
    shutdown: F,
    mut report: R,
) -> Result<ScanSummary>
where
    C: DecoderCapability,
    P: Persistence,
    A: AudioCue,
    K: Clock,
    F: Future<Output = ()>,
    R: FnMut(&ScanOutcome, Option<&Feedback>),
{
    if let Err(e) = camera.start(camera_index).await {
        controller.notify(e.user_message(), FeedbackKind::Error);
        return Err(e.into());
    }

    let mut summary = ScanSummary::default();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;
            event = events.next() => match event {
                Some(event) => {
                    let outcome = controller.on_event(event);
                    summary.record(&outcome);
                    report(&outcome, controller.feedback());
                }
                None => break,
            },
            _ = &mut shutdown => break,
        }
    }

    // 終了要求の時点で届いていたイベント
    while let Ok(Some(event)) = events.try_next() {
        let outcome = controller.on_event(event);
        summary.record(&outcome);
        report(&outcome, controller.feedback());
    }

    camera.stop().await;
    tracing::info!(
        added = summary.added,
        duplicates = summary.duplicates,
        noise = summary.noise,
        "scan session finished"
    );
    Ok(summary)
}
