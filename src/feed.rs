//! リプレイフィード
//!
//! 1行を1フレームとして読み込み、一定間隔でデコードイベントとして流す。
//! ノイズマーカーと一致する行は読み取り失敗フレーム、それ以外（空行を含む）は
//! デコード結果として扱う。

use qr_scan_common::{CameraDevice, DecodeEvent, DecodeSink, DecoderCapability};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// フィードの読み込み元
#[derive(Debug, Clone)]
pub enum FeedSource {
    Stdin,
    File(PathBuf),
}

/// ラベルからデバイス一覧を作る（IDは `replay0`, `replay1`, ...）
pub fn devices_from_labels(labels: &[String]) -> Vec<CameraDevice> {
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| CameraDevice::new(format!("replay{}", i), label.clone()))
        .collect()
}

/// 1行をデコードイベントに変換
pub fn parse_frame(line: &str, noise_marker: &str) -> DecodeEvent {
    let line = line.strip_suffix('\r').unwrap_or(line);
    if line == noise_marker {
        DecodeEvent::Noise(format!("unreadable frame ({})", noise_marker))
    } else {
        DecodeEvent::Decoded(line.to_string())
    }
}

/// フィードを再生するデコーダ
pub struct ReplayDecoder {
    devices: Vec<CameraDevice>,
    source: FeedSource,
    frame_interval: Duration,
    noise_marker: String,
    finished: Arc<Notify>,
}

impl ReplayDecoder {
    pub fn new(
        devices: Vec<CameraDevice>,
        source: FeedSource,
        fps: u32,
        noise_marker: impl Into<String>,
    ) -> Self {
        let millis = (1000 / u64::from(fps.max(1))).max(1);
        Self {
            devices,
            source,
            frame_interval: Duration::from_millis(millis),
            noise_marker: noise_marker.into(),
            finished: Arc::new(Notify::new()),
        }
    }

    /// フィードを最後まで読み終えたら通知される
    pub fn finished(&self) -> Arc<Notify> {
        self.finished.clone()
    }

    async fn open(&self) -> Result<Box<dyn AsyncBufRead + Unpin + Send>, String> {
        match &self.source {
            FeedSource::Stdin => Ok(Box::new(BufReader::new(tokio::io::stdin()))),
            FeedSource::File(path) => {
                let file = tokio::fs::File::open(path)
                    .await
                    .map_err(|e| format!("{}: {}", path.display(), e))?;
                Ok(Box::new(BufReader::new(file)))
            }
        }
    }
}

impl DecoderCapability for ReplayDecoder {
    type Handle = JoinHandle<()>;

    async fn enumerate_devices(&self) -> Result<Vec<CameraDevice>, String> {
        Ok(self.devices.clone())
    }

    async fn bind(&self, device_id: &str, sink: DecodeSink) -> Result<Self::Handle, String> {
        if !self.devices.iter().any(|d| d.id == device_id) {
            return Err(format!("unknown camera: {}", device_id));
        }

        let reader = self.open().await?;
        let interval = self.frame_interval;
        let marker = self.noise_marker.clone();
        let finished = self.finished.clone();
        let device = device_id.to_string();

        Ok(tokio::spawn(async move {
            let mut lines = reader.lines();
            let mut ticker = tokio::time::interval(interval);
            let mut frames = 0usize;
            loop {
                ticker.tick().await;
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        frames += 1;
                        if sink.unbounded_send(parse_frame(&line, &marker)).is_err() {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to read feed");
                        break;
                    }
                }
            }
            tracing::debug!(%device, frames, "feed finished");
            finished.notify_one();
        }))
    }

    async fn unbind(&self, handle: Self::Handle) -> Result<(), String> {
        handle.abort();
        match handle.await {
            Ok(()) => Ok(()),
            Err(e) if e.is_cancelled() => Ok(()),
            Err(e) => Err(e.to_string()),
        }
    }
}
