//! カメラセッション管理
//!
//! デコーダ（外部ライブラリ）とカメラデバイスのバインドを管理する。
//!
//! - 状態遷移: `Idle → Requesting → Bound ⇄ Switching → Bound`,
//!   `Requesting → PermissionDenied`, 停止で常に `Idle`
//! - 開始・停止・切替は1つずつ順番に実行される（同時に2つのバインドは作らない）
//! - 開始処理中に停止された場合、遅れて完了したバインドは即座に解放する

use crate::error::CameraError;
use crate::types::CameraDevice;
use futures::channel::mpsc;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

/// 背面カメラを示すラベルのキーワード
pub const DEFAULT_CAMERA_KEYWORDS: &[&str] = &["back", "rear", "environment"];

/// デコーダから届くイベント
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeEvent {
    /// 読み取り成功
    Decoded(String),
    /// フレーム単位の読み取り失敗（無視する）
    Noise(String),
}

pub type DecodeSink = mpsc::UnboundedSender<DecodeEvent>;
pub type DecodeEvents = mpsc::UnboundedReceiver<DecodeEvent>;

/// デコーダ（カメラ + QR読み取り）の抽象化
#[allow(async_fn_in_trait)]
pub trait DecoderCapability {
    /// バインド中のデコードを表すハンドル
    type Handle;

    /// 利用可能なカメラを列挙
    async fn enumerate_devices(&self) -> Result<Vec<CameraDevice>, String>;

    /// デバイスにバインドし、連続デコードを開始する
    ///
    /// 読み取り結果・ノイズは `sink` に送る。
    async fn bind(&self, device_id: &str, sink: DecodeSink) -> Result<Self::Handle, String>;

    /// バインドを解放し、デコードを停止する
    async fn unbind(&self, handle: Self::Handle) -> Result<(), String>;
}

/// カメラセッションの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraState {
    Idle,
    Requesting,
    Bound,
    Switching,
    PermissionDenied,
}

impl CameraState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CameraState::Idle => "idle",
            CameraState::Requesting => "requesting",
            CameraState::Bound => "bound",
            CameraState::Switching => "switching",
            CameraState::PermissionDenied => "permission-denied",
        }
    }
}

/// カメラ権限
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Permission {
    #[default]
    Unknown,
    Granted,
    Denied,
}

/// ラベルからデフォルトのカメラを選ぶ
///
/// キーワードを含む最初のデバイス、なければ先頭。
pub fn select_default_camera<S: AsRef<str>>(devices: &[CameraDevice], keywords: &[S]) -> usize {
    devices
        .iter()
        .position(|d| {
            let label = d.label.to_lowercase();
            keywords
                .iter()
                .any(|k| label.contains(&k.as_ref().to_lowercase()))
        })
        .unwrap_or(0)
}

struct Binding<H> {
    device_id: String,
    handle: H,
}

struct Inner<H> {
    state: CameraState,
    permission: Permission,
    devices: Vec<CameraDevice>,
    current_index: Option<usize>,
    binding: Option<Binding<H>>,
}

/// カメラセッション
///
/// 唯一のバインドを所有する。操作は `&self` で呼べるが、
/// 内部のガードで1つずつ直列に実行される。
pub struct CameraSession<C: DecoderCapability> {
    capability: C,
    sink: DecodeSink,
    keywords: Vec<String>,
    op_guard: futures::lock::Mutex<()>,
    epoch: AtomicU64,
    inner: Mutex<Inner<C::Handle>>,
}

impl<C: DecoderCapability> CameraSession<C> {
    /// セッションとデコードイベントの受信側を作成
    pub fn new(capability: C) -> (Self, DecodeEvents) {
        let (sink, events) = mpsc::unbounded();
        let session = Self {
            capability,
            sink,
            keywords: DEFAULT_CAMERA_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            op_guard: futures::lock::Mutex::new(()),
            epoch: AtomicU64::new(0),
            inner: Mutex::new(Inner {
                state: CameraState::Idle,
                permission: Permission::Unknown,
                devices: Vec::new(),
                current_index: None,
                binding: None,
            }),
        };
        (session, events)
    }

    /// 背面カメラ判定のキーワードを差し替える
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn capability(&self) -> &C {
        &self.capability
    }

    pub fn state(&self) -> CameraState {
        self.inner().state
    }

    pub fn permission(&self) -> Permission {
        self.inner().permission
    }

    pub fn is_bound(&self) -> bool {
        self.inner().binding.is_some()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.inner().current_index
    }

    /// 最後に列挙したデバイス
    pub fn devices(&self) -> Vec<CameraDevice> {
        self.inner().devices.clone()
    }

    /// バインド中のデバイスID
    pub fn bound_device(&self) -> Option<String> {
        self.inner().binding.as_ref().map(|b| b.device_id.clone())
    }

    /// デバイスを列挙してキャッシュを更新
    pub async fn enumerate_devices(&self) -> Result<Vec<CameraDevice>, CameraError> {
        let devices = self
            .capability
            .enumerate_devices()
            .await
            .map_err(CameraError::PermissionDenied)?;
        self.inner().devices = devices.clone();
        Ok(devices)
    }

    /// スキャンを開始
    ///
    /// `device_index` が `None` の場合、初回は背面カメラを、以降は現在のカメラを使う。
    /// 既に同じデバイスにバインド済みなら何もしない。
    pub fn start(
        &self,
        device_index: Option<usize>,
    ) -> impl Future<Output = Result<(), CameraError>> + '_ {
        let epoch = self.epoch.load(Ordering::SeqCst);
        async move {
            let _op = self.op_guard.lock().await;
            self.start_locked(device_index, epoch).await
        }
    }

    /// スキャンを停止
    ///
    /// 呼び出した時点で進行中・待機中の開始処理は取り消され、
    /// 遅れて完了したバインドも解放される。
    /// 解放の失敗はログのみで、停止済みとして扱う。
    pub fn stop(&self) -> impl Future<Output = ()> + '_ {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        async move {
            let _op = self.op_guard.lock().await;
            self.release_binding().await;
            self.set_state(CameraState::Idle);
        }
    }

    /// 次のカメラに切り替える
    ///
    /// デバイスが2台未満なら何もしない。停止中はインデックスだけ進める。
    pub fn switch_camera(&self) -> impl Future<Output = Result<(), CameraError>> + '_ {
        let epoch = self.epoch.load(Ordering::SeqCst);
        async move {
            let _op = self.op_guard.lock().await;
            self.switch_locked(epoch).await
        }
    }

    async fn switch_locked(&self, epoch: u64) -> Result<(), CameraError> {
        let (count, next, bound) = {
            let inner = self.inner();
            let count = inner.devices.len();
            let next = inner.current_index.map_or(0, |i| (i + 1) % count.max(1));
            (count, next, inner.binding.is_some())
        };
        if count < 2 {
            return Ok(());
        }
        if !bound {
            self.inner().current_index = Some(next);
            return Ok(());
        }

        tracing::info!(index = next, "switching camera");
        self.set_state(CameraState::Switching);
        self.release_binding().await;
        self.start_locked(Some(next), epoch).await
    }

    async fn start_locked(
        &self,
        device_index: Option<usize>,
        epoch: u64,
    ) -> Result<(), CameraError> {
        if self.epoch.load(Ordering::SeqCst) != epoch {
            return Err(CameraError::Cancelled);
        }
        self.set_state(CameraState::Requesting);

        let devices = match self.capability.enumerate_devices().await {
            Ok(devices) if !devices.is_empty() => devices,
            Ok(_) => {
                self.release_binding().await;
                return Err(self.deny(CameraError::CameraUnavailable));
            }
            Err(e) => {
                self.release_binding().await;
                return Err(self.deny(CameraError::PermissionDenied(e)));
            }
        };

        let (index, bound_to) = {
            let mut inner = self.inner();
            let last = devices.len() - 1;
            let index = match (device_index, inner.current_index) {
                (Some(i), _) | (None, Some(i)) => i.min(last),
                (None, None) => select_default_camera(&devices, &self.keywords[..]),
            };
            inner.devices = devices.clone();
            inner.current_index = Some(index);
            inner.permission = Permission::Granted;
            (index, inner.binding.as_ref().map(|b| b.device_id.clone()))
        };
        let device = &devices[index];

        match bound_to {
            Some(id) if id == device.id => {
                self.set_state(CameraState::Bound);
                return Ok(());
            }
            Some(_) => self.release_binding().await,
            None => {}
        }

        let handle = match self.capability.bind(&device.id, self.sink.clone()).await {
            Ok(handle) => handle,
            Err(e) => return Err(self.deny(CameraError::PermissionDenied(e))),
        };

        if self.epoch.load(Ordering::SeqCst) != epoch {
            tracing::debug!(device = %device.label, "stop requested during start, releasing camera");
            if let Err(e) = self.capability.unbind(handle).await {
                tracing::warn!(error = %CameraError::StopFailure(e), "failed to release late binding");
            }
            self.set_state(CameraState::Idle);
            return Err(CameraError::Cancelled);
        }

        let mut inner = self.inner();
        inner.binding = Some(Binding {
            device_id: device.id.clone(),
            handle,
        });
        inner.state = CameraState::Bound;
        tracing::info!(device = %device.label, index, "camera bound");
        Ok(())
    }

    async fn release_binding(&self) {
        let binding = self.inner().binding.take();
        if let Some(binding) = binding {
            match self.capability.unbind(binding.handle).await {
                Ok(()) => tracing::debug!(device = %binding.device_id, "camera released"),
                Err(e) => tracing::warn!(
                    error = %CameraError::StopFailure(e),
                    device = %binding.device_id,
                    "failed to stop scanner"
                ),
            }
        }
    }

    fn deny(&self, error: CameraError) -> CameraError {
        let mut inner = self.inner();
        inner.state = CameraState::PermissionDenied;
        inner.permission = Permission::Denied;
        tracing::warn!(error = %error, "camera unavailable");
        error
    }

    fn set_state(&self, state: CameraState) {
        self.inner().state = state;
    }

    fn inner(&self) -> MutexGuard<'_, Inner<C::Handle>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
