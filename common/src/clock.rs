//! 時刻の抽象化
//!
//! 重複通知の抑制やフィードバックの有効期限はミリ秒で扱う。
//! 実時刻はプラットフォーム側（CLI: chrono, Web: js_sys::Date）が提供する。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub trait Clock {
    /// 現在時刻（Unixエポックからのミリ秒）
    fn now_millis(&self) -> u64;

    /// 表示用タイムスタンプ
    fn timestamp_label(&self) -> String;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_millis(&self) -> u64 {
        (**self).now_millis()
    }

    fn timestamp_label(&self) -> String {
        (**self).timestamp_label()
    }
}

/// 手動で進めるクロック（テスト・リプレイ用）
///
/// クローンは同じ時刻を共有する。
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }

    fn timestamp_label(&self) -> String {
        format!("T{}", self.now_millis())
    }
}
