//! ブラウザ向けの Clock / AudioCue / Clipboard / ShareSheet / Persistence 実装

use crate::bridge;
use gloo::storage::errors::StorageError;
use gloo::storage::{LocalStorage, Storage};
use qr_scan_common::{
    AudioCue, Clipboard, Clock, Error, Persistence, Result, ScanRecord, ShareData, ShareSheet,
};

/// localStorage のキー
pub const STORAGE_KEY: &str = "qr-scanned-codes";

/// `Date.now()` と `toLocaleString()` による時計
#[derive(Debug, Clone, Copy, Default)]
pub struct JsClock;

impl Clock for JsClock {
    fn now_millis(&self) -> u64 {
        js_sys::Date::now() as u64
    }

    fn timestamp_label(&self) -> String {
        bridge::timestamp_label_js()
    }
}

/// WebAudio の確認音
#[derive(Debug, Clone, Copy, Default)]
pub struct WebBeep;

impl AudioCue for WebBeep {
    fn play_confirmation_tone(&self) {
        bridge::play_beep_js();
    }
}

/// `navigator.clipboard`
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserClipboard;

impl Clipboard for BrowserClipboard {
    async fn copy_text(&self, text: &str) -> std::result::Result<(), String> {
        bridge::copy_text(text).await
    }
}

/// `navigator.share`
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserShareSheet;

impl ShareSheet for BrowserShareSheet {
    fn is_available(&self) -> bool {
        bridge::can_share_js()
    }

    async fn share(&self, data: &ShareData) -> std::result::Result<(), String> {
        bridge::share_app(&data.title, &data.text, &data.url).await
    }
}

/// localStorage への永続化
#[derive(Debug, Clone)]
pub struct LocalStoragePersistence {
    key: String,
}

impl LocalStoragePersistence {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl Default for LocalStoragePersistence {
    fn default() -> Self {
        Self::new(STORAGE_KEY)
    }
}

impl Persistence for LocalStoragePersistence {
    fn load(&self) -> Result<Vec<ScanRecord>> {
        match LocalStorage::get::<Vec<ScanRecord>>(&self.key) {
            Ok(records) => Ok(records),
            Err(StorageError::KeyNotFound(_)) => Ok(Vec::new()),
            Err(StorageError::SerdeError(e)) => Err(Error::Json(e)),
            Err(e) => Err(Error::Persistence(e.to_string())),
        }
    }

    fn save(&self, records: &[ScanRecord]) -> Result<()> {
        LocalStorage::set(&self.key, records).map_err(|e| Error::Persistence(e.to_string()))
    }
}

/// 現在のページURL（共有用）
pub fn page_url() -> String {
    web_sys::window()
        .and_then(|w| w.location().href().ok())
        .unwrap_or_default()
}

/// ブラウザのコンソールに出力
pub fn console_warn(message: &str) {
    web_sys::console::warn_1(&message.into());
}

pub fn console_error(message: &str) {
    web_sys::console::error_1(&message.into());
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn wasm_local_storage_roundtrip() {
        let persistence = LocalStoragePersistence::new("qr-scanned-codes-test");
        LocalStorage::delete("qr-scanned-codes-test");
        assert!(persistence.load().unwrap().is_empty());

        let records = vec![ScanRecord {
            id: 1,
            text: "https://example.com".to_string(),
            timestamp: "1/1/2025, 10:00:00 AM".to_string(),
        }];
        persistence.save(&records).unwrap();
        assert_eq!(persistence.load().unwrap(), records);
        LocalStorage::delete("qr-scanned-codes-test");
    }
}
