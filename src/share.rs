//! ターミナル向けのクリップボード・共有
//!
//! 端末にはクリップボードも共有シートもないため、標準出力に書き出す。

use qr_scan_common::{Clipboard, ShareData, ShareSheet};
use std::io::Write;

#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutClipboard;

impl Clipboard for StdoutClipboard {
    async fn copy_text(&self, text: &str) -> Result<(), String> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{}", text).map_err(|e| e.to_string())
    }
}

/// 共有シートなし（常にURLコピーにフォールバック）
#[derive(Debug, Clone, Copy, Default)]
pub struct NoShareSheet;

impl ShareSheet for NoShareSheet {
    fn is_available(&self) -> bool {
        false
    }

    async fn share(&self, _data: &ShareData) -> Result<(), String> {
        Err("share sheet is not available in a terminal".into())
    }
}
