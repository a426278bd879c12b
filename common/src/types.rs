//! スキャン結果・カメラ・フィードバックの型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - ScanRecord: 保存されるスキャン結果
//! - CameraDevice: 列挙されたカメラ
//! - Feedback: 一定時間で消える通知

use serde::{Deserialize, Serialize};

/// スキャン結果1件
///
/// フィールド名はそのまま永続化フォーマットになる（id, text, timestamp）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRecord {
    /// 生成時刻ベースのID（セッション内で一意）
    pub id: u64,
    /// デコードされた内容（空文字列も有効）
    pub text: String,
    /// 表示用のスキャン時刻
    pub timestamp: String,
}

/// カメラデバイス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraDevice {
    pub id: String,
    pub label: String,
}

impl CameraDevice {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// フィードバック種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    /// 新規スキャン
    Success,
    /// スキャン済みのコード
    Duplicate,
    /// 一般的なトースト
    Info,
    /// カメラエラー等
    Error,
}

impl FeedbackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackKind::Success => "success",
            FeedbackKind::Duplicate => "duplicate",
            FeedbackKind::Info => "info",
            FeedbackKind::Error => "error",
        }
    }
}

/// 自動で消える通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub message: String,
    pub kind: FeedbackKind,
    /// 表示終了時刻（ミリ秒）
    pub expires_at_ms: u64,
}

impl Feedback {
    /// `now_ms` の時点でまだ表示すべきか
    pub fn is_active(&self, now_ms: u64) -> bool {
        now_ms < self.expires_at_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_record_field_names() {
        let record = ScanRecord {
            id: 1700000000000,
            text: "hello".to_string(),
            timestamp: "2026/10/16 10:00:00".to_string(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"id":1700000000000,"text":"hello","timestamp":"2026/10/16 10:00:00"}"#
        );
    }

    #[test]
    fn test_scan_record_from_browser_storage() {
        // ブラウザ版が localStorage に書いた形式
        let json = r#"[{"id":1731234567890,"text":"https://example.com","timestamp":"11/10/2024, 3:42:47 PM"}]"#;
        let records: Vec<ScanRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, 1731234567890);
        assert_eq!(records[0].timestamp, "11/10/2024, 3:42:47 PM");
    }

    #[test]
    fn test_feedback_expiry() {
        let feedback = Feedback {
            message: "Scan successful!".to_string(),
            kind: FeedbackKind::Success,
            expires_at_ms: 2000,
        };
        assert!(feedback.is_active(0));
        assert!(feedback.is_active(1999));
        assert!(!feedback.is_active(2000));
    }

    #[test]
    fn test_feedback_kind_as_str() {
        assert_eq!(FeedbackKind::Success.as_str(), "success");
        assert_eq!(FeedbackKind::Duplicate.as_str(), "duplicate");
        assert_eq!(FeedbackKind::Error.as_str(), "error");
    }
}
