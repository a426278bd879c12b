//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Camera error: {0}")]
    Camera(#[from] CameraError),
}

/// カメラライフサイクルのエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    /// カメラが1台も列挙されなかった
    #[error("no camera devices available")]
    CameraUnavailable,

    /// カメラへのアクセスが拒否された（列挙・バインド失敗を含む）
    #[error("camera permission denied: {0}")]
    PermissionDenied(String),

    /// カメラの解放に失敗（ログのみ）
    #[error("failed to release camera: {0}")]
    StopFailure(String),

    /// 開始処理の完了前に停止された
    #[error("camera start cancelled by stop")]
    Cancelled,
}

impl CameraError {
    /// ユーザー向けメッセージ
    pub fn user_message(&self) -> &'static str {
        match self {
            CameraError::CameraUnavailable => "No cameras found.",
            CameraError::PermissionDenied(_) => {
                "Camera permission denied or error accessing camera."
            }
            CameraError::StopFailure(_) => "Failed to stop scanner.",
            CameraError::Cancelled => "Scanning stopped.",
        }
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
