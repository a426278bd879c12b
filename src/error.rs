use thiserror::Error;

#[derive(Error, Debug)]
pub enum QrScanError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("フィードファイルが見つかりません: {0}")]
    FeedNotFound(String),

    #[error("スキャン結果が見つかりません: id={0}")]
    RecordNotFound(u64),

    #[error("カメラエラー: {0}")]
    Camera(#[from] qr_scan_common::CameraError),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] qr_scan_common::Error),
}

pub type Result<T> = std::result::Result<T, QrScanError>;
