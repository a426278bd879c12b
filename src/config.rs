use crate::error::{QrScanError, Result};
use qr_scan_common::{ControllerSettings, DEFAULT_CAMERA_KEYWORDS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// スキャン結果の保存先（未設定なら ~/.config/qr-scan/scanned-codes.json）
    pub store_path: Option<PathBuf>,
    pub duplicate_window_ms: u64,
    pub scan_feedback_ms: u64,
    pub toast_ms: u64,
    /// リプレイフィードの再生速度（フレーム/秒）
    pub fps: u32,
    /// 読み取り失敗フレームを表す行
    pub noise_marker: String,
    /// 背面カメラ判定のキーワード
    pub camera_keywords: Vec<String>,
    /// 共有するURL
    pub share_url: String,
    pub beep: bool,
}

impl Default for Config {
    fn default() -> Self {
        let settings = ControllerSettings::default();
        Self {
            store_path: None,
            duplicate_window_ms: settings.duplicate_window_ms,
            scan_feedback_ms: settings.scan_feedback_ms,
            toast_ms: settings.toast_ms,
            fps: 10,
            noise_marker: "!noise".into(),
            camera_keywords: DEFAULT_CAMERA_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            share_url: "http://localhost:8080/".into(),
            beep: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| QrScanError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("qr-scan"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// スキャン結果の保存先
    pub fn resolved_store_path(&self) -> Result<PathBuf> {
        match &self.store_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join("scanned-codes.json")),
        }
    }

    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            duplicate_window_ms: self.duplicate_window_ms,
            scan_feedback_ms: self.scan_feedback_ms,
            toast_ms: self.toast_ms,
        }
    }

    pub fn set_store_path(&mut self, path: PathBuf) -> Result<()> {
        self.store_path = Some(path);
        self.save()
    }
}
