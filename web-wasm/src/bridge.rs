//! JavaScript Bridge バインディング
//!
//! html5-qrcode・WebAudio・クリップボード・共有シートは JavaScript 側に委譲する。

use qr_scan_common::CameraDevice;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ============================================
// データ型定義
// ============================================

/// スキャン領域のサイズ
#[derive(Debug, Clone, Copy, Serialize)]
pub struct QrBox {
    pub width: u32,
    pub height: u32,
}

/// html5-qrcode に渡すスキャン設定
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScannerConfig {
    pub fps: u32,
    pub qrbox: QrBox,
    pub aspect_ratio: f32,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            fps: 10,
            qrbox: QrBox {
                width: 250,
                height: 250,
            },
            aspect_ratio: 1.0,
        }
    }
}

impl ScannerConfig {
    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string(self).map_err(|e| format!("JSON serialization failed: {}", e))
    }
}

// ============================================
// JavaScript関数のextern宣言
// ============================================

#[wasm_bindgen(module = "/js/scanner-bridge.js")]
extern "C" {
    /// カメラを列挙（`{ id, label }` の配列）
    #[wasm_bindgen(js_name = "listCameras", catch)]
    async fn list_cameras_js() -> Result<JsValue, JsValue>;

    /// スキャナを起動し、Html5Qrcode インスタンスを返す
    ///
    /// # Arguments
    /// * `element_id` - 映像を描画する要素のID
    /// * `camera_id` - 使用するカメラのID
    /// * `config_json` - ScannerConfigのJSON文字列
    /// * `on_decoded` - 読み取り成功時のコールバック
    /// * `on_noise` - フレーム単位の読み取り失敗時のコールバック
    #[wasm_bindgen(js_name = "startScanner", catch)]
    pub async fn start_scanner_js(
        element_id: &str,
        camera_id: &str,
        config_json: &str,
        on_decoded: &Closure<dyn FnMut(String)>,
        on_noise: &Closure<dyn FnMut(String)>,
    ) -> Result<JsValue, JsValue>;

    /// スキャナを停止
    #[wasm_bindgen(js_name = "stopScanner", catch)]
    pub async fn stop_scanner_js(scanner: &JsValue) -> Result<JsValue, JsValue>;

    /// 確認音 (880Hz, 0.1秒)
    #[wasm_bindgen(js_name = "playBeep")]
    pub fn play_beep_js();

    /// ロケール形式の現在時刻
    #[wasm_bindgen(js_name = "timestampLabel")]
    pub fn timestamp_label_js() -> String;

    #[wasm_bindgen(js_name = "copyText", catch)]
    async fn copy_text_js(text: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_name = "canShare")]
    pub fn can_share_js() -> bool;

    #[wasm_bindgen(js_name = "shareApp", catch)]
    async fn share_app_js(title: &str, text: &str, url: &str) -> Result<JsValue, JsValue>;

    /// テキストをファイルとしてダウンロード
    #[wasm_bindgen(js_name = "downloadText")]
    pub fn download_text_js(text: &str, filename: &str, mime_type: &str);
}

// ============================================
// ヘルパー関数
// ============================================

/// JS側のエラー値を文字列に
pub fn js_error_message(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

pub async fn list_cameras() -> Result<Vec<CameraDevice>, String> {
    let value = list_cameras_js().await.map_err(|e| js_error_message(&e))?;
    serde_wasm_bindgen::from_value(value).map_err(|e| format!("カメラ一覧の変換失敗: {}", e))
}

pub async fn copy_text(text: &str) -> Result<(), String> {
    copy_text_js(text)
        .await
        .map(|_| ())
        .map_err(|e| js_error_message(&e))
}

pub async fn share_app(title: &str, text: &str, url: &str) -> Result<(), String> {
    share_app_js(title, text, url)
        .await
        .map(|_| ())
        .map_err(|e| js_error_message(&e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scanner_config_defaults() {
        let config = ScannerConfig::default();
        assert_eq!(config.fps, 10);
        assert_eq!(config.qrbox.width, 250);
        assert_eq!(config.qrbox.height, 250);
        assert!((config.aspect_ratio - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_scanner_config_json() {
        let json = ScannerConfig::default().to_json().expect("JSON変換失敗");

        // camelCase変換の確認
        assert!(json.contains("\"fps\":10"));
        assert!(json.contains("\"qrbox\":{\"width\":250,\"height\":250}"));
        assert!(json.contains("\"aspectRatio\":1.0"));
    }
}
