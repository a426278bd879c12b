//! html5-qrcode デコーダ
//!
//! `startScanner` で起動したインスタンスと、JS側に渡したコールバックを
//! 1つのハンドルとして保持する。ハンドルを解放するまでコールバックは生きている。

use crate::bridge::{self, ScannerConfig};
use qr_scan_common::{CameraDevice, DecodeEvent, DecodeSink, DecoderCapability};
use wasm_bindgen::prelude::*;

/// 映像を描画する要素のID
pub const READER_ELEMENT_ID: &str = "reader";

/// バインド中のスキャナ
pub struct ScannerHandle {
    scanner: JsValue,
    _on_decoded: Closure<dyn FnMut(String)>,
    _on_noise: Closure<dyn FnMut(String)>,
}

pub struct Html5QrcodeDecoder {
    element_id: String,
    config: ScannerConfig,
}

impl Html5QrcodeDecoder {
    pub fn new(element_id: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
            config: ScannerConfig::default(),
        }
    }
}

impl Default for Html5QrcodeDecoder {
    fn default() -> Self {
        Self::new(READER_ELEMENT_ID)
    }
}

impl DecoderCapability for Html5QrcodeDecoder {
    type Handle = ScannerHandle;

    async fn enumerate_devices(&self) -> Result<Vec<CameraDevice>, String> {
        bridge::list_cameras().await
    }

    async fn bind(&self, device_id: &str, sink: DecodeSink) -> Result<Self::Handle, String> {
        let config_json = self.config.to_json()?;

        let decoded_sink = sink.clone();
        let on_decoded = Closure::wrap(Box::new(move |text: String| {
            let _ = decoded_sink.unbounded_send(DecodeEvent::Decoded(text));
        }) as Box<dyn FnMut(String)>);

        let on_noise = Closure::wrap(Box::new(move |detail: String| {
            let _ = sink.unbounded_send(DecodeEvent::Noise(detail));
        }) as Box<dyn FnMut(String)>);

        let scanner = bridge::start_scanner_js(
            &self.element_id,
            device_id,
            &config_json,
            &on_decoded,
            &on_noise,
        )
        .await
        .map_err(|e| bridge::js_error_message(&e))?;

        Ok(ScannerHandle {
            scanner,
            _on_decoded: on_decoded,
            _on_noise: on_noise,
        })
    }

    async fn unbind(&self, handle: Self::Handle) -> Result<(), String> {
        bridge::stop_scanner_js(&handle.scanner)
            .await
            .map(|_| ())
            .map_err(|e| bridge::js_error_message(&e))
    }
}
