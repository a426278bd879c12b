//! QR Scan Common Library
//!
//! CLIとWeb(WASM)で共有されるスキャンセッションのコア

pub mod types;
pub mod error;
pub mod clock;
pub mod store;
pub mod controller;
pub mod camera;
pub mod export;
pub mod share;
pub mod link;

pub use types::{CameraDevice, Feedback, FeedbackKind, ScanRecord};
pub use error::{CameraError, Error, Result};
pub use clock::{Clock, ManualClock};
pub use store::{MemoryPersistence, Persistence, ResultStore};
pub use controller::{AudioCue, ControllerSettings, ScanController, ScanOutcome, Silent};
pub use camera::{
    select_default_camera, CameraSession, CameraState, DecodeEvent, DecodeEvents, DecodeSink,
    DecoderCapability, Permission, DEFAULT_CAMERA_KEYWORDS,
};
pub use export::{copy_all_text, to_csv, CSV_FILE_NAME};
pub use share::{share_app, Clipboard, ShareData, ShareOutcome, ShareSheet};
pub use link::is_url;
