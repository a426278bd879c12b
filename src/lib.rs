//! QR Scan CLI
//!
//! 共通コア（qr-scan-common）をネイティブ環境で動かすための実装:
//! ファイル保存・リプレイフィード・ターミナルベル・設定ファイル

pub mod audio;
pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod feed;
pub mod scan;
pub mod share;
pub mod storage;
