use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "qr-scan")]
#[command(about = "QRコード連続スキャン・重複検出・CSV出力ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// スキャン結果の保存先（設定より優先）
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// カメラ（リプレイフィード）からスキャン
    Scan {
        /// フィードファイル（省略時は標準入力）
        #[arg(short, long)]
        feed: Option<PathBuf>,

        /// 使用するカメラの番号（省略時は背面カメラ）
        #[arg(short, long)]
        camera: Option<usize>,

        /// カメララベル（複数指定可）
        #[arg(short = 'd', long = "device")]
        devices: Vec<String>,

        /// フレーム/秒
        #[arg(long)]
        fps: Option<u32>,

        /// 確認音を鳴らさない
        #[arg(long)]
        no_beep: bool,
    },

    /// カメラ一覧を表示
    Devices {
        /// カメララベル（複数指定可）
        #[arg(short = 'd', long = "device")]
        devices: Vec<String>,
    },

    /// スキャン結果を表示（新しい順）
    List,

    /// スキャン結果を1件削除
    Delete {
        /// 削除するID
        #[arg(required = true)]
        id: u64,
    },

    /// スキャン結果をすべて削除
    Clear,

    /// CSVに出力
    Export {
        /// 出力ファイル/ディレクトリ（デフォルト: ./scanned_codes.csv）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 全件のテキストを出力（1行1件）
    CopyAll,

    /// アプリを共有
    Share,

    /// 設定を表示/編集
    Config {
        /// 保存先を設定
        #[arg(long)]
        set_store: Option<PathBuf>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// デフォルトのカメララベル
pub const DEFAULT_DEVICE_LABEL: &str = "Replay feed (back)";

/// `--device` が省略されたときのラベル
pub fn device_labels(devices: &[String]) -> Vec<String> {
    if devices.is_empty() {
        vec![DEFAULT_DEVICE_LABEL.to_string()]
    } else {
        devices.to_vec()
    }
}

/// 出力パスを解決（ディレクトリなら scanned_codes.csv を付ける）
pub fn csv_output_path(output: Option<PathBuf>) -> PathBuf {
    let file_name = qr_scan_common::CSV_FILE_NAME;
    match output {
        Some(path) if path.is_dir() || path.extension().is_none() => path.join(file_name),
        Some(path) => path,
        None => PathBuf::from(file_name),
    }
}
