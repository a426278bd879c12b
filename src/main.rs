use clap::Parser;
use qr_scan_common::{
    copy_all_text, is_url, share_app, to_csv, CameraSession, Clipboard, ScanController,
    ScanOutcome, ShareData,
};
use qr_scan_rust::{audio, cli, clock, config, error, feed, scan, share, storage};
use audio::TerminalBell;
use cli::{Cli, Commands};
use clock::SystemClock;
use config::Config;
use error::{QrScanError, Result};
use feed::{FeedSource, ReplayDecoder};
use std::path::PathBuf;
use storage::FilePersistence;
use tracing_subscriber::EnvFilter;

type Controller = ScanController<FilePersistence, TerminalBell, SystemClock>;

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "qr_scan_rust=debug,qr_scan_common=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_controller(config: &Config, store: Option<PathBuf>, beep: bool) -> Result<Controller> {
    let path = match store {
        Some(path) => path,
        None => config.resolved_store_path()?,
    };
    tracing::debug!(path = %path.display(), "opening result store");
    // 読めない保存データは上書きせずエラーで終了する
    let controller = ScanController::open(
        FilePersistence::new(path),
        TerminalBell { enabled: beep },
        SystemClock,
        config.controller_settings(),
    )?;
    Ok(controller)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Scan { feed, camera, devices, fps, no_beep } => {
            println!("📷 qr-scan - スキャン\n");

            let source = match feed {
                Some(path) if !path.exists() => {
                    return Err(QrScanError::FeedNotFound(path.display().to_string()));
                }
                Some(path) => FeedSource::File(path),
                None => FeedSource::Stdin,
            };

            let decoder = ReplayDecoder::new(
                feed::devices_from_labels(&cli::device_labels(&devices)),
                source,
                fps.unwrap_or(config.fps),
                config.noise_marker.clone(),
            );
            let finished = decoder.finished();
            let (session, mut events) = CameraSession::new(decoder);
            let session = session.with_keywords(config.camera_keywords.clone());

            let mut controller = open_controller(&config, cli.store, config.beep && !no_beep)?;

            let shutdown = async move {
                tokio::select! {
                    _ = finished.notified() => {}
                    _ = tokio::signal::ctrl_c() => {
                        println!("\n中断しました");
                    }
                }
            };

            let result = scan::run_scan(
                &session,
                &mut events,
                &mut controller,
                camera,
                shutdown,
                |outcome, feedback| match outcome {
                    ScanOutcome::Added(record) => {
                        let message = feedback.map(|f| f.message.as_str()).unwrap_or_default();
                        println!("✔ {} [{}] {}", message, record.id, record.text);
                    }
                    ScanOutcome::Duplicate { notified: true } => {
                        if let Some(f) = feedback {
                            println!("⚠ {}", f.message);
                        }
                    }
                    _ => {}
                },
            )
            .await;
            let summary = match result {
                Ok(summary) => summary,
                Err(e) => {
                    if let Some(toast) = controller.toast() {
                        eprintln!("✖ {}", toast.message);
                    }
                    return Err(e);
                }
            };

            println!(
                "\n✅ スキャン完了: 新規 {}件 / 重複 {}件 / 合計 {}件",
                summary.added,
                summary.duplicates,
                controller.len()
            );
        }

        Commands::Devices { devices } => {
            let decoder = ReplayDecoder::new(
                feed::devices_from_labels(&cli::device_labels(&devices)),
                FeedSource::Stdin,
                config.fps,
                config.noise_marker.clone(),
            );
            let (session, _events) = CameraSession::new(decoder);
            let devices = session.enumerate_devices().await?;
            let default =
                qr_scan_common::select_default_camera(&devices, &config.camera_keywords[..]);

            println!("カメラ一覧:");
            for (i, device) in devices.iter().enumerate() {
                let mark = if i == default { "*" } else { " " };
                println!("  {} [{}] {} ({})", mark, i, device.label, device.id);
            }
        }

        Commands::List => {
            let controller = open_controller(&config, cli.store, false)?;
            if controller.is_empty() {
                println!("スキャン結果はありません");
            } else {
                println!("{}件:", controller.len());
                for record in controller.records() {
                    let link = if is_url(&record.text) { " [url]" } else { "" };
                    println!("  {}  {}  {}{}", record.id, record.timestamp, record.text, link);
                }
            }
        }

        Commands::Delete { id } => {
            let mut controller = open_controller(&config, cli.store, false)?;
            if !controller.delete(id) {
                return Err(QrScanError::RecordNotFound(id));
            }
            println!("✔ 削除しました: {}", id);
        }

        Commands::Clear => {
            let mut controller = open_controller(&config, cli.store, false)?;
            let count = controller.clear_all();
            if let Some(toast) = controller.toast() {
                println!("✔ {} ({}件)", toast.message, count);
            }
        }

        Commands::Export { output } => {
            let controller = open_controller(&config, cli.store, false)?;
            let output_path = cli::csv_output_path(output);
            if let Some(parent) = output_path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(&output_path, to_csv(controller.records()))?;
            println!("✔ CSV出力: {} ({}件)", output_path.display(), controller.len());
        }

        Commands::CopyAll => {
            let controller = open_controller(&config, cli.store, false)?;
            let text = copy_all_text(controller.records());
            if let Err(e) = share::StdoutClipboard.copy_text(&text).await {
                tracing::error!(error = %e, "failed to write codes");
            }
        }

        Commands::Share => {
            let data = ShareData::app(config.share_url.clone());
            let outcome =
                share_app(&share::NoShareSheet, &share::StdoutClipboard, &data).await;
            if let Some(message) = outcome.toast_message() {
                eprintln!("{}", message);
            }
        }

        Commands::Config { set_store, show } => {
            let mut config = config;

            if let Some(path) = set_store {
                config.set_store_path(path)?;
                println!("✔ 保存先を設定しました");
            }

            if show {
                println!("設定:");
                println!("  保存先: {}", config.resolved_store_path()?.display());
                println!("  重複通知の抑制: {}ms", config.duplicate_window_ms);
                println!("  フィードバック表示: {}ms", config.scan_feedback_ms);
                println!("  トースト表示: {}ms", config.toast_ms);
                println!("  フレーム/秒: {}", config.fps);
                println!("  背面カメラ判定: {}", config.camera_keywords.join(", "));
                println!("  確認音: {}", if config.beep { "有効" } else { "無効" });
            }
        }
    }
    Ok(())
}
