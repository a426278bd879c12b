//! システム時刻

use chrono::Local;
use qr_scan_common::Clock;

/// 表示用タイムスタンプの書式
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        u64::try_from(Local::now().timestamp_millis()).unwrap_or(0)
    }

    fn timestamp_label(&self) -> String {
        Local::now().format(TIMESTAMP_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_label_format() {
        let label = SystemClock.timestamp_label();
        // 2026/10/16 10:00:00
        assert_eq!(label.len(), 19);
        assert_eq!(&label[4..5], "/");
        assert_eq!(&label[13..14], ":");
    }

    #[test]
    fn test_now_millis_advances() {
        let a = SystemClock.now_millis();
        let b = SystemClock.now_millis();
        assert!(a > 0);
        assert!(b >= a);
    }
}
