//! 確認音（ターミナルベル）

use qr_scan_common::AudioCue;
use std::io::Write;

#[derive(Debug, Clone, Copy)]
pub struct TerminalBell {
    pub enabled: bool,
}

impl AudioCue for TerminalBell {
    fn play_confirmation_tone(&self) {
        if !self.enabled {
            return;
        }
        let mut stderr = std::io::stderr();
        // 失敗しても無視
        let _ = stderr.write_all(b"\x07");
        let _ = stderr.flush();
    }
}
