//! スキャンセッションコントローラ
//!
//! デコードイベントを受け取り、重複判定・ストア更新・フィードバック発行を行う。
//! ストアの更新（スキャン・削除・全削除）はすべて `&mut self` を通るため、
//! 到着順に1件ずつ適用される。

use crate::camera::DecodeEvent;
use crate::clock::Clock;
use crate::error::Result;
use crate::store::{Persistence, ResultStore};
use crate::types::{Feedback, FeedbackKind, ScanRecord};

pub const SUCCESS_MESSAGE: &str = "Scan successful!";
pub const DUPLICATE_MESSAGE: &str = "Already scanned!";
pub const CLEARED_MESSAGE: &str = "All items cleared!";
pub const COPIED_ALL_MESSAGE: &str = "All codes copied to clipboard!";
pub const STORE_UNREADABLE_MESSAGE: &str =
    "Saved codes could not be loaded. New scans will not be saved.";

/// 確認音
pub trait AudioCue {
    /// 失敗しても無視する（ベストエフォート）
    fn play_confirmation_tone(&self);
}

/// 音を鳴らさない
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl AudioCue for Silent {
    fn play_confirmation_tone(&self) {}
}

/// タイミング設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    /// 「スキャン済み」通知の抑制時間
    pub duplicate_window_ms: u64,
    /// スキャンフィードバックの表示時間
    pub scan_feedback_ms: u64,
    /// 一般トーストの表示時間
    pub toast_ms: u64,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            duplicate_window_ms: 2000,
            scan_feedback_ms: 2000,
            toast_ms: 5000,
        }
    }
}

/// デコード1件の処理結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// 新規追加
    Added(ScanRecord),
    /// スキャン済み。`notified` は通知を出したかどうか
    Duplicate { notified: bool },
    /// 読み取りノイズ（破棄）
    Ignored,
}

pub struct ScanController<P, A, K> {
    store: ResultStore,
    persistence: P,
    persistence_enabled: bool,
    audio: A,
    clock: K,
    settings: ControllerSettings,
    last_id: u64,
    last_duplicate_notice_ms: Option<u64>,
    feedback: Option<Feedback>,
    toast: Option<Feedback>,
}

impl<P, A, K> ScanController<P, A, K>
where
    P: Persistence,
    A: AudioCue,
    K: Clock,
{
    /// 保存済みの結果を読み込んで作成
    ///
    /// 読み込みに失敗した場合はそのエラーを返す。
    pub fn open(persistence: P, audio: A, clock: K, settings: ControllerSettings) -> Result<Self> {
        let records = persistence.load()?;
        Ok(Self::restored(persistence, audio, clock, settings, records, true))
    }

    /// 保存済みの結果を読み込んで作成
    ///
    /// 読み込みに失敗した場合は空のストアで開始し、以降は保存しない。
    /// 読めなかった保存データは上書きされない。
    pub fn new(persistence: P, audio: A, clock: K, settings: ControllerSettings) -> Self {
        let loaded = persistence.load();
        match loaded {
            Ok(records) => Self::restored(persistence, audio, clock, settings, records, true),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load scan records, saving disabled");
                Self::restored(persistence, audio, clock, settings, Vec::new(), false)
            }
        }
    }

    fn restored(
        persistence: P,
        audio: A,
        clock: K,
        settings: ControllerSettings,
        records: Vec<ScanRecord>,
        persistence_enabled: bool,
    ) -> Self {
        let store = ResultStore::from_records(records);
        let last_id = store.max_id().unwrap_or(0);
        tracing::debug!(records = store.len(), "scan controller restored");

        Self {
            store,
            persistence,
            persistence_enabled,
            audio,
            clock,
            settings,
            last_id,
            last_duplicate_notice_ms: None,
            feedback: None,
            toast: None,
        }
    }

    /// 保存データが読めなかったため保存を止めているか
    pub fn persistence_disabled(&self) -> bool {
        !self.persistence_enabled
    }

    /// デコードイベントを処理
    pub fn on_event(&mut self, event: DecodeEvent) -> ScanOutcome {
        match event {
            DecodeEvent::Decoded(text) => self.on_decoded(&text),
            DecodeEvent::Noise(detail) => {
                tracing::trace!(%detail, "decode noise discarded");
                ScanOutcome::Ignored
            }
        }
    }

    /// デコード結果1件を処理
    pub fn on_decoded(&mut self, text: &str) -> ScanOutcome {
        let now = self.clock.now_millis();

        if self.store.contains(text) {
            let notified = match self.last_duplicate_notice_ms {
                Some(last) => now.saturating_sub(last) > self.settings.duplicate_window_ms,
                None => true,
            };
            if notified {
                self.last_duplicate_notice_ms = Some(now);
                self.feedback = Some(Feedback {
                    message: DUPLICATE_MESSAGE.to_string(),
                    kind: FeedbackKind::Duplicate,
                    expires_at_ms: now + self.settings.scan_feedback_ms,
                });
            }
            tracing::debug!(notified, "duplicate scan");
            return ScanOutcome::Duplicate { notified };
        }

        let record = ScanRecord {
            id: self.next_id(now),
            text: text.to_string(),
            timestamp: self.clock.timestamp_label(),
        };
        self.store.insert_front(record.clone());
        self.persist();

        self.feedback = Some(Feedback {
            message: SUCCESS_MESSAGE.to_string(),
            kind: FeedbackKind::Success,
            expires_at_ms: now + self.settings.scan_feedback_ms,
        });
        self.audio.play_confirmation_tone();
        tracing::info!(id = record.id, len = text.len(), "new code scanned");

        ScanOutcome::Added(record)
    }

    /// IDで1件削除
    pub fn delete(&mut self, id: u64) -> bool {
        let removed = self.store.remove(id).is_some();
        if removed {
            self.persist();
        }
        removed
    }

    /// 全件削除
    pub fn clear_all(&mut self) -> usize {
        let count = self.store.clear();
        self.persist();
        self.notify(CLEARED_MESSAGE, FeedbackKind::Info);
        count
    }

    /// 一般トーストを表示
    pub fn notify(&mut self, message: impl Into<String>, kind: FeedbackKind) {
        let now = self.clock.now_millis();
        self.toast = Some(Feedback {
            message: message.into(),
            kind,
            expires_at_ms: now + self.settings.toast_ms,
        });
    }

    /// 表示中のスキャンフィードバック
    pub fn feedback(&self) -> Option<&Feedback> {
        let now = self.clock.now_millis();
        self.feedback.as_ref().filter(|f| f.is_active(now))
    }

    /// 表示中のトースト
    pub fn toast(&self) -> Option<&Feedback> {
        let now = self.clock.now_millis();
        self.toast.as_ref().filter(|f| f.is_active(now))
    }

    pub fn records(&self) -> &[ScanRecord] {
        self.store.records()
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    fn next_id(&mut self, now: u64) -> u64 {
        let id = if now > self.last_id {
            now
        } else {
            self.last_id.saturating_add(1)
        };
        self.last_id = id;
        id
    }

    fn persist(&self) {
        if !self.persistence_enabled {
            tracing::debug!("saving disabled, skipping persist");
            return;
        }
        if let Err(e) = self.persistence.save(self.store.records()) {
            tracing::warn!(error = %e, "failed to persist scan records");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::{Error, Result};
    use crate::store::MemoryPersistence;
    use std::cell::Cell;

    #[derive(Default)]
    struct CountingCue {
        plays: Cell<usize>,
    }

    impl AudioCue for &CountingCue {
        fn play_confirmation_tone(&self) {
            self.plays.set(self.plays.get() + 1);
        }
    }

    struct FailingPersistence;

    impl Persistence for FailingPersistence {
        fn load(&self) -> Result<Vec<ScanRecord>> {
            Err(Error::Persistence("storage unavailable".into()))
        }

        fn save(&self, _records: &[ScanRecord]) -> Result<()> {
            Err(Error::Persistence("storage unavailable".into()))
        }
    }

    /// 読み込みだけ失敗し、保存の呼び出し回数を数える
    #[derive(Default)]
    struct UnreadablePersistence {
        saves: Cell<usize>,
    }

    impl Persistence for UnreadablePersistence {
        fn load(&self) -> Result<Vec<ScanRecord>> {
            Err(Error::Persistence("corrupt".into()))
        }

        fn save(&self, _records: &[ScanRecord]) -> Result<()> {
            self.saves.set(self.saves.get() + 1);
            Ok(())
        }
    }

    fn controller(
        clock: &ManualClock,
    ) -> ScanController<MemoryPersistence, Silent, ManualClock> {
        ScanController::new(
            MemoryPersistence::default(),
            Silent,
            clock.clone(),
            ControllerSettings::default(),
        )
    }

    fn texts<P: Persistence, A: AudioCue, K: Clock>(c: &ScanController<P, A, K>) -> Vec<String> {
        c.records().iter().map(|r| r.text.clone()).collect()
    }

    #[test]
    fn test_new_scan_added_with_feedback() {
        let clock = ManualClock::new(1_000);
        let mut c = controller(&clock);

        let outcome = c.on_decoded("A");
        let record = match outcome {
            ScanOutcome::Added(r) => r,
            other => panic!("unexpected outcome: {:?}", other),
        };
        assert_eq!(record.id, 1_000);
        assert_eq!(record.timestamp, "T1000");

        let feedback = c.feedback().expect("フィードバックがない");
        assert_eq!(feedback.message, SUCCESS_MESSAGE);
        assert_eq!(feedback.kind, FeedbackKind::Success);
        assert_eq!(feedback.expires_at_ms, 3_000);
    }

    #[test]
    fn test_a_b_a_keeps_two_records_newest_first() {
        let clock = ManualClock::new(0);
        let mut c = controller(&clock);

        c.on_decoded("A");
        clock.advance(100);
        c.on_decoded("B");
        clock.advance(100);
        let outcome = c.on_decoded("A");

        assert_eq!(texts(&c), vec!["B", "A"]);
        assert_eq!(outcome, ScanOutcome::Duplicate { notified: true });
        assert_eq!(c.feedback().unwrap().message, DUPLICATE_MESSAGE);
    }

    #[test]
    fn test_duplicate_notice_throttled_within_window() {
        let clock = ManualClock::new(0);
        let mut c = controller(&clock);
        c.on_decoded("A");

        clock.advance(100);
        assert_eq!(c.on_decoded("A"), ScanOutcome::Duplicate { notified: true });

        // カメラを同じコードに向けたまま（毎秒約10回デコード）
        for _ in 0..20 {
            clock.advance(100);
            assert_eq!(c.on_decoded("A"), ScanOutcome::Duplicate { notified: false });
        }
        assert_eq!(clock.now_millis(), 2_100);
        assert_eq!(c.len(), 1);

        clock.set(100 + 2_001);
        assert_eq!(c.on_decoded("A"), ScanOutcome::Duplicate { notified: true });
    }

    #[test]
    fn test_duplicate_window_boundary_is_exclusive() {
        let clock = ManualClock::new(0);
        let mut c = controller(&clock);
        c.on_decoded("A");
        c.on_decoded("A");

        clock.set(2_000);
        assert_eq!(c.on_decoded("A"), ScanOutcome::Duplicate { notified: false });
        clock.set(2_001);
        assert_eq!(c.on_decoded("A"), ScanOutcome::Duplicate { notified: true });
    }

    #[test]
    fn test_duplicate_window_shared_across_texts() {
        let clock = ManualClock::new(0);
        let mut c = controller(&clock);
        c.on_decoded("A");
        c.on_decoded("B");

        assert_eq!(c.on_decoded("A"), ScanOutcome::Duplicate { notified: true });
        clock.advance(500);
        assert_eq!(c.on_decoded("B"), ScanOutcome::Duplicate { notified: false });
    }

    #[test]
    fn test_uniqueness_for_any_sequence() {
        let clock = ManualClock::new(0);
        let mut c = controller(&clock);
        let inputs = ["x", "y", "x", "", "z", "y", "", "x", "z", "w"];
        for text in inputs {
            c.on_decoded(text);
            clock.advance(7);
        }
        assert_eq!(texts(&c), vec!["w", "z", "", "y", "x"]);
    }

    #[test]
    fn test_uniqueness_for_all_short_sequences() {
        let alphabet = ["", "a", "b"];
        for len in 0..=4u32 {
            for n in 0..alphabet.len().pow(len) {
                let mut seq = Vec::new();
                let mut rest = n;
                for _ in 0..len {
                    seq.push(alphabet[rest % alphabet.len()]);
                    rest /= alphabet.len();
                }

                let clock = ManualClock::new(0);
                let mut c = controller(&clock);
                for text in &seq {
                    c.on_decoded(text);
                }

                let mut first_seen: Vec<&str> = Vec::new();
                for text in &seq {
                    if !first_seen.contains(text) {
                        first_seen.push(*text);
                    }
                }
                first_seen.reverse();
                assert_eq!(texts(&c), first_seen, "sequence: {:?}", seq);

                let mut ids: Vec<u64> = c.records().iter().map(|r| r.id).collect();
                ids.dedup();
                assert_eq!(ids.len(), c.len(), "sequence: {:?}", seq);
            }
        }
    }

    #[test]
    fn test_ids_unique_when_clock_stands_still() {
        let clock = ManualClock::new(5_000);
        let mut c = controller(&clock);
        c.on_decoded("A");
        c.on_decoded("B");
        c.on_decoded("C");

        let ids: Vec<u64> = c.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![5_002, 5_001, 5_000]);
    }

    #[test]
    fn test_ids_continue_after_restored_records() {
        let persistence = MemoryPersistence::with_records(vec![ScanRecord {
            id: 9_000,
            text: "old".into(),
            timestamp: "T9000".into(),
        }]);
        let clock = ManualClock::new(1_000);
        let mut c = ScanController::new(persistence, Silent, clock, ControllerSettings::default());

        assert_eq!(c.len(), 1);
        match c.on_decoded("new") {
            ScanOutcome::Added(r) => assert_eq!(r.id, 9_001),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(c.on_decoded("old"), ScanOutcome::Duplicate { notified: true });
    }

    #[test]
    fn test_ids_saturate_at_max() {
        let persistence = MemoryPersistence::with_records(vec![ScanRecord {
            id: u64::MAX,
            text: "old".into(),
            timestamp: "T".into(),
        }]);
        let clock = ManualClock::new(1_000);
        let mut c = ScanController::new(persistence, Silent, clock, ControllerSettings::default());

        match c.on_decoded("new") {
            ScanOutcome::Added(r) => assert_eq!(r.id, u64::MAX),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(texts(&c), vec!["new", "old"]);
    }

    #[test]
    fn test_confirmation_tone_only_for_new_codes() {
        let cue = CountingCue::default();
        let clock = ManualClock::new(0);
        let mut c = ScanController::new(
            MemoryPersistence::default(),
            &cue,
            clock.clone(),
            ControllerSettings::default(),
        );
        c.on_decoded("A");
        c.on_decoded("A");
        clock.advance(5_000);
        c.on_decoded("A");
        c.on_decoded("B");
        assert_eq!(cue.plays.get(), 2);
    }

    #[test]
    fn test_noise_is_discarded() {
        let clock = ManualClock::new(0);
        let mut c = controller(&clock);
        let outcome = c.on_event(DecodeEvent::Noise(
            "No MultiFormat Readers were able to detect the code.".into(),
        ));
        assert_eq!(outcome, ScanOutcome::Ignored);
        assert!(c.is_empty());
        assert!(c.feedback().is_none());

        assert!(matches!(
            c.on_event(DecodeEvent::Decoded("A".into())),
            ScanOutcome::Added(_)
        ));
    }

    #[test]
    fn test_every_mutation_persisted() {
        let persistence = MemoryPersistence::default();
        let clock = ManualClock::new(0);
        let mut c = ScanController::new(
            persistence.clone(),
            Silent,
            clock.clone(),
            ControllerSettings::default(),
        );

        c.on_decoded("A");
        clock.advance(1);
        c.on_decoded("B");
        c.on_decoded("A");
        assert_eq!(persistence.save_count(), 2);
        assert_eq!(persistence.snapshot().len(), 2);

        let id = c.records()[1].id;
        assert!(c.delete(id));
        assert_eq!(persistence.save_count(), 3);
        assert_eq!(persistence.snapshot()[0].text, "B");

        c.clear_all();
        assert_eq!(persistence.save_count(), 4);
        assert!(persistence.snapshot().is_empty());
    }

    #[test]
    fn test_delete_only_target() {
        let clock = ManualClock::new(0);
        let mut c = controller(&clock);
        c.on_decoded("A");
        clock.advance(1);
        c.on_decoded("B");
        clock.advance(1);
        c.on_decoded("C");

        let b_id = c.records()[1].id;
        assert!(c.delete(b_id));
        assert_eq!(texts(&c), vec!["C", "A"]);
        assert!(!c.delete(b_id));
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn test_deleted_code_can_be_rescanned() {
        let clock = ManualClock::new(0);
        let mut c = controller(&clock);
        c.on_decoded("A");
        let id = c.records()[0].id;
        c.delete(id);
        assert!(matches!(c.on_decoded("A"), ScanOutcome::Added(_)));
    }

    #[test]
    fn test_clear_all_shows_toast() {
        let clock = ManualClock::new(0);
        let mut c = controller(&clock);
        c.on_decoded("A");
        c.on_decoded("B");

        assert_eq!(c.clear_all(), 2);
        assert!(c.is_empty());
        let toast = c.toast().expect("トーストがない");
        assert_eq!(toast.message, CLEARED_MESSAGE);
        assert_eq!(toast.expires_at_ms, 5_000);

        clock.advance(5_000);
        assert!(c.toast().is_none());
    }

    #[test]
    fn test_scan_feedback_expires() {
        let clock = ManualClock::new(0);
        let mut c = controller(&clock);
        c.on_decoded("A");
        clock.advance(1_999);
        assert!(c.feedback().is_some());
        clock.advance(1);
        assert!(c.feedback().is_none());
    }

    #[test]
    fn test_persistence_failure_not_fatal() {
        let clock = ManualClock::new(0);
        let mut c = ScanController::new(
            FailingPersistence,
            Silent,
            clock,
            ControllerSettings::default(),
        );
        assert!(c.is_empty());
        assert!(c.persistence_disabled());
        assert!(matches!(c.on_decoded("A"), ScanOutcome::Added(_)));
        assert_eq!(c.len(), 1);
        assert_eq!(c.clear_all(), 1);
    }

    #[test]
    fn test_unreadable_store_never_overwritten() {
        let persistence = UnreadablePersistence::default();
        let clock = ManualClock::new(0);
        let mut c = ScanController::new(&persistence, Silent, clock, ControllerSettings::default());

        c.on_decoded("A");
        c.on_decoded("B");
        let id = c.records()[0].id;
        c.delete(id);
        c.clear_all();
        assert_eq!(persistence.saves.get(), 0);
    }

    #[test]
    fn test_open_propagates_load_error() {
        let clock = ManualClock::new(0);
        let result = ScanController::open(
            FailingPersistence,
            Silent,
            clock,
            ControllerSettings::default(),
        );
        assert!(matches!(result, Err(Error::Persistence(_))));

        let c = ScanController::open(
            MemoryPersistence::default(),
            Silent,
            ManualClock::new(0),
            ControllerSettings::default(),
        )
        .expect("空のストアは開ける");
        assert!(!c.persistence_disabled());
    }
}
