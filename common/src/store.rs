//! スキャン結果ストア
//!
//! 新しい順に並んだ ScanRecord のリスト。`text` はストア内で一意。
//! 永続化は `Persistence` トレイト経由でプラットフォームに委譲する。

use crate::error::Result;
use crate::types::ScanRecord;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// 永続化の抽象化
pub trait Persistence {
    /// 保存済みのリストを読み込む（未保存なら空）
    fn load(&self) -> Result<Vec<ScanRecord>>;

    /// リスト全体を保存
    fn save(&self, records: &[ScanRecord]) -> Result<()>;
}

impl<T: Persistence + ?Sized> Persistence for &T {
    fn load(&self) -> Result<Vec<ScanRecord>> {
        (**self).load()
    }

    fn save(&self, records: &[ScanRecord]) -> Result<()> {
        (**self).save(records)
    }
}

/// メモリ上の永続化（テスト用）
///
/// クローンは同じ内容を共有する。
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    records: Arc<Mutex<Vec<ScanRecord>>>,
    saves: Arc<Mutex<usize>>,
}

impl MemoryPersistence {
    pub fn with_records(records: Vec<ScanRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
            saves: Arc::default(),
        }
    }

    /// 最後に保存された内容
    pub fn snapshot(&self) -> Vec<ScanRecord> {
        self.records
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// save が呼ばれた回数
    pub fn save_count(&self) -> usize {
        self.saves.lock().map(|s| *s).unwrap_or(0)
    }
}

impl Persistence for MemoryPersistence {
    fn load(&self) -> Result<Vec<ScanRecord>> {
        Ok(self.snapshot())
    }

    fn save(&self, records: &[ScanRecord]) -> Result<()> {
        if let Ok(mut stored) = self.records.lock() {
            *stored = records.to_vec();
        }
        if let Ok(mut saves) = self.saves.lock() {
            *saves += 1;
        }
        Ok(())
    }
}

/// スキャン結果ストア
#[derive(Debug, Clone, Default)]
pub struct ResultStore {
    records: Vec<ScanRecord>,
    texts: HashSet<String>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存済みリストから復元
    ///
    /// 同じ `text` が複数ある場合は先頭（新しい方）のみ残す。
    pub fn from_records(records: Vec<ScanRecord>) -> Self {
        let mut store = Self::new();
        for record in records {
            if store.texts.insert(record.text.clone()) {
                store.records.push(record);
            }
        }
        store
    }

    /// 完全一致で検索
    pub fn contains(&self, text: &str) -> bool {
        self.texts.contains(text)
    }

    pub fn get(&self, id: u64) -> Option<&ScanRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// 先頭に追加。同じ `text` が既にあれば追加せず false
    pub fn insert_front(&mut self, record: ScanRecord) -> bool {
        if !self.texts.insert(record.text.clone()) {
            return false;
        }
        self.records.insert(0, record);
        true
    }

    /// IDで1件削除
    pub fn remove(&mut self, id: u64) -> Option<ScanRecord> {
        let pos = self.records.iter().position(|r| r.id == id)?;
        let removed = self.records.remove(pos);
        self.texts.remove(&removed.text);
        Some(removed)
    }

    /// 全件削除。削除した件数を返す
    pub fn clear(&mut self) -> usize {
        let count = self.records.len();
        self.records.clear();
        self.texts.clear();
        count
    }

    pub fn records(&self) -> &[ScanRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScanRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 発行済みIDの最大値
    pub fn max_id(&self) -> Option<u64> {
        self.records.iter().map(|r| r.id).max()
    }
}
