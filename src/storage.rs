//! スキャン結果のファイル保存
//!
//! ScanRecord の配列をJSONでそのまま保存する（id, text, timestamp）。

use qr_scan_common::{Persistence, ScanRecord};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FilePersistence {
    path: PathBuf,
}

impl FilePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Persistence for FilePersistence {
    fn load(&self) -> qr_scan_common::Result<Vec<ScanRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let records: Vec<ScanRecord> = serde_json::from_reader(reader)?;
        Ok(records)
    }

    fn save(&self, records: &[ScanRecord]) -> qr_scan_common::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // 書き込み途中で壊れないよう一時ファイル経由で置き換える
        let tmp_path = self.path.with_extension("json.tmp");
        let file = File::create(&tmp_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, records)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = FilePersistence::new(dir.path().join("none.json"));
        assert!(persistence.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("codes.json");
        let persistence = FilePersistence::new(&path);

        persistence
            .save(&[ScanRecord {
                id: 1,
                text: "A".into(),
                timestamp: "T1".into(),
            }])
            .unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
        assert_eq!(persistence.load().unwrap().len(), 1);
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codes.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = FilePersistence::new(&path).load();
        assert!(matches!(result, Err(qr_scan_common::Error::Json(_))));
    }
}
