//! CSV出力・一括コピー
//!
//! 出力は新しい順。CSVは `Timestamp,Content` ヘッダ + 1件1行で、
//! 各フィールドをダブルクォートで囲み、内部の `"` は `""` にエスケープする。

use crate::types::ScanRecord;

/// ダウンロード時のファイル名
pub const CSV_FILE_NAME: &str = "scanned_codes.csv";

pub const CSV_HEADER: &str = "Timestamp,Content";

pub const CSV_MIME_TYPE: &str = "text/csv;charset=utf-8";

/// CSVフィールドのエスケープ
pub fn csv_escape(field: &str) -> String {
    field.replace('"', "\"\"")
}

/// CSV文字列を生成（末尾改行なし）
pub fn to_csv(records: &[ScanRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(CSV_HEADER.to_string());
    for record in records {
        lines.push(format!(
            "\"{}\",\"{}\"",
            csv_escape(&record.timestamp),
            csv_escape(&record.text)
        ));
    }
    lines.join("\n")
}

/// 「リストをコピー」用のテキスト（1行1件）
pub fn copy_all_text(records: &[ScanRecord]) -> String {
    records
        .iter()
        .map(|r| r.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, text: &str, timestamp: &str) -> ScanRecord {
        ScanRecord {
            id,
            text: text.to_string(),
            timestamp: timestamp.to_string(),
        }
    }

    #[test]
    fn test_csv_quotes_doubled() {
        let csv = to_csv(&[record(1, "a\"b", "T1")]);
        assert_eq!(csv, "Timestamp,Content\n\"T1\",\"a\"\"b\"");
    }

    #[test]
    fn test_csv_empty_store_header_only() {
        assert_eq!(to_csv(&[]), "Timestamp,Content");
    }

    #[test]
    fn test_csv_keeps_order_and_commas() {
        let csv = to_csv(&[
            record(2, "WIFI:S:home,net;T:WPA;;", "2026/10/16 10:00:01"),
            record(1, "", "2026/10/16 10:00:00"),
        ]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "\"2026/10/16 10:00:01\",\"WIFI:S:home,net;T:WPA;;\"");
        assert_eq!(lines[2], "\"2026/10/16 10:00:00\",\"\"");
    }

    #[test]
    fn test_copy_all_text() {
        let text = copy_all_text(&[record(2, "B", "T2"), record(1, "A", "T1")]);
        assert_eq!(text, "B\nA");
        assert_eq!(copy_all_text(&[]), "");
    }
}
