//! 部品カタログ・スキャン結果の型定義
//!
//! CLIとライブラリ利用側で共有される型:
//! - PartRecord: カタログの1行
//! - CatalogMeta: 最終インポート情報
//! - ScanResult: スキャン解決の出力（部品番号 + 説明）
//! - RawRecognizedText: バーコード/OCRの生テキスト

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// カタログに一致しない部品に使う説明文
pub const UNKNOWN_PART: &str = "Unknown-Part";

/// カタログの1行
///
/// `part_number` は常に大文字・前後空白なし・空でない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartRecord {
    pub part_number: String,
    #[serde(default)]
    pub description: String,
}

/// 最終インポートのメタデータ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogMeta {
    pub imported_at: DateTime<Utc>,
    pub count: usize,
}

/// スキャン解決結果（両フィールドとも必ず埋まる）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub part_number: String,
    pub description: String,
}

/// 認識エンジンから届く生テキスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawRecognizedText {
    Barcode(String),
    Ocr(String),
}

impl RawRecognizedText {
    pub fn text(&self) -> &str {
        match self {
            RawRecognizedText::Barcode(text) | RawRecognizedText::Ocr(text) => text,
        }
    }

    pub fn source(&self) -> &'static str {
        match self {
            RawRecognizedText::Barcode(_) => "barcode",
            RawRecognizedText::Ocr(_) => "ocr",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_record_serialize() {
        let record = PartRecord {
            part_number: "M1024253".to_string(),
            description: "Left Hand Bracket".to_string(),
        };
        let json = serde_json::to_string(&record).expect("シリアライズ失敗");
        assert!(json.contains("\"partNumber\":\"M1024253\""));
        assert!(json.contains("\"description\":\"Left Hand Bracket\""));
    }

    #[test]
    fn test_part_record_missing_description() {
        let record: PartRecord =
            serde_json::from_str(r#"{"partNumber":"M1"}"#).expect("デシリアライズ失敗");
        assert_eq!(record.description, "");
    }

    #[test]
    fn test_catalog_meta_camel_case() {
        let json = r#"{"importedAt":"2026-01-18T09:30:00Z","count":3}"#;
        let meta: CatalogMeta = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(meta.count, 3);
        assert_eq!(meta.imported_at.to_rfc3339(), "2026-01-18T09:30:00+00:00");
    }

    #[test]
    fn test_recognized_text_accessors() {
        let barcode = RawRecognizedText::Barcode("M1".into());
        let ocr = RawRecognizedText::Ocr("m 2".into());
        assert_eq!(barcode.text(), "M1");
        assert_eq!(barcode.source(), "barcode");
        assert_eq!(ocr.text(), "m 2");
        assert_eq!(ocr.source(), "ocr");
    }
}
