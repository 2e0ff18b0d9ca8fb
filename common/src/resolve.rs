//! スキャン解決
//!
//! バーコード/OCRの生テキスト、または手入力から (部品番号, 説明) を決める。
//! カタログに無い部品番号はエラーにせず、説明を `Unknown-Part` にして先へ進める。

use crate::catalog::{normalize_identifier, Catalog};
use crate::error::{Error, Result};
use crate::types::{RawRecognizedText, ScanResult, UNKNOWN_PART};
use regex::Regex;
use tracing::debug;

/// 既定の部品番号パターン（M + 7桁）
pub const DEFAULT_PART_PATTERN: &str = r"M\d{7}";

lazy_static::lazy_static! {
    static ref DEFAULT_REGEX: Regex = Regex::new(DEFAULT_PART_PATTERN).unwrap();
}

/// 認識テキストから部品番号を抜き出すパターン
#[derive(Debug, Clone)]
pub struct PartPattern {
    regex: Regex,
}

impl PartPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| Error::Validation(format!("部品番号パターンが不正です ({}): {}", pattern, e)))?;
        Ok(Self { regex })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// 最初に一致した部分
    pub fn extract<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex.find(text).map(|m| m.as_str())
    }
}

impl Default for PartPattern {
    fn default() -> Self {
        Self {
            regex: DEFAULT_REGEX.clone(),
        }
    }
}

/// 認識テキストの正規化（空白をすべて除去して大文字化）
pub fn normalize_recognized(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// カタログを参照する解決器
///
/// 状態は持たず、呼び出しごとにカタログを引くだけ。
#[derive(Debug)]
pub struct Resolver<'a> {
    catalog: &'a Catalog,
    pattern: Option<PartPattern>,
}

impl<'a> Resolver<'a> {
    /// パターンなし（正規化したテキスト全体を部品番号とみなす）
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            pattern: None,
        }
    }

    pub fn with_pattern(catalog: &'a Catalog, pattern: PartPattern) -> Self {
        Self {
            catalog,
            pattern: Some(pattern),
        }
    }

    pub fn pattern(&self) -> Option<&PartPattern> {
        self.pattern.as_ref()
    }

    /// 認識テキストから解決
    ///
    /// 部品番号パターンはOCRのテキストにだけ適用する。
    ///
    /// # Returns
    /// 部品番号が読み取れなければ `None`（未読扱い、エラーではない）
    pub fn resolve_from_recognized_text(&self, input: &RawRecognizedText) -> Option<ScanResult> {
        let normalized = normalize_recognized(input.text());
        let identifier = match (input, &self.pattern) {
            (RawRecognizedText::Ocr(_), Some(pattern)) => pattern.extract(&normalized)?.to_string(),
            _ => normalized,
        };

        if identifier.is_empty() {
            return None;
        }

        let description = self
            .catalog
            .lookup(&identifier)
            .unwrap_or_else(|| UNKNOWN_PART.to_string());

        debug!(
            source = input.source(),
            part_number = %identifier,
            description = %description,
            "認識テキストを解決"
        );

        Some(ScanResult {
            part_number: identifier,
            description,
        })
    }

    /// 手入力から解決
    ///
    /// 説明の優先順: 入力した説明 > カタログ > `Unknown-Part`
    pub fn resolve_manual(&self, identifier_input: &str, description_override: &str) -> Result<ScanResult> {
        let part_number = normalize_identifier(identifier_input);
        if part_number.is_empty() {
            return Err(Error::Validation("部品番号を入力してください".to_string()));
        }

        let override_desc = description_override.trim();
        let description = if !override_desc.is_empty() {
            override_desc.to_string()
        } else {
            self.catalog
                .lookup(&part_number)
                .unwrap_or_else(|| UNKNOWN_PART.to_string())
        };

        Ok(ScanResult {
            part_number,
            description,
        })
    }
}
