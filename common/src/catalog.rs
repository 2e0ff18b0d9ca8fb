//! 部品カタログモジュール
//!
//! 部品番号 → 説明 の対応表をメモリ上に持ち、スナップショットとして保存する。
//! CSVなどの表形式テキストからインポートし、前回のスナップショットから復元する。
//!
//! インポート・復元は常に全件置き換え（マージしない）。
//! 読み出し側は置き換え前か置き換え後のどちらか一方の表だけを見る。

use crate::error::{Error, Result};
use crate::snapshot::{MemoryStore, SnapshotStore};
use crate::table::parse_table;
use crate::types::{CatalogMeta, PartRecord};
use chrono::Utc;
use parking_lot::RwLock;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// レコード一覧のストアキー
pub const RECORDS_KEY: &str = "catalog-records";
/// メタデータのストアキー
pub const META_KEY: &str = "catalog-meta";

/// ヘッダー判定ルール
struct ColumnRule {
    name: &'static str,
    pattern: Regex,
}

impl ColumnRule {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).unwrap(),
        }
    }
}

lazy_static::lazy_static! {
    /// 部品番号列のルール（上から順に評価、より具体的なものが先）
    static ref PART_RULES: Vec<ColumnRule> = vec![
        ColumnRule::new("part+number", r"(?i)part.*(num|no|#|code|id)"),
        ColumnRule::new("part", r"(?i)part"),
        ColumnRule::new("item/sku/code/id", r"(?i)^(item|sku|code|id)\b"),
    ];

    /// 説明列のルール
    static ref DESCRIPTION_RULES: Vec<ColumnRule> = vec![
        ColumnRule::new("desc", r"(?i)desc"),
    ];
}

/// 判定された列位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Columns {
    pub part: usize,
    pub description: usize,
}

/// ヘッダーから部品番号列・説明列を判定
///
/// - 部品番号列: ルール順に評価し、最初に一致したヘッダー（説明列らしいものは除く）。
///   どれも一致しなければ1列目
/// - 説明列: `desc` を含むヘッダー（部品番号列以外）。なければ2列目
/// - 2列未満、または両者が同じ列になる場合は `Error::Schema`
pub fn detect_columns(headers: &[String]) -> Result<Columns> {
    if headers.len() < 2 {
        return Err(Error::Schema(format!(
            "部品番号列と説明列を判定できません（列数: {}）",
            headers.len()
        )));
    }

    // 説明列らしいヘッダーは部品番号列の候補にしない
    let part = find_by_rules(headers, &PART_RULES, |_, h| is_description_header(h)).unwrap_or(0);
    let description = find_by_rules(headers, &DESCRIPTION_RULES, |i, _| i == part).unwrap_or(1);

    if part == description {
        return Err(Error::Schema(format!(
            "部品番号列と説明列が同じ列になりました: {}",
            headers[part]
        )));
    }

    Ok(Columns { part, description })
}

fn is_description_header(header: &str) -> bool {
    DESCRIPTION_RULES.iter().any(|rule| rule.pattern.is_match(header))
}

fn find_by_rules<F>(headers: &[String], rules: &[ColumnRule], skip: F) -> Option<usize>
where
    F: Fn(usize, &str) -> bool,
{
    rules.iter().find_map(|rule| {
        let found = headers
            .iter()
            .enumerate()
            .filter(|(i, h)| !skip(*i, h.as_str()))
            .find(|(_, h)| rule.pattern.is_match(h))
            .map(|(i, _)| i);
        if let Some(i) = found {
            debug!(rule = rule.name, column = %headers[i], "列を判定");
        }
        found
    })
}

/// 部品番号の正規化（前後空白除去 + 大文字化）
pub fn normalize_identifier(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// 部品カタログ
///
/// 内部の対応表は `Arc` ごと差し替えるため、ルックアップ中に
/// インポートが走っても半端な状態は見えない。
pub struct Catalog {
    parts: RwLock<Arc<HashMap<String, String>>>,
    store: Box<dyn SnapshotStore>,
}

impl Catalog {
    /// 保存先を指定して空のカタログを作成
    pub fn new(store: impl SnapshotStore + 'static) -> Self {
        Self {
            parts: RwLock::new(Arc::new(HashMap::new())),
            store: Box::new(store),
        }
    }

    /// メモリ上のストアを使うカタログ
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// 表形式テキストをインポート
    ///
    /// 部品番号が空の行は黙って捨てる。成功時はスナップショット
    /// （レコード + メタデータ）を書いてからメモリ上の表を置き換える。
    /// 失敗時はメモリもスナップショットも変更しない。
    ///
    /// # Returns
    /// 保持した行数（重複キーも1行として数える）
    pub fn import(&self, raw_text: &str) -> Result<usize> {
        let table = parse_table(raw_text)?;
        let columns = detect_columns(&table.headers)?;

        let records: Vec<PartRecord> = table
            .rows
            .iter()
            .filter_map(|row| {
                let part_number = normalize_identifier(&row[columns.part]);
                if part_number.is_empty() {
                    return None;
                }
                Some(PartRecord {
                    part_number,
                    description: row[columns.description].trim().to_string(),
                })
            })
            .collect();

        let dropped = table.rows.len() - records.len();
        let meta = CatalogMeta {
            imported_at: Utc::now(),
            count: records.len(),
        };

        self.store.set_many(&[
            (RECORDS_KEY, serde_json::to_string(&records)?),
            (META_KEY, serde_json::to_string(&meta)?),
        ])?;

        let parts = build_index(&records);
        let distinct = parts.len();
        *self.parts.write() = Arc::new(parts);

        info!(
            rows = records.len(),
            distinct,
            dropped,
            part_column = %table.headers[columns.part],
            description_column = %table.headers[columns.description],
            "カタログをインポート"
        );

        Ok(records.len())
    }

    /// 前回のスナップショットから復元
    ///
    /// スナップショットがない・空・壊れている場合は何もせず `false`。
    pub fn load(&self) -> Result<bool> {
        let raw = match self.store.get(RECORDS_KEY)? {
            Some(raw) => raw,
            None => return Ok(false),
        };

        let records: Vec<PartRecord> = match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "カタログのスナップショットが壊れています");
                return Ok(false);
            }
        };

        if records.is_empty() {
            return Ok(false);
        }

        let parts = build_index(&records);
        info!(count = parts.len(), "カタログをスナップショットから復元");
        *self.parts.write() = Arc::new(parts);
        Ok(true)
    }

    /// 部品番号で説明を検索（大文字小文字を区別しない完全一致）
    pub fn lookup(&self, identifier: &str) -> Option<String> {
        let key = normalize_identifier(identifier);
        self.parts.read().get(&key).cloned()
    }

    /// 部品番号が登録されているか
    pub fn contains(&self, identifier: &str) -> bool {
        let key = normalize_identifier(identifier);
        self.parts.read().contains_key(&key)
    }

    /// メモリ上の件数（部品番号の種類数）
    pub fn count(&self) -> usize {
        self.parts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// 最終インポートのメタデータ（メモリ上の表とは独立に保存先から読む）
    pub fn meta(&self) -> Result<Option<CatalogMeta>> {
        let raw = match self.store.get(META_KEY)? {
            Some(raw) => raw,
            None => return Ok(None),
        };

        match serde_json::from_str(&raw) {
            Ok(meta) => Ok(Some(meta)),
            Err(e) => {
                warn!(error = %e, "カタログのメタデータが壊れています");
                Ok(None)
            }
        }
    }

    /// 全レコードを部品番号順で取得
    pub fn records(&self) -> Vec<PartRecord> {
        let parts = Arc::clone(&self.parts.read());
        let mut records: Vec<PartRecord> = parts
            .iter()
            .map(|(part_number, description)| PartRecord {
                part_number: part_number.clone(),
                description: description.clone(),
            })
            .collect();
        records.sort_by(|a, b| a.part_number.cmp(&b.part_number));
        records
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog").field("count", &self.count()).finish()
    }
}

/// レコード列から検索表を作る（重複キーは後勝ち）
fn build_index(records: &[PartRecord]) -> HashMap<String, String> {
    records
        .iter()
        .map(|r| (r.part_number.clone(), r.description.clone()))
        .collect()
}
