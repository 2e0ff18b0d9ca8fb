//! スナップショット保存先（キー・バリューストア）
//!
//! カタログは `catalog-records` と `catalog-meta` の2エントリを
//! JSON文字列として保存する。保存先の実体（ファイル、ブラウザストレージ等）は
//! 呼び出し側が `SnapshotStore` を実装して差し込む。

use crate::error::Result;
use parking_lot::Mutex;
use std::collections::HashMap;

/// 名前付きエントリの読み書き
pub trait SnapshotStore: Send + Sync {
    /// エントリを取得（存在しなければ `None`）
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// エントリを書き込み
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// 複数エントリをまとめて書き込み
    ///
    /// デフォルト実装は順番に `set` するだけで、途中失敗時は
    /// 書き込み済みのエントリが残る。
    fn set_many(&self, entries: &[(&str, String)]) -> Result<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}

/// メモリ上のストア（テスト・WASM向け）
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// エントリ数
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SnapshotStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// ロックを1回だけ取って全エントリを反映する
    fn set_many(&self, entries: &[(&str, String)]) -> Result<()> {
        let mut guard = self.entries.lock();
        for (key, value) in entries {
            guard.insert((*key).to_string(), value.clone());
        }
        Ok(())
    }
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn set_many(&self, entries: &[(&str, String)]) -> Result<()> {
        (**self).set_many(entries)
    }
}
