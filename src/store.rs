//! ファイル保存のスナップショットストア
//!
//! キーごとに `{保存先}/{キー}.json` を1ファイル書く。書き込みは一時ファイルに
//! 書いてからリネームするので、途中で落ちても前回の内容は壊れない。
//! 複数エントリの書き込みは、失敗したら全エントリを前回の内容に戻す。

use part_photo_common::{Error, Result, SnapshotStore};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const TEMP_SUFFIX: &str = ".tmp";
const BACKUP_SUFFIX: &str = ".bak";

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// 保存先フォルダを指定（無ければ作成）
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// キーに対応するファイルパス
    pub fn entry_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(Error::Store(format!("使用できないキーです: {:?}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }

    fn write_temp(&self, key: &str, value: &str) -> Result<(PathBuf, PathBuf)> {
        let path = self.entry_path(key)?;
        let temp = self.dir.join(format!("{}.json{}", key, TEMP_SUFFIX));

        let file = File::create(&temp)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(value.as_bytes())?;
        writer.flush()?;

        Ok((temp, path))
    }
}

impl SnapshotStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.entry_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let (temp, path) = self.write_temp(key, value)?;
        fs::rename(temp, &path)?;
        debug!(path = %path.display(), "スナップショットを保存");
        Ok(())
    }

    /// 全エントリを一時ファイルに書き終えてから差し替える
    ///
    /// 差し替えの途中で失敗した場合は、差し替え済みのエントリを `.bak` から戻す。
    fn set_many(&self, entries: &[(&str, String)]) -> Result<()> {
        let mut staged = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            match self.write_temp(key, value) {
                Ok(pair) => staged.push(pair),
                Err(e) => {
                    remove_temps(&staged);
                    return Err(e);
                }
            }
        }

        let mut committed = Vec::with_capacity(staged.len());
        for (i, (temp, path)) in staged.iter().enumerate() {
            match commit(temp, path) {
                Ok(backup) => committed.push((path.clone(), backup)),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "スナップショットの差し替えに失敗。元に戻します");
                    rollback(&committed);
                    remove_temps(&staged[i..]);
                    return Err(e.into());
                }
            }
        }

        for backup in committed.iter().filter_map(|(_, backup)| backup.as_ref()) {
            fs::remove_file(backup).ok();
        }
        debug!(count = entries.len(), dir = %self.dir.display(), "スナップショットを保存");
        Ok(())
    }
}

fn backup_path(path: &Path) -> PathBuf {
    path.with_extension(format!("json{}", BACKUP_SUFFIX))
}

/// 既存ファイルを `.bak` に退避してから一時ファイルを本来の名前にする
fn commit(temp: &Path, path: &Path) -> std::io::Result<Option<PathBuf>> {
    let backup = if path.exists() {
        let backup = backup_path(path);
        fs::rename(path, &backup)?;
        Some(backup)
    } else {
        None
    };

    if let Err(e) = fs::rename(temp, path) {
        if let Some(backup) = &backup {
            fs::rename(backup, path).ok();
        }
        return Err(e);
    }
    Ok(backup)
}

fn rollback(committed: &[(PathBuf, Option<PathBuf>)]) {
    for (path, backup) in committed.iter().rev() {
        match backup {
            Some(backup) => {
                fs::rename(backup, path).ok();
            }
            None => {
                fs::remove_file(path).ok();
            }
        }
    }
}

fn remove_temps(staged: &[(PathBuf, PathBuf)]) {
    for (temp, _) in staged {
        fs::remove_file(temp).ok();
    }
}
