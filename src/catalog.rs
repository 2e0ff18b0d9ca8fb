//! カタログの保存先・取得元とのつなぎ込み

use crate::config::Config;
use crate::error::{PartPhotoError, Result};
use crate::store::FileStore;
use part_photo_common::{Catalog, RemoteTransport};
use std::path::Path;
use tracing::{info, warn};

/// 保存先のスナップショットを読み込んだカタログを開く
pub fn open(config: &Config) -> Result<Catalog> {
    open_at(&config.store_dir()?)
}

/// 保存先フォルダを指定してカタログを開く
pub fn open_at(store_dir: &Path) -> Result<Catalog> {
    let store = FileStore::open(store_dir)?;
    let catalog = Catalog::new(store);
    if catalog.load()? {
        info!(count = catalog.count(), "保存済みカタログを読み込み");
    }
    Ok(catalog)
}

/// ローカルのCSVファイルをインポート
pub fn import_file(catalog: &Catalog, path: &Path) -> Result<usize> {
    if !path.exists() {
        return Err(PartPhotoError::FileNotFound(path.display().to_string()));
    }
    let text = std::fs::read_to_string(path)?;
    Ok(catalog.import(&text)?)
}

/// ドライブからCSVを取得して取り込み直す
///
/// 取得・取り込みのどちらで失敗しても、読み込み済みのカタログはそのまま使える。
pub async fn refresh<T: RemoteTransport>(catalog: &Catalog, transport: &T, csv_path: &str) -> Result<usize> {
    let result = match transport.download_text(csv_path).await {
        Ok(text) => catalog.import(&text),
        Err(e) => Err(e),
    };

    match result {
        Ok(count) => {
            info!(count, path = csv_path, "カタログを更新");
            Ok(count)
        }
        Err(e) => {
            warn!(error = %e, cached = catalog.count(), "カタログを更新できません。保存済みのカタログを使用します");
            Err(e.into())
        }
    }
}
