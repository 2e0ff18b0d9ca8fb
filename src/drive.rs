//! ローカルフォルダをドライブとして扱う転送先
//!
//! `/Parts Photos/parts-catalog.csv` のようなドライブ上のパスを
//! ルートフォルダ配下のパスに読み替える。

use part_photo_common::{Error, RemoteTransport, Result, UploadItem};
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct LocalDrive {
    root: PathBuf,
}

impl LocalDrive {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// ドライブ上のパスをローカルパスに変換（`..` は拒否）
    pub fn resolve(&self, drive_path: &str) -> Result<PathBuf> {
        let mut resolved = self.root.clone();
        for component in Path::new(drive_path).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::RootDir | Component::CurDir => {}
                _ => {
                    return Err(Error::Transport(format!(
                        "ドライブ外を指すパスです: {}",
                        drive_path
                    )))
                }
            }
        }
        Ok(resolved)
    }
}

impl RemoteTransport for LocalDrive {
    async fn upload(&self, item: UploadItem<'_>) -> Result<()> {
        let folder = self.resolve(item.folder_path)?;
        fs::create_dir_all(&folder).await?;

        // ファイル名にフォルダ区切りが入っていたら別ファイルとして扱わない
        let file_name = Path::new(item.file_name)
            .file_name()
            .ok_or_else(|| Error::Transport(format!("不正なファイル名です: {}", item.file_name)))?;
        let destination = folder.join(file_name);

        fs::write(&destination, item.data).await?;
        debug!(
            path = %destination.display(),
            bytes = item.data.len(),
            mime = item.mime_type,
            "ドライブに保存"
        );
        Ok(())
    }

    async fn download_text(&self, path: &str) -> Result<String> {
        let local = self.resolve(path)?;
        match fs::read_to_string(&local).await {
            Ok(text) => {
                info!(path, bytes = text.len(), "ドライブから取得");
                Ok(text)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::Transport(format!("ドライブにファイルがありません: {}", path)))
            }
            Err(e) => Err(e.into()),
        }
    }
}
