//! リモート保存先との境界とアップロード処理
//!
//! 実際のクラウドAPIは呼び出し側が `RemoteTransport` を実装して差し込む。
//! ここでは写真を1枚ずつ順番に送り、最初の失敗で止める。

use crate::error::{Error, Result};
use crate::session::NamedPhoto;
use tracing::{info, warn};

/// 写真のMIMEタイプ
pub const JPEG_MIME: &str = "image/jpeg";

/// アップロード1件分
#[derive(Debug, Clone, Copy)]
pub struct UploadItem<'a> {
    pub folder_path: &'a str,
    pub file_name: &'a str,
    pub data: &'a [u8],
    pub mime_type: &'a str,
}

/// 進捗（`current` は1始まり）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadProgress {
    pub current: usize,
    pub total: usize,
    pub file_name: String,
}

/// リモートのファイル保存先
#[allow(async_fn_in_trait)]
pub trait RemoteTransport {
    /// ファイルを1件アップロード
    async fn upload(&self, item: UploadItem<'_>) -> Result<()>;

    /// テキストファイルをダウンロード
    async fn download_text(&self, path: &str) -> Result<String>;
}

/// 写真を順番にアップロード
///
/// 各ファイルの送信前に `on_progress` を呼ぶ。失敗したら残りは送らず、
/// どのファイルで失敗したかを含む `Error::Transport` を返す。
///
/// # Returns
/// アップロードした件数
pub async fn upload_photos<T, F>(
    transport: &T,
    photos: &[NamedPhoto],
    folder_path: &str,
    mut on_progress: F,
) -> Result<usize>
where
    T: RemoteTransport + ?Sized,
    F: FnMut(&UploadProgress),
{
    let total = photos.len();

    for (i, photo) in photos.iter().enumerate() {
        on_progress(&UploadProgress {
            current: i + 1,
            total,
            file_name: photo.file_name.clone(),
        });

        let item = UploadItem {
            folder_path,
            file_name: &photo.file_name,
            data: &photo.data,
            mime_type: JPEG_MIME,
        };

        if let Err(e) = transport.upload(item).await {
            warn!(file = %photo.file_name, uploaded = i, total, "アップロード失敗");
            return Err(Error::Transport(format!(
                "{} のアップロードに失敗しました ({}/{}): {}",
                photo.file_name,
                i + 1,
                total,
                e
            )));
        }
    }

    info!(count = total, folder = folder_path, "アップロード完了");
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingTransport {
        uploaded: Mutex<Vec<(String, String, usize, String)>>,
        fail_on: Option<String>,
    }

    impl RemoteTransport for RecordingTransport {
        async fn upload(&self, item: UploadItem<'_>) -> Result<()> {
            if self.fail_on.as_deref() == Some(item.file_name) {
                return Err(Error::Transport("quota exceeded".to_string()));
            }
            self.uploaded.lock().push((
                item.folder_path.to_string(),
                item.file_name.to_string(),
                item.data.len(),
                item.mime_type.to_string(),
            ));
            Ok(())
        }

        async fn download_text(&self, path: &str) -> Result<String> {
            Err(Error::Transport(format!("not found: {}", path)))
        }
    }

    fn photos(n: usize) -> Vec<NamedPhoto> {
        (0..n)
            .map(|i| NamedPhoto {
                file_name: format!("M1_d_{:03}.jpg", i + 1),
                data: vec![0; i + 1],
            })
            .collect()
    }

    #[tokio::test]
    async fn test_upload_all_in_order() {
        let transport = RecordingTransport::default();
        let mut progress = Vec::new();

        let count = upload_photos(&transport, &photos(3), "/Parts Photos", |p| progress.push(p.clone()))
            .await
            .unwrap();

        assert_eq!(count, 3);
        let uploaded = transport.uploaded.lock();
        assert_eq!(uploaded.len(), 3);
        assert_eq!(uploaded[0].0, "/Parts Photos");
        assert_eq!(uploaded[2].1, "M1_d_003.jpg");
        assert_eq!(uploaded[2].2, 3);
        assert_eq!(uploaded[1].3, JPEG_MIME);

        assert_eq!(progress.len(), 3);
        assert_eq!(
            progress[0],
            UploadProgress {
                current: 1,
                total: 3,
                file_name: "M1_d_001.jpg".to_string(),
            }
        );
        assert_eq!(progress[2].current, 3);
    }

    #[tokio::test]
    async fn test_upload_stops_at_first_failure() {
        let transport = RecordingTransport {
            fail_on: Some("M1_d_002.jpg".to_string()),
            ..Default::default()
        };
        let mut reported = 0;

        let err = upload_photos(&transport, &photos(4), "/f", |_| reported += 1)
            .await
            .unwrap_err();

        assert!(matches!(&err, Error::Transport(msg) if msg.contains("M1_d_002.jpg")));
        assert_eq!(transport.uploaded.lock().len(), 1);
        assert_eq!(reported, 2);
    }

    #[tokio::test]
    async fn test_upload_empty_list() {
        let transport = RecordingTransport::default();
        let count = upload_photos(&transport, &[], "/f", |_| panic!("呼ばれないはず"))
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_download_error_propagates() {
        let transport = RecordingTransport::default();
        let err = transport.download_text("/Parts Photos/parts-catalog.csv").await.unwrap_err();
        assert!(err.to_string().contains("parts-catalog.csv"));
    }
}
