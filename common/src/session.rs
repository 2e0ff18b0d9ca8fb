//! 撮影セッションの写真リスト
//!
//! スキャンで決まった (部品番号, 説明) に対して撮影した写真を順番に持つ。
//! 追加・削除・並べ替えのたびに全写真のファイル名を位置から付け直すため、
//! `photos[i].final_name() == derive_file_name(部品番号, 説明, i)` が常に成り立つ。
//!
//! サムネイルは削除・クリア・セッション終了（drop含む）で必ず解放される。

use crate::naming::derive_file_name;
use crate::thumbnail::{PassthroughThumbnailer, ThumbnailHandle, ThumbnailPool, Thumbnailer};
use crate::types::ScanResult;
use tracing::debug;

/// 写真の識別子（位置が変わっても変わらない）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhotoId(u64);

impl std::fmt::Display for PhotoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// カメラ等から受け取った生データ
#[derive(Debug, Clone, Default)]
pub struct RawCapture {
    pub data: Vec<u8>,
    /// 元ファイル名（ログ用）
    pub original_name: Option<String>,
}

impl RawCapture {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            original_name: None,
        }
    }

    pub fn named(data: Vec<u8>, original_name: impl Into<String>) -> Self {
        Self {
            data,
            original_name: Some(original_name.into()),
        }
    }
}

/// セッション内の写真
#[derive(Debug)]
pub struct CapturedPhoto {
    id: PhotoId,
    data: Vec<u8>,
    original_name: Option<String>,
    thumbnail: ThumbnailHandle,
    final_name: String,
}

impl CapturedPhoto {
    pub fn id(&self) -> PhotoId {
        self.id
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn original_name(&self) -> Option<&str> {
        self.original_name.as_deref()
    }

    pub fn thumbnail(&self) -> &ThumbnailHandle {
        &self.thumbnail
    }

    /// 現在の位置から導出されたファイル名
    pub fn final_name(&self) -> &str {
        &self.final_name
    }
}

/// 出力用の名前付き写真
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedPhoto {
    pub file_name: String,
    pub data: Vec<u8>,
}

/// 撮影セッションの写真リスト
pub struct SessionPhotoList {
    part_number: String,
    description: String,
    photos: Vec<CapturedPhoto>,
    pool: ThumbnailPool,
    thumbnailer: Box<dyn Thumbnailer>,
    next_id: u64,
}

impl SessionPhotoList {
    pub fn new(scan: ScanResult, pool: ThumbnailPool, thumbnailer: impl Thumbnailer + 'static) -> Self {
        Self {
            part_number: scan.part_number,
            description: scan.description,
            photos: Vec::new(),
            pool,
            thumbnailer: Box::new(thumbnailer),
            next_id: 0,
        }
    }

    /// 元データをそのままプレビューにするセッション
    pub fn with_passthrough(scan: ScanResult) -> Self {
        Self::new(scan, ThumbnailPool::new(), PassthroughThumbnailer)
    }

    pub fn part_number(&self) -> &str {
        &self.part_number
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn pool(&self) -> &ThumbnailPool {
        &self.pool
    }

    pub fn photos(&self) -> &[CapturedPhoto] {
        &self.photos
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn get(&self, id: PhotoId) -> Option<&CapturedPhoto> {
        self.photos.iter().find(|p| p.id == id)
    }

    pub fn position(&self, id: PhotoId) -> Option<usize> {
        self.photos.iter().position(|p| p.id == id)
    }

    /// 次に撮影する写真に付くファイル名
    pub fn next_file_name(&self) -> String {
        derive_file_name(&self.part_number, &self.description, self.photos.len())
    }

    /// 写真を末尾に追加
    pub fn add(&mut self, capture: RawCapture) -> &CapturedPhoto {
        self.next_id += 1;
        let id = PhotoId(self.next_id);
        let thumbnail = self.pool.acquire(self.thumbnailer.render(&capture.data));
        let final_name = self.next_file_name();

        debug!(photo = %id, name = %final_name, bytes = capture.data.len(), "写真を追加");

        let index = self.photos.len();
        self.photos.push(CapturedPhoto {
            id,
            data: capture.data,
            original_name: capture.original_name,
            thumbnail,
            final_name,
        });
        &self.photos[index]
    }

    /// 写真を削除してサムネイルを解放し、残りを付け直す
    ///
    /// # Returns
    /// 該当する写真があれば `true`
    pub fn remove(&mut self, id: PhotoId) -> bool {
        match self.position(id) {
            Some(index) => self.remove_at(index),
            None => false,
        }
    }

    /// 位置指定で削除
    pub fn remove_at(&mut self, index: usize) -> bool {
        if index >= self.photos.len() {
            return false;
        }

        let CapturedPhoto {
            id,
            thumbnail,
            final_name,
            ..
        } = self.photos.remove(index);
        thumbnail.release();
        debug!(photo = %id, name = %final_name, "写真を削除");

        self.renumber_from(index);
        true
    }

    /// 写真を `from` から `to` の位置へ移動
    pub fn move_photo(&mut self, from: usize, to: usize) -> bool {
        let len = self.photos.len();
        if from >= len || to >= len {
            return false;
        }
        if from == to {
            return true;
        }

        let photo = self.photos.remove(from);
        self.photos.insert(to, photo);
        self.renumber_from(from.min(to));
        true
    }

    /// 全サムネイルを解放して空にする
    pub fn clear(&mut self) {
        let count = self.photos.len();
        for photo in self.photos.drain(..) {
            photo.thumbnail.release();
        }
        if count > 0 {
            debug!(count, "セッションの写真をクリア");
        }
    }

    /// セッションを終了し、名前付き写真を順番に取り出す
    pub fn finish(mut self) -> Vec<NamedPhoto> {
        std::mem::take(&mut self.photos)
            .into_iter()
            .map(|photo| {
                photo.thumbnail.release();
                NamedPhoto {
                    file_name: photo.final_name,
                    data: photo.data,
                }
            })
            .collect()
    }

    fn renumber_from(&mut self, start: usize) {
        for (index, photo) in self.photos.iter_mut().enumerate().skip(start) {
            photo.final_name = derive_file_name(&self.part_number, &self.description, index);
        }
    }
}

impl Drop for SessionPhotoList {
    fn drop(&mut self) {
        self.clear();
    }
}

impl std::fmt::Debug for SessionPhotoList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionPhotoList")
            .field("part_number", &self.part_number)
            .field("description", &self.description)
            .field("photos", &self.photos.len())
            .finish()
    }
}
