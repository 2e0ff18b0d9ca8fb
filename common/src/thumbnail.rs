//! サムネイル（プレビュー）リソース管理
//!
//! 撮影した写真ごとにプレビュー用のバッファを確保し、ハンドルで所有する。
//! ハンドルは `release()` か drop のどちらかで1回だけ解放される。

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// 生データからプレビューを作る
pub trait Thumbnailer: Send + Sync {
    fn render(&self, data: &[u8]) -> Vec<u8>;
}

/// 元データをそのままプレビューにする
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughThumbnailer;

impl Thumbnailer for PassthroughThumbnailer {
    fn render(&self, data: &[u8]) -> Vec<u8> {
        data.to_vec()
    }
}

#[derive(Debug, Default)]
struct PoolInner {
    next_id: AtomicU64,
    released: AtomicU64,
    live: Mutex<HashMap<u64, Arc<[u8]>>>,
}

/// 確保中のサムネイルの管理表
///
/// `Clone` は同じ管理表を共有する。
#[derive(Debug, Clone, Default)]
pub struct ThumbnailPool {
    inner: Arc<PoolInner>,
}

impl ThumbnailPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// プレビューを登録してハンドルを返す
    pub fn acquire(&self, preview: Vec<u8>) -> ThumbnailHandle {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.inner.live.lock().insert(id, Arc::from(preview));
        ThumbnailHandle {
            id,
            pool: Arc::clone(&self.inner),
            released: false,
        }
    }

    /// 確保中のサムネイル数
    pub fn live_count(&self) -> usize {
        self.inner.live.lock().len()
    }

    /// これまでに解放した数
    pub fn released_count(&self) -> u64 {
        self.inner.released.load(Ordering::Relaxed)
    }

    /// ハンドルIDが確保中か
    pub fn is_live(&self, id: u64) -> bool {
        self.inner.live.lock().contains_key(&id)
    }
}

/// サムネイルの所有ハンドル
#[derive(Debug)]
pub struct ThumbnailHandle {
    id: u64,
    pool: Arc<PoolInner>,
    released: bool,
}

impl ThumbnailHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// プレビューのバイト列
    pub fn preview(&self) -> Option<Arc<[u8]>> {
        self.pool.live.lock().get(&self.id).cloned()
    }

    /// 明示的に解放
    pub fn release(mut self) {
        self.release_once();
    }

    fn release_once(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if self.pool.live.lock().remove(&self.id).is_some() {
            self.pool.released.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl Drop for ThumbnailHandle {
    fn drop(&mut self) {
        self.release_once();
    }
}
