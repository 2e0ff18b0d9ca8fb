//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// 表形式テキストが読めない（空、閉じていない引用符など）
    #[error("Parse error: {0}")]
    Parse(String),

    /// 部品番号列・説明列を特定できない
    #[error("Schema error: {0}")]
    Schema(String),

    /// 手入力の部品番号が空など
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Snapshot store error: {0}")]
    Store(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
