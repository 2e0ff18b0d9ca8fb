use thiserror::Error;

#[derive(Error, Debug)]
pub enum PartPhotoError {
    #[error(transparent)]
    Common(#[from] part_photo_common::Error),

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("部品番号を読み取れませんでした: {0}")]
    NoRead(String),

    #[error("エクスポートエラー: {0}")]
    Export(String),

    #[error("ZIP生成エラー: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("CLI実行エラー: {0}")]
    CliExecution(String),
}

pub type Result<T> = std::result::Result<T, PartPhotoError>;
