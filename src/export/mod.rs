//! アップロードできない場合のローカル出力
//!
//! - ZIP: `{部品番号}_photos.zip` に全写真をまとめる
//! - フォルダ: 命名済みの写真をそのまま書き出す

pub mod archive;

use crate::error::{PartPhotoError, Result};
use part_photo_common::NamedPhoto;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Zip,
    Folder,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "zip" => Ok(ExportFormat::Zip),
            "folder" | "dir" => Ok(ExportFormat::Folder),
            _ => Err(format!("Unknown format: {}. Use zip or folder", s)),
        }
    }
}

/// ZIPファイル名（部品番号中のパス区切りは `-` に置換）
pub fn zip_file_name(part_number: &str) -> String {
    format!("{}_photos.zip", part_number.replace(['/', '\\'], "-"))
}

/// 出力先の外を指さないよう、名前の最後の要素だけを使う
pub(crate) fn plain_file_name(name: &str) -> Result<&str> {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| PartPhotoError::Export(format!("不正なファイル名です: {}", name)))
}

fn zip_output_path(output: &Path, part_number: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(zip_file_name(part_number))
    } else {
        output.to_path_buf()
    }
}

/// 写真をZIPに出力
///
/// # Returns
/// 作成したZIPのパス
pub fn export_zip(photos: &[NamedPhoto], part_number: &str, output: &Path) -> Result<PathBuf> {
    if photos.is_empty() {
        return Err(PartPhotoError::Export("出力する写真がありません".into()));
    }

    let output_path = zip_output_path(output, part_number);
    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    archive::write_zip(photos, &output_path)?;
    info!(path = %output_path.display(), count = photos.len(), "ZIPを出力");
    Ok(output_path)
}

/// 写真をフォルダに出力
///
/// # Returns
/// 書き出したファイルのパス（写真の順番どおり）
pub fn export_to_folder(photos: &[NamedPhoto], output_dir: &Path) -> Result<Vec<PathBuf>> {
    if photos.is_empty() {
        return Err(PartPhotoError::Export("出力する写真がありません".into()));
    }

    std::fs::create_dir_all(output_dir)?;

    let mut written = Vec::with_capacity(photos.len());
    for photo in photos {
        let path = output_dir.join(plain_file_name(&photo.file_name)?);
        std::fs::write(&path, &photo.data)?;
        written.push(path);
    }

    info!(dir = %output_dir.display(), count = written.len(), "フォルダに出力");
    Ok(written)
}

/// 形式を指定して出力
pub fn export_photos(
    photos: &[NamedPhoto],
    part_number: &str,
    format: ExportFormat,
    output: &Path,
) -> Result<Vec<PathBuf>> {
    match format {
        ExportFormat::Zip => Ok(vec![export_zip(photos, part_number, output)?]),
        ExportFormat::Folder => export_to_folder(photos, output),
    }
}
