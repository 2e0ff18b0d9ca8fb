use crate::error::{PartPhotoError, Result};
use part_photo_common::RawCapture;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct PhotoFile {
    pub path: PathBuf,
    pub file_name: String,
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "JPG", "JPEG", "PNG"];

fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&ext)
}

/// 撮影済み写真フォルダを走査（直下のみ、ファイル名順）
pub fn scan_folder(folder: &Path) -> Result<Vec<PhotoFile>> {
    if !folder.exists() {
        return Err(PartPhotoError::FolderNotFound(folder.display().to_string()));
    }

    let mut photos = Vec::new();

    for entry in WalkDir::new(folder)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let is_image = path
            .extension()
            .map(|ext| is_image_extension(&ext.to_string_lossy()))
            .unwrap_or(false);
        if is_image {
            photos.push(photo_file(path));
        }
    }

    photos.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(photos)
}

/// 個別指定のファイルとフォルダをまとめて写真リストにする（指定順）
pub fn collect_photos(inputs: &[PathBuf]) -> Result<Vec<PhotoFile>> {
    let mut photos = Vec::new();
    for input in inputs {
        if input.is_dir() {
            photos.extend(scan_folder(input)?);
        } else if input.is_file() {
            photos.push(photo_file(input));
        } else {
            return Err(PartPhotoError::FileNotFound(input.display().to_string()));
        }
    }
    Ok(photos)
}

/// 写真ファイルを読み込んでセッションに渡せる形にする
pub fn load_capture(photo: &PhotoFile) -> Result<RawCapture> {
    let data = std::fs::read(&photo.path)?;
    Ok(RawCapture::named(data, photo.file_name.clone()))
}

fn photo_file(path: &Path) -> PhotoFile {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    PhotoFile {
        path: path.to_path_buf(),
        file_name,
    }
}
