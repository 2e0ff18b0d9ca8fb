use crate::error::{PartPhotoError, Result};
use part_photo_common::{PartPattern, DEFAULT_PART_PATTERN};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CSV_FILE_PATH: &str = "/Parts Photos/parts-catalog.csv";
pub const DEFAULT_PHOTO_FOLDER_PATH: &str = "/Parts Photos";
pub const DEFAULT_THUMBNAIL_SIZE: u32 = 256;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// ドライブ上のカタログCSV
    pub csv_file_path: String,
    /// ドライブ上の写真アップロード先
    pub photo_folder_path: String,
    /// ドライブとして使うローカルフォルダ
    pub drive_root: Option<PathBuf>,
    /// カタログのスナップショット保存先
    pub store_dir: Option<PathBuf>,
    /// 認識テキストから部品番号を抜き出す正規表現（空なら全体を使う）
    pub part_number_pattern: String,
    pub thumbnail_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config.with_fallbacks())
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PartPhotoError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("part-photo"))
    }

    fn default_config() -> Self {
        Self {
            csv_file_path: DEFAULT_CSV_FILE_PATH.into(),
            photo_folder_path: DEFAULT_PHOTO_FOLDER_PATH.into(),
            drive_root: None,
            store_dir: None,
            part_number_pattern: DEFAULT_PART_PATTERN.into(),
            thumbnail_size: DEFAULT_THUMBNAIL_SIZE,
        }
    }

    /// 空のパス設定は既定値に戻す
    pub fn with_fallbacks(mut self) -> Self {
        if self.csv_file_path.trim().is_empty() {
            self.csv_file_path = DEFAULT_CSV_FILE_PATH.into();
        }
        if self.photo_folder_path.trim().is_empty() {
            self.photo_folder_path = DEFAULT_PHOTO_FOLDER_PATH.into();
        }
        if self.thumbnail_size == 0 {
            self.thumbnail_size = DEFAULT_THUMBNAIL_SIZE;
        }
        self
    }

    /// ドライブのルート（未設定なら `~/PartPhotoDrive`）
    pub fn drive_root(&self) -> Result<PathBuf> {
        if let Some(root) = &self.drive_root {
            return Ok(root.clone());
        }
        let home = dirs::home_dir()
            .ok_or_else(|| PartPhotoError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join("PartPhotoDrive"))
    }

    /// スナップショット保存先（未設定なら設定フォルダ内の `store`）
    pub fn store_dir(&self) -> Result<PathBuf> {
        match &self.store_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::config_dir()?.join("store")),
        }
    }

    pub fn part_pattern(&self) -> Result<Option<PartPattern>> {
        let pattern = self.part_number_pattern.trim();
        if pattern.is_empty() {
            return Ok(None);
        }
        Ok(Some(PartPattern::new(pattern)?))
    }

    pub fn set_csv_file_path(&mut self, path: String) -> Result<()> {
        self.csv_file_path = path;
        *self = self.clone().with_fallbacks();
        self.save()
    }

    pub fn set_photo_folder_path(&mut self, path: String) -> Result<()> {
        self.photo_folder_path = path;
        *self = self.clone().with_fallbacks();
        self.save()
    }
}
