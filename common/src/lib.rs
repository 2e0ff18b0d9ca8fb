//! Part Photo Common Library
//!
//! 部品カタログ・スキャン解決・撮影セッション・ファイル名生成など、
//! CLIと他のホスト（モバイル等）で共有されるコア処理

pub mod types;
pub mod error;
pub mod table;
pub mod snapshot;
pub mod catalog;
pub mod naming;
pub mod thumbnail;
pub mod session;
pub mod resolve;
pub mod transport;

pub use types::{CatalogMeta, PartRecord, RawRecognizedText, ScanResult, UNKNOWN_PART};
pub use error::{Error, Result};
pub use table::{parse_table, Table};
pub use snapshot::{MemoryStore, SnapshotStore};
pub use catalog::{detect_columns, normalize_identifier, Catalog, Columns};
pub use naming::{derive_file_name, sanitize_description};
pub use thumbnail::{PassthroughThumbnailer, ThumbnailHandle, ThumbnailPool, Thumbnailer};
pub use session::{CapturedPhoto, NamedPhoto, PhotoId, RawCapture, SessionPhotoList};
pub use resolve::{PartPattern, Resolver, DEFAULT_PART_PATTERN};
pub use transport::{upload_photos, RemoteTransport, UploadItem, UploadProgress, JPEG_MIME};
