//! カタログ保存・復元の統合テスト
//!
//! ファイル保存のスナップショットを使い、再起動をまたいだ動作を検証

use part_photo::catalog;
use part_photo::drive::LocalDrive;
use part_photo::store::FileStore;
use part_photo_common::catalog::{META_KEY, RECORDS_KEY};
use part_photo_common::{Error, SnapshotStore};
use tempfile::tempdir;

const CSV: &str = "Part Number,Description,Qty\nM1024253,Left Hand Bracket,2\nm2000001 , Gear Box ,1\n,orphan,3\n";

/// インポートしたカタログが再起動後に復元される
#[test]
fn test_catalog_survives_restart() {
    let dir = tempdir().expect("Failed to create temp dir");

    {
        let catalog = catalog::open_at(dir.path()).unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.import(CSV).unwrap(), 2);
    }

    let reopened = catalog::open_at(dir.path()).unwrap();
    assert_eq!(reopened.count(), 2);
    assert_eq!(reopened.lookup("m1024253").as_deref(), Some("Left Hand Bracket"));
    assert_eq!(reopened.lookup("M2000001").as_deref(), Some("Gear Box"));

    let meta = reopened.meta().unwrap().expect("メタデータがあるはず");
    assert_eq!(meta.count, 2);
}

/// 壊れたスナップショットは空カタログとして扱う
#[test]
fn test_corrupt_snapshot_loads_empty() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = FileStore::open(dir.path()).unwrap();
    store.set(RECORDS_KEY, "{ not json").unwrap();

    let catalog = catalog::open_at(dir.path()).unwrap();
    assert!(catalog.is_empty());
}

/// 失敗したインポートは保存済みスナップショットを変更しない
#[test]
fn test_failed_import_keeps_snapshot() {
    let dir = tempdir().expect("Failed to create temp dir");
    let catalog = catalog::open_at(dir.path()).unwrap();
    catalog.import(CSV).unwrap();

    let store = FileStore::open(dir.path()).unwrap();
    let records_before = store.get(RECORDS_KEY).unwrap();
    let meta_before = store.get(META_KEY).unwrap();

    let err = catalog.import("OnlyOneColumn\nvalue\n").unwrap_err();
    assert!(matches!(err, Error::Schema(_)));

    assert_eq!(store.get(RECORDS_KEY).unwrap(), records_before);
    assert_eq!(store.get(META_KEY).unwrap(), meta_before);
    assert_eq!(catalog.count(), 2);
}

/// ローカルCSVファイルの取り込み
#[test]
fn test_import_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let csv_path = dir.path().join("parts.csv");
    std::fs::write(&csv_path, "Item;Desc\nA1;Alpha\nB2;Beta\n").unwrap();

    let catalog = catalog::open_at(&dir.path().join("store")).unwrap();
    assert_eq!(catalog::import_file(&catalog, &csv_path).unwrap(), 2);
    assert_eq!(catalog.lookup("b2").as_deref(), Some("Beta"));

    assert!(catalog::import_file(&catalog, &dir.path().join("missing.csv")).is_err());
}

/// ドライブからの更新
#[tokio::test]
async fn test_refresh_from_drive() {
    let drive_dir = tempdir().expect("Failed to create temp dir");
    let store_dir = tempdir().expect("Failed to create temp dir");
    let csv_dir = drive_dir.path().join("Parts Photos");
    std::fs::create_dir_all(&csv_dir).unwrap();
    std::fs::write(csv_dir.join("parts-catalog.csv"), CSV).unwrap();

    let drive = LocalDrive::new(drive_dir.path());
    let catalog = catalog::open_at(store_dir.path()).unwrap();

    let count = catalog::refresh(&catalog, &drive, "/Parts Photos/parts-catalog.csv")
        .await
        .unwrap();
    assert_eq!(count, 2);
    assert!(catalog.contains("M1024253"));
}

/// 更新に失敗しても読み込み済みのカタログは使える
#[tokio::test]
async fn test_refresh_failure_keeps_cached_catalog() {
    let drive_dir = tempdir().expect("Failed to create temp dir");
    let store_dir = tempdir().expect("Failed to create temp dir");

    let catalog = catalog::open_at(store_dir.path()).unwrap();
    catalog.import(CSV).unwrap();

    let drive = LocalDrive::new(drive_dir.path());
    let result = catalog::refresh(&catalog, &drive, "/Parts Photos/parts-catalog.csv").await;

    assert!(result.is_err());
    assert_eq!(catalog.count(), 2);
    assert_eq!(catalog.lookup("M1024253").as_deref(), Some("Left Hand Bracket"));
}
