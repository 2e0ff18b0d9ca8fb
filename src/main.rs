use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use part_photo::{catalog, cli, config, drive, error, export, logging, prompt, scanner, thumbnails};
use part_photo_common::{upload_photos, Catalog, Resolver, ScanResult, SessionPhotoList, ThumbnailPool};
use cli::{CatalogAction, Cli, Commands, ScanInput, ScanSource};
use config::Config;
use drive::LocalDrive;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let config = Config::load().context("設定ファイルを読み込めません")?;

    match cli.command {
        Commands::Catalog { action } => run_catalog(action, &config).await?,

        Commands::Resolve { input } => {
            let catalog = catalog::open(&config)?;
            let result = resolve(&input, &catalog, &config)?;
            println!("部品番号: {}", result.part_number);
            println!("説明: {}", result.description);
        }

        Commands::Capture { input, photos, review, export: export_format, output, dry_run } => {
            println!("📸 part-photo - 写真撮影\n");

            // 1. 部品を解決
            println!("[1/3] 部品を解決中...");
            let catalog = catalog::open(&config)?;
            let scan = resolve(&input, &catalog, &config)?;
            println!("✔ {} ({})\n", scan.part_number, scan.description);

            // 2. 写真を追加
            println!("[2/3] 写真を読み込み中...");
            let files = scanner::collect_photos(&photos)?;
            if files.is_empty() {
                return Err(error::PartPhotoError::NoImagesFound(
                    photos.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", "),
                )
                .into());
            }

            let part_number = scan.part_number.clone();
            let mut session = SessionPhotoList::new(
                scan,
                ThumbnailPool::new(),
                thumbnails::ImageThumbnailer::new(config.thumbnail_size),
            );
            for file in &files {
                let capture = scanner::load_capture(file)
                    .with_context(|| format!("写真を読み込めません: {}", file.path.display()))?;
                session.add(capture);
            }

            if review {
                let removed = prompt::review_photos(&mut session)?;
                if removed > 0 {
                    println!("- {}枚を削除", removed);
                }
            }

            for photo in session.photos() {
                println!("  {} ← {}", photo.final_name(), photo.original_name().unwrap_or("-"));
            }
            println!("✔ {}枚の写真\n", session.len());

            if dry_run {
                println!("ドライラン: 出力しません");
                return Ok(());
            }

            let named = session.finish();
            if named.is_empty() {
                println!("写真がないため終了します");
                return Ok(());
            }

            // 3. アップロード/出力
            let output_dir = output.unwrap_or_else(|| std::path::PathBuf::from("."));
            match export_format {
                Some(format) => {
                    println!("[3/3] ローカルに出力中...");
                    let written = export::export_photos(&named, &part_number, format, &output_dir)?;
                    for path in &written {
                        println!("✔ 出力: {}", path.display());
                    }
                }
                None => {
                    println!("[3/3] アップロード中...");
                    let drive = LocalDrive::new(config.drive_root()?);
                    let progress = ProgressBar::new(named.len() as u64);
                    progress.set_style(
                        ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")
                            .unwrap_or_else(|_| ProgressStyle::default_bar()),
                    );

                    let result = upload_photos(&drive, &named, &config.photo_folder_path, |p| {
                        progress.set_position((p.current - 1) as u64);
                        progress.set_message(p.file_name.clone());
                    })
                    .await;

                    match result {
                        Ok(count) => {
                            progress.finish_and_clear();
                            println!("✔ {}枚をアップロード: {}", count, config.photo_folder_path);
                        }
                        Err(e) => {
                            progress.abandon();
                            println!("⚠ アップロード失敗: {}", e);
                            let path = export::export_zip(&named, &part_number, &output_dir)?;
                            println!("✔ 代わりにZIPを出力: {}", path.display());
                        }
                    }
                }
            }

            println!("\n✅ 完了");
        }

        Commands::Config { set_csv_path, set_photo_folder, set_drive_root, set_pattern, show } => {
            let mut config = config;

            if let Some(path) = set_csv_path {
                config.set_csv_file_path(path)?;
                println!("✔ カタログCSVのパスを設定しました: {}", config.csv_file_path);
            }

            if let Some(folder) = set_photo_folder {
                config.set_photo_folder_path(folder)?;
                println!("✔ 写真フォルダを設定しました: {}", config.photo_folder_path);
            }

            if let Some(root) = set_drive_root {
                config.drive_root = Some(root);
                config.save()?;
                println!("✔ ドライブのフォルダを設定しました");
            }

            if let Some(pattern) = set_pattern {
                config.part_number_pattern = pattern;
                config.part_pattern()?;
                config.save()?;
                println!("✔ 部品番号パターンを設定しました");
            }

            if show {
                println!("設定:");
                println!("  カタログCSV: {}", config.csv_file_path);
                println!("  写真フォルダ: {}", config.photo_folder_path);
                println!("  ドライブ: {}", config.drive_root()?.display());
                println!("  保存先: {}", config.store_dir()?.display());
                println!(
                    "  部品番号パターン: {}",
                    if config.part_number_pattern.is_empty() { "なし" } else { config.part_number_pattern.as_str() }
                );
                println!("  サムネイル: {}px", config.thumbnail_size);
            }
        }
    }

    Ok(())
}

async fn run_catalog(action: CatalogAction, config: &Config) -> Result<()> {
    let catalog = catalog::open(config)?;

    match action {
        CatalogAction::Refresh => {
            println!("📋 カタログを更新中: {}", config.csv_file_path);
            let drive = LocalDrive::new(config.drive_root()?);
            match catalog::refresh(&catalog, &drive, &config.csv_file_path).await {
                Ok(count) => println!("✔ {}件を取り込みました", count),
                Err(e) => {
                    println!("⚠ 更新に失敗しました: {}", e);
                    if catalog.is_empty() {
                        return Err(e).context("カタログがありません");
                    }
                    println!("  保存済みのカタログ（{}件）を使用します", catalog.count());
                }
            }
        }

        CatalogAction::Import { file } => {
            let count = catalog::import_file(&catalog, &file)
                .with_context(|| format!("カタログを取り込めません: {}", file.display()))?;
            println!("✔ {}件を取り込みました", count);
        }

        CatalogAction::Status { list } => {
            println!("カタログ:");
            println!("  件数: {}", catalog.count());
            match catalog.meta()? {
                Some(meta) => {
                    println!("  最終インポート: {}", meta.imported_at.format("%Y-%m-%d %H:%M:%S UTC"));
                    println!("  取り込み行数: {}", meta.count);
                }
                None => println!("  最終インポート: なし"),
            }
            if list {
                for record in catalog.records() {
                    println!("  {}\t{}", record.part_number, record.description);
                }
            }
        }

        CatalogAction::Lookup { part_number } => match catalog.lookup(&part_number) {
            Some(description) => println!("{}", description),
            None => println!("見つかりません: {}", part_number),
        },
    }

    Ok(())
}

fn resolve(input: &ScanInput, catalog: &Catalog, config: &Config) -> Result<ScanResult> {
    let resolver = match config.part_pattern()? {
        Some(pattern) => Resolver::with_pattern(catalog, pattern),
        None => Resolver::new(catalog),
    };

    let result = match input.source() {
        ScanSource::Recognized(text) => resolver
            .resolve_from_recognized_text(&text)
            .ok_or_else(|| error::PartPhotoError::NoRead(text.text().to_string()))?,
        ScanSource::Manual { part_number, description } => {
            resolver.resolve_manual(&part_number, &description)?
        }
        ScanSource::Interactive => {
            let entry = prompt::prompt_manual_entry()?;
            resolver.resolve_manual(&entry.part_number, &entry.description)?
        }
    };

    Ok(result)
}
