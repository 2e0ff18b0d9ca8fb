use clap::{Parser, Subcommand};
use crate::export::ExportFormat;
use part_photo_common::RawRecognizedText;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "part-photo")]
#[command(about = "部品番号スキャン・写真撮影・命名・アップロード支援ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 部品カタログの管理
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },

    /// 認識テキストまたは手入力から部品を解決
    Resolve {
        #[command(flatten)]
        input: ScanInput,
    },

    /// 部品を解決して写真を命名し、アップロード/出力
    Capture {
        #[command(flatten)]
        input: ScanInput,

        /// 写真ファイルまたはフォルダ（指定順に追加）
        #[arg(required = true)]
        photos: Vec<PathBuf>,

        /// 追加後に削除する写真を選ぶ
        #[arg(long)]
        review: bool,

        /// アップロードせずローカルに出力 (zip/folder)
        #[arg(short, long)]
        export: Option<ExportFormat>,

        /// 出力先（省略時はカレント）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 名前だけ表示して何もしない
        #[arg(long)]
        dry_run: bool,
    },

    /// 設定を表示/編集
    Config {
        /// カタログCSVのドライブ上のパス
        #[arg(long)]
        set_csv_path: Option<String>,

        /// 写真アップロード先のドライブ上のフォルダ
        #[arg(long)]
        set_photo_folder: Option<String>,

        /// ドライブとして使うローカルフォルダ
        #[arg(long)]
        set_drive_root: Option<PathBuf>,

        /// 部品番号パターン（空文字で無効）
        #[arg(long)]
        set_pattern: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Subcommand)]
pub enum CatalogAction {
    /// ドライブからCSVを取得して更新
    Refresh,

    /// ローカルのCSVファイルを取り込む
    Import {
        #[arg(required = true)]
        file: PathBuf,
    },

    /// 件数と最終インポート日時を表示
    Status {
        /// 全レコードを表示
        #[arg(long)]
        list: bool,
    },

    /// 部品番号で検索
    Lookup {
        #[arg(required = true)]
        part_number: String,
    },
}

/// 部品の指定方法
#[derive(clap::Args, Clone, Debug, Default)]
pub struct ScanInput {
    /// バーコードの読み取り結果
    #[arg(long, conflicts_with_all = ["ocr", "part"])]
    pub barcode: Option<String>,

    /// OCRの読み取り結果
    #[arg(long, conflicts_with = "part")]
    pub ocr: Option<String>,

    /// 部品番号を手入力
    #[arg(short, long)]
    pub part: Option<String>,

    /// 説明を手入力（カタログより優先）
    #[arg(short, long, requires = "part")]
    pub description: Option<String>,
}

/// 解決方法
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanSource {
    Recognized(RawRecognizedText),
    Manual { part_number: String, description: String },
    /// 引数なし（対話入力）
    Interactive,
}

impl ScanInput {
    pub fn source(&self) -> ScanSource {
        if let Some(text) = &self.barcode {
            return ScanSource::Recognized(RawRecognizedText::Barcode(text.clone()));
        }
        if let Some(text) = &self.ocr {
            return ScanSource::Recognized(RawRecognizedText::Ocr(text.clone()));
        }
        match &self.part {
            Some(part) => ScanSource::Manual {
                part_number: part.clone(),
                description: self.description.clone().unwrap_or_default(),
            },
            None => ScanSource::Interactive,
        }
    }
}
