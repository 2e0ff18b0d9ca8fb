use super::plain_file_name;
use crate::error::Result;
use part_photo_common::NamedPhoto;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// 写真をZIPにまとめる（アーカイブ内の並びは写真の順番どおり、エントリ名にフォルダは含めない）
pub fn write_zip(photos: &[NamedPhoto], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)?;
    let mut writer = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for photo in photos {
        writer.start_file(plain_file_name(&photo.file_name)?, options)?;
        writer.write_all(&photo.data)?;
    }

    writer.finish()?.flush()?;
    Ok(())
}
