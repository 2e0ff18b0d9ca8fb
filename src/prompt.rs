//! 対話入力（手入力での部品指定・撮影写真の確認）

use crate::error::{PartPhotoError, Result};
use dialoguer::{Input, MultiSelect};
use part_photo_common::{PhotoId, SessionPhotoList};

/// 手入力の部品番号と説明
#[derive(Debug, Clone)]
pub struct ManualEntry {
    pub part_number: String,
    pub description: String,
}

/// 部品番号と説明（任意）を入力
pub fn prompt_manual_entry() -> Result<ManualEntry> {
    let part_number: String = Input::new()
        .with_prompt("部品番号")
        .validate_with(|input: &String| -> std::result::Result<(), &str> {
            if input.trim().is_empty() {
                Err("部品番号を入力してください")
            } else {
                Ok(())
            }
        })
        .interact_text()
        .map_err(|e| PartPhotoError::CliExecution(e.to_string()))?;

    let description: String = Input::new()
        .with_prompt("説明（空欄ならカタログの説明）")
        .allow_empty(true)
        .interact_text()
        .map_err(|e| PartPhotoError::CliExecution(e.to_string()))?;

    Ok(ManualEntry {
        part_number,
        description,
    })
}

/// 削除する写真を選ばせ、セッションから外す
///
/// # Returns
/// 削除した枚数
pub fn review_photos(session: &mut SessionPhotoList) -> Result<usize> {
    if session.is_empty() {
        return Ok(0);
    }

    let items: Vec<String> = session
        .photos()
        .iter()
        .map(|p| match p.original_name() {
            Some(original) => format!("{} ({})", p.final_name(), original),
            None => p.final_name().to_string(),
        })
        .collect();

    let selected = MultiSelect::new()
        .with_prompt("削除する写真を選択（スペースで選択、Enterで確定）")
        .items(&items)
        .interact()
        .map_err(|e| PartPhotoError::CliExecution(e.to_string()))?;

    Ok(remove_selected(session, &selected))
}

/// 位置で選ばれた写真をまとめて削除（位置は削除前の並び）
pub fn remove_selected(session: &mut SessionPhotoList, positions: &[usize]) -> usize {
    let ids: Vec<PhotoId> = positions
        .iter()
        .filter_map(|&i| session.photos().get(i).map(|p| p.id()))
        .collect();

    ids.into_iter().filter(|&id| session.remove(id)).count()
}
