//! 写真ファイル名の生成
//!
//! `{部品番号}_{説明}_{連番3桁}.jpg` 形式。説明は以下の順で整形する:
//! 1. 連続する空白をハイフン1つに置換
//! 2. ASCII英数字とハイフン以外を削除
//! 3. 先頭80文字に切り詰め

/// 説明部分の最大文字数
pub const MAX_DESCRIPTION_LEN: usize = 80;

/// 写真の拡張子
pub const PHOTO_EXTENSION: &str = "jpg";

/// ファイル名用に説明を整形
pub fn sanitize_description(description: &str) -> String {
    let mut hyphenated = String::with_capacity(description.len());
    let mut in_whitespace = false;
    for c in description.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                hyphenated.push('-');
            }
            in_whitespace = true;
        } else {
            hyphenated.push(c);
            in_whitespace = false;
        }
    }

    hyphenated
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .take(MAX_DESCRIPTION_LEN)
        .collect()
}

/// 写真のファイル名を生成
///
/// # Arguments
/// * `identifier` - 部品番号
/// * `description` - 部品の説明
/// * `index` - 0始まりの位置（連番は `index + 1`）
///
/// # Examples
/// ```
/// use part_photo_common::derive_file_name;
///
/// let name = derive_file_name("M1024253", "Left Hand Bracket!!", 0);
/// assert_eq!(name, "M1024253_Left-Hand-Bracket_001.jpg");
/// ```
pub fn derive_file_name(identifier: &str, description: &str, index: usize) -> String {
    format!(
        "{}_{}_{:03}.{}",
        identifier,
        sanitize_description(description),
        index + 1,
        PHOTO_EXTENSION
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_basic() {
        assert_eq!(
            derive_file_name("M1024253", "Left Hand Bracket!!", 0),
            "M1024253_Left-Hand-Bracket_001.jpg"
        );
    }

    #[test]
    fn test_sequence_padding() {
        assert_eq!(derive_file_name("P", "d", 9), "P_d_010.jpg");
        assert_eq!(derive_file_name("P", "d", 998), "P_d_999.jpg");
        // 3桁を超えたらそのまま伸びる
        assert_eq!(derive_file_name("P", "d", 999), "P_d_1000.jpg");
    }

    #[test]
    fn test_whitespace_runs_collapse() {
        assert_eq!(sanitize_description("a  \t b\nc"), "a-b-c");
        assert_eq!(sanitize_description("  lead and trail  "), "-lead-and-trail-");
    }

    #[test]
    fn test_strips_non_ascii_and_symbols() {
        assert_eq!(sanitize_description("Bolt, M8 (zinc) / 5%"), "Bolt-M8-zinc--5");
        assert_eq!(sanitize_description("ボルト M8"), "-M8");
    }

    #[test]
    fn test_empty_description() {
        assert_eq!(derive_file_name("M1", "", 0), "M1__001.jpg");
        assert_eq!(derive_file_name("M1", "!!!", 0), "M1__001.jpg");
    }

    #[test]
    fn test_truncates_to_80() {
        let long = "word ".repeat(40);
        let sanitized = sanitize_description(&long);
        assert_eq!(sanitized.len(), MAX_DESCRIPTION_LEN);

        let name = derive_file_name("M1", &long, 0);
        let segment = name
            .strip_prefix("M1_")
            .and_then(|s| s.strip_suffix("_001.jpg"))
            .unwrap();
        assert_eq!(segment.len(), MAX_DESCRIPTION_LEN);
    }

    #[test]
    fn test_truncation_counts_after_stripping() {
        // 記号は切り詰め前に除去される
        let long = format!("{}{}", "!".repeat(50), "a".repeat(100));
        assert_eq!(sanitize_description(&long), "a".repeat(80));
    }

    #[test]
    fn test_deterministic() {
        let a = derive_file_name("M9", "Same Input", 4);
        let b = derive_file_name("M9", "Same Input", 4);
        assert_eq!(a, b);
    }
}
