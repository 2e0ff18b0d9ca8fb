//! 区切り文字付きテキスト（CSV/TSVなど）のパーサー
//!
//! ヘッダー行 + データ行の表形式テキストを読み込む。
//! - 区切り文字の自動判定（`,` `;` タブ `|`）
//! - ダブルクォート、`""` エスケープ、引用符内の改行
//! - CRLF/LF、先頭BOM
//! - 空行はスキップ

use crate::error::{Error, Result};

const DELIMITER_CANDIDATES: &[char] = &[',', ';', '\t', '|'];

/// 区切り文字判定に使う先頭行数
const SNIFF_LINES: usize = 10;

/// パース済みの表
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// ヘッダー（前後空白除去済み）
    pub headers: Vec<String>,
    /// データ行（ヘッダーと同じ列数に揃えてある）
    pub rows: Vec<Vec<String>>,
    /// 判定された区切り文字
    pub delimiter: char,
}

impl Table {
    /// 列数
    pub fn width(&self) -> usize {
        self.headers.len()
    }
}

/// 表形式テキストをパース
pub fn parse_table(text: &str) -> Result<Table> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if text.trim().is_empty() {
        return Err(Error::Parse("入力が空です".into()));
    }

    let delimiter = detect_delimiter(text);
    let mut records = split_records(text, delimiter)?.into_iter();

    let headers: Vec<String> = match records.next() {
        Some(header) => header.into_iter().map(|h| h.trim().to_string()).collect(),
        None => return Err(Error::Parse("ヘッダー行がありません".into())),
    };

    let width = headers.len();
    let rows = records
        .map(|mut row| {
            row.resize(width, String::new());
            row
        })
        .collect();

    Ok(Table {
        headers,
        rows,
        delimiter,
    })
}

/// 区切り文字を推定
///
/// 先頭数行で列数が最も安定している候補を選ぶ。
/// どの候補でも2列以上にならなければ `,`。
pub fn detect_delimiter(text: &str) -> char {
    let lines: Vec<&str> = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(SNIFF_LINES)
        .collect();

    let mut best = (',', 0usize, 0usize);

    for &candidate in DELIMITER_CANDIDATES {
        let counts: Vec<usize> = lines.iter().map(|l| count_fields(l, candidate)).collect();
        let header_width = match counts.first() {
            Some(&w) if w > 1 => w,
            _ => continue,
        };
        let consistent = counts.iter().filter(|&&c| c == header_width).count();

        if consistent > best.1 || (consistent == best.1 && header_width > best.2) {
            best = (candidate, consistent, header_width);
        }
    }

    best.0
}

/// 引用符の外にある区切り文字で数えた列数
fn count_fields(line: &str, delimiter: char) -> usize {
    let mut in_quotes = false;
    let mut fields = 1;
    for c in line.chars() {
        if c == '"' {
            in_quotes = !in_quotes;
        } else if c == delimiter && !in_quotes {
            fields += 1;
        }
    }
    fields
}

/// テキストをレコード単位に分割（引用符内の改行はレコード内に残す）
fn split_records(text: &str, delimiter: char) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }

        match c {
            '"' if field.is_empty() && !quoted => {
                in_quotes = true;
                quoted = true;
            }
            c if c == delimiter => {
                record.push(std::mem::take(&mut field));
                quoted = false;
            }
            '\r' | '\n' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                record.push(std::mem::take(&mut field));
                quoted = false;
                push_record(&mut records, std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(Error::Parse("引用符が閉じていません".into()));
    }

    if !field.is_empty() || !record.is_empty() || quoted {
        record.push(field);
        push_record(&mut records, record);
    }

    Ok(records)
}

/// 空行でなければ追加
fn push_record(records: &mut Vec<Vec<String>>, record: Vec<String>) {
    let is_blank = record.len() == 1 && record[0].trim().is_empty();
    if !is_blank {
        records.push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_csv() {
        let table = parse_table("PartNumber,Description\nM1,Bracket\nM2,Bolt\n").unwrap();
        assert_eq!(table.headers, vec!["PartNumber", "Description"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1], vec!["M2", "Bolt"]);
        assert_eq!(table.delimiter, ',');
    }

    #[test]
    fn test_parse_quoted_fields() {
        let text = "Part,Desc\n\"M1\",\"Bracket, left\"\n\"M2\",\"6\"\" \"\"bolt\"\"\"\n";
        let table = parse_table(text).unwrap();
        assert_eq!(table.rows[0][1], "Bracket, left");
        assert_eq!(table.rows[1][1], "6\" \"bolt\"");
    }

    #[test]
    fn test_parse_newline_inside_quotes() {
        let text = "Part,Desc\r\nM1,\"two\r\nlines\"\r\nM2,single\r\n";
        let table = parse_table(text).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][1], "two\r\nlines");
        assert_eq!(table.rows[1][0], "M2");
    }

    #[test]
    fn test_parse_skips_empty_lines() {
        let table = parse_table("a,b\n\n1,2\n\n\n3,4").unwrap();
        assert_eq!(table.rows, vec![vec!["1", "2"], vec!["3", "4"]]);
    }

    #[test]
    fn test_parse_pads_short_rows() {
        let table = parse_table("a,b,c\n1\n1,2,3,4").unwrap();
        assert_eq!(table.rows[0], vec!["1", "", ""]);
        assert_eq!(table.rows[1], vec!["1", "2", "3"]);
    }

    #[test]
    fn test_parse_strips_bom_and_trims_headers() {
        let table = parse_table("\u{feff} Part No , Desc \nM1,x").unwrap();
        assert_eq!(table.headers, vec!["Part No", "Desc"]);
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(matches!(parse_table(""), Err(Error::Parse(_))));
        assert!(matches!(parse_table("  \n \n"), Err(Error::Parse(_))));
    }

    #[test]
    fn test_parse_unterminated_quote() {
        let result = parse_table("a,b\n\"M1,oops\n");
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_detect_semicolon() {
        assert_eq!(detect_delimiter("Part;Desc\nM1;a, b\nM2;c"), ';');
    }

    #[test]
    fn test_detect_tab() {
        let table = parse_table("Part\tDesc\nM1\tBracket, left").unwrap();
        assert_eq!(table.delimiter, '\t');
        assert_eq!(table.rows[0][1], "Bracket, left");
    }

    #[test]
    fn test_detect_single_column_defaults_to_comma() {
        assert_eq!(detect_delimiter("Name\nfoo\nbar"), ',');
        let table = parse_table("Name\nfoo\nbar").unwrap();
        assert_eq!(table.width(), 1);
    }

    #[test]
    fn test_header_only() {
        let table = parse_table("Part,Desc\n").unwrap();
        assert_eq!(table.width(), 2);
        assert!(table.rows.is_empty());
    }
}
