//! Output Namer Module
//!
//! 入力ファイル名と設定から出力ファイル名を決定する純粋関数を提供します。

/// カスタムサフィックスが指定されていない場合の既定サフィックス
pub const DEFAULT_SUFFIX: &str = "已处理";

/// 検証に失敗したファイルの出力名に付与する接頭辞
pub const FAIL_PREFIX: &str = "FALSE_";

/// 出力ファイル名の構成要素
///
/// `stem`と`extension`は入力ファイル名から取り出したものをそのまま使います
/// （`extension`は先頭のドットを含む、例: `.xlsx`）。
#[derive(Debug, Clone, Copy)]
pub struct OutputName<'a> {
    pub stem: &'a str,
    pub extension: &'a str,
    pub file_index: usize,
    pub custom_suffixes: &'a [String],
    pub failed: bool,
    pub check_requested: bool,
}

impl OutputName<'_> {
    /// 既定サフィックスを使って出力ファイル名を導出する
    pub fn derive(&self) -> String {
        self.derive_with_default(DEFAULT_SUFFIX)
    }

    /// 既定サフィックスを指定して出力ファイル名を導出する
    pub fn derive_with_default(&self, default_suffix: &str) -> String {
        let suffix = select_suffix(self.file_index, self.custom_suffixes, default_suffix);
        let prefix = if self.failed && self.check_requested {
            FAIL_PREFIX
        } else {
            ""
        };
        format!("{}{}_{}{}", prefix, self.stem, suffix, self.extension)
    }
}

/// 出力ファイル名を導出する
///
/// `"{接頭辞}{stem}_{サフィックス}{extension}"`。接頭辞は`failed && check_requested`のとき
/// [`FAIL_PREFIX`]、それ以外は空です。
///
/// # 使用例
///
/// ```rust
/// use xlsxbatch::derive_name;
///
/// assert_eq!(derive_name("report", ".xlsx", 0, &[], false, true), "report_已处理.xlsx");
/// assert_eq!(derive_name("report", ".xlsx", 0, &[], true, true), "FALSE_report_已处理.xlsx");
/// ```
pub fn derive_name(
    stem: &str,
    extension: &str,
    file_index: usize,
    custom_suffixes: &[String],
    failed: bool,
    check_requested: bool,
) -> String {
    OutputName {
        stem,
        extension,
        file_index,
        custom_suffixes,
        failed,
        check_requested,
    }
    .derive()
}

/// サフィックスの選択規則
///
/// - カスタムサフィックスが空 → 既定サフィックス
/// - `file_index`が範囲内 → `custom_suffixes[file_index]`
/// - 範囲外 → 最後のサフィックスに`file_index - len + 1`を連結
fn select_suffix(file_index: usize, custom_suffixes: &[String], default_suffix: &str) -> String {
    match custom_suffixes.last() {
        None => default_suffix.to_string(),
        Some(_) if file_index < custom_suffixes.len() => custom_suffixes[file_index].clone(),
        Some(last) => format!("{}{}", last, file_index - custom_suffixes.len() + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suffixes(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_suffix() {
        assert_eq!(
            derive_name("report", ".xlsx", 0, &[], false, false),
            "report_已处理.xlsx"
        );
    }

    #[test]
    fn test_fail_prefix_requires_check() {
        assert_eq!(
            derive_name("report", ".xlsx", 0, &[], true, true),
            "FALSE_report_已处理.xlsx"
        );
        assert_eq!(
            derive_name("report", ".xlsx", 0, &[], true, false),
            "report_已处理.xlsx"
        );
    }

    #[test]
    fn test_custom_suffix_by_index() {
        let s = suffixes(&["Q1", "Q2"]);
        assert_eq!(derive_name("r", ".xlsx", 0, &s, false, true), "r_Q1.xlsx");
        assert_eq!(derive_name("r", ".xlsx", 1, &s, false, true), "r_Q2.xlsx");
    }

    #[test]
    fn test_custom_suffix_overflow() {
        let s = suffixes(&["Q1", "Q2"]);
        assert_eq!(derive_name("r", ".xlsx", 2, &s, false, true), "r_Q21.xlsx");
        assert_eq!(derive_name("r", ".xlsx", 5, &s, false, true), "r_Q24.xlsx");
        assert_eq!(derive_name("r", ".xlsx", 5, &s, true, true), "FALSE_r_Q24.xlsx");
    }

    #[test]
    fn test_stem_and_extension_untouched() {
        assert_eq!(
            derive_name("Data.V2 ÄÖ", ".XLSX", 0, &[], false, false),
            "Data.V2 ÄÖ_已处理.XLSX"
        );
        assert_eq!(derive_name("noext", "", 0, &[], false, false), "noext_已处理");
    }

    #[test]
    fn test_custom_default_suffix() {
        let name = OutputName {
            stem: "a",
            extension: ".xlsx",
            file_index: 0,
            custom_suffixes: &[],
            failed: false,
            check_requested: false,
        };
        assert_eq!(name.derive_with_default("processed"), "a_processed.xlsx");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_name_shape(
                stem in "[a-z0-9]{1,12}",
                list in proptest::collection::vec("[a-zA-Z0-9]{1,6}", 0..10),
                index in 0usize..20,
                failed in any::<bool>(),
                check in any::<bool>(),
            ) {
                let name = derive_name(&stem, ".xlsx", index, &list, failed, check);
                prop_assert!(name.ends_with(".xlsx"));
                prop_assert_eq!(name.starts_with(FAIL_PREFIX), failed && check);
                let body = name.strip_prefix(FAIL_PREFIX).filter(|_| failed && check).unwrap_or(&name);
                let expected_prefix = format!("{}_", stem);
                prop_assert!(body.starts_with(&expected_prefix));
                // 同じ入力からは常に同じ名前
                prop_assert_eq!(name.clone(), derive_name(&stem, ".xlsx", index, &list, failed, check));
            }
        }
    }
}
