//! Column Matcher Module
//!
//! ヘッダー名にマーカー文字列（既定: `starttime`）を含む列を検出するモジュール。

use crate::types::CellValue;

/// 列名マーカーの既定値
pub const DEFAULT_MARKER: &str = "starttime";

/// 列名マーカーによる列検出器
///
/// 照合は大文字小文字を区別しない部分一致です。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMatcher {
    marker_lower: String,
}

impl Default for ColumnMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER)
    }
}

impl ColumnMatcher {
    pub fn new(marker: &str) -> Self {
        Self {
            marker_lower: marker.to_lowercase(),
        }
    }

    /// 列名がマーカーを含むか
    pub fn matches(&self, name: &str) -> bool {
        name.to_lowercase().contains(&self.marker_lower)
    }

    /// ヘッダー列から一致する列名を元の順序で返す
    ///
    /// 文字列以外のヘッダーは対象外です。一致する列がない場合は空のベクターを返します。
    pub fn find_matches<'a, I>(&self, headers: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a CellValue>,
    {
        headers
            .into_iter()
            .filter_map(|header| match header {
                CellValue::String(name) if self.matches(name) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }
}
