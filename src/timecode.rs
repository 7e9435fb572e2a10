//! Time Code Module
//!
//! ミリ秒値を`HH:MM:SS:mmm`形式の時刻コードに変換するモジュール。

use crate::types::{CellValue, TimeCode};

/// 数値として解釈できない入力に対して出力する文字列
pub const INVALID_TIME: &str = "无效时间";

/// ミリ秒値を`HH:MM:SS:mmm`形式に整形する
///
/// 剰余は床関数ベース（結果は除数と同符号）で計算します。
/// 負の値や24時間を超える値は補正せず、そのまま各フィールドに反映されます。
/// 非有限値（NaN、±∞）は[`INVALID_TIME`]を返します。
///
/// # 使用例
///
/// ```rust
/// use xlsxbatch::format_millis;
///
/// assert_eq!(format_millis(3_723_004.0), "01:02:03:004");
/// assert_eq!(format_millis(f64::NAN), "无效时间");
/// ```
pub fn format_millis(ms: f64) -> String {
    if !ms.is_finite() {
        return INVALID_TIME.to_string();
    }

    let total_seconds = ms / 1000.0;
    let hours = (total_seconds / 3600.0).floor();
    let minutes = (total_seconds.rem_euclid(3600.0) / 60.0).floor();
    let seconds = total_seconds.rem_euclid(60.0).floor();
    let millis = ms.rem_euclid(1000.0).floor();

    format!(
        "{:02}:{:02}:{:02}:{:03}",
        hours as i64, minutes as i64, seconds as i64, millis as i64
    )
}

/// セル値から時刻コードを導出する
///
/// - 空セル → `TimeCode::Empty`
/// - 数値・論理値（1/0） → 整形済み時刻
/// - 日付 → `TimeCode::Invalid`
/// - 文字列 → 前後の空白を除いて数値として解釈できれば整形、できなければ`TimeCode::Invalid`
pub fn time_code(cell: &CellValue) -> TimeCode {
    let ms = match cell {
        CellValue::Empty => return TimeCode::Empty,
        CellValue::DateTime(_) => return TimeCode::Invalid,
        CellValue::String(s) => match s.trim().parse::<f64>() {
            Ok(v) => v,
            Err(_) => return TimeCode::Invalid,
        },
        other => match other.as_number() {
            Some(v) => v,
            None => return TimeCode::Invalid,
        },
    };

    if !ms.is_finite() {
        return TimeCode::Invalid;
    }
    TimeCode::Formatted(format_millis(ms))
}
