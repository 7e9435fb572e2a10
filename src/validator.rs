//! Row Validator Module
//!
//! 列の各セルが除数（既定: 40）の整数倍かどうかを判定するモジュール。

use crate::error::BatchError;
use crate::types::{CellValue, DivisibilityFlag};

/// 除数の既定値
pub const DEFAULT_DIVISOR: f64 = 40.0;

/// 列の各セルについて割り切り判定を行う
///
/// - 空セル → `NotApplicable`
/// - 数値（論理値は1/0） → `value % divisor == 0`なら`Divisible`、それ以外は`NotDivisible`
///
/// 丸めは行いません。小数値は浮動小数点の剰余規則にそのまま従います。
///
/// # 戻り値
///
/// * `Ok(Vec<DivisibilityFlag>)` - セルごとの判定結果（入力と同じ順序・長さ）
/// * `Err(BatchError::NonNumericCell)` - 文字列・日付セルが含まれる場合
pub fn check_divisible(
    column: &str,
    values: &[CellValue],
    divisor: f64,
) -> Result<Vec<DivisibilityFlag>, BatchError> {
    values
        .iter()
        .enumerate()
        .map(|(row, value)| match value {
            CellValue::Empty => Ok(DivisibilityFlag::NotApplicable),
            CellValue::String(_) | CellValue::DateTime(_) => Err(BatchError::NonNumericCell {
                column: column.to_string(),
                row,
                value: value.as_raw_string(),
            }),
            other => {
                // as_numberは数値・論理値では常にSome
                let n = other.as_number().unwrap_or(f64::NAN);
                Ok(if n % divisor == 0.0 {
                    DivisibilityFlag::Divisible
                } else {
                    DivisibilityFlag::NotDivisible
                })
            }
        })
        .collect()
}

/// 判定結果に`NotDivisible`が1つでも含まれるか
///
/// `NotApplicable`は不正として数えません。
pub fn any_invalid(flags: &[DivisibilityFlag]) -> bool {
    flags.contains(&DivisibilityFlag::NotDivisible)
}
