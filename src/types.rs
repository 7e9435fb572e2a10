//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。
//! テーブルは列の順序付きリストで、すべての列は同じ行数を持ちます。

use std::collections::HashMap;

use crate::error::BatchError;

/// セルの値を表す列挙型
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// 数値（f64）
    Number(f64),

    /// 文字列
    String(String),

    /// 論理値
    Bool(bool),

    /// 日付・時刻（Excelのシリアル値）
    DateTime(f64),

    /// 空セル
    Empty,
}

impl CellValue {
    /// 値が空かどうかを判定
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// 数値として解釈した値を返す
    ///
    /// 論理値は1/0として扱います。文字列・日付・空セルは`None`です。
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            CellValue::String(_) | CellValue::DateTime(_) | CellValue::Empty => None,
        }
    }

    /// 値を文字列として取得（書式適用前）
    pub fn as_raw_string(&self) -> String {
        match self {
            CellValue::Number(n) => n.to_string(),
            CellValue::String(s) => s.clone(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::DateTime(serial) => serial.to_string(),
            CellValue::Empty => String::new(),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::String(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::String(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Empty)
    }
}

/// テーブルの1列
///
/// ヘッダーもセルとして保持します。ヘッダーが文字列の場合のみ列名として扱われ、
/// 数値や論理値のヘッダーは列名照合の対象外です。
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    header: CellValue,
    cells: Vec<CellValue>,
}

impl Column {
    /// 文字列ヘッダーを持つ列を生成
    pub fn new(name: impl Into<String>, cells: Vec<CellValue>) -> Self {
        Self {
            header: CellValue::String(name.into()),
            cells,
        }
    }

    /// 任意のヘッダーセルを持つ列を生成
    pub fn with_header(header: CellValue, cells: Vec<CellValue>) -> Self {
        Self { header, cells }
    }

    /// ヘッダーセル
    pub fn header(&self) -> &CellValue {
        &self.header
    }

    /// 列名（ヘッダーが文字列の場合のみ）
    pub fn name(&self) -> Option<&str> {
        match &self.header {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// データセル（ヘッダーを含まない）
    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }

    /// データ行数
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// データ行が存在しないかどうか
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// 名前付き列の順序付きコレクション
///
/// # 不変条件
///
/// すべての列は同じ行数を持ちます。列は追加または同名列の置き換えのみ可能で、
/// 削除・並べ替えはできません。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    height: usize,
}

impl Table {
    /// 空のテーブルを生成
    pub fn new() -> Self {
        Self::default()
    }

    /// 列のリストからテーブルを生成
    ///
    /// 行数が揃っていない場合は`BatchError::ColumnLength`を返します。
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, BatchError> {
        let mut table = Self::new();
        for column in columns {
            table.push_column(column)?;
        }
        Ok(table)
    }

    /// ヘッダー行とデータ行（行優先）からテーブルを生成
    ///
    /// 短い行は空セルで補完し、ヘッダーより長い行の余剰セルには
    /// `Unnamed: {index}`ヘッダーの列を割り当てます。
    /// 空のヘッダーセルも`Unnamed: {index}`になります。
    /// 重複した列名には`.1`、`.2`…を付けて一意にします。
    pub fn from_rows(header: Vec<CellValue>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(header.len()))
            .max()
            .unwrap_or(0);
        let height = rows.len();

        let mut columns: Vec<Column> = (0..width)
            .map(|col_idx| {
                let header = match header.get(col_idx) {
                    Some(CellValue::Empty) | None => {
                        CellValue::String(format!("Unnamed: {}", col_idx))
                    }
                    Some(value) => value.clone(),
                };
                Column::with_header(header, Vec::with_capacity(height))
            })
            .collect();
        dedupe_names(&mut columns);

        for row in rows {
            let mut cells = row.into_iter();
            for column in columns.iter_mut() {
                column.cells.push(cells.next().unwrap_or(CellValue::Empty));
            }
        }

        Self { columns, height }
    }

    /// データ行数
    pub fn height(&self) -> usize {
        self.height
    }

    /// 列数
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// すべての列
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// ヘッダーセルの一覧（列順）
    pub fn headers(&self) -> impl Iterator<Item = &CellValue> {
        self.columns.iter().map(Column::header)
    }

    /// 列名で列を検索（最初に一致した列）
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == Some(name))
    }

    /// 同名の列を置き換える（なければ末尾に追加）
    ///
    /// 置き換えた列の位置は変わりません。行数の検証は`push_column`と同じです。
    pub fn set_column(&mut self, column: Column) -> Result<(), BatchError> {
        let position = column
            .name()
            .and_then(|name| self.columns.iter().position(|c| c.name() == Some(name)));

        match position {
            Some(index) => {
                if column.len() != self.height {
                    return Err(BatchError::ColumnLength {
                        column: column.header.as_raw_string(),
                        expected: self.height,
                        actual: column.len(),
                    });
                }
                self.columns[index] = column;
                Ok(())
            }
            None => self.push_column(column),
        }
    }

    /// 列を末尾に追加
    ///
    /// 最初の列はテーブルの行数を決定します。以降の列は同じ行数でなければなりません。
    pub fn push_column(&mut self, column: Column) -> Result<(), BatchError> {
        if self.columns.is_empty() {
            self.height = column.len();
        } else if column.len() != self.height {
            return Err(BatchError::ColumnLength {
                column: column.header.as_raw_string(),
                expected: self.height,
                actual: column.len(),
            });
        }
        self.columns.push(column);
        Ok(())
    }
}

/// 重複した文字列ヘッダーに`.{n}`を付けて一意にする
///
/// 付与後の名前が既存の列名と衝突する場合は番号を進めます。
fn dedupe_names(columns: &mut [Column]) {
    let mut counts: HashMap<String, usize> = HashMap::new();

    for column in columns.iter_mut() {
        let mut name = match &column.header {
            CellValue::String(s) => s.clone(),
            _ => continue,
        };

        let mut seen = counts.get(&name).copied().unwrap_or(0);
        if seen > 0 {
            while seen > 0 {
                counts.insert(name.clone(), seen + 1);
                name = format!("{}.{}", name, seen);
                seen = counts.get(&name).copied().unwrap_or(0);
            }
            column.header = CellValue::String(name.clone());
        }
        counts.insert(name, seen + 1);
    }
}

/// 1セル分の割り切り判定結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DivisibilityFlag {
    /// 除数の整数倍
    Divisible,
    /// 除数の整数倍ではない
    NotDivisible,
    /// 入力が空（判定対象外）
    NotApplicable,
}

impl DivisibilityFlag {
    /// 出力用のセル値（論理値、または判定対象外なら空セル）
    pub fn to_cell(self) -> CellValue {
        match self {
            DivisibilityFlag::Divisible => CellValue::Bool(true),
            DivisibilityFlag::NotDivisible => CellValue::Bool(false),
            DivisibilityFlag::NotApplicable => CellValue::Empty,
        }
    }
}

/// 時刻コード（`HH:MM:SS:mmm`）の導出結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeCode {
    /// 整形済みの時刻文字列
    Formatted(String),
    /// 数値として解釈できない入力
    Invalid,
    /// 入力が空
    Empty,
}

impl TimeCode {
    /// 出力用のセル値
    pub fn to_cell(&self) -> CellValue {
        match self {
            TimeCode::Formatted(s) => CellValue::String(s.clone()),
            TimeCode::Invalid => CellValue::String(crate::timecode::INVALID_TIME.to_string()),
            TimeCode::Empty => CellValue::Empty,
        }
    }
}
