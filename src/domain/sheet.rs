// ==========================================
// 库存看板系统 - 原始工作表模型
// ==========================================
// 职责: 文件解析层的输出（表头 + 原始单元格行）
// 约束: 不做任何类型推断，保持单元格原貌
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 原始单元格值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Empty,
}

impl CellValue {
    /// 空单元格或仅含空白的文本
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Empty => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value.to_string())
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

/// 原始数据行
pub type RawRow = Vec<CellValue>;

/// 原始工作表（第一行为表头）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSheet {
    /// 工作表名称（CSV 为文件名）
    pub name: String,

    /// 表头行
    pub headers: Vec<String>,

    /// 数据行（不含表头，已跳过全空行）
    pub rows: Vec<RawRow>,

    /// 解析时跳过的全空行数
    pub skipped_blank_rows: usize,
}

impl RawSheet {
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<RawRow>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows,
            skipped_blank_rows: 0,
        }
    }
}
