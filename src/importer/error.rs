// ==========================================
// 库存看板系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 单元格级别的类型转换不产生错误（一律降级为 0 / 空串）
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 结构错误（整次上传中止）=====
    #[error("工作表不存在: {missing}（可用工作表: {available:?}）")]
    MissingSheet {
        missing: String,
        available: Vec<String>,
    },

    #[error("工作表 {sheet} 缺少必需列: {}", columns.join(", "))]
    MissingColumns { sheet: String, columns: Vec<String> },

    #[error("工作表 {sheet} 为空或无数据行（至少需要表头 + 1 行数据）")]
    EmptySheet { sheet: String },

    // ===== 写入错误 =====
    #[error("仓储错误: {0}")]
    Repository(#[from] RepositoryError),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// 是否为结构性错误（需用户修正文件后重新上传）
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ImportError::MissingSheet { .. }
                | ImportError::MissingColumns { .. }
                | ImportError::EmptySheet { .. }
        )
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
