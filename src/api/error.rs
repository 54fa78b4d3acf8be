// ==========================================
// 库存看板系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换导入/仓储错误为用户友好的错误消息
// ==========================================

use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 上传结构错误（用户修正文件后重新上传）
    // ==========================================
    #[error("工作表 {sheet} 缺少必需列: {}", columns.join(", "))]
    MissingColumns { sheet: String, columns: Vec<String> },

    #[error("工作表 {sheet} 没有数据行")]
    EmptySheet { sheet: String },

    #[error("工作表不存在: {missing}（可用工作表: {}）", available.join(", "))]
    MissingSheet {
        missing: String,
        available: Vec<String>,
    },

    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("文件导入失败: {0}")]
    ImportError(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("存储错误: {0}")]
    StorageError(String),

    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("配置读取失败: {0}")]
    ConfigError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 是否为文件结构问题（需要用户修正后重新上传）
    pub fn is_user_fixable(&self) -> bool {
        matches!(
            self,
            ApiError::MissingColumns { .. }
                | ApiError::EmptySheet { .. }
                | ApiError::MissingSheet { .. }
                | ApiError::InvalidInput(_)
        )
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::MissingColumns { sheet, columns } => {
                ApiError::MissingColumns { sheet, columns }
            }
            ImportError::EmptySheet { sheet } => ApiError::EmptySheet { sheet },
            ImportError::MissingSheet { missing, available } => {
                ApiError::MissingSheet { missing, available }
            }
            ImportError::FileNotFound(path) => ApiError::InvalidInput(format!("文件不存在: {}", path)),
            ImportError::UnsupportedFormat(ext) => ApiError::InvalidInput(format!(
                "文件格式不支持: {}（仅支持 .xlsx/.xls/.csv）",
                ext
            )),
            ImportError::Repository(repo_err) => repo_err.into(),
            ImportError::InternalError(msg) => ApiError::InternalError(msg),
            ImportError::Other(err) => ApiError::Other(err),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::StorageWrite { .. }
            | RepositoryError::StorageRead { .. }
            | RepositoryError::Serialization(_) => ApiError::StorageError(err.to_string()),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_keeps_full_list() {
        let api_err: ApiError = ImportError::MissingColumns {
            sheet: "Data".to_string(),
            columns: vec!["TYPE".to_string(), "HARSAT".to_string()],
        }
        .into();

        match &api_err {
            ApiError::MissingColumns { columns, .. } => assert_eq!(columns.len(), 2),
            other => panic!("Expected MissingColumns, got {:?}", other),
        }
        assert!(api_err.to_string().contains("TYPE, HARSAT"));
        assert!(api_err.is_user_fixable());
    }

    #[test]
    fn test_repository_error_conversion() {
        let api_err: ApiError = RepositoryError::StorageWrite {
            key: "wika-data-ok".to_string(),
            message: "readonly".to_string(),
        }
        .into();
        assert!(matches!(api_err, ApiError::StorageError(ref msg) if msg.contains("wika-data-ok")));
        assert!(!api_err.is_user_fixable());

        let nested: ApiError = ImportError::Repository(RepositoryError::LockError("poisoned".to_string())).into();
        assert!(matches!(nested, ApiError::DatabaseError(_)));
    }

    #[test]
    fn test_unsupported_format_is_invalid_input() {
        let api_err: ApiError = ImportError::UnsupportedFormat("pdf".to_string()).into();
        assert!(matches!(api_err, ApiError::InvalidInput(ref msg) if msg.contains("pdf")));
    }
}
