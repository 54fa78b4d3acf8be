// ==========================================
// 库存看板系统 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 存储写入失败只作为告警上报，内存数据仍然可用
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 持久化错误 =====
    #[error("存储写入失败 (key={key}): {message}")]
    StorageWrite { key: String, message: String },

    #[error("存储读取失败 (key={key}): {message}")]
    StorageRead { key: String, message: String },

    #[error("序列化失败: {0}")]
    Serialization(String),

    // ===== 数据库错误 =====
    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RepositoryError {
    /// 写入失败（调用方记录告警后继续使用内存数据）
    pub fn is_write_failure(&self) -> bool {
        matches!(self, RepositoryError::StorageWrite { .. })
    }
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => RepositoryError::DatabaseQueryError(msg),
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

// 实现 From<serde_json::Error>
impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Serialization(err.to_string())
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
