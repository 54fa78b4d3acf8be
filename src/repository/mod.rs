// ==========================================
// 库存看板系统 - 数据仓储层
// ==========================================
// 职责: 按桶存取库存记录，屏蔽存储细节
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化
// ==========================================

pub mod error;
pub mod stock_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use stock_repo::{
    CachedStockRepository, InMemoryStockStore, SqliteStockStorage, StockRepository,
    StockStoragePort, WriteOutcome, DEFAULT_NAMESPACE,
};
