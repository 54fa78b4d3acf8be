// ==========================================
// 库存看板系统 - 应用层
// ==========================================
// 职责: 组装各层，供 CLI / UI 宿主使用
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState, DB_PATH_ENV};
