// ==========================================
// 库存看板系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供 UI 层 / CLI 调用
// ==========================================

pub mod dashboard_api;
pub mod error;

// 重导出核心类型
pub use dashboard_api::{
    BucketStatus, ChartCollector, ChartEmitter, DashboardApi, DashboardImporter, RenderCall,
};
pub use error::{ApiError, ApiResult};
