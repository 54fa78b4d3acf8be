// ==========================================
// 库存看板系统 - 引擎层
// ==========================================
// 职责: 分桶 / 聚合 / 排序 / 图表计划
// 红线: 引擎为纯计算，不访问存储，不做 IO
// ==========================================

pub mod aggregator;
pub mod chart_plan;
pub mod classifier;
pub mod ordering;

// 重导出核心引擎
pub use aggregator::{Aggregator, DimensionDomain};
pub use chart_plan::{build_series, chart_plan, ChartSpec};
pub use classifier::{definition_of, BucketDefinition, Classifier, BUCKET_DEFINITIONS};
pub use ordering::{order_aggregate, order_points, range_umur_rank, split_series};
