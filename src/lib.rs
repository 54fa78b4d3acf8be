// ==========================================
// 库存看板系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite + calamine
// 系统定位: 库存工作簿 → 分桶 → 分维度汇总 → 图表数据
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 分桶 / 聚合 / 排序
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{Bucket, ChartKind, ChartUnit, Dimension, MetricKind};

// 领域实体
pub use domain::{
    Aggregate, ChartSeries, GroupKey, MetricField, RawSheet, SheetPreview, StockRecord,
    UploadOutcome, UploadSummary,
};

// 引擎
pub use engine::{Aggregator, Classifier, DimensionDomain};

// API
pub use api::{ApiError, ChartCollector, ChartEmitter, DashboardApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "WIKA Stock Dashboard";

// 数据库版本
pub const DB_VERSION: &str = "v1";

// 默认存储命名空间
pub use repository::DEFAULT_NAMESPACE as STORAGE_NAMESPACE;
