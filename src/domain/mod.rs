// ==========================================
// 库存看板系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含数据访问逻辑，不含引擎逻辑
// ==========================================

pub mod aggregate;
pub mod record;
pub mod sheet;
pub mod types;
pub mod upload;

// 重导出核心类型
pub use aggregate::{Aggregate, AggregateEntry, ChartSeries, GroupKey, SeriesPoint, UNMATCHED_LABEL};
pub use record::{MetricDescriptor, MetricField, StockRecord, METRIC_DESCRIPTORS};
pub use sheet::{CellValue, RawRow, RawSheet};
pub use types::{Bucket, ChartKind, ChartUnit, Dimension, MetricKind};
pub use upload::{BucketedRecords, SheetPreview, UploadOutcome, UploadSummary};
