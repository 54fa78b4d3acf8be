// ==========================================
// 库存看板系统 - 上传批次模型
// ==========================================
// 职责: 上传/分析结果汇总、数据预览
// ==========================================

use crate::domain::record::StockRecord;
use crate::domain::types::Bucket;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 按桶划分的记录集合（桶内保持原始行序）
pub type BucketedRecords = BTreeMap<Bucket, Vec<StockRecord>>;

// ==========================================
// UploadSummary - 上传汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadSummary {
    /// 批次 ID
    pub batch_id: String,

    /// 文件名（直接调用 process_upload 时为空）
    pub file_name: Option<String>,

    /// 工作表名
    pub sheet_name: String,

    /// 数据行数（不含表头）
    pub total_rows: usize,

    /// 解析时跳过的全空行
    pub skipped_blank_rows: usize,

    /// 各桶记录数
    pub bucket_counts: BTreeMap<Bucket, usize>,

    /// 不属于任何桶的行数
    pub unclassified_rows: usize,

    /// 未识别的表头（以合成字段名保存在 extras）
    pub unknown_headers: Vec<String>,

    /// 持久化告警（内存数据仍可用）
    pub storage_warnings: Vec<String>,

    /// 完成时间
    pub imported_at: DateTime<Utc>,

    /// 耗时（毫秒）
    pub elapsed_ms: i64,
}

// ==========================================
// UploadOutcome - 上传结果
// ==========================================
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub summary: UploadSummary,
    pub buckets: BucketedRecords,
}

// ==========================================
// SheetPreview - 数据预览
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetPreview {
    pub sheet_name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// 展示行数
    pub shown: usize,
    /// 总数据行数
    pub total_rows: usize,
}

impl SheetPreview {
    /// 预览说明（"Showing 10 of 250 rows"）
    pub fn caption(&self) -> String {
        format!("Showing {} of {} rows", self.shown, self.total_rows)
    }
}
