// ==========================================
// 库存看板系统 - 聚合结果模型
// ==========================================
// 职责: 分组键 / 聚合表 / 有序序列 / 图表数据
// ==========================================

use crate::domain::record::MetricField;
use crate::domain::types::{Bucket, ChartKind, ChartUnit, Dimension};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 未匹配键的显示标签
pub const UNMATCHED_LABEL: &str = "Undefined";

// ==========================================
// GroupKey - 分组键
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "source", content = "label", rename_all = "snake_case")]
pub enum GroupKey {
    /// 维度固定值域中的键（始终出现）
    Domain(String),
    /// 数据中出现但不在值域内的键（按首次出现顺序追加）
    Observed(String),
    /// 维度值为空的记录（始终出现，默认 0）
    Unmatched,
}

impl GroupKey {
    pub fn label(&self) -> &str {
        match self {
            GroupKey::Domain(label) | GroupKey::Observed(label) => label,
            GroupKey::Unmatched => UNMATCHED_LABEL,
        }
    }

    pub fn is_unmatched(&self) -> bool {
        matches!(self, GroupKey::Unmatched)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ==========================================
// Aggregate - 单指标 × 单维度 聚合表
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateEntry {
    pub key: GroupKey,
    pub total: f64,
    pub record_count: usize,
}

/// 聚合表（条目顺序: 值域键 → 观测键 → 未匹配键）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub metric: MetricField,
    pub dimension: Dimension,
    pub entries: Vec<AggregateEntry>,
}

impl Aggregate {
    /// 按标签取合计值（大小写不敏感）
    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.key.label().eq_ignore_ascii_case(label.trim()))
            .map(|e| e.total)
    }

    pub fn unmatched_total(&self) -> f64 {
        self.entries
            .iter()
            .find(|e| e.key.is_unmatched())
            .map(|e| e.total)
            .unwrap_or(0.0)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.key.label()).collect()
    }

    pub fn grand_total(&self) -> f64 {
        self.entries.iter().map(|e| e.total).sum()
    }
}

// ==========================================
// SeriesPoint - 有序序列中的一个点
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

// ==========================================
// ChartSeries - 交给图表层的数据
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub bucket: Bucket,
    pub chart_id: String,
    pub title: String,
    pub kind: ChartKind,
    pub dimension: Dimension,
    pub metric: MetricField,
    pub unit: ChartUnit,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    /// 画布 ID（chart-{bucket}-{id}）
    pub fn canvas_id(&self) -> String {
        format!("chart-{}-{}", self.bucket, self.chart_id)
    }
}
