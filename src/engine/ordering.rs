// ==========================================
// 库存看板系统 - 展示排序策略
// ==========================================
// 职责: 聚合结果 → 有序 (label, value) 序列
// 规则:
// - tahun: 按年份升序，无法解析的键排在所有年份之后
// - range_umur: 按固定等级表升序，未知标签等级 999
// - 其他维度: 按合计值降序
// 约束: 不修改聚合结果；全部使用稳定排序，重复执行结果一致
// ==========================================

use crate::domain::aggregate::{Aggregate, SeriesPoint};
use crate::domain::types::Dimension;
use std::cmp::Ordering;

/// 库龄区间等级表
pub const RANGE_UMUR_RANK: [(&str, u32); 5] = [
    ("0–1 tahun", 1),
    ("2–3 tahun", 2),
    ("4–5 tahun", 3),
    ("6–7 tahun", 4),
    ("> 8 tahun", 5),
];

/// 未知库龄区间的等级
pub const UNKNOWN_RANK: u32 = 999;

pub fn range_umur_rank(label: &str) -> u32 {
    let label = label.trim();
    RANGE_UMUR_RANK
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(label))
        .map(|(_, rank)| *rank)
        .unwrap_or(UNKNOWN_RANK)
}

fn year_order(a: &SeriesPoint, b: &SeriesPoint) -> Ordering {
    let parse = |p: &SeriesPoint| p.label.trim().parse::<i32>().ok();
    match (parse(a), parse(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// 按维度排序一组点（稳定排序）
pub fn order_points(points: &[SeriesPoint], dimension: Dimension) -> Vec<SeriesPoint> {
    let mut ordered = points.to_vec();
    match dimension {
        Dimension::Tahun => ordered.sort_by(year_order),
        Dimension::RangeUmur => ordered.sort_by_key(|p| range_umur_rank(&p.label)),
        Dimension::Sbu | Dimension::Ppb | Dimension::Area => {
            ordered.sort_by(|a, b| b.value.total_cmp(&a.value))
        }
    }
    ordered
}

/// 聚合结果的展示序列
pub fn order_aggregate(aggregate: &Aggregate) -> Vec<SeriesPoint> {
    let points: Vec<SeriesPoint> = aggregate
        .entries
        .iter()
        .map(|entry| SeriesPoint {
            label: entry.key.label().to_string(),
            value: entry.total,
        })
        .collect();
    order_points(&points, aggregate.dimension)
}

/// 拆分为图表层需要的 (labels, values)
pub fn split_series(points: &[SeriesPoint]) -> (Vec<String>, Vec<f64>) {
    points.iter().map(|p| (p.label.clone(), p.value)).unzip()
}
