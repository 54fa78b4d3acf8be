// ==========================================
// 库存看板系统 - 图表计划
// ==========================================
// 职责: 每个桶需要渲染哪些图表（指标 × 维度 × 图表类型 × 标题）
// 说明: 计划是静态的，与数据无关；数据由聚合 + 排序填充
// ==========================================

use crate::domain::aggregate::ChartSeries;
use crate::domain::record::{MetricField, StockRecord};
use crate::domain::types::{Bucket, ChartKind, ChartUnit, Dimension};
use crate::engine::aggregator::Aggregator;
use crate::engine::classifier::definition_of;
use crate::engine::ordering::{order_aggregate, split_series};
use serde::{Deserialize, Serialize};

// ==========================================
// ChartSpec - 图表描述
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub id: String,
    pub title: String,
    pub metric: MetricField,
    pub dimension: Dimension,
    pub kind: ChartKind,
}

impl ChartSpec {
    pub fn unit(&self) -> ChartUnit {
        self.metric.kind().unit()
    }
}

fn spec(
    id: &str,
    title: String,
    metric: MetricField,
    dimension: Dimension,
    kind: ChartKind,
) -> ChartSpec {
    ChartSpec {
        id: id.to_string(),
        title,
        metric,
        dimension,
        kind,
    }
}

/// "Jumlah Stok PPB (Btg) tiap SBU"
fn stock_title(bucket: Bucket, metric: MetricField, dimension: Dimension) -> String {
    format!(
        "Jumlah Stok {} ({}) tiap {}",
        bucket.display_name(),
        metric.kind().unit().label(),
        dimension.display_name()
    )
}

/// "Jumlah Mutasi Stok Titipan Murni (Rp) tiap Tahun"
fn movement_title(bucket: Bucket, metric: MetricField, dimension: Dimension) -> String {
    format!(
        "Jumlah Mutasi Stok {} ({}) tiap {}",
        bucket.display_name(),
        metric.kind().unit().label(),
        dimension.display_name()
    )
}

fn produksi_plan() -> Vec<ChartSpec> {
    let saat_ini = MetricField::StokProduksiSaatIni;
    let lalu = MetricField::StokProduksiLalu;
    vec![
        spec(
            "area-saat-ini",
            "Jumlah Stok Produksi Saat Ini (Btg) tiap Area".to_string(),
            saat_ini,
            Dimension::Area,
            ChartKind::Bar,
        ),
        spec(
            "area-lalu",
            "Jumlah Stok Produksi Lalu (Btg) tiap Area".to_string(),
            lalu,
            Dimension::Area,
            ChartKind::Bar,
        ),
        spec(
            "sbu-saat-ini",
            "Jumlah Stok Produksi Saat Ini (Btg) tiap SBU".to_string(),
            saat_ini,
            Dimension::Sbu,
            ChartKind::Bar,
        ),
        spec(
            "sbu-lalu",
            "Jumlah Stok Produksi Lalu (Btg) tiap SBU".to_string(),
            lalu,
            Dimension::Sbu,
            ChartKind::Bar,
        ),
        spec(
            "area-share",
            "Proporsi Stok Produksi Saat Ini tiap Area".to_string(),
            saat_ini,
            Dimension::Area,
            ChartKind::Pie,
        ),
    ]
}

/// 桶的图表计划
pub fn chart_plan(bucket: Bucket) -> Vec<ChartSpec> {
    if bucket == Bucket::Produksi {
        return produksi_plan();
    }

    let def = definition_of(bucket);
    let stok = def.count_metric();
    let saldo = def.value_metric();

    let mut plan = Vec::with_capacity(10);
    for (id, dimension, kind) in [
        ("sbu", Dimension::Sbu, ChartKind::Bar),
        ("ppb", Dimension::Ppb, ChartKind::Bar),
        ("range-umur", Dimension::RangeUmur, ChartKind::Bar),
        ("tahun", Dimension::Tahun, ChartKind::Line),
    ] {
        plan.push(spec(id, stock_title(bucket, stok, dimension), stok, dimension, kind));
        plan.push(spec(
            &format!("{}-saldo", id),
            stock_title(bucket, saldo, dimension),
            saldo,
            dimension,
            kind,
        ));
    }

    if let Some((mutasi_stok, mutasi_saldo)) = def.movement {
        plan.push(spec(
            "mutasi-tahun",
            movement_title(bucket, mutasi_stok, Dimension::Tahun),
            mutasi_stok,
            Dimension::Tahun,
            ChartKind::Line,
        ));
        plan.push(spec(
            "mutasi-saldo-tahun",
            movement_title(bucket, mutasi_saldo, Dimension::Tahun),
            mutasi_saldo,
            Dimension::Tahun,
            ChartKind::Line,
        ));
    }

    plan
}

/// 按计划计算桶的全部图表数据
pub fn build_series(
    aggregator: &Aggregator,
    bucket: Bucket,
    records: &[StockRecord],
) -> Vec<ChartSeries> {
    chart_plan(bucket)
        .into_iter()
        .map(|chart| {
            let aggregate = aggregator.aggregate(records, chart.metric, chart.dimension);
            let (labels, values) = split_series(&order_aggregate(&aggregate));
            ChartSeries {
                bucket,
                unit: chart.unit(),
                chart_id: chart.id,
                title: chart.title,
                kind: chart.kind,
                dimension: chart.dimension,
                metric: chart.metric,
                labels,
                values,
            }
        })
        .collect()
}
