// ==========================================
// 库存看板系统 - 聚合引擎
// ==========================================
// 职责: 单桶 × 单指标 × 单维度 求和
// 规则:
// - 维度值域中的每个键都出现在结果中（无记录时为 0）
// - 值域外的非空值按首次出现顺序追加
// - 维度值为空的记录计入 Undefined（始终存在，默认 0）
// - 变动指标与数量/金额指标各自独立累计
// ==========================================

use crate::domain::aggregate::{Aggregate, AggregateEntry, GroupKey, UNMATCHED_LABEL};
use crate::domain::record::{MetricField, StockRecord};
use crate::domain::types::Dimension;
use chrono::{Datelike, Local};
use std::collections::HashMap;
use tracing::instrument;

/// 年份维度起始年
pub const DEFAULT_YEAR_START: i32 = 2018;

pub const SBU_DOMAIN: [&str; 7] = ["BR", "HD", "MR", "PI", "PO", "RT", "RY"];
pub const PPB_DOMAIN: [&str; 4] = ["BGR", "BYL", "MJK", "PSR"];
pub const RANGE_UMUR_DOMAIN: [&str; 5] = [
    "0–1 tahun",
    "2–3 tahun",
    "4–5 tahun",
    "6–7 tahun",
    "> 8 tahun",
];
pub const AREA_DOMAIN: [&str; 6] = ["JABAR", "JATENG", "JATIM", "BALI", "NTT", "NTB"];

// ==========================================
// DimensionDomain - 维度值域
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionDomain {
    year_start: i32,
    year_end: i32,
}

impl Default for DimensionDomain {
    fn default() -> Self {
        Self::new(DEFAULT_YEAR_START, Local::now().year())
    }
}

impl DimensionDomain {
    /// 年份区间（闭区间；end < start 时年份值域为空）
    pub fn new(year_start: i32, year_end: i32) -> Self {
        Self {
            year_start,
            year_end,
        }
    }

    pub fn year_range(&self) -> (i32, i32) {
        (self.year_start, self.year_end)
    }

    /// 维度的固定值域（值域顺序即默认顺序）
    pub fn keys(&self, dimension: Dimension) -> Vec<String> {
        let fixed: &[&str] = match dimension {
            Dimension::Sbu => &SBU_DOMAIN,
            Dimension::Ppb => &PPB_DOMAIN,
            Dimension::RangeUmur => &RANGE_UMUR_DOMAIN,
            Dimension::Area => &AREA_DOMAIN,
            Dimension::Tahun => {
                return (self.year_start..=self.year_end)
                    .map(|y| y.to_string())
                    .collect();
            }
        };
        fixed.iter().map(|k| k.to_string()).collect()
    }
}

fn match_key(label: &str) -> String {
    label.trim().to_uppercase()
}

// ==========================================
// Aggregator - 聚合引擎
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    domain: DimensionDomain,
}

impl Aggregator {
    pub fn new(domain: DimensionDomain) -> Self {
        Self { domain }
    }

    pub fn domain(&self) -> &DimensionDomain {
        &self.domain
    }

    /// 聚合
    ///
    /// 条目顺序: 值域键 → 观测键（首次出现顺序）→ Undefined。
    /// 键比较大小写不敏感；观测键保留首次出现时的原始写法（已去除首尾空白）。
    #[instrument(skip(self, records), fields(count = records.len(), metric = %metric, dimension = %dimension))]
    pub fn aggregate(
        &self,
        records: &[StockRecord],
        metric: MetricField,
        dimension: Dimension,
    ) -> Aggregate {
        let mut entries: Vec<AggregateEntry> = self
            .domain
            .keys(dimension)
            .into_iter()
            .map(|label| AggregateEntry {
                key: GroupKey::Domain(label),
                total: 0.0,
                record_count: 0,
            })
            .collect();

        let mut index: HashMap<String, usize> = entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| (match_key(entry.key.label()), idx))
            .collect();

        let mut unmatched = AggregateEntry {
            key: GroupKey::Unmatched,
            total: 0.0,
            record_count: 0,
        };

        for record in records {
            let value = record.metric(metric);
            let value = if value.is_finite() { value } else { 0.0 };

            let slot = match record.dimension_value(dimension) {
                None => &mut unmatched,
                // 源数据中的字面 "Undefined" 与未匹配合并为同一标签
                Some(label) if match_key(&label) == match_key(UNMATCHED_LABEL) => &mut unmatched,
                Some(label) => {
                    let idx = *index.entry(match_key(&label)).or_insert_with(|| {
                        entries.push(AggregateEntry {
                            key: GroupKey::Observed(label.clone()),
                            total: 0.0,
                            record_count: 0,
                        });
                        entries.len() - 1
                    });
                    &mut entries[idx]
                }
            };

            slot.total += value;
            slot.record_count += 1;
        }

        entries.push(unmatched);

        Aggregate {
            metric,
            dimension,
            entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aggregator() -> Aggregator {
        Aggregator::new(DimensionDomain::new(2018, 2024))
    }

    fn bebas(sbu: &str, tahun: i32, stok: f64) -> StockRecord {
        StockRecord {
            sbu: sbu.to_string(),
            tahun,
            stok_bebas: stok,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_input_zero_fills_sbu() {
        let agg = aggregator().aggregate(&[], MetricField::StokBebas, Dimension::Sbu);

        assert_eq!(
            agg.labels(),
            vec!["BR", "HD", "MR", "PI", "PO", "RT", "RY", "Undefined"]
        );
        assert!(agg.entries.iter().all(|e| e.total == 0.0 && e.record_count == 0));
    }

    #[test]
    fn test_sums_case_insensitive() {
        let records = vec![bebas("BR", 2020, 5.0), bebas("br", 2020, 2.5), bebas("HD", 2020, 1.0)];
        let agg = aggregator().aggregate(&records, MetricField::StokBebas, Dimension::Sbu);

        assert_eq!(agg.get("BR"), Some(7.5));
        assert_eq!(agg.get("HD"), Some(1.0));
        assert_eq!(agg.get("RY"), Some(0.0));
        assert_eq!(agg.entries[0].record_count, 2);
    }

    #[test]
    fn test_blank_goes_to_unmatched() {
        let records = vec![bebas("", 2020, 4.0), bebas("   ", 0, 1.0)];
        let agg = aggregator().aggregate(&records, MetricField::StokBebas, Dimension::Sbu);

        assert_eq!(agg.unmatched_total(), 5.0);
        assert_eq!(agg.entries.last().map(|e| e.key.clone()), Some(GroupKey::Unmatched));
    }

    #[test]
    fn test_literal_undefined_folds_into_unmatched() {
        let records = vec![bebas("undefined", 2020, 2.0), bebas("", 2020, 3.0), bebas(" UNDEFINED ", 2020, 1.0)];
        let agg = aggregator().aggregate(&records, MetricField::StokBebas, Dimension::Sbu);

        let labels = agg.labels();
        assert_eq!(labels.iter().filter(|l| **l == UNMATCHED_LABEL).count(), 1);
        assert_eq!(labels.len(), 8);
        assert_eq!(agg.unmatched_total(), 6.0);
        assert!(agg.entries.iter().all(|e| !matches!(e.key, GroupKey::Observed(_))));
    }

    #[test]
    fn test_observed_key_appended_before_unmatched() {
        let records = vec![bebas("XX", 2020, 3.0), bebas("BR", 2020, 1.0), bebas("xx", 2020, 1.0)];
        let agg = aggregator().aggregate(&records, MetricField::StokBebas, Dimension::Sbu);

        let labels = agg.labels();
        assert_eq!(labels[7], "XX");
        assert_eq!(labels[8], "Undefined");
        assert_eq!(agg.get("XX"), Some(4.0));
        assert_eq!(agg.get("BR"), Some(1.0));
        assert_eq!(agg.entries[7].key, GroupKey::Observed("XX".to_string()));
    }

    #[test]
    fn test_year_domain_and_year_zero() {
        let records = vec![bebas("BR", 2021, 1.0), bebas("BR", 0, 2.0), bebas("BR", 2015, 3.0)];
        let agg = aggregator().aggregate(&records, MetricField::StokBebas, Dimension::Tahun);

        assert_eq!(
            agg.labels(),
            vec!["2018", "2019", "2020", "2021", "2022", "2023", "2024", "2015", "Undefined"]
        );
        assert_eq!(agg.get("2021"), Some(1.0));
        assert_eq!(agg.get("2015"), Some(3.0));
        assert_eq!(agg.unmatched_total(), 2.0);
    }

    #[test]
    fn test_movement_accumulated_separately() {
        let record = StockRecord {
            sbu: "BR".to_string(),
            stok_distribusi: 10.0,
            mutasi_stok_distribusi: -4.0,
            ..Default::default()
        };
        let agg = aggregator();
        let base = agg.aggregate(&[record.clone()], MetricField::StokDistribusi, Dimension::Sbu);
        let movement = agg.aggregate(&[record], MetricField::MutasiStokDistribusi, Dimension::Sbu);

        assert_eq!(base.get("BR"), Some(10.0));
        assert_eq!(movement.get("BR"), Some(-4.0));
    }

    #[test]
    fn test_range_umur_domain_matches_en_dash_labels() {
        let record = StockRecord {
            range_umur: "0–1 TAHUN".to_string(),
            saldo_ok: 9.0,
            ..Default::default()
        };
        let agg = aggregator().aggregate(&[record], MetricField::SaldoOk, Dimension::RangeUmur);
        assert_eq!(agg.get("0–1 tahun"), Some(9.0));
        assert_eq!(agg.entries.len(), 6);
    }

    #[test]
    fn test_default_domain_ends_at_current_year() {
        let domain = DimensionDomain::default();
        let keys = domain.keys(Dimension::Tahun);
        assert_eq!(keys.first().map(String::as_str), Some("2018"));
        assert_eq!(keys.last(), Some(&Local::now().year().to_string()));
    }
}
