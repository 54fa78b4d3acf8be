// ==========================================
// 库存看板系统 - 字段映射器实现
// ==========================================
// 职责: 源表头 → 标准字段映射 + 必需列校验 + 行转换
// 匹配顺序: 精确匹配 → 子串匹配 → 合成 snake_case 字段名
// ==========================================

use crate::domain::record::{MetricField, StockRecord, METRIC_DESCRIPTORS};
use crate::domain::sheet::{CellValue, RawRow};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::stock_importer_trait::{
    DataCleaner as DataCleanerTrait, FieldMapper as FieldMapperTrait,
};
use tracing::{debug, warn};

// ==========================================
// 标准字段
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    Npp,
    Tahun,
    Kategori,
    Wp,
    Ppb,
    Sbu,
    Area,
    Pelanggan,
    Proyek,
    Type,
    Harsat,
    UmurStok,
    RangeUmur,
    Keterangan,
    Metric(MetricField),
}

/// 通用列（同时也是必需列）
const COMMON_COLUMNS: [(&str, CanonicalField); 14] = [
    ("NPP", CanonicalField::Npp),
    ("TAHUN", CanonicalField::Tahun),
    ("KATEGORI", CanonicalField::Kategori),
    ("WP", CanonicalField::Wp),
    ("PPB", CanonicalField::Ppb),
    ("SBU", CanonicalField::Sbu),
    ("AREA", CanonicalField::Area),
    ("PELANGGAN", CanonicalField::Pelanggan),
    ("PROYEK", CanonicalField::Proyek),
    ("TYPE", CanonicalField::Type),
    ("HARSAT", CanonicalField::Harsat),
    ("UMUR STOK", CanonicalField::UmurStok),
    ("RANGE UMUR", CanonicalField::RangeUmur),
    ("KETERANGAN", CanonicalField::Keterangan),
];

/// 必需列名（指标列可缺省，缺省按 0 处理）
pub fn required_columns() -> Vec<&'static str> {
    COMMON_COLUMNS.iter().map(|(name, _)| *name).collect()
}

/// 完整名称表：通用列在前，指标列在后
fn name_table() -> Vec<(&'static str, CanonicalField)> {
    COMMON_COLUMNS
        .iter()
        .copied()
        .chain(
            METRIC_DESCRIPTORS
                .iter()
                .map(|d| (d.header, CanonicalField::Metric(d.field))),
        )
        .collect()
}

// ==========================================
// 表头解析结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Substring,
    Synthesized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnTarget {
    Canonical(CanonicalField),
    /// 未识别列，保存在 StockRecord::extras
    Extra(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnBinding {
    pub index: usize,
    pub header: String,
    pub target: ColumnTarget,
    pub match_kind: MatchKind,
}

/// 表头映射（空白表头的列被忽略）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    pub bindings: Vec<ColumnBinding>,
}

impl HeaderMap {
    /// 标准字段所绑定的列号
    pub fn column_of(&self, field: CanonicalField) -> Option<usize> {
        self.bindings
            .iter()
            .find(|b| b.target == ColumnTarget::Canonical(field))
            .map(|b| b.index)
    }

    /// 未识别的原始表头
    pub fn unknown_headers(&self) -> Vec<String> {
        self.bindings
            .iter()
            .filter(|b| b.match_kind == MatchKind::Synthesized)
            .map(|b| b.header.clone())
            .collect()
    }
}

/// 合成字段名: 小写 + 空白串替换为下划线
pub fn synthesize_field_name(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

fn normalize_header(header: &str) -> String {
    header.trim().to_uppercase()
}

/// 子串匹配
///
/// 表头包含标准名时取最长的标准名（"STOK PPB (BTG)" → STOK PPB，而不是 PPB）；
/// 否则取第一个包含表头的标准名。
fn substring_match(
    upper: &str,
    table: &[(&'static str, CanonicalField)],
) -> Option<CanonicalField> {
    let forward = table
        .iter()
        .filter(|(name, _)| upper.contains(name))
        .max_by_key(|(name, _)| name.len())
        .map(|(_, field)| *field);

    forward.or_else(|| {
        table
            .iter()
            .find(|(name, _)| name.contains(upper))
            .map(|(_, field)| *field)
    })
}

// ==========================================
// FieldMapper 实现
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct FieldMapper {
    cleaner: DataCleaner,
}

impl FieldMapper {
    pub fn new(cleaner: DataCleaner) -> Self {
        Self { cleaner }
    }

    fn assign(&self, record: &mut StockRecord, field: CanonicalField, cell: &CellValue) {
        let c = &self.cleaner;
        match field {
            CanonicalField::Npp => record.npp = c.clean_text(cell, false),
            CanonicalField::Tahun => record.tahun = c.to_integer(cell),
            CanonicalField::Kategori => record.kategori = c.clean_text(cell, true),
            CanonicalField::Wp => record.wp = c.clean_text(cell, true),
            CanonicalField::Ppb => record.ppb = c.clean_text(cell, true),
            CanonicalField::Sbu => record.sbu = c.clean_text(cell, true),
            CanonicalField::Area => record.area = c.clean_text(cell, true),
            CanonicalField::Pelanggan => record.pelanggan = c.clean_text(cell, false),
            CanonicalField::Proyek => record.proyek = c.clean_text(cell, false),
            CanonicalField::Type => record.product_type = c.clean_text(cell, false),
            CanonicalField::Harsat => record.harsat = c.to_number(cell),
            CanonicalField::UmurStok => record.umur_stok = c.to_integer(cell),
            CanonicalField::RangeUmur => record.range_umur = c.clean_text(cell, false),
            CanonicalField::Keterangan => record.keterangan = c.clean_text(cell, false),
            CanonicalField::Metric(metric) => record.set_metric(metric, c.to_number(cell)),
        }
    }
}

impl FieldMapperTrait for FieldMapper {
    fn resolve_headers(&self, headers: &[String]) -> HeaderMap {
        let table = name_table();
        let mut bindings: Vec<ColumnBinding> = Vec::with_capacity(headers.len());

        // 第一轮: 精确匹配（同名列先到先得）
        let mut exact: Vec<Option<CanonicalField>> = vec![None; headers.len()];
        let mut claimed: Vec<CanonicalField> = Vec::new();
        for (idx, header) in headers.iter().enumerate() {
            let upper = normalize_header(header);
            if upper.is_empty() {
                continue;
            }
            if let Some((_, field)) = table.iter().find(|(name, _)| *name == upper) {
                if claimed.contains(field) {
                    warn!(header = %header, column = idx, "重复表头，后出现的列按未识别列处理");
                } else {
                    claimed.push(*field);
                    exact[idx] = Some(*field);
                }
            }
        }

        // 第二轮: 子串匹配 / 合成字段名（不覆盖已被精确匹配占用的字段）
        for (idx, header) in headers.iter().enumerate() {
            let upper = normalize_header(header);
            if upper.is_empty() {
                continue;
            }

            let (target, match_kind) = if let Some(field) = exact[idx] {
                (ColumnTarget::Canonical(field), MatchKind::Exact)
            } else {
                match substring_match(&upper, &table) {
                    Some(field) if !claimed.contains(&field) => {
                        debug!(header = %header, field = ?field, "表头按子串匹配");
                        claimed.push(field);
                        (ColumnTarget::Canonical(field), MatchKind::Substring)
                    }
                    _ => (
                        ColumnTarget::Extra(synthesize_field_name(header)),
                        MatchKind::Synthesized,
                    ),
                }
            };

            bindings.push(ColumnBinding {
                index: idx,
                header: header.trim().to_string(),
                target,
                match_kind,
            });
        }

        HeaderMap { bindings }
    }

    fn check_required_columns(&self, sheet_name: &str, headers: &[String]) -> ImportResult<()> {
        // 以实际绑定结果为准: 被其他字段占用的列不算
        let header_map = self.resolve_headers(headers);

        let missing: Vec<String> = COMMON_COLUMNS
            .iter()
            .filter(|(_, field)| header_map.column_of(*field).is_none())
            .map(|(name, _)| name.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ImportError::MissingColumns {
                sheet: sheet_name.to_string(),
                columns: missing,
            })
        }
    }

    fn map_row(&self, header_map: &HeaderMap, row: &RawRow) -> StockRecord {
        let mut record = StockRecord::default();

        for binding in &header_map.bindings {
            let cell = row.get(binding.index).unwrap_or(&CellValue::Empty);
            match &binding.target {
                ColumnTarget::Canonical(field) => self.assign(&mut record, *field, cell),
                ColumnTarget::Extra(name) => {
                    let text = self.cleaner.clean_text(cell, false);
                    if !text.is_empty() {
                        record.extras.insert(name.clone(), text);
                    }
                }
            }
        }

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn full_headers() -> Vec<String> {
        let mut h = headers(&required_columns());
        h.push("STOK OK".to_string());
        h.push("SALDO OK".to_string());
        h
    }

    #[test]
    fn test_resolve_exact_case_insensitive() {
        let mapper = FieldMapper::default();
        let map = mapper.resolve_headers(&headers(&["npp", " Umur Stok ", "STOK BEBAS"]));

        assert_eq!(map.column_of(CanonicalField::Npp), Some(0));
        assert_eq!(map.column_of(CanonicalField::UmurStok), Some(1));
        assert_eq!(
            map.column_of(CanonicalField::Metric(MetricField::StokBebas)),
            Some(2)
        );
        assert!(map.bindings.iter().all(|b| b.match_kind == MatchKind::Exact));
    }

    #[test]
    fn test_resolve_substring_prefers_longest_name() {
        let mapper = FieldMapper::default();
        let map = mapper.resolve_headers(&headers(&["STOK PPB (BTG)", "TAHUN PRODUKSI"]));

        assert_eq!(
            map.column_of(CanonicalField::Metric(MetricField::StokPpb)),
            Some(0)
        );
        assert_eq!(map.column_of(CanonicalField::Tahun), Some(1));
        assert_eq!(map.bindings[0].match_kind, MatchKind::Substring);
    }

    #[test]
    fn test_substring_does_not_override_exact() {
        let mapper = FieldMapper::default();
        let map = mapper.resolve_headers(&headers(&["KETERANGAN TAMBAHAN", "KETERANGAN"]));

        assert_eq!(map.column_of(CanonicalField::Keterangan), Some(1));
        assert_eq!(
            map.bindings[0].target,
            ColumnTarget::Extra("keterangan_tambahan".to_string())
        );
        assert_eq!(map.unknown_headers(), vec!["KETERANGAN TAMBAHAN".to_string()]);
    }

    #[test]
    fn test_unknown_header_synthesized() {
        let mapper = FieldMapper::default();
        let map = mapper.resolve_headers(&headers(&["Nama   Gudang", ""]));

        assert_eq!(map.bindings.len(), 1);
        assert_eq!(
            map.bindings[0].target,
            ColumnTarget::Extra("nama_gudang".to_string())
        );
    }

    #[test]
    fn test_synthesize_field_name() {
        assert_eq!(synthesize_field_name("  Lokasi  Rak\tUtama "), "lokasi_rak_utama");
    }

    #[test]
    fn test_check_required_columns_ok() {
        let mapper = FieldMapper::default();
        assert!(mapper.check_required_columns("Sheet1", &full_headers()).is_ok());
    }

    #[test]
    fn test_check_required_columns_lists_all_missing() {
        let mapper = FieldMapper::default();
        let hs = headers(&["NPP", "TAHUN", "KATEGORI", "WP", "PPB", "SBU", "AREA"]);
        let err = mapper.check_required_columns("Data", &hs).unwrap_err();

        match err {
            ImportError::MissingColumns { sheet, columns } => {
                assert_eq!(sheet, "Data");
                assert_eq!(
                    columns,
                    vec![
                        "PELANGGAN",
                        "PROYEK",
                        "TYPE",
                        "HARSAT",
                        "UMUR STOK",
                        "RANGE UMUR",
                        "KETERANGAN"
                    ]
                );
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_check_required_columns_substring_fallback() {
        let mapper = FieldMapper::default();
        let mut hs = full_headers();
        hs.retain(|h| h != "HARSAT");
        hs.push("HARSAT (RP)".to_string());
        assert!(mapper.check_required_columns("Sheet1", &hs).is_ok());
    }

    #[test]
    fn test_metric_column_does_not_satisfy_common_column() {
        let mapper = FieldMapper::default();
        let mut hs = full_headers();
        hs.retain(|h| h != "PPB");
        hs.push("STOK PPB".to_string());

        match mapper.check_required_columns("Sheet1", &hs).unwrap_err() {
            ImportError::MissingColumns { columns, .. } => {
                assert_eq!(columns, vec!["PPB".to_string()]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_map_row_coercion() {
        let mapper = FieldMapper::default();
        let hs = full_headers();
        let map = mapper.resolve_headers(&hs);

        let row: RawRow = vec![
            CellValue::Number(10023.0),
            CellValue::Text("2021".to_string()),
            CellValue::Text(" tiang ".to_string()),
            CellValue::Text("wp-1".to_string()),
            CellValue::Text("bgr".to_string()),
            CellValue::Text(" br ".to_string()),
            CellValue::Text("jabar".to_string()),
            CellValue::Text("PT Maju".to_string()),
            CellValue::Text("Tol Cisumdawu".to_string()),
            CellValue::Text("Spun Pile".to_string()),
            CellValue::Number(1500000.0),
            CellValue::Text("2".to_string()),
            CellValue::Text("2–3 tahun".to_string()),
            CellValue::Empty,
            CellValue::Text("N/A".to_string()),
            CellValue::Number(250.5),
        ];

        let record = mapper.map_row(&map, &row);
        assert_eq!(record.npp, "10023");
        assert_eq!(record.tahun, 2021);
        assert_eq!(record.kategori, "TIANG");
        assert_eq!(record.ppb, "BGR");
        assert_eq!(record.sbu, "BR");
        assert_eq!(record.area, "JABAR");
        assert_eq!(record.pelanggan, "PT Maju");
        assert_eq!(record.product_type, "Spun Pile");
        assert_eq!(record.harsat, 1500000.0);
        assert_eq!(record.umur_stok, 2);
        assert_eq!(record.range_umur, "2–3 tahun");
        assert_eq!(record.keterangan, "");
        assert_eq!(record.stok_ok, 0.0);
        assert_eq!(record.saldo_ok, 250.5);
    }

    #[test]
    fn test_map_short_row_defaults() {
        let mapper = FieldMapper::default();
        let map = mapper.resolve_headers(&full_headers());
        let record = mapper.map_row(&map, &vec![CellValue::Text("N-9".to_string())]);

        assert_eq!(record.npp, "N-9");
        assert_eq!(record.tahun, 0);
        assert_eq!(record.saldo_ok, 0.0);
    }

    #[test]
    fn test_map_row_keeps_extras() {
        let mapper = FieldMapper::default();
        let map = mapper.resolve_headers(&headers(&["NPP", "Nama Gudang"]));
        let record = mapper.map_row(
            &map,
            &vec![
                CellValue::Text("N-1".to_string()),
                CellValue::Text("Gudang A".to_string()),
            ],
        );
        assert_eq!(record.extras.get("nama_gudang"), Some(&"Gudang A".to_string()));
    }
}
