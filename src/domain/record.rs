// ==========================================
// 库存看板系统 - 库存记录领域模型
// ==========================================
// 职责: 标准化库存记录（所有桶字段的超集）+ 指标描述表
// 约束: 数值字段永不为空，缺失/非数值一律为 0
// 用途: 导入层写入，引擎层只读，整桶替换，不做单条修改
// ==========================================

use crate::domain::types::{Dimension, MetricKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ==========================================
// MetricField - 指标字段
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricField {
    StokOk,
    SaldoOk,
    StokSpprb,
    SaldoSpprb,
    StokProduksiLalu,
    StokProduksiSaatIni,
    StokDistribusi,
    SaldoDistribusi,
    MutasiStokDistribusi,
    MutasiSaldoDistribusi,
    StokLancar,
    SaldoLancar,
    StokBebas,
    SaldoBebas,
    StokTitipanPercepatan,
    SaldoTitipanPercepatan,
    MutasiStokTitipanPercepatan,
    MutasiSaldoTitipanPercepatan,
    StokTitipanMurni,
    SaldoTitipanMurni,
    MutasiStokTitipanMurni,
    MutasiSaldoTitipanMurni,
    StokOp,
    SaldoOp,
    StokPpb,
    SaldoPpb,
    StokSite,
    SaldoSite,
}

/// 指标描述：字段名 / 源表头 / 指标类型
///
/// 指标类型在此处一次性声明，聚合路径不再根据字段名做字符串判断。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricDescriptor {
    pub field: MetricField,
    pub field_name: &'static str,
    pub header: &'static str,
    pub kind: MetricKind,
}

const fn metric(
    field: MetricField,
    field_name: &'static str,
    header: &'static str,
    kind: MetricKind,
) -> MetricDescriptor {
    MetricDescriptor {
        field,
        field_name,
        header,
        kind,
    }
}

/// 指标描述表（表头顺序即模板列顺序）
pub const METRIC_DESCRIPTORS: [MetricDescriptor; 28] = [
    metric(MetricField::StokOk, "stok_ok", "STOK OK", MetricKind::Count),
    metric(MetricField::SaldoOk, "saldo_ok", "SALDO OK", MetricKind::MonetaryValue),
    metric(MetricField::StokSpprb, "stok_spprb", "STOK SPPRB", MetricKind::Count),
    metric(MetricField::SaldoSpprb, "saldo_spprb", "SALDO SPPRB", MetricKind::MonetaryValue),
    metric(MetricField::StokProduksiLalu, "stok_produksi_lalu", "STOK PRODUKSI LALU", MetricKind::Count),
    metric(MetricField::StokProduksiSaatIni, "stok_produksi_saat_ini", "STOK PRODUKSI SAAT INI", MetricKind::Count),
    metric(MetricField::StokDistribusi, "stok_distribusi", "STOK DISTRIBUSI", MetricKind::Count),
    metric(MetricField::SaldoDistribusi, "saldo_distribusi", "SALDO DISTRIBUSI", MetricKind::MonetaryValue),
    metric(MetricField::MutasiStokDistribusi, "mutasi_stok_distribusi", "MUTASI STOK DISTRIBUSI", MetricKind::MovementCount),
    metric(MetricField::MutasiSaldoDistribusi, "mutasi_saldo_distribusi", "MUTASI SALDO DISTRIBUSI", MetricKind::MovementValue),
    metric(MetricField::StokLancar, "stok_lancar", "STOK LANCAR", MetricKind::Count),
    metric(MetricField::SaldoLancar, "saldo_lancar", "SALDO LANCAR", MetricKind::MonetaryValue),
    metric(MetricField::StokBebas, "stok_bebas", "STOK BEBAS", MetricKind::Count),
    metric(MetricField::SaldoBebas, "saldo_bebas", "SALDO BEBAS", MetricKind::MonetaryValue),
    metric(MetricField::StokTitipanPercepatan, "stok_titipan_percepatan", "STOK TITIPAN PERCEPATAN", MetricKind::Count),
    metric(MetricField::SaldoTitipanPercepatan, "saldo_titipan_percepatan", "SALDO TITIPAN PERCEPATAN", MetricKind::MonetaryValue),
    metric(MetricField::MutasiStokTitipanPercepatan, "mutasi_stok_titipan_percepatan", "MUTASI STOK TITIPAN PERCEPATAN", MetricKind::MovementCount),
    metric(MetricField::MutasiSaldoTitipanPercepatan, "mutasi_saldo_titipan_percepatan", "MUTASI SALDO TITIPAN PERCEPATAN", MetricKind::MovementValue),
    metric(MetricField::StokTitipanMurni, "stok_titipan_murni", "STOK TITIPAN MURNI", MetricKind::Count),
    metric(MetricField::SaldoTitipanMurni, "saldo_titipan_murni", "SALDO TITIPAN MURNI", MetricKind::MonetaryValue),
    metric(MetricField::MutasiStokTitipanMurni, "mutasi_stok_titipan_murni", "MUTASI STOK TITIPAN MURNI", MetricKind::MovementCount),
    metric(MetricField::MutasiSaldoTitipanMurni, "mutasi_saldo_titipan_murni", "MUTASI SALDO TITIPAN MURNI", MetricKind::MovementValue),
    metric(MetricField::StokOp, "stok_op", "STOK OP", MetricKind::Count),
    metric(MetricField::SaldoOp, "saldo_op", "SALDO OP", MetricKind::MonetaryValue),
    metric(MetricField::StokPpb, "stok_ppb", "STOK PPB", MetricKind::Count),
    metric(MetricField::SaldoPpb, "saldo_ppb", "SALDO PPB", MetricKind::MonetaryValue),
    metric(MetricField::StokSite, "stok_site", "STOK SITE", MetricKind::Count),
    metric(MetricField::SaldoSite, "saldo_site", "SALDO SITE", MetricKind::MonetaryValue),
];

impl MetricField {
    pub fn descriptor(&self) -> &'static MetricDescriptor {
        // 描述表按枚举声明顺序排列
        &METRIC_DESCRIPTORS[*self as usize]
    }

    pub fn field_name(&self) -> &'static str {
        self.descriptor().field_name
    }

    pub fn kind(&self) -> MetricKind {
        self.descriptor().kind
    }

    pub fn from_field_name(name: &str) -> Option<MetricField> {
        METRIC_DESCRIPTORS
            .iter()
            .find(|d| d.field_name == name)
            .map(|d| d.field)
    }
}

impl fmt::Display for MetricField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

// ==========================================
// StockRecord - 标准化库存记录
// ==========================================
// 序列化字段名与持久化 JSON 保持一致
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockRecord {
    // ===== 标识字段 =====
    pub npp: String,        // 产品编号
    pub tahun: i32,         // 年份（解析失败为 0）
    pub kategori: String,   // 类别（大写）
    pub wp: String,         // WP（大写）
    pub ppb: String,        // 工厂代码（大写）
    pub sbu: String,        // 事业部代码（大写）
    pub area: String,       // 区域（大写）
    pub pelanggan: String,  // 客户
    pub proyek: String,     // 项目
    #[serde(rename = "type")]
    pub product_type: String, // 产品类型
    pub keterangan: String, // 备注

    // ===== 价格与库龄 =====
    pub harsat: f64,        // 单价
    pub umur_stok: i32,     // 库龄
    pub range_umur: String, // 库龄区间标签

    // ===== 指标字段 =====
    pub stok_ok: f64,
    pub saldo_ok: f64,
    pub stok_spprb: f64,
    pub saldo_spprb: f64,
    pub stok_produksi_lalu: f64,
    pub stok_produksi_saat_ini: f64,
    pub stok_distribusi: f64,
    pub saldo_distribusi: f64,
    pub mutasi_stok_distribusi: f64,
    pub mutasi_saldo_distribusi: f64,
    pub stok_lancar: f64,
    pub saldo_lancar: f64,
    pub stok_bebas: f64,
    pub saldo_bebas: f64,
    pub stok_titipan_percepatan: f64,
    pub saldo_titipan_percepatan: f64,
    pub mutasi_stok_titipan_percepatan: f64,
    pub mutasi_saldo_titipan_percepatan: f64,
    pub stok_titipan_murni: f64,
    pub saldo_titipan_murni: f64,
    pub mutasi_stok_titipan_murni: f64,
    pub mutasi_saldo_titipan_murni: f64,
    pub stok_op: f64,
    pub saldo_op: f64,
    pub stok_ppb: f64,
    pub saldo_ppb: f64,
    pub stok_site: f64,
    pub saldo_site: f64,

    // ===== 未识别列（按合成字段名保存原文）=====
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, String>,
}

impl StockRecord {
    /// 读取指标值
    pub fn metric(&self, field: MetricField) -> f64 {
        match field {
            MetricField::StokOk => self.stok_ok,
            MetricField::SaldoOk => self.saldo_ok,
            MetricField::StokSpprb => self.stok_spprb,
            MetricField::SaldoSpprb => self.saldo_spprb,
            MetricField::StokProduksiLalu => self.stok_produksi_lalu,
            MetricField::StokProduksiSaatIni => self.stok_produksi_saat_ini,
            MetricField::StokDistribusi => self.stok_distribusi,
            MetricField::SaldoDistribusi => self.saldo_distribusi,
            MetricField::MutasiStokDistribusi => self.mutasi_stok_distribusi,
            MetricField::MutasiSaldoDistribusi => self.mutasi_saldo_distribusi,
            MetricField::StokLancar => self.stok_lancar,
            MetricField::SaldoLancar => self.saldo_lancar,
            MetricField::StokBebas => self.stok_bebas,
            MetricField::SaldoBebas => self.saldo_bebas,
            MetricField::StokTitipanPercepatan => self.stok_titipan_percepatan,
            MetricField::SaldoTitipanPercepatan => self.saldo_titipan_percepatan,
            MetricField::MutasiStokTitipanPercepatan => self.mutasi_stok_titipan_percepatan,
            MetricField::MutasiSaldoTitipanPercepatan => self.mutasi_saldo_titipan_percepatan,
            MetricField::StokTitipanMurni => self.stok_titipan_murni,
            MetricField::SaldoTitipanMurni => self.saldo_titipan_murni,
            MetricField::MutasiStokTitipanMurni => self.mutasi_stok_titipan_murni,
            MetricField::MutasiSaldoTitipanMurni => self.mutasi_saldo_titipan_murni,
            MetricField::StokOp => self.stok_op,
            MetricField::SaldoOp => self.saldo_op,
            MetricField::StokPpb => self.stok_ppb,
            MetricField::SaldoPpb => self.saldo_ppb,
            MetricField::StokSite => self.stok_site,
            MetricField::SaldoSite => self.saldo_site,
        }
    }

    /// 写入指标值（仅在构造阶段使用）
    pub fn set_metric(&mut self, field: MetricField, value: f64) {
        let slot = match field {
            MetricField::StokOk => &mut self.stok_ok,
            MetricField::SaldoOk => &mut self.saldo_ok,
            MetricField::StokSpprb => &mut self.stok_spprb,
            MetricField::SaldoSpprb => &mut self.saldo_spprb,
            MetricField::StokProduksiLalu => &mut self.stok_produksi_lalu,
            MetricField::StokProduksiSaatIni => &mut self.stok_produksi_saat_ini,
            MetricField::StokDistribusi => &mut self.stok_distribusi,
            MetricField::SaldoDistribusi => &mut self.saldo_distribusi,
            MetricField::MutasiStokDistribusi => &mut self.mutasi_stok_distribusi,
            MetricField::MutasiSaldoDistribusi => &mut self.mutasi_saldo_distribusi,
            MetricField::StokLancar => &mut self.stok_lancar,
            MetricField::SaldoLancar => &mut self.saldo_lancar,
            MetricField::StokBebas => &mut self.stok_bebas,
            MetricField::SaldoBebas => &mut self.saldo_bebas,
            MetricField::StokTitipanPercepatan => &mut self.stok_titipan_percepatan,
            MetricField::SaldoTitipanPercepatan => &mut self.saldo_titipan_percepatan,
            MetricField::MutasiStokTitipanPercepatan => &mut self.mutasi_stok_titipan_percepatan,
            MetricField::MutasiSaldoTitipanPercepatan => &mut self.mutasi_saldo_titipan_percepatan,
            MetricField::StokTitipanMurni => &mut self.stok_titipan_murni,
            MetricField::SaldoTitipanMurni => &mut self.saldo_titipan_murni,
            MetricField::MutasiStokTitipanMurni => &mut self.mutasi_stok_titipan_murni,
            MetricField::MutasiSaldoTitipanMurni => &mut self.mutasi_saldo_titipan_murni,
            MetricField::StokOp => &mut self.stok_op,
            MetricField::SaldoOp => &mut self.saldo_op,
            MetricField::StokPpb => &mut self.stok_ppb,
            MetricField::SaldoPpb => &mut self.saldo_ppb,
            MetricField::StokSite => &mut self.stok_site,
            MetricField::SaldoSite => &mut self.saldo_site,
        };
        *slot = value;
    }

    /// 取分组维度的原始值（空白 / 年份 0 返回 None）
    pub fn dimension_value(&self, dimension: Dimension) -> Option<String> {
        let raw = match dimension {
            Dimension::Sbu => self.sbu.trim(),
            Dimension::Ppb => self.ppb.trim(),
            Dimension::Area => self.area.trim(),
            Dimension::RangeUmur => self.range_umur.trim(),
            Dimension::Tahun => {
                return if self.tahun == 0 {
                    None
                } else {
                    Some(self.tahun.to_string())
                };
            }
        };

        if raw.is_empty() {
            None
        } else {
            Some(raw.to_string())
        }
    }
}
