// ==========================================
// 库存看板系统 - 领域类型定义
// ==========================================
// 职责: 分类桶 / 分组维度 / 指标类型 / 图表类型
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 分类桶 (Bucket)
// ==========================================
// 看板上的每个 tab 对应一个桶；桶之间不互斥
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Bucket {
    Ok,                // 库存 OK
    Spprb,             // SPPRB
    Produksi,          // 生产
    Distribusi,        // 配送
    Lancar,            // 流动库存
    Bebas,             // 自由库存
    TitipanPercepatan, // 加急寄存
    TitipanMurni,      // 纯寄存
    Op,                // OP
    Ppb,               // 工厂库存
    Site,              // 工地库存
}

impl Bucket {
    /// 全部桶（看板 tab 顺序）
    pub const ALL: [Bucket; 11] = [
        Bucket::Ok,
        Bucket::Spprb,
        Bucket::Produksi,
        Bucket::Distribusi,
        Bucket::Lancar,
        Bucket::Bebas,
        Bucket::TitipanPercepatan,
        Bucket::TitipanMurni,
        Bucket::Op,
        Bucket::Ppb,
        Bucket::Site,
    ];

    /// tab 名称（同时用于持久化 key）
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Ok => "ok",
            Bucket::Spprb => "spprb",
            Bucket::Produksi => "produksi",
            Bucket::Distribusi => "distribusi",
            Bucket::Lancar => "lancar",
            Bucket::Bebas => "bebas",
            Bucket::TitipanPercepatan => "titipan-percepatan",
            Bucket::TitipanMurni => "titipan-murni",
            Bucket::Op => "op",
            Bucket::Ppb => "ppb",
            Bucket::Site => "site",
        }
    }

    /// 图表标题中使用的显示名
    pub fn display_name(&self) -> &'static str {
        match self {
            Bucket::Ok => "OK",
            Bucket::Spprb => "SPPRB",
            Bucket::Produksi => "Produksi",
            Bucket::Distribusi => "Distribusi",
            Bucket::Lancar => "Lancar",
            Bucket::Bebas => "Bebas",
            Bucket::TitipanPercepatan => "Titipan Percepatan",
            Bucket::TitipanMurni => "Titipan Murni",
            Bucket::Op => "OP",
            Bucket::Ppb => "PPB",
            Bucket::Site => "Site",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Bucket::ALL
            .iter()
            .copied()
            .find(|b| b.as_str() == normalized)
            .ok_or_else(|| format!("未知的分类桶: {}", s))
    }
}

// ==========================================
// 分组维度 (Dimension)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Sbu,       // 事业部
    Ppb,       // 工厂
    RangeUmur, // 库龄区间
    Tahun,     // 年份
    Area,      // 区域（仅生产桶）
}

impl Dimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Sbu => "sbu",
            Dimension::Ppb => "ppb",
            Dimension::RangeUmur => "range_umur",
            Dimension::Tahun => "tahun",
            Dimension::Area => "area",
        }
    }

    /// 图表标题中使用的显示名
    pub fn display_name(&self) -> &'static str {
        match self {
            Dimension::Sbu => "SBU",
            Dimension::Ppb => "PPB",
            Dimension::RangeUmur => "Range Umur",
            Dimension::Tahun => "Tahun",
            Dimension::Area => "Area",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// 指标类型 (Metric Kind)
// ==========================================
// 数量 / 金额 / 变动（变动数量与变动金额分开累计）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricKind {
    Count,
    MonetaryValue,
    MovementCount,
    MovementValue,
}

impl MetricKind {
    pub fn is_movement(&self) -> bool {
        matches!(self, MetricKind::MovementCount | MetricKind::MovementValue)
    }

    /// 交给图表层的单位标签
    pub fn unit(&self) -> ChartUnit {
        match self {
            MetricKind::Count | MetricKind::MovementCount => ChartUnit::Count,
            MetricKind::MonetaryValue | MetricKind::MovementValue => ChartUnit::Value,
        }
    }
}

// ==========================================
// 图表单位 (count | value)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartUnit {
    Count, // Btg（根）
    Value, // Rp
}

impl ChartUnit {
    pub fn label(&self) -> &'static str {
        match self {
            ChartUnit::Count => "Btg",
            ChartUnit::Value => "Rp",
        }
    }
}

impl fmt::Display for ChartUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartUnit::Count => write!(f, "count"),
            ChartUnit::Value => write!(f, "value"),
        }
    }
}

// ==========================================
// 图表类型 (Chart Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartKind::Bar => write!(f, "bar"),
            ChartKind::Line => write!(f, "line"),
            ChartKind::Pie => write!(f, "pie"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_from_str() {
        assert_eq!("ppb".parse::<Bucket>().unwrap(), Bucket::Ppb);
        assert_eq!(
            "titipan-percepatan".parse::<Bucket>().unwrap(),
            Bucket::TitipanPercepatan
        );
        assert_eq!(
            " Titipan_Murni ".parse::<Bucket>().unwrap(),
            Bucket::TitipanMurni
        );
        assert!("gudang".parse::<Bucket>().is_err());
    }

    #[test]
    fn test_bucket_serde_uses_tab_name() {
        let json = serde_json::to_string(&Bucket::TitipanMurni).unwrap();
        assert_eq!(json, "\"titipan-murni\"");
    }

    #[test]
    fn test_metric_kind_unit() {
        assert_eq!(MetricKind::Count.unit(), ChartUnit::Count);
        assert_eq!(MetricKind::MovementValue.unit(), ChartUnit::Value);
        assert!(MetricKind::MovementCount.is_movement());
        assert!(!MetricKind::MonetaryValue.is_movement());
    }
}
