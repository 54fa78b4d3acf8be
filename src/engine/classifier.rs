// ==========================================
// 库存看板系统 - 分桶引擎
// ==========================================
// 职责: 判定记录所属的桶 + 将记录划分到各桶
// 规则: 任一触发指标非零即属于该桶；桶之间不互斥
// 阈值: 数量/金额指标 > 0，变动指标 != 0
// ==========================================

use crate::domain::record::{MetricField, StockRecord};
use crate::domain::types::Bucket;
use crate::domain::upload::BucketedRecords;
use tracing::{debug, info, instrument};

// ==========================================
// BucketDefinition - 桶定义
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketDefinition {
    pub bucket: Bucket,
    /// 触发指标（第一个为数量，第二个为金额）
    pub triggers: &'static [MetricField],
    /// 变动指标（数量, 金额），仅部分桶有
    pub movement: Option<(MetricField, MetricField)>,
}

impl BucketDefinition {
    /// 记录是否属于该桶
    pub fn matches(&self, record: &StockRecord) -> bool {
        self.triggers
            .iter()
            .any(|field| trigger_fires(*field, record.metric(*field)))
    }

    /// 数量指标
    pub fn count_metric(&self) -> MetricField {
        self.triggers[0]
    }

    /// 金额指标（生产桶没有金额，退化为第二个数量指标）
    pub fn value_metric(&self) -> MetricField {
        self.triggers.get(1).copied().unwrap_or(self.triggers[0])
    }
}

/// 单个触发指标是否成立
pub fn trigger_fires(field: MetricField, value: f64) -> bool {
    if !value.is_finite() {
        return false;
    }
    if field.kind().is_movement() {
        value != 0.0
    } else {
        value > 0.0
    }
}

/// 全部桶定义（与 Bucket::ALL 同序）
pub const BUCKET_DEFINITIONS: [BucketDefinition; 11] = [
    BucketDefinition {
        bucket: Bucket::Ok,
        triggers: &[MetricField::StokOk, MetricField::SaldoOk],
        movement: None,
    },
    BucketDefinition {
        bucket: Bucket::Spprb,
        triggers: &[MetricField::StokSpprb, MetricField::SaldoSpprb],
        movement: None,
    },
    BucketDefinition {
        bucket: Bucket::Produksi,
        triggers: &[MetricField::StokProduksiSaatIni, MetricField::StokProduksiLalu],
        movement: None,
    },
    BucketDefinition {
        bucket: Bucket::Distribusi,
        triggers: &[MetricField::StokDistribusi, MetricField::SaldoDistribusi],
        movement: Some((
            MetricField::MutasiStokDistribusi,
            MetricField::MutasiSaldoDistribusi,
        )),
    },
    BucketDefinition {
        bucket: Bucket::Lancar,
        triggers: &[MetricField::StokLancar, MetricField::SaldoLancar],
        movement: None,
    },
    BucketDefinition {
        bucket: Bucket::Bebas,
        triggers: &[MetricField::StokBebas, MetricField::SaldoBebas],
        movement: None,
    },
    BucketDefinition {
        bucket: Bucket::TitipanPercepatan,
        triggers: &[
            MetricField::StokTitipanPercepatan,
            MetricField::SaldoTitipanPercepatan,
        ],
        movement: Some((
            MetricField::MutasiStokTitipanPercepatan,
            MetricField::MutasiSaldoTitipanPercepatan,
        )),
    },
    BucketDefinition {
        bucket: Bucket::TitipanMurni,
        triggers: &[MetricField::StokTitipanMurni, MetricField::SaldoTitipanMurni],
        movement: Some((
            MetricField::MutasiStokTitipanMurni,
            MetricField::MutasiSaldoTitipanMurni,
        )),
    },
    BucketDefinition {
        bucket: Bucket::Op,
        triggers: &[MetricField::StokOp, MetricField::SaldoOp],
        movement: None,
    },
    BucketDefinition {
        bucket: Bucket::Ppb,
        triggers: &[MetricField::StokPpb, MetricField::SaldoPpb],
        movement: None,
    },
    BucketDefinition {
        bucket: Bucket::Site,
        triggers: &[MetricField::StokSite, MetricField::SaldoSite],
        movement: None,
    },
];

/// 按桶取定义
pub fn definition_of(bucket: Bucket) -> &'static BucketDefinition {
    // 定义表与 Bucket 声明顺序一致
    &BUCKET_DEFINITIONS[bucket as usize]
}

// ==========================================
// Classifier - 分桶引擎
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct Classifier;

impl Classifier {
    pub fn new() -> Self {
        Self
    }

    /// 记录所属的全部桶（可能为空）
    pub fn classify(&self, record: &StockRecord) -> Vec<Bucket> {
        BUCKET_DEFINITIONS
            .iter()
            .filter(|def| def.matches(record))
            .map(|def| def.bucket)
            .collect()
    }

    /// 划分全部记录
    ///
    /// 返回值包含每一个桶（无记录的桶为空列表），桶内保持原始行序。
    /// 第二个返回值为不属于任何桶的记录数。
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub fn partition(&self, records: &[StockRecord]) -> (BucketedRecords, usize) {
        let mut buckets: BucketedRecords = Bucket::ALL.iter().map(|b| (*b, Vec::new())).collect();
        let mut unclassified = 0usize;

        for record in records {
            let mut matched = false;
            for def in BUCKET_DEFINITIONS.iter().filter(|def| def.matches(record)) {
                matched = true;
                if let Some(list) = buckets.get_mut(&def.bucket) {
                    list.push(record.clone());
                }
            }
            if !matched {
                unclassified += 1;
            }
        }

        for (bucket, list) in &buckets {
            debug!(bucket = %bucket, records = list.len(), "分桶结果");
        }
        info!(
            total = records.len(),
            unclassified,
            "分桶完成"
        );

        (buckets, unclassified)
    }
}
