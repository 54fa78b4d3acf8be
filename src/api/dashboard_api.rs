// ==========================================
// 库存看板系统 - 看板 API
// ==========================================
// 职责: 供 UI 层调用的门面（上传 / 预览 / 图表数据 / 重置）
// 架构: API 层 → 导入层 / 引擎层 → 仓储层
// 说明: 图表渲染由外部协作者实现 ChartEmitter 完成
// ==========================================

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, DashboardConfig, DashboardConfigReader};
use crate::domain::aggregate::ChartSeries;
use crate::domain::record::StockRecord;
use crate::domain::sheet::{CellValue, RawRow, RawSheet};
use crate::domain::types::{Bucket, ChartUnit, Dimension};
use crate::domain::upload::{SheetPreview, UploadOutcome, UploadSummary};
use crate::engine::aggregator::Aggregator;
use crate::engine::chart_plan::build_series;
use crate::importer::{FileParser, StockImporter, StockImporterImpl, UniversalFileParser};
use crate::repository::{CachedStockRepository, StockRepository};

/// 看板使用的导入器
pub type DashboardImporter = StockImporterImpl<CachedStockRepository, ConfigManager>;

// ==========================================
// ChartEmitter - 图表渲染协作者
// ==========================================
/// 每个 (桶, 维度, 指标) 组合调用一次
pub trait ChartEmitter: Send {
    fn render(
        &mut self,
        bucket: Bucket,
        dimension: Dimension,
        labels: &[String],
        values: &[f64],
        unit: ChartUnit,
    );

    /// 带完整描述的渲染入口（默认转发到 render）
    fn render_series(&mut self, series: &ChartSeries) {
        self.render(
            series.bucket,
            series.dimension,
            &series.labels,
            &series.values,
            series.unit,
        );
    }
}

/// 单次渲染调用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderCall {
    pub bucket: Bucket,
    pub dimension: Dimension,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub unit: ChartUnit,
}

/// 收集渲染调用（CLI 输出 / 测试用）
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChartCollector {
    pub calls: Vec<RenderCall>,
}

impl ChartEmitter for ChartCollector {
    fn render(
        &mut self,
        bucket: Bucket,
        dimension: Dimension,
        labels: &[String],
        values: &[f64],
        unit: ChartUnit,
    ) {
        self.calls.push(RenderCall {
            bucket,
            dimension,
            labels: labels.to_vec(),
            values: values.to_vec(),
            unit,
        });
    }
}

/// 桶状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketStatus {
    pub bucket: Bucket,
    pub display_name: String,
    pub records: usize,
}

// ==========================================
// DashboardApi - 看板 API
// ==========================================
pub struct DashboardApi {
    importer: Arc<DashboardImporter>,
    repo: Arc<CachedStockRepository>,
    config: Arc<ConfigManager>,
}

impl DashboardApi {
    /// 创建新的DashboardApi实例
    pub fn new(
        importer: Arc<DashboardImporter>,
        repo: Arc<CachedStockRepository>,
        config: Arc<ConfigManager>,
    ) -> Self {
        Self {
            importer,
            repo,
            config,
        }
    }

    async fn load_config(&self) -> ApiResult<DashboardConfig> {
        self.config
            .load_config()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))
    }

    // ==========================================
    // 上传
    // ==========================================

    /// 处理已解析的表头 + 数据行（UI 层入口）
    ///
    /// 全空行被跳过；缺少必需列或没有数据行时整次上传中止。
    pub async fn process_upload(
        &self,
        headers: Vec<String>,
        rows: Vec<RawRow>,
    ) -> ApiResult<UploadOutcome> {
        let total = rows.len();
        let rows: Vec<RawRow> = rows
            .into_iter()
            .filter(|row| !row.iter().all(CellValue::is_blank))
            .collect();

        let mut sheet = RawSheet::new("upload", headers, rows);
        sheet.skipped_blank_rows = total - sheet.rows.len();

        Ok(self.importer.process_sheet(sheet, None).await?)
    }

    /// 上传文件并渲染全部桶
    #[instrument(skip(self, file_path, emitter))]
    pub async fn analyze_file(
        &self,
        file_path: &Path,
        sheet: Option<&str>,
        emitter: &mut dyn ChartEmitter,
    ) -> ApiResult<UploadSummary> {
        let outcome = self.importer.import_file(file_path, sheet).await?;

        let config = self.load_config().await?;
        let aggregator = Aggregator::new(config.dimension_domain());

        let mut rendered = 0;
        for (bucket, records) in &outcome.buckets {
            for series in build_series(&aggregator, *bucket, records) {
                emitter.render_series(&series);
                rendered += 1;
            }
        }

        info!(
            batch_id = %outcome.summary.batch_id,
            charts = rendered,
            "分析完成，图表已渲染"
        );
        Ok(outcome.summary)
    }

    // ==========================================
    // 预览
    // ==========================================

    /// 预览工作表前 N 行（N = preview_rows）
    pub async fn preview(&self, file_path: &Path, sheet: Option<&str>) -> ApiResult<SheetPreview> {
        let config = self.load_config().await?;
        let wanted = sheet.map(str::to_string).or(config.required_sheet);

        let raw = UniversalFileParser.parse_sheet(file_path, wanted.as_deref())?;
        let rows: Vec<Vec<String>> = raw
            .rows
            .iter()
            .take(config.preview_rows)
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect();

        Ok(SheetPreview {
            sheet_name: raw.name,
            headers: raw.headers,
            shown: rows.len(),
            total_rows: raw.rows.len(),
            rows,
        })
    }

    /// 列出工作簿中的工作表
    pub fn list_sheets(&self, file_path: &Path) -> ApiResult<Vec<String>> {
        Ok(UniversalFileParser.sheet_names(file_path)?)
    }

    // ==========================================
    // 图表数据
    // ==========================================

    /// 桶的全部图表数据（已聚合 + 已排序）
    pub async fn bucket_charts(&self, bucket: Bucket) -> ApiResult<Vec<ChartSeries>> {
        let config = self.load_config().await?;
        let aggregator = Aggregator::new(config.dimension_domain());
        let records = self.repo.get(bucket)?;
        Ok(build_series(&aggregator, bucket, &records))
    }

    /// 渲染单个桶（tab 切换时调用），返回渲染的图表数
    pub async fn render_bucket(
        &self,
        bucket: Bucket,
        emitter: &mut dyn ChartEmitter,
    ) -> ApiResult<usize> {
        let series = self.bucket_charts(bucket).await?;
        for chart in &series {
            emitter.render_series(chart);
        }
        Ok(series.len())
    }

    /// 桶内记录
    pub fn bucket_records(&self, bucket: Bucket) -> ApiResult<Vec<StockRecord>> {
        Ok(self.repo.get(bucket)?)
    }

    /// 全部桶的记录数
    pub fn list_buckets(&self) -> ApiResult<Vec<BucketStatus>> {
        Bucket::ALL
            .iter()
            .map(|bucket| {
                Ok(BucketStatus {
                    bucket: *bucket,
                    display_name: bucket.display_name().to_string(),
                    records: self.repo.get(*bucket)?.len(),
                })
            })
            .collect()
    }

    // ==========================================
    // 重置
    // ==========================================

    /// 清空内存与持久化数据（退出登录）
    ///
    /// 返回持久化告警（内存已清空）。
    pub fn reset(&self) -> ApiResult<Option<String>> {
        let outcome = self.repo.clear()?;
        info!("看板数据已重置");
        Ok(outcome.storage_warning)
    }
}
