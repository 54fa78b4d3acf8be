// ==========================================
// 库存看板系统 - 库存导入器实现
// ==========================================
// 职责: 整合上传流程，从文件到各桶
// 流程: 解析 → 必需列校验 → 映射/清洗 → 分桶 → 全部桶整体替换
// 红线: 结构错误中止整次上传，任何桶都不写入；单元格错误不中止
// ==========================================

use crate::config::DashboardConfigReader;
use crate::domain::sheet::RawSheet;
use crate::domain::upload::{UploadOutcome, UploadSummary};
use crate::engine::classifier::Classifier;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::stock_importer_trait::{FieldMapper, FileParser, StockImporter};
use crate::repository::StockRepository;
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// StockImporterImpl - 库存导入器实现
// ==========================================
pub struct StockImporterImpl<R, C>
where
    R: StockRepository,
    C: DashboardConfigReader,
{
    // 数据访问层
    repo: Arc<R>,

    // 配置读取器
    config: Arc<C>,

    // 导入组件
    file_parser: Box<dyn FileParser>,
    field_mapper: Box<dyn FieldMapper>,
    classifier: Classifier,
}

impl<R, C> StockImporterImpl<R, C>
where
    R: StockRepository + 'static,
    C: DashboardConfigReader + 'static,
{
    /// 创建新的 StockImporter 实例
    ///
    /// # 参数
    /// - repo: 库存仓储（各桶整体替换）
    /// - config: 配置读取器
    /// - file_parser: 文件解析器
    /// - field_mapper: 字段映射器
    pub fn new(
        repo: Arc<R>,
        config: Arc<C>,
        file_parser: Box<dyn FileParser>,
        field_mapper: Box<dyn FieldMapper>,
    ) -> Self {
        Self {
            repo,
            config,
            file_parser,
            field_mapper,
            classifier: Classifier::new(),
        }
    }

    fn file_name_of(path: &Path) -> Option<String> {
        path.file_name().map(|n| n.to_string_lossy().to_string())
    }

    /// 按扩展名导入（.csv 走 CSV，其余走 Excel）
    pub async fn import_file<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
        sheet: Option<&str>,
    ) -> ImportResult<UploadOutcome> {
        let is_csv = file_path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

        if is_csv {
            self.import_from_csv(file_path).await
        } else {
            self.import_from_excel(file_path, sheet).await
        }
    }
}

#[async_trait::async_trait]
impl<R, C> StockImporter for StockImporterImpl<R, C>
where
    R: StockRepository + 'static,
    C: DashboardConfigReader + 'static,
{
    async fn import_from_excel<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
        sheet: Option<&str>,
    ) -> ImportResult<UploadOutcome> {
        let path = file_path.as_ref();
        info!(file_path = %path.display(), "开始导入库存数据");

        let wanted = match sheet {
            Some(name) => Some(name.to_string()),
            None => self
                .config
                .get_required_sheet()
                .await
                .map_err(|e| ImportError::InternalError(format!("配置读取失败: {}", e)))?,
        };

        debug!("步骤 1: 解析文件");
        let raw = self
            .file_parser
            .parse_sheet(path, wanted.as_deref())
            .map_err(|e| {
                error!(error = %e, "文件解析失败");
                e
            })?;

        self.process_sheet(raw, Self::file_name_of(path)).await
    }

    async fn import_from_csv<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ImportResult<UploadOutcome> {
        let path = file_path.as_ref();
        info!(file_path = %path.display(), "开始导入库存数据 (CSV)");

        debug!("步骤 1: 解析文件");
        let raw = self.file_parser.parse_sheet(path, None).map_err(|e| {
            error!(error = %e, "文件解析失败");
            e
        })?;

        self.process_sheet(raw, Self::file_name_of(path)).await
    }

    #[instrument(skip(self, sheet), fields(sheet = %sheet.name, batch_id))]
    async fn process_sheet(
        &self,
        sheet: RawSheet,
        file_name: Option<String>,
    ) -> ImportResult<UploadOutcome> {
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());

        if sheet.rows.is_empty() {
            error!("工作表无数据行，上传中止");
            return Err(ImportError::EmptySheet { sheet: sheet.name });
        }

        // === 步骤 2: 必需列校验 ===
        debug!("步骤 2: 必需列校验");
        if let Err(e) = self
            .field_mapper
            .check_required_columns(&sheet.name, &sheet.headers)
        {
            error!(error = %e, "必需列缺失，上传中止");
            return Err(e);
        }

        // === 步骤 3: 字段映射 + 清洗 ===
        debug!("步骤 3: 字段映射");
        let header_map = self.field_mapper.resolve_headers(&sheet.headers);
        let unknown_headers = header_map.unknown_headers();
        if !unknown_headers.is_empty() {
            warn!(headers = ?unknown_headers, "存在未识别的表头，按扩展字段保存");
        }

        let records: Vec<_> = sheet
            .rows
            .iter()
            .map(|row| self.field_mapper.map_row(&header_map, row))
            .collect();
        info!(total_rows = records.len(), "字段映射完成");

        // === 步骤 4: 分桶 ===
        debug!("步骤 4: 分桶");
        let (buckets, unclassified_rows) = self.classifier.partition(&records);
        let bucket_counts = buckets.iter().map(|(b, list)| (*b, list.len())).collect();

        // === 步骤 5: 整体替换（包括本次为空的桶）===
        debug!("步骤 5: 写入各桶");
        let storage_warnings = self.repo.replace_all(buckets.clone())?;
        for warning in &storage_warnings {
            warn!(warning = %warning, "持久化告警");
        }

        let elapsed_ms = start_time.elapsed().as_millis() as i64;
        let summary = UploadSummary {
            batch_id,
            file_name,
            sheet_name: sheet.name,
            total_rows: records.len(),
            skipped_blank_rows: sheet.skipped_blank_rows,
            bucket_counts,
            unclassified_rows,
            unknown_headers,
            storage_warnings,
            imported_at: Utc::now(),
            elapsed_ms,
        };

        info!(
            total_rows = summary.total_rows,
            unclassified = summary.unclassified_rows,
            elapsed_ms,
            "上传处理完成"
        );

        Ok(UploadOutcome { summary, buckets })
    }
}
