// ==========================================
// 库存看板系统 - 库存导入 Trait
// ==========================================
// 职责: 定义库存导入各阶段接口（不包含实现）
// ==========================================

use crate::domain::record::StockRecord;
use crate::domain::sheet::{CellValue, RawRow, RawSheet};
use crate::domain::upload::UploadOutcome;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::HeaderMap;
use async_trait::async_trait;
use std::path::Path;

// ==========================================
// StockImporter Trait
// ==========================================
// 用途: 库存导入主接口
// 实现者: StockImporterImpl
#[async_trait]
pub trait StockImporter: Send + Sync {
    /// 从 Excel 文件导入库存数据
    ///
    /// # 参数
    /// - file_path: Excel 文件路径（.xlsx / .xls）
    /// - sheet: 指定工作表；None 时使用配置中的 required_sheet，仍为空则取第一个工作表
    ///
    /// # 导入流程
    /// 1. 文件读取与解析
    /// 2. 必需列校验（缺失即中止，不写入任何桶）
    /// 3. 字段映射与类型转换
    /// 4. 分桶
    /// 5. 全部桶整体替换写入
    async fn import_from_excel<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
        sheet: Option<&str>,
    ) -> ImportResult<UploadOutcome>;

    /// 从 CSV 文件导入库存数据（工作表名取文件名）
    async fn import_from_csv<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ImportResult<UploadOutcome>;

    /// 处理已解析的工作表（表头 + 数据行）
    ///
    /// # 说明
    /// - 空表（无数据行）返回 EmptySheet
    /// - 成功时每个桶都会被替换，包括本次为空的桶
    async fn process_sheet(
        &self,
        sheet: RawSheet,
        file_name: Option<String>,
    ) -> ImportResult<UploadOutcome>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口
// 实现者: ExcelParser, CsvParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始工作表
    ///
    /// # 参数
    /// - file_path: 文件路径
    /// - sheet: 指定工作表（CSV 忽略）
    ///
    /// # 返回
    /// - Ok(RawSheet): 表头 + 数据行（已跳过全空行）
    /// - Err: 文件不存在、格式错误、工作表缺失、空表
    fn parse_sheet(&self, file_path: &Path, sheet: Option<&str>) -> ImportResult<RawSheet>;

    /// 列出工作表名称
    fn sheet_names(&self, file_path: &Path) -> ImportResult<Vec<String>>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 表头解析 + 行映射
// 实现者: FieldMapper
pub trait FieldMapper: Send + Sync {
    /// 解析表头为列绑定
    fn resolve_headers(&self, headers: &[String]) -> HeaderMap;

    /// 校验必需列（一次性列出全部缺失列）
    fn check_required_columns(&self, sheet_name: &str, headers: &[String]) -> ImportResult<()>;

    /// 将原始行映射为 StockRecord（不会失败，缺失/非法值降级为默认值）
    fn map_row(&self, header_map: &HeaderMap, row: &RawRow) -> StockRecord;
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 用途: 单元格清洗接口
// 实现者: DataCleaner
pub trait DataCleaner: Send + Sync {
    /// 清洗文本字段（TRIM，可选 UPPER）
    fn clean_text(&self, value: &CellValue, uppercase: bool) -> String;

    /// 转换为数值（无法解析 → 0）
    fn to_number(&self, value: &CellValue) -> f64;

    /// 转换为整数（无法解析 → 0，小数截断）
    fn to_integer(&self, value: &CellValue) -> i32;
}
