// ==========================================
// 库存看板系统 - 导入层
// ==========================================
// 职责: 工作簿 → 标准化库存记录 → 各桶
// 支持: Excel (.xlsx/.xls), CSV
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod stock_importer_impl;
pub mod stock_importer_trait;

// 重导出核心类型
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use error::{ImportError, ImportResult};
pub use field_mapper::{required_columns, FieldMapper as FieldMapperImpl, HeaderMap};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use stock_importer_impl::StockImporterImpl;
pub use stock_importer_trait::{DataCleaner, FieldMapper, FileParser, StockImporter};
