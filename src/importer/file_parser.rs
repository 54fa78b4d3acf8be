// ==========================================
// 库存看板系统 - 文件解析器实现
// ==========================================
// 职责: 文件 → RawSheet（表头 + 原始单元格行）
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// ==========================================

use crate::domain::sheet::{CellValue, RawRow, RawSheet};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::stock_importer_trait::FileParser;
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;
use tracing::debug;

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

/// 丢弃全空行，返回 (保留行, 跳过行数)
fn drop_blank_rows(rows: Vec<RawRow>) -> (Vec<RawRow>, usize) {
    let total = rows.len();
    let kept: Vec<RawRow> = rows
        .into_iter()
        .filter(|row| !row.iter().all(CellValue::is_blank))
        .collect();
    let skipped = total - kept.len();
    (kept, skipped)
}

fn finish_sheet(name: String, headers: Vec<String>, rows: Vec<RawRow>) -> ImportResult<RawSheet> {
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(ImportError::EmptySheet { sheet: name });
    }

    let (rows, skipped) = drop_blank_rows(rows);
    if rows.is_empty() {
        return Err(ImportError::EmptySheet { sheet: name });
    }

    debug!(sheet = %name, rows = rows.len(), skipped, "工作表解析完成");
    let mut sheet = RawSheet::new(name, headers, rows);
    sheet.skipped_blank_rows = skipped;
    Ok(sheet)
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_sheet(&self, file_path: &Path, _sheet: Option<&str>) -> ImportResult<RawSheet> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(CellValue::from).collect::<RawRow>());
        }

        let name = file_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        finish_sheet(name, headers, rows)
    }

    fn sheet_names(&self, file_path: &Path) -> ImportResult<Vec<String>> {
        ensure_exists(file_path)?;
        Ok(file_path
            .file_stem()
            .map(|s| vec![s.to_string_lossy().to_string()])
            .unwrap_or_default())
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    fn convert_cell(cell: &Data) -> CellValue {
        match cell {
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Float(f) => CellValue::Number(*f),
            Data::String(s) => CellValue::from(s.as_str()),
            Data::Bool(b) => CellValue::Text(b.to_string().to_uppercase()),
            Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::from(s.as_str()),
            // #N/A、#DIV/0! 等错误单元格按空值处理
            Data::Error(_) | Data::Empty => CellValue::Empty,
        }
    }

    fn check_extension(path: &Path) -> ImportResult<()> {
        let ext = extension_of(path);
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }
        Ok(())
    }
}

impl FileParser for ExcelParser {
    fn parse_sheet(&self, file_path: &Path, sheet: Option<&str>) -> ImportResult<RawSheet> {
        ensure_exists(file_path)?;
        Self::check_extension(file_path)?;

        let mut workbook = open_workbook_auto(file_path)?;
        let sheet_names = workbook.sheet_names();

        let sheet_name = match sheet.map(str::trim).filter(|s| !s.is_empty()) {
            Some(wanted) => sheet_names
                .iter()
                .find(|name| name.as_str() == wanted)
                .cloned()
                .ok_or_else(|| ImportError::MissingSheet {
                    missing: wanted.to_string(),
                    available: sheet_names.clone(),
                })?,
            None => sheet_names
                .first()
                .cloned()
                .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?,
        };

        let range = workbook.worksheet_range(&sheet_name)?;

        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row
                .iter()
                .map(|cell| cell.to_string().trim().to_string())
                .collect(),
            None => return Err(ImportError::EmptySheet { sheet: sheet_name }),
        };

        let data_rows: Vec<RawRow> = rows
            .map(|row| row.iter().map(Self::convert_cell).collect())
            .collect();

        finish_sheet(sheet_name, headers, data_rows)
    }

    fn sheet_names(&self, file_path: &Path) -> ImportResult<Vec<String>> {
        ensure_exists(file_path)?;
        Self::check_extension(file_path)?;
        let workbook = open_workbook_auto(file_path)?;
        Ok(workbook.sheet_names())
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    fn delegate(path: &Path) -> ImportResult<&'static dyn FileParser> {
        match extension_of(path).as_str() {
            "csv" => Ok(&CsvParser),
            "xlsx" | "xls" => Ok(&ExcelParser),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn parse<P: AsRef<Path>>(&self, file_path: P, sheet: Option<&str>) -> ImportResult<RawSheet> {
        self.parse_sheet(file_path.as_ref(), sheet)
    }
}

impl FileParser for UniversalFileParser {
    fn parse_sheet(&self, file_path: &Path, sheet: Option<&str>) -> ImportResult<RawSheet> {
        ensure_exists(file_path)?;
        Self::delegate(file_path)?.parse_sheet(file_path, sheet)
    }

    fn sheet_names(&self, file_path: &Path) -> ImportResult<Vec<String>> {
        Self::delegate(file_path)?.sheet_names(file_path)
    }
}
