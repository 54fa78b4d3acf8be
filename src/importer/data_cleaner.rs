// ==========================================
// 库存看板系统 - 数据清洗器实现
// ==========================================
// 职责: TRIM / UPPER / 数值与整数转换
// 红线: 单元格转换永不失败，无法解析一律降级为 0 / 空串
// ==========================================

use crate::domain::sheet::CellValue;
use crate::importer::stock_importer_trait::DataCleaner as DataCleanerTrait;

#[derive(Debug, Clone, Copy, Default)]
pub struct DataCleaner;

impl DataCleanerTrait for DataCleaner {
    fn clean_text(&self, value: &CellValue, uppercase: bool) -> String {
        let text = match value {
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Number(n) if n.is_finite() => n.to_string(),
            CellValue::Number(_) | CellValue::Empty => String::new(),
        };

        if uppercase {
            text.to_uppercase()
        } else {
            text
        }
    }

    fn to_number(&self, value: &CellValue) -> f64 {
        let parsed = match value {
            CellValue::Number(n) => *n,
            CellValue::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            CellValue::Empty => 0.0,
        };

        // "NaN" / "inf" 等文本也能被 parse 接受，这里统一拦截
        if parsed.is_finite() {
            parsed
        } else {
            0.0
        }
    }

    fn to_integer(&self, value: &CellValue) -> i32 {
        match value {
            CellValue::Number(n) => truncate_to_i32(*n),
            CellValue::Text(s) => {
                let trimmed = s.trim();
                trimmed.parse::<i32>().unwrap_or_else(|_| {
                    trimmed
                        .parse::<f64>()
                        .map(truncate_to_i32)
                        .unwrap_or(0)
                })
            }
            CellValue::Empty => 0,
        }
    }
}

fn truncate_to_i32(value: f64) -> i32 {
    if !value.is_finite() || value > i32::MAX as f64 || value < i32::MIN as f64 {
        return 0;
    }
    value.trunc() as i32
}
