// ==========================================
// 库存看板系统 - 看板配置读取 Trait
// ==========================================
// 职责: 定义导入/聚合所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::engine::aggregator::{DimensionDomain, DEFAULT_YEAR_START};
use crate::repository::stock_repo::DEFAULT_NAMESPACE;
use async_trait::async_trait;
use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use std::error::Error;

pub type ConfigError = Box<dyn Error + Send + Sync>;

// ==========================================
// DashboardConfig - 配置快照
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// 持久化键前缀
    pub storage_namespace: String,
    /// 年份维度起始年
    pub year_range_start: i32,
    /// 年份维度结束年（默认当前年）
    pub year_range_end: i32,
    /// 指定工作表（None 取第一个）
    pub required_sheet: Option<String>,
    /// 预览行数
    pub preview_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            storage_namespace: DEFAULT_NAMESPACE.to_string(),
            year_range_start: DEFAULT_YEAR_START,
            year_range_end: Local::now().year(),
            required_sheet: None,
            preview_rows: 10,
        }
    }
}

impl DashboardConfig {
    pub fn dimension_domain(&self) -> DimensionDomain {
        DimensionDomain::new(self.year_range_start, self.year_range_end)
    }
}

// ==========================================
// DashboardConfigReader Trait
// ==========================================
// 用途: 看板所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait DashboardConfigReader: Send + Sync {
    /// 持久化命名空间（默认 wika-data）
    async fn get_storage_namespace(&self) -> Result<String, ConfigError>;

    /// 年份区间（默认 2018 ~ 当前年）
    async fn get_year_range(&self) -> Result<(i32, i32), ConfigError>;

    /// 指定工作表（默认无）
    async fn get_required_sheet(&self) -> Result<Option<String>, ConfigError>;

    /// 预览行数（默认 10）
    async fn get_preview_rows(&self) -> Result<usize, ConfigError>;

    /// 读取完整配置快照
    async fn load_config(&self) -> Result<DashboardConfig, ConfigError> {
        let (year_range_start, year_range_end) = self.get_year_range().await?;
        Ok(DashboardConfig {
            storage_namespace: self.get_storage_namespace().await?,
            year_range_start,
            year_range_end,
            required_sheet: self.get_required_sheet().await?,
            preview_rows: self.get_preview_rows().await?,
        })
    }
}
