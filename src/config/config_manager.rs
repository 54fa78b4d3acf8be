// ==========================================
// 库存看板系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、写入
// 存储: config_kv 表 (key-value + scope)
// 规则: 非法配置值回退为默认值并记录告警
// ==========================================

use crate::config::dashboard_config_trait::{ConfigError, DashboardConfigReader};
use crate::db::open_sqlite_connection;
use crate::engine::aggregator::DEFAULT_YEAR_START;
use crate::repository::stock_repo::DEFAULT_NAMESPACE;
use async_trait::async_trait;
use chrono::{Datelike, Local};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// 年份配置的合理范围
const YEAR_MIN: i32 = 1900;
const YEAR_MAX: i32 = 2200;

const DEFAULT_PREVIEW_ROWS: usize = 10;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, ConfigError> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, ConfigError> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value)
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, ConfigError> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 获取所有 global 配置（按键排序）
    pub fn get_config_snapshot(&self) -> Result<BTreeMap<String, String>, ConfigError> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }
        Ok(config_map)
    }

    /// 读取并解析年份；缺失返回 None，非法值告警后返回 None
    fn get_year(&self, key: &str) -> Result<Option<i32>, ConfigError> {
        let raw = match self.get_config_value(key)? {
            Some(v) => v,
            None => return Ok(None),
        };

        match raw.trim().parse::<i32>() {
            Ok(year) if (YEAR_MIN..=YEAR_MAX).contains(&year) => Ok(Some(year)),
            _ => {
                warn!(config_key = key, raw_value = %raw, "年份配置非法，使用默认值");
                Ok(None)
            }
        }
    }
}

// ==========================================
// DashboardConfigReader Trait 实现
// ==========================================
#[async_trait]
impl DashboardConfigReader for ConfigManager {
    async fn get_storage_namespace(&self) -> Result<String, ConfigError> {
        let value = self.get_config_value(config_keys::STORAGE_NAMESPACE)?;
        match value.as_deref().map(str::trim) {
            Some(ns) if !ns.is_empty() => Ok(ns.to_string()),
            Some(_) => {
                warn!(
                    config_key = config_keys::STORAGE_NAMESPACE,
                    "命名空间配置为空，使用默认值"
                );
                Ok(DEFAULT_NAMESPACE.to_string())
            }
            None => Ok(DEFAULT_NAMESPACE.to_string()),
        }
    }

    async fn get_year_range(&self) -> Result<(i32, i32), ConfigError> {
        let current_year = Local::now().year();
        let start = self
            .get_year(config_keys::YEAR_RANGE_START)?
            .unwrap_or(DEFAULT_YEAR_START);
        let end = self
            .get_year(config_keys::YEAR_RANGE_END)?
            .unwrap_or(current_year);

        if end < start {
            warn!(start, end, "年份区间结束早于起始，使用默认区间");
            return Ok((DEFAULT_YEAR_START, current_year.max(DEFAULT_YEAR_START)));
        }
        Ok((start, end))
    }

    async fn get_required_sheet(&self) -> Result<Option<String>, ConfigError> {
        Ok(self
            .get_config_value(config_keys::REQUIRED_SHEET)?
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()))
    }

    async fn get_preview_rows(&self) -> Result<usize, ConfigError> {
        let raw = match self.get_config_value(config_keys::PREVIEW_ROWS)? {
            Some(v) => v,
            None => return Ok(DEFAULT_PREVIEW_ROWS),
        };

        match raw.trim().parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => {
                warn!(
                    config_key = config_keys::PREVIEW_ROWS,
                    raw_value = %raw,
                    "预览行数配置非法，使用默认值"
                );
                Ok(DEFAULT_PREVIEW_ROWS)
            }
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    pub const STORAGE_NAMESPACE: &str = "storage_namespace";
    pub const YEAR_RANGE_START: &str = "year_range_start";
    pub const YEAR_RANGE_END: &str = "year_range_end";
    pub const REQUIRED_SHEET: &str = "required_sheet";
    pub const PREVIEW_ROWS: &str = "preview_rows";
}
