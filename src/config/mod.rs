// ==========================================
// 库存看板系统 - 配置层
// ==========================================
// 职责: 看板配置读取与写入
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod dashboard_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use dashboard_config_trait::{ConfigError, DashboardConfig, DashboardConfigReader};
