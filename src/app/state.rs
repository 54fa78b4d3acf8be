// ==========================================
// 库存看板系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::DashboardApi;
use crate::config::{ConfigManager, DashboardConfigReader};
use crate::db::open_and_init;
use crate::importer::{FieldMapperImpl, StockImporterImpl, UniversalFileParser};
use crate::repository::{CachedStockRepository, SqliteStockStorage};

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "WIKA_DASHBOARD_DB_PATH";

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 存储命名空间
    pub namespace: String,

    /// 看板API
    pub dashboard_api: Arc<DashboardApi>,

    /// 配置管理器
    pub config: Arc<ConfigManager>,

    /// 库存仓储（内存 + SQLite 镜像）
    pub stock_repo: Arc<CachedStockRepository>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 1. 打开数据库并建表
    /// 2. 读取存储命名空间
    /// 3. 组装仓储 / 导入器 / API
    pub async fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_and_init(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        let config = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        let namespace = config
            .get_storage_namespace()
            .await
            .map_err(|e| format!("无法读取存储命名空间: {}", e))?;

        let storage = SqliteStockStorage::from_connection(conn, namespace.clone());
        let stock_repo = Arc::new(CachedStockRepository::new(Arc::new(storage)));

        let importer = Arc::new(StockImporterImpl::new(
            stock_repo.clone(),
            config.clone(),
            Box::new(UniversalFileParser),
            Box::new(FieldMapperImpl::default()),
        ));

        let dashboard_api = Arc::new(DashboardApi::new(
            importer,
            stock_repo.clone(),
            config.clone(),
        ));

        tracing::info!(namespace = %namespace, "AppState初始化完成");

        Ok(Self {
            db_path,
            namespace,
            dashboard_api,
            config,
            stock_repo,
        })
    }
}

/// 默认数据库路径
///
/// 优先使用环境变量 WIKA_DASHBOARD_DB_PATH，否则放在用户数据目录下。
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./wika_stock_dashboard.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("wika-stock-dashboard");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("wika_stock_dashboard.db");
        }
    }

    path.to_string_lossy().to_string()
}
