// ==========================================
// 库存看板系统 - 库存记录仓储
// ==========================================
// 职责: 按桶整体读取 / 整体替换 / 清空
// 结构: 内存存储（会话内数据源）+ 可选的持久化适配器（镜像）
// 红线: Repository 不含业务逻辑；只做整桶替换，不做单条修改
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::record::StockRecord;
use crate::domain::types::Bucket;
use crate::domain::upload::BucketedRecords;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use tracing::{debug, info, warn};

/// 默认存储命名空间
pub const DEFAULT_NAMESPACE: &str = "wika-data";

/// 写操作结果（持久化失败时带告警，内存数据仍然有效）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteOutcome {
    pub storage_warning: Option<String>,
}

impl WriteOutcome {
    fn warned(err: &RepositoryError) -> Self {
        Self {
            storage_warning: Some(err.to_string()),
        }
    }
}

// ==========================================
// StockRepository Trait
// ==========================================
// 用途: 调用方唯一的数据入口（不直接接触全局状态）
// 实现者: InMemoryStockStore, CachedStockRepository
pub trait StockRepository: Send + Sync {
    /// 读取桶内全部记录（无数据返回空列表）
    fn get(&self, bucket: Bucket) -> RepositoryResult<Vec<StockRecord>>;

    /// 整体替换桶内记录
    fn replace(&self, bucket: Bucket, records: Vec<StockRecord>) -> RepositoryResult<WriteOutcome>;

    /// 清空全部桶
    fn clear(&self) -> RepositoryResult<WriteOutcome>;

    /// 替换全部桶，返回持久化告警
    fn replace_all(&self, buckets: BucketedRecords) -> RepositoryResult<Vec<String>> {
        let mut warnings = Vec::new();
        for (bucket, records) in buckets {
            if let Some(w) = self.replace(bucket, records)?.storage_warning {
                warnings.push(w);
            }
        }
        Ok(warnings)
    }
}

// ==========================================
// InMemoryStockStore - 内存存储
// ==========================================
#[derive(Debug, Default)]
pub struct InMemoryStockStore {
    buckets: RwLock<HashMap<Bucket, Vec<StockRecord>>>,
}

impl InMemoryStockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 仅查内存（区分“未加载”与“空桶”）
    pub fn cached(&self, bucket: Bucket) -> RepositoryResult<Option<Vec<StockRecord>>> {
        let guard = self
            .buckets
            .read()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        Ok(guard.get(&bucket).cloned())
    }

    fn put(&self, bucket: Bucket, records: Vec<StockRecord>) -> RepositoryResult<()> {
        let mut guard = self
            .buckets
            .write()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        guard.insert(bucket, records);
        Ok(())
    }
}

impl StockRepository for InMemoryStockStore {
    fn get(&self, bucket: Bucket) -> RepositoryResult<Vec<StockRecord>> {
        Ok(self.cached(bucket)?.unwrap_or_default())
    }

    fn replace(&self, bucket: Bucket, records: Vec<StockRecord>) -> RepositoryResult<WriteOutcome> {
        self.put(bucket, records)?;
        Ok(WriteOutcome::default())
    }

    fn clear(&self) -> RepositoryResult<WriteOutcome> {
        let mut guard = self
            .buckets
            .write()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        guard.clear();
        Ok(WriteOutcome::default())
    }
}

// ==========================================
// StockStoragePort Trait - 持久化适配器
// ==========================================
// 实现者: SqliteStockStorage
pub trait StockStoragePort: Send + Sync {
    /// 写入桶（覆盖）
    fn save(&self, bucket: Bucket, records: &[StockRecord]) -> RepositoryResult<()>;

    /// 读取桶（不存在返回 None；内容损坏返回 Serialization 错误）
    fn load(&self, bucket: Bucket) -> RepositoryResult<Option<Vec<StockRecord>>>;

    /// 删除单个桶
    fn remove(&self, bucket: Bucket) -> RepositoryResult<()>;

    /// 删除全部桶
    fn clear(&self) -> RepositoryResult<()>;
}

// ==========================================
// SqliteStockStorage - SQLite 键值存储
// ==========================================
/// 表: stock_store(store_key, payload, updated_at)
/// 键: "<namespace>-<bucket>"，值: StockRecord 的 JSON 数组
pub struct SqliteStockStorage {
    conn: Arc<Mutex<Connection>>,
    namespace: String,
}

impl SqliteStockStorage {
    /// 创建新的 SqliteStockStorage 实例
    pub fn new(db_path: &str, namespace: impl Into<String>) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            namespace: namespace.into(),
        })
    }

    /// 从已有连接创建
    pub fn from_connection(conn: Arc<Mutex<Connection>>, namespace: impl Into<String>) -> Self {
        Self {
            conn,
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// 存储键
    pub fn store_key(&self, bucket: Bucket) -> String {
        format!("{}-{}", self.namespace, bucket.as_str())
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 当前命名空间下已存储的键（按键名排序）
    pub fn stored_keys(&self) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;
        let keys: Vec<String> = Bucket::ALL.iter().map(|b| self.store_key(*b)).collect();

        let mut stmt = conn.prepare("SELECT 1 FROM stock_store WHERE store_key = ?1")?;
        let mut stored = Vec::new();
        for key in keys {
            if stmt.exists(params![key])? {
                stored.push(key);
            }
        }
        stored.sort();
        Ok(stored)
    }
}

impl StockStoragePort for SqliteStockStorage {
    fn save(&self, bucket: Bucket, records: &[StockRecord]) -> RepositoryResult<()> {
        let key = self.store_key(bucket);
        let payload = serde_json::to_string(records)?;

        let conn = self.get_conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO stock_store (store_key, payload, updated_at) VALUES (?1, ?2, ?3)",
            params![key, payload, Utc::now().to_rfc3339()],
        )
        .map_err(|e| RepositoryError::StorageWrite {
            key: key.clone(),
            message: e.to_string(),
        })?;

        debug!(key = %key, records = records.len(), bytes = payload.len(), "桶已持久化");
        Ok(())
    }

    fn load(&self, bucket: Bucket) -> RepositoryResult<Option<Vec<StockRecord>>> {
        let key = self.store_key(bucket);
        let conn = self.get_conn()?;

        let payload: Option<String> = conn
            .query_row(
                "SELECT payload FROM stock_store WHERE store_key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| RepositoryError::StorageRead {
                key: key.clone(),
                message: e.to_string(),
            })?;

        match payload {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn remove(&self, bucket: Bucket) -> RepositoryResult<()> {
        let key = self.store_key(bucket);
        let conn = self.get_conn()?;
        conn.execute("DELETE FROM stock_store WHERE store_key = ?1", params![key])
            .map_err(|e| RepositoryError::StorageWrite {
                key: key.clone(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    fn clear(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let mut removed = 0;
        for bucket in Bucket::ALL {
            let key = self.store_key(bucket);
            removed += tx
                .execute("DELETE FROM stock_store WHERE store_key = ?1", params![key])
                .map_err(|e| RepositoryError::StorageWrite {
                    key: key.clone(),
                    message: e.to_string(),
                })?;
        }

        tx.commit()?;
        info!(namespace = %self.namespace, removed, "持久化数据已清空");
        Ok(())
    }
}

// ==========================================
// CachedStockRepository - 内存 + 持久化镜像
// ==========================================
/// 读: 先查内存，未命中时从持久化加载并回填内存
/// 写: 先写内存，再镜像到持久化；持久化失败只记录告警
/// 持久化中不保留旧批次: 写入失败的桶会删除旧条目
pub struct CachedStockRepository {
    memory: InMemoryStockStore,
    storage: Option<Arc<dyn StockStoragePort>>,
}

impl CachedStockRepository {
    pub fn new(storage: Arc<dyn StockStoragePort>) -> Self {
        Self {
            memory: InMemoryStockStore::new(),
            storage: Some(storage),
        }
    }

    /// 仅内存（不做持久化）
    pub fn memory_only() -> Self {
        Self {
            memory: InMemoryStockStore::new(),
            storage: None,
        }
    }

    pub fn has_storage(&self) -> bool {
        self.storage.is_some()
    }
}

impl StockRepository for CachedStockRepository {
    fn get(&self, bucket: Bucket) -> RepositoryResult<Vec<StockRecord>> {
        if let Some(records) = self.memory.cached(bucket)? {
            return Ok(records);
        }

        let storage = match &self.storage {
            Some(storage) => storage,
            None => return Ok(Vec::new()),
        };

        match storage.load(bucket) {
            Ok(Some(records)) => {
                debug!(bucket = %bucket, records = records.len(), "从持久化加载桶");
                self.memory.put(bucket, records.clone())?;
                Ok(records)
            }
            Ok(None) => Ok(Vec::new()),
            Err(e) => {
                warn!(bucket = %bucket, error = %e, "持久化数据无法读取，按空桶处理");
                Ok(Vec::new())
            }
        }
    }

    fn replace(&self, bucket: Bucket, records: Vec<StockRecord>) -> RepositoryResult<WriteOutcome> {
        let outcome = match &self.storage {
            Some(storage) => match storage.save(bucket, &records) {
                Ok(()) => WriteOutcome::default(),
                Err(e) => {
                    warn!(bucket = %bucket, error = %e, "持久化写入失败，仅保留内存数据");
                    // 旧条目必须删除，否则重启后会读回上一批数据
                    if let Err(remove_err) = storage.remove(bucket) {
                        warn!(bucket = %bucket, error = %remove_err, "旧持久化条目删除失败");
                    }
                    WriteOutcome::warned(&e)
                }
            },
            None => WriteOutcome::default(),
        };

        self.memory.put(bucket, records)?;
        Ok(outcome)
    }

    /// 整批替换: 先清空命名空间下的全部持久化条目，再逐桶写入
    fn replace_all(&self, buckets: BucketedRecords) -> RepositoryResult<Vec<String>> {
        let mut warnings = Vec::new();
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.clear() {
                warn!(error = %e, "写入前清空持久化失败");
                warnings.push(e.to_string());
            }
        }

        for (bucket, records) in buckets {
            if let Some(w) = self.replace(bucket, records)?.storage_warning {
                warnings.push(w);
            }
        }
        Ok(warnings)
    }

    fn clear(&self) -> RepositoryResult<WriteOutcome> {
        self.memory.clear()?;

        match &self.storage {
            Some(storage) => match storage.clear() {
                Ok(()) => Ok(WriteOutcome::default()),
                Err(e) => {
                    warn!(error = %e, "持久化清空失败");
                    Ok(WriteOutcome::warned(&e))
                }
            },
            None => Ok(WriteOutcome::default()),
        }
    }
}
