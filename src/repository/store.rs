// ==========================================
// 列车物流规划系统 - 键值存储端口
// ==========================================
// 职责: 抽象"单机本地键值存储", 屏蔽底层介质
// 实现: SqliteStore (生产, kv_store 表) / MemoryStore (测试替身)
// 红线: 存储端口不含业务逻辑, 不理解值的 JSON 结构
// ==========================================

use crate::db::{configure_sqlite_connection, init_kv_schema, open_sqlite_connection};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ==========================================
// KeyValueStore - 存储端口
// ==========================================

/// 本地键值存储端口
///
/// 所有操作同步执行; 单执行上下文内保证写后读一致性
pub trait KeyValueStore {
    /// 读取键值, 不存在时返回 None
    fn get(&self, key: &str) -> RepositoryResult<Option<String>>;

    /// 写入键值 (存在则覆盖)
    fn set(&self, key: &str, value: &str) -> RepositoryResult<()>;

    /// 删除键 (不存在时为无操作)
    fn remove(&self, key: &str) -> RepositoryResult<()>;
}

// ==========================================
// SqliteStore - SQLite 键值存储
// ==========================================

/// SQLite 键值存储 (kv_store 表)
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// 打开数据库文件并初始化 kv_store 表
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        init_kv_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 (统一 PRAGMA 幂等重放)
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
            init_kv_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO kv_store (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
            params![key, value],
        )
        .map_err(|e| RepositoryError::WriteError {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    fn remove(&self, key: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute("DELETE FROM kv_store WHERE key = ?1", params![key])
            .map_err(|e| RepositoryError::WriteError {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }
}

// ==========================================
// MemoryStore - 内存测试替身
// ==========================================

/// 内存键值存储 (测试替身)
///
/// 附带写入计数与注入式写失败开关, 供迁移幂等性/
/// 写失败传播类测试使用
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    write_count: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置键值
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        self
    }

    /// 累计写入次数 (set + remove)
    pub fn write_count(&self) -> usize {
        self.write_count.load(Ordering::SeqCst)
    }

    /// 注入写失败
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_write_allowed(&self, key: &str) -> RepositoryResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::WriteError {
                key: key.to_string(),
                message: "注入的写失败".to_string(),
            });
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> RepositoryResult<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> RepositoryResult<()> {
        self.check_write_allowed(key)?;
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        self.write_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove(&self, key: &str) -> RepositoryResult<()> {
        self.check_write_allowed(key)?;
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        entries.remove(key);
        self.write_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
