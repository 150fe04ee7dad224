// ==========================================
// 列车物流规划系统 - 数据仓储层
// ==========================================
// 职责: 本地键值存储访问与 schema 演进
// 红线: Repository 不含业务逻辑
// 约束: 所有 SQL 使用参数化
// ==========================================

pub mod error;
pub mod migration;
pub mod store;
pub mod train_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use migration::{migrate_item, migrate_items, migrate_train, migrate_trains, RawItem, RawTrain};
pub use store::{KeyValueStore, MemoryStore, SqliteStore};
pub use train_repo::{
    TrainRepository, ACTIVE_TRAIN_ID_KEY, LEGACY_ITEMS_STORAGE_KEY, TRAINS_STORAGE_KEY,
};
