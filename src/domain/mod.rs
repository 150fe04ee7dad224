// ==========================================
// 列车物流规划系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含数据访问逻辑, 不含引擎逻辑
// ==========================================

pub mod id;
pub mod item;
pub mod train;
pub mod types;

// 重导出核心类型
pub use id::{generate_item_id, generate_train_id, TRAIN_ID_PREFIX};
pub use item::{Item, ItemFormData, WorkingSet};
pub use train::{Train, MIGRATION_TRAIN_NAME};
pub use types::{BeltTier, CarType, StackSize};
