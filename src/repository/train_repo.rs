// ==========================================
// 列车物流规划系统 - 列车集合仓储
// ==========================================
// 存储布局 (kv_store 三个逻辑键):
//   satisfactory_trains          列车集合 JSON 数组
//   satisfactory_active_train_id 活动列车指针
//   satisfactory_train_items     旧版扁平货物列表 (一次性迁移后删除)
// 失败语义: 读取/解析失败降级为空并记日志;
//           权威保存的写失败向上传播
// ==========================================

use crate::domain::train::{Train, MIGRATION_TRAIN_NAME};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::migration::{migrate_items, migrate_trains, RawItem, RawTrain};
use crate::repository::store::KeyValueStore;
use anyhow::anyhow;
use chrono::Utc;
use tracing::{info, warn};

/// 列车集合存储键
pub const TRAINS_STORAGE_KEY: &str = "satisfactory_trains";

/// 活动列车指针存储键
pub const ACTIVE_TRAIN_ID_KEY: &str = "satisfactory_active_train_id";

/// 旧版扁平货物列表存储键 (只读, 迁移后删除)
pub const LEGACY_ITEMS_STORAGE_KEY: &str = "satisfactory_train_items";

// ==========================================
// TrainRepository - 列车集合仓储
// ==========================================

/// 列车集合仓储
///
/// 泛型存储端口, 测试可注入内存替身
pub struct TrainRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> TrainRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// 底层存储端口 (测试断言用)
    pub fn store(&self) -> &S {
        &self.store
    }

    /// 载入列车集合
    ///
    /// - 键不存在或无法解析: 降级为空集合 (记日志, 不上抛)
    /// - 解析后执行字段迁移; 有修正时立即回写修正后的集合
    ///   (回写失败仅降级为警告, 迁移结果仍然返回)
    /// - Err 仅在编程不变量被破坏时出现 (吞吐表缺失支持组合)
    pub fn load_trains(&self) -> RepositoryResult<Vec<Train>> {
        let text = match self.store.get(TRAINS_STORAGE_KEY) {
            Ok(Some(text)) => text,
            Ok(None) => return Ok(Vec::new()),
            Err(e) => {
                warn!("读取列车集合失败, 按空集合处理: {}", e);
                return Ok(Vec::new());
            }
        };

        let raw_trains: Vec<RawTrain> = match serde_json::from_str(&text) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("解析列车集合失败, 按空集合处理: {}", e);
                return Ok(Vec::new());
            }
        };

        let (trains, changed) =
            migrate_trains(&raw_trains).map_err(|e| RepositoryError::Other(anyhow!(e)))?;

        if changed {
            info!("字段迁移修正了列车集合, 回写修正结果");
            if let Err(e) = self.save_trains(&trains) {
                warn!("迁移结果回写失败 (集合仍以迁移后形态返回): {}", e);
            }
        }

        Ok(trains)
    }

    /// 保存完整列车集合
    ///
    /// 写失败必须向上传播 - 静默把"没存上"报告为成功不可接受
    pub fn save_trains(&self, trains: &[Train]) -> RepositoryResult<()> {
        let json = serde_json::to_string(trains)?;
        self.store.set(TRAINS_STORAGE_KEY, &json)
    }

    /// 读取活动列车指针 (读失败返回 None)
    pub fn get_active_train_id(&self) -> Option<String> {
        match self.store.get(ACTIVE_TRAIN_ID_KEY) {
            Ok(value) => value,
            Err(e) => {
                warn!("读取活动列车指针失败: {}", e);
                None
            }
        }
    }

    /// 写入活动列车指针 (None 即删除键; 指针丢失非致命, 失败仅记日志)
    pub fn set_active_train_id(&self, id: Option<&str>) {
        let result = match id {
            Some(id) => self.store.set(ACTIVE_TRAIN_ID_KEY, id),
            None => self.store.remove(ACTIVE_TRAIN_ID_KEY),
        };
        if let Err(e) = result {
            warn!("写入活动列车指针失败: {}", e);
        }
    }

    /// 旧版扁平货物列表 → 列车集合的一次性迁移
    ///
    /// 列车集合已存在, 或旧键缺失/为空/无法解析时均为无操作
    /// (无法解析的旧数据原地保留, 不删除); 否则把旧货物包装为
    /// 一辆合成列车, 持久化并设为活动, 然后删除旧键
    ///
    /// # 返回
    /// - Ok(true): 本次执行了迁移
    /// - Ok(false): 无事可做 (幂等 - 每次启动调用也只会生效一次)
    pub fn migrate_legacy_items_to_trains(&self) -> RepositoryResult<bool> {
        if !self.load_trains()?.is_empty() {
            return Ok(false);
        }

        let text = match self.store.get(LEGACY_ITEMS_STORAGE_KEY) {
            Ok(Some(text)) => text,
            Ok(None) => return Ok(false),
            Err(e) => {
                warn!("读取旧版货物列表失败, 跳过迁移: {}", e);
                return Ok(false);
            }
        };

        let raw_items: Vec<RawItem> = match serde_json::from_str(&text) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("解析旧版货物列表失败, 跳过迁移: {}", e);
                return Ok(false);
            }
        };
        if raw_items.is_empty() {
            return Ok(false);
        }

        // 旧货物天然缺少 carType/beltTier, 借道字段迁移补全并重算
        let (items, _) =
            migrate_items(&raw_items).map_err(|e| RepositoryError::Other(anyhow!(e)))?;

        let now = Utc::now().timestamp_millis();
        let migration_train = Train {
            id: format!("train-{}-migration", now),
            name: MIGRATION_TRAIN_NAME.to_string(),
            items,
            created_at: now,
            updated_at: now,
        };

        self.save_trains(std::slice::from_ref(&migration_train))?;
        self.set_active_train_id(Some(&migration_train.id));
        self.store.remove(LEGACY_ITEMS_STORAGE_KEY)?;

        info!(
            train_id = %migration_train.id,
            "旧版货物列表已迁移为列车: {}",
            migration_train.name
        );
        Ok(true)
    }
}
