// ==========================================
// 列车物流规划系统 - 列车实体
// ==========================================
// 列车 = 命名的货物有序集合
// 约束: 名称在列车集合内不区分大小写唯一 (保存时校验)
// ==========================================

use crate::domain::item::Item;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// 合成迁移列车的固定名称 (旧版扁平货物列表一次性升级时使用)
pub const MIGRATION_TRAIN_NAME: &str = "My First Train";

/// 列车 - 命名的货物有序集合
///
/// items 顺序即车厢编组顺序, 经保存/载入/重排后保持不变
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Train {
    /// 唯一标识符 (train- 前缀, 与货物标识符区分命名空间)
    pub id: String,

    /// 展示名称, 去除首尾空白后 1~50 字符
    pub name: String,

    /// 货物有序集合
    pub items: Vec<Item>,

    /// 创建时刻 (毫秒时间戳)
    pub created_at: i64,

    /// 最近变更时刻 (毫秒时间戳), name/items 任一变更时刷新
    pub updated_at: i64,
}

impl Train {
    /// 以当前时刻创建新列车
    pub fn new(id: String, name: String, items: Vec<Item>) -> Self {
        let now = Utc::now().timestamp_millis();
        Self {
            id,
            name,
            items,
            created_at: now,
            updated_at: now,
        }
    }

    /// 重命名并刷新变更时刻
    pub fn rename(&mut self, name: String) {
        self.name = name;
        self.touch();
    }

    /// 替换货物集合并刷新变更时刻
    pub fn set_items(&mut self, items: Vec<Item>) {
        self.items = items;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now().timestamp_millis();
    }
}
