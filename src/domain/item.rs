// ==========================================
// 列车物流规划系统 - 货物实体与工作集
// ==========================================
// 红线: freightCars 为派生字段, 永远由计算引擎产出,
//       不允许从表单直接写入
// ==========================================

use crate::domain::types::{BeltTier, CarType, StackSize};
use serde::{Deserialize, Serialize};

// ==========================================
// Item - 货物定义
// ==========================================

/// 货物定义 (一列列车中的一种货物及其派生车厢数)
///
/// 字段名与持久化 JSON 布局一致 (camelCase)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// 唯一标识符, 创建后不可变
    pub id: String,

    /// 展示名称, 去除首尾空白后非空
    pub name: String,

    /// 车厢类型, 决定吞吐模型
    pub car_type: CarType,

    /// 往返周期 (分钟), 仅旧式容量公式使用, 主计算路径不读取
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_time: Option<f64>,

    /// 需求吞吐: 货运为 件/分钟, 流体为 m³/分钟, > 0
    pub required_parts: f64,

    /// 堆叠规格, 仅货运车厢有意义
    pub stack_size: StackSize,

    /// 传送带等级, 仅货运车厢有意义
    pub belt_tier: BeltTier,

    /// 货物图片 (Base64 编码), 纯展示用, 原样往返
    pub image_data: Option<String>,

    /// 派生: 所需车厢数, 正需求下 >= 1
    pub freight_cars: u32,
}

// ==========================================
// ItemFormData - 原始表单输入
// ==========================================

/// 原始表单输入
///
/// 刻意宽松: 枚举字段以字符串/裸数字表达, 由校验器把关,
/// 通过校验后才能构造 [`Item`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFormData {
    pub name: String,
    pub car_type: String,
    pub required_parts: f64,
    pub stack_size: u32,
    pub belt_tier: String,
    #[serde(default)]
    pub loop_time: Option<f64>,
    #[serde(default)]
    pub image_data: Option<String>,
}

impl ItemFormData {
    /// 解析车厢类型 (非法取值返回 None, 由校验器报错)
    pub fn parsed_car_type(&self) -> Option<CarType> {
        match self.car_type.as_str() {
            "freight" => Some(CarType::Freight),
            "fluid" => Some(CarType::Fluid),
            _ => None,
        }
    }

    /// 解析传送带等级
    pub fn parsed_belt_tier(&self) -> Option<BeltTier> {
        match self.belt_tier.as_str() {
            "mk5" => Some(BeltTier::Mk5),
            "mk6" => Some(BeltTier::Mk6),
            _ => None,
        }
    }

    /// 解析堆叠规格
    pub fn parsed_stack_size(&self) -> Option<StackSize> {
        StackSize::try_from(self.stack_size).ok()
    }
}

// ==========================================
// WorkingSet - 当前编辑中的货物工作集
// ==========================================

/// 当前编辑中的货物序列 (可能尚未归属任何列车)
///
/// 任何货物变更置位未保存标志; 保存/载入/丢弃时清除
#[derive(Debug, Clone, Default)]
pub struct WorkingSet {
    items: Vec<Item>,
    dirty: bool,
}

impl WorkingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前货物序列 (顺序即车厢编组顺序)
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// 是否存在未保存的变更
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    /// 追加货物
    pub fn push(&mut self, item: Item) {
        self.items.push(item);
        self.dirty = true;
    }

    /// 按标识符替换货物, 返回是否命中
    pub fn replace(&mut self, id: &str, item: Item) -> bool {
        match self.items.iter_mut().find(|it| it.id == id) {
            Some(slot) => {
                *slot = item;
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    /// 按标识符删除货物, 返回是否命中
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|it| it.id != id);
        let removed = self.items.len() != before;
        if removed {
            self.dirty = true;
        }
        removed
    }

    /// 按标识符查找货物
    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|it| it.id == id)
    }

    /// 重排后的序列回写 (保留未保存语义)
    pub fn set_order(&mut self, items: Vec<Item>) {
        self.items = items;
        self.dirty = true;
    }

    /// 从已保存列车载入货物序列, 清除未保存标志
    pub fn load(&mut self, items: Vec<Item>) {
        self.items = items;
        self.dirty = false;
    }

    /// 丢弃为全空工作集
    pub fn clear(&mut self) {
        self.items.clear();
        self.dirty = false;
    }

    /// 保存成功后清除未保存标志
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item(id: &str) -> Item {
        Item {
            id: id.to_string(),
            name: "Iron Plate".to_string(),
            car_type: CarType::Freight,
            loop_time: None,
            required_parts: 600.0,
            stack_size: StackSize::S100,
            belt_tier: BeltTier::Mk5,
            image_data: None,
            freight_cars: 1,
        }
    }

    #[test]
    fn test_item_json_layout() {
        let json = serde_json::to_string(&sample_item("1700000000000-abc123def")).unwrap();
        // loopTime 缺省时不落盘, imageData 显式写 null
        assert!(!json.contains("loopTime"));
        assert!(json.contains("\"imageData\":null"));
        assert!(json.contains("\"carType\":\"freight\""));
        assert!(json.contains("\"stackSize\":100"));
        assert!(json.contains("\"freightCars\":1"));

        let back: Item = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample_item("1700000000000-abc123def"));
    }

    #[test]
    fn test_working_set_dirty_flag_lifecycle() {
        let mut ws = WorkingSet::new();
        assert!(!ws.has_unsaved_changes());

        ws.push(sample_item("a"));
        assert!(ws.has_unsaved_changes());

        ws.mark_saved();
        assert!(!ws.has_unsaved_changes());

        assert!(ws.remove("a"));
        assert!(ws.has_unsaved_changes());
        assert!(!ws.remove("a"));

        ws.load(vec![sample_item("b")]);
        assert!(!ws.has_unsaved_changes());
        assert_eq!(ws.items().len(), 1);

        ws.clear();
        assert!(!ws.has_unsaved_changes());
        assert!(ws.items().is_empty());
    }

    #[test]
    fn test_working_set_replace_keeps_position() {
        let mut ws = WorkingSet::new();
        ws.push(sample_item("a"));
        ws.push(sample_item("b"));
        ws.mark_saved();

        let mut updated = sample_item("a");
        updated.name = "Copper Plate".to_string();
        assert!(ws.replace("a", updated));

        assert_eq!(ws.items()[0].name, "Copper Plate");
        assert_eq!(ws.items()[1].id, "b");
        assert!(ws.has_unsaved_changes());
    }
}
