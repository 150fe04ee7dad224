// ==========================================
// 列车物流规划系统 - 持久化数据字段迁移
// ==========================================
// 历史上出现过三轮 schema 演进:
//   1) 旧版扁平货物列表 → 列车集合 (train_repo 一次性迁移)
//   2) 货物缺少 beltTier 字段 (速率模型引入前的数据)
//   3) 货物缺少 carType 字段 (流体车厢引入前的数据)
// 本模块处理 2)/3): 宽松解析落盘记录, 逐字段检查-修正,
// 任一字段被修正即用分派计算引擎重算 freightCars
// 红线: 幂等 - 对已正确数据重复执行不产生任何变更
// ==========================================

use crate::domain::item::Item;
use crate::domain::train::Train;
use crate::domain::types::{BeltTier, CarType, StackSize};
use crate::engine::calculator::{calculate_cars, CalcError};
use serde::Deserialize;

/// carType 缺失时的默认值 (流体车厢引入前所有货物均为货运)
const DEFAULT_CAR_TYPE: CarType = CarType::Freight;

/// beltTier 缺失时的默认值 (速率模型引入前按 Mk.5 估算)
const DEFAULT_BELT_TIER: BeltTier = BeltTier::Mk5;

/// stackSize 不在支持集合内时的默认值
const DEFAULT_STACK_SIZE: StackSize = StackSize::S100;

// ==========================================
// 宽松落盘记录
// ==========================================
// 不假设落盘形状与当前类型一致: 可缺字段、可带历史取值

/// 宽松的货物落盘记录
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub car_type: Option<String>,
    #[serde(default)]
    pub loop_time: Option<f64>,
    pub required_parts: f64,
    #[serde(default)]
    pub stack_size: Option<u32>,
    #[serde(default)]
    pub belt_tier: Option<String>,
    #[serde(default)]
    pub image_data: Option<String>,
    #[serde(default)]
    pub freight_cars: Option<u32>,
}

/// 宽松的列车落盘记录
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTrain {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub items: Vec<RawItem>,
    pub created_at: i64,
    pub updated_at: i64,
}

// ==========================================
// 字段升级器
// ==========================================
// 有序、独立、各管一个字段; 返回 (修正后取值, 是否发生修正)

fn fix_car_type(raw: &Option<String>) -> (CarType, bool) {
    match raw.as_deref() {
        Some("freight") => (CarType::Freight, false),
        Some("fluid") => (CarType::Fluid, false),
        // 缺失或无法识别: 视同缺失
        _ => (DEFAULT_CAR_TYPE, true),
    }
}

fn fix_belt_tier(raw: &Option<String>) -> (BeltTier, bool) {
    match raw.as_deref() {
        Some("mk5") => (BeltTier::Mk5, false),
        Some("mk6") => (BeltTier::Mk6, false),
        _ => (DEFAULT_BELT_TIER, true),
    }
}

fn fix_stack_size(raw: Option<u32>) -> (StackSize, bool) {
    match raw.and_then(|v| StackSize::try_from(v).ok()) {
        Some(stack) => (stack, false),
        None => (DEFAULT_STACK_SIZE, true),
    }
}

// ==========================================
// 迁移入口
// ==========================================

/// 迁移单个货物记录, 返回 (严格实体, 是否发生修正)
///
/// 任一升级器触发修正、或 freightCars 本身缺失时,
/// 用修正后的字段重算 freightCars; 结构完好的记录原样保留
/// (即使当年是旧式容量公式算出的 - 不做强制重算)
pub fn migrate_item(raw: &RawItem) -> Result<(Item, bool), CalcError> {
    let (car_type, car_type_fixed) = fix_car_type(&raw.car_type);
    let (belt_tier, belt_tier_fixed) = fix_belt_tier(&raw.belt_tier);
    let (stack_size, stack_size_fixed) = fix_stack_size(raw.stack_size);

    let fields_fixed = car_type_fixed || belt_tier_fixed || stack_size_fixed;

    let (freight_cars, recomputed) = match raw.freight_cars {
        Some(stored) if !fields_fixed => (stored, false),
        _ => (
            calculate_cars(
                car_type,
                raw.required_parts,
                Some(stack_size),
                Some(belt_tier),
            )?,
            true,
        ),
    };

    let item = Item {
        id: raw.id.clone(),
        name: raw.name.clone(),
        car_type,
        loop_time: raw.loop_time,
        required_parts: raw.required_parts,
        stack_size,
        belt_tier,
        image_data: raw.image_data.clone(),
        freight_cars,
    };

    Ok((item, fields_fixed || recomputed))
}

/// 迁移货物记录序列, 返回 (严格实体序列, 是否有任何修正)
pub fn migrate_items(raw_items: &[RawItem]) -> Result<(Vec<Item>, bool), CalcError> {
    let mut items = Vec::with_capacity(raw_items.len());
    let mut changed = false;
    for raw in raw_items {
        let (item, item_changed) = migrate_item(raw)?;
        changed |= item_changed;
        items.push(item);
    }
    Ok((items, changed))
}

/// 迁移单个列车记录
pub fn migrate_train(raw: &RawTrain) -> Result<(Train, bool), CalcError> {
    let (items, changed) = migrate_items(&raw.items)?;
    let train = Train {
        id: raw.id.clone(),
        name: raw.name.clone(),
        items,
        created_at: raw.created_at,
        updated_at: raw.updated_at,
    };
    Ok((train, changed))
}

/// 迁移整个列车集合, 返回 (集合, 是否需要回写)
pub fn migrate_trains(raw_trains: &[RawTrain]) -> Result<(Vec<Train>, bool), CalcError> {
    let mut trains = Vec::with_capacity(raw_trains.len());
    let mut changed = false;
    for raw in raw_trains {
        let (train, train_changed) = migrate_train(raw)?;
        changed |= train_changed;
        trains.push(train);
    }
    Ok((trains, changed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_item_complete() -> RawItem {
        RawItem {
            id: "1700000000000-abc123def".to_string(),
            name: "Iron Plate".to_string(),
            car_type: Some("freight".to_string()),
            loop_time: None,
            required_parts: 600.0,
            stack_size: Some(100),
            belt_tier: Some("mk5".to_string()),
            image_data: None,
            freight_cars: Some(1),
        }
    }

    #[test]
    fn test_complete_record_untouched() {
        let (item, changed) = migrate_item(&raw_item_complete()).unwrap();
        assert!(!changed);
        assert_eq!(item.freight_cars, 1);
        assert_eq!(item.car_type, CarType::Freight);
    }

    #[test]
    fn test_missing_car_type_and_belt_tier_defaulted_and_recomputed() {
        // 迁移前数据: 600 件/分钟, 100 档, 无 carType/beltTier
        let mut raw = raw_item_complete();
        raw.car_type = None;
        raw.belt_tier = None;
        raw.freight_cars = Some(2); // 旧式公式的历史结果

        let (item, changed) = migrate_item(&raw).unwrap();
        assert!(changed);
        assert_eq!(item.car_type, CarType::Freight);
        assert_eq!(item.belt_tier, BeltTier::Mk5);
        // 600 / 1278 = 0.47 → 1
        assert_eq!(item.freight_cars, 1);
    }

    #[test]
    fn test_out_of_set_stack_size_defaulted() {
        let mut raw = raw_item_complete();
        raw.stack_size = Some(64);
        raw.required_parts = 2000.0;

        let (item, changed) = migrate_item(&raw).unwrap();
        assert!(changed);
        assert_eq!(item.stack_size, StackSize::S100);
        // 2000 / 1278 = 1.56 → 2
        assert_eq!(item.freight_cars, 2);
    }

    #[test]
    fn test_missing_freight_cars_recomputed_without_field_fix() {
        let mut raw = raw_item_complete();
        raw.freight_cars = None;

        let (item, changed) = migrate_item(&raw).unwrap();
        assert!(changed);
        assert_eq!(item.freight_cars, 1);
    }

    #[test]
    fn test_stale_but_structurally_valid_value_kept() {
        // 结构完好但数值陈旧 (当年旧式公式算出 5 节): 不强制重算
        let mut raw = raw_item_complete();
        raw.freight_cars = Some(5);

        let (item, changed) = migrate_item(&raw).unwrap();
        assert!(!changed);
        assert_eq!(item.freight_cars, 5);
    }

    #[test]
    fn test_fluid_item_recompute_uses_pipe_constant() {
        let mut raw = raw_item_complete();
        raw.car_type = Some("fluid".to_string());
        raw.required_parts = 1800.0;
        raw.freight_cars = None;

        let (item, _) = migrate_item(&raw).unwrap();
        // 1800 / 896.52 = 2.01 → 3
        assert_eq!(item.freight_cars, 3);
    }

    #[test]
    fn test_migration_idempotent() {
        let raw_trains = vec![RawTrain {
            id: "train-1-a".to_string(),
            name: "Iron Loop".to_string(),
            items: vec![
                {
                    let mut r = raw_item_complete();
                    r.car_type = None;
                    r.belt_tier = None;
                    r
                },
                raw_item_complete(),
            ],
            created_at: 1,
            updated_at: 2,
        }];

        let (first_pass, changed) = migrate_trains(&raw_trains).unwrap();
        assert!(changed);

        // 第一轮输出重新序列化后再迁移: 零修正, 输出一致
        let json = serde_json::to_string(&first_pass).unwrap();
        let reparsed: Vec<RawTrain> = serde_json::from_str(&json).unwrap();
        let (second_pass, changed_again) = migrate_trains(&reparsed).unwrap();
        assert!(!changed_again);
        assert_eq!(second_pass, first_pass);
    }

    #[test]
    fn test_raw_parse_tolerates_missing_fields() {
        let json = r#"[{
            "id": "1690000000000-legacy123",
            "name": "Uranium",
            "loopTime": 5,
            "requiredParts": 600,
            "stackSize": 100,
            "imageData": null,
            "freightCars": 2
        }]"#;

        let raw: Vec<RawItem> = serde_json::from_str(json).unwrap();
        let (items, changed) = migrate_items(&raw).unwrap();
        assert!(changed);
        assert_eq!(items[0].car_type, CarType::Freight);
        assert_eq!(items[0].belt_tier, BeltTier::Mk5);
        assert_eq!(items[0].freight_cars, 1);
        assert_eq!(items[0].loop_time, Some(5.0));
    }
}
