// ==========================================
// 列车物流规划系统 - 车厢数计算引擎
// ==========================================
// 主路径: 速率模型 - 车厢数受车站装卸吞吐约束, 而非单纯容量
// 旧路径: 容量模型 - 仅为历史数据重算保留, 新建一律走速率模型
// 数值语义: 标准浮点除法 + 向上取整, 不做 epsilon 修正,
//           恰好等于单车吞吐的需求取整为 1 而不是 2
// ==========================================

use crate::domain::item::Item;
use crate::domain::types::{BeltTier, CarType, StackSize};
use crate::engine::throughput::throughput_per_freight_car;
use thiserror::Error;

/// 单节货运车厢的库存槽位数
pub const FREIGHT_CAR_CAPACITY: u32 = 32;

/// 单节流体车厢的最大吞吐 (m³/分钟)
///
/// 流体车厢走管道, 吞吐与堆叠规格/传送带等级无关
pub const FLUID_CAR_MAX_THROUGHPUT: f64 = 896.52;

// ==========================================
// CalcError - 计算引擎错误
// ==========================================

/// 计算引擎错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    // 防御性检查: 校验后的输入不可能触发, 用于尽早暴露扩表遗漏
    #[error("不支持的传送带等级/堆叠规格组合: {belt_tier} + {stack_size}")]
    UnsupportedCombination {
        belt_tier: BeltTier,
        stack_size: StackSize,
    },

    #[error("货运车厢计算缺少必要字段: {0}")]
    MissingFreightFields(&'static str),
}

/// 速率模型 - 货运车厢数
///
/// cars = ceil(需求吞吐 / 单车吞吐), 单车吞吐查装卸吞吐表
///
/// # 边界
/// - 需求为 0 (或非正) 时返回 0 (无需车厢)
/// - 任何正需求至少 1 节 (哪怕 1 件/分钟)
pub fn calculate_freight_cars_rate_based(
    required_parts: f64,
    stack_size: StackSize,
    belt_tier: BeltTier,
) -> Result<u32, CalcError> {
    if required_parts <= 0.0 {
        return Ok(0);
    }

    let per_car = throughput_per_freight_car(belt_tier, stack_size)?;
    Ok((required_parts / per_car).ceil() as u32)
}

/// 流体车厢数: cars = ceil(需求流量 / 896.52)
pub fn calculate_fluid_cars(required_flow_rate: f64) -> u32 {
    if required_flow_rate <= 0.0 {
        return 0;
    }
    (required_flow_rate / FLUID_CAR_MAX_THROUGHPUT).ceil() as u32
}

/// 按车厢类型分派计算
///
/// 货运路径要求 stack_size/belt_tier 同时在场, 缺失即报错
/// (而不是静默取默认值, 字段补全是迁移层的职责)
pub fn calculate_cars(
    car_type: CarType,
    required_parts: f64,
    stack_size: Option<StackSize>,
    belt_tier: Option<BeltTier>,
) -> Result<u32, CalcError> {
    match car_type {
        CarType::Freight => {
            let stack = stack_size.ok_or(CalcError::MissingFreightFields("stack_size"))?;
            let tier = belt_tier.ok_or(CalcError::MissingFreightFields("belt_tier"))?;
            calculate_freight_cars_rate_based(required_parts, stack, tier)
        }
        CarType::Fluid => Ok(calculate_fluid_cars(required_parts)),
    }
}

/// 旧式容量模型 - 仅供历史数据重算
///
/// cars = ceil(loop_time × required_parts × 2 / (32 × stack_size))
///
/// 迁移来的历史记录当年用此公式计算, 结果必须逐位可复现
pub fn calculate_freight_cars_legacy(loop_time: f64, required_parts: f64, stack_size: u32) -> u32 {
    let parts_per_train = loop_time * (required_parts * 2.0);
    let freight_cars = parts_per_train / (FREIGHT_CAR_CAPACITY * stack_size) as f64;
    freight_cars.ceil() as u32
}

/// 全列车厢数合计
///
/// 直接累加各货物已存的 freightCars, 不做重算 -
/// 派生字段与输入字段的同步由创建/更新/迁移路径保证
pub fn total_freight_cars(items: &[Item]) -> u32 {
    items.iter().map(|item| item.freight_cars).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_based_rounds_up() {
        // 2000 件/分钟, Mk.5 + 100 档: 单车 1278, 2000/1278 = 1.56 → 2
        let cars =
            calculate_freight_cars_rate_based(2000.0, StackSize::S100, BeltTier::Mk5).unwrap();
        assert_eq!(cars, 2);
    }

    #[test]
    fn test_rate_based_exact_capacity_no_over_round() {
        // 需求恰好等于单车吞吐时取整为 1, 不得多算
        let cars =
            calculate_freight_cars_rate_based(1083.0, StackSize::S50, BeltTier::Mk5).unwrap();
        assert_eq!(cars, 1);
    }

    #[test]
    fn test_rate_based_minimum_one_car() {
        let cars = calculate_freight_cars_rate_based(1.0, StackSize::S500, BeltTier::Mk6).unwrap();
        assert_eq!(cars, 1);
    }

    #[test]
    fn test_rate_based_zero_requirement() {
        let cars = calculate_freight_cars_rate_based(0.0, StackSize::S100, BeltTier::Mk5).unwrap();
        assert_eq!(cars, 0);
    }

    #[test]
    fn test_rate_based_matches_table_for_all_combinations() {
        for tier in [BeltTier::Mk5, BeltTier::Mk6] {
            for stack in StackSize::ALL {
                let per_car =
                    crate::engine::throughput::throughput_per_freight_car(tier, stack).unwrap();
                for required in [1.0, 500.0, per_car, per_car + 0.1, 10_000.0] {
                    let cars = calculate_freight_cars_rate_based(required, stack, tier).unwrap();
                    assert_eq!(cars, (required / per_car).ceil() as u32);
                    assert!(cars >= 1);
                }
            }
        }
    }

    #[test]
    fn test_fluid_cars() {
        assert_eq!(calculate_fluid_cars(896.52), 1);
        assert_eq!(calculate_fluid_cars(896.53), 2);
        assert_eq!(calculate_fluid_cars(1800.0), 3);
        assert_eq!(calculate_fluid_cars(0.0), 0);
    }

    #[test]
    fn test_dispatch_by_car_type() {
        let freight = calculate_cars(
            CarType::Freight,
            2000.0,
            Some(StackSize::S100),
            Some(BeltTier::Mk5),
        )
        .unwrap();
        assert_eq!(freight, 2);

        // 流体路径忽略堆叠规格/传送带等级
        let fluid = calculate_cars(CarType::Fluid, 1000.0, None, None).unwrap();
        assert_eq!(fluid, 2);
    }

    #[test]
    fn test_dispatch_rejects_missing_freight_fields() {
        let err = calculate_cars(CarType::Freight, 100.0, None, Some(BeltTier::Mk5)).unwrap_err();
        assert_eq!(err, CalcError::MissingFreightFields("stack_size"));

        let err = calculate_cars(CarType::Freight, 100.0, Some(StackSize::S50), None).unwrap_err();
        assert_eq!(err, CalcError::MissingFreightFields("belt_tier"));
    }

    #[test]
    fn test_legacy_formula_reproducible() {
        // 铀: 600 件/分钟 × 5 分钟往返 × 2 / (32 × 100) = 1.875 → 2
        assert_eq!(calculate_freight_cars_legacy(5.0, 600.0, 100), 2);
        // 3 × (200 × 2) / (32 × 50) = 0.75 → 1
        assert_eq!(calculate_freight_cars_legacy(3.0, 200.0, 50), 1);
        // 10 × (50 × 2) / (32 × 500) = 0.0625 → 1
        assert_eq!(calculate_freight_cars_legacy(10.0, 50.0, 500), 1);
        // 零输入 → 0
        assert_eq!(calculate_freight_cars_legacy(0.0, 100.0, 50), 0);
        assert_eq!(calculate_freight_cars_legacy(5.0, 0.0, 50), 0);
    }

    #[test]
    fn test_total_trusts_stored_derived_field() {
        use crate::domain::item::Item;

        let mk = |id: &str, cars: u32| Item {
            id: id.to_string(),
            name: "x".to_string(),
            car_type: CarType::Freight,
            loop_time: None,
            required_parts: 1.0,
            stack_size: StackSize::S100,
            belt_tier: BeltTier::Mk5,
            image_data: None,
            freight_cars: cars,
        };

        assert_eq!(total_freight_cars(&[]), 0);
        assert_eq!(total_freight_cars(&[mk("a", 4), mk("b", 1)]), 5);
    }
}
