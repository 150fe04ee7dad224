// ==========================================
// 列车物流规划系统 - 装卸吞吐查找表
// ==========================================
// 依据: Satisfactory Wiki 实测 - 单节货运车厢在车站被
//       指定等级传送带装/卸时的最大持续吞吐 (件/分钟)
// 约束: 表值随堆叠规格严格递增 (同等级), 随 Mk.5→Mk.6
//       严格递增 (同规格); 扩表时必须保持该单调性
// ==========================================

use crate::domain::types::{BeltTier, StackSize};
use crate::engine::calculator::CalcError;

/// 单节货运车厢每槽位堆叠数: 2 级 × 4 档
///
/// 键: (传送带等级, 堆叠规格); 值: 件/分钟
static BELT_THROUGHPUT_TABLE: [(BeltTier, StackSize, f64); 8] = [
    // Mk.5 传送带
    (BeltTier::Mk5, StackSize::S50, 1083.0),
    (BeltTier::Mk5, StackSize::S100, 1278.0),
    (BeltTier::Mk5, StackSize::S200, 1405.0),
    (BeltTier::Mk5, StackSize::S500, 1494.0),
    // Mk.6 传送带
    (BeltTier::Mk6, StackSize::S50, 1431.0),
    (BeltTier::Mk6, StackSize::S100, 1793.0),
    (BeltTier::Mk6, StackSize::S200, 2052.0),
    (BeltTier::Mk6, StackSize::S500, 2247.0),
];

/// 查询单节货运车厢的最大装卸吞吐 (件/分钟)
///
/// 类型系统已把输入限制在支持集合内, 查找失败属于编程不变量
/// 被破坏 (例如扩枚举后漏补表项), 必须响亮失败而非静默兜底
pub fn throughput_per_freight_car(
    belt_tier: BeltTier,
    stack_size: StackSize,
) -> Result<f64, CalcError> {
    BELT_THROUGHPUT_TABLE
        .iter()
        .find(|(tier, stack, _)| *tier == belt_tier && *stack == stack_size)
        .map(|(_, _, throughput)| *throughput)
        .ok_or(CalcError::UnsupportedCombination {
            belt_tier,
            stack_size,
        })
}
