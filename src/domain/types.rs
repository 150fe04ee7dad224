// ==========================================
// 列车物流规划系统 - 领域类型定义
// ==========================================
// 依据: Satisfactory Wiki - 车站装卸吞吐实测数据
// 序列化格式: 与持久化 JSON 布局一致 (lowercase / 裸数字)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 车厢类型 (Car Type)
// ==========================================
// 决定运力计算模型: 货运车厢按传送带吞吐, 流体车厢按固定管道吞吐
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarType {
    Freight, // 货运车厢
    Fluid,   // 流体车厢
}

impl fmt::Display for CarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CarType::Freight => write!(f, "freight"),
            CarType::Fluid => write!(f, "fluid"),
        }
    }
}

// ==========================================
// 传送带等级 (Belt Tier)
// ==========================================
// 装卸吞吐受站台传送带速度约束
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BeltTier {
    Mk5, // Mk.5 传送带
    Mk6, // Mk.6 传送带
}

impl fmt::Display for BeltTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BeltTier::Mk5 => write!(f, "mk5"),
            BeltTier::Mk6 => write!(f, "mk6"),
        }
    }
}

// ==========================================
// 堆叠规格 (Stack Size)
// ==========================================
// 仅支持有实测吞吐数据的四档规格
// 序列化为裸数字 (50/100/200/500), 与历史 JSON 兼容
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum StackSize {
    S50,
    S100,
    S200,
    S500,
}

impl StackSize {
    /// 支持的全部堆叠规格, 升序
    pub const ALL: [StackSize; 4] = [
        StackSize::S50,
        StackSize::S100,
        StackSize::S200,
        StackSize::S500,
    ];

    /// 数值形式
    pub fn value(self) -> u32 {
        match self {
            StackSize::S50 => 50,
            StackSize::S100 => 100,
            StackSize::S200 => 200,
            StackSize::S500 => 500,
        }
    }
}

impl TryFrom<u32> for StackSize {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            50 => Ok(StackSize::S50),
            100 => Ok(StackSize::S100),
            200 => Ok(StackSize::S200),
            500 => Ok(StackSize::S500),
            other => Err(format!("不支持的堆叠规格: {}", other)),
        }
    }
}

impl From<StackSize> for u32 {
    fn from(value: StackSize) -> Self {
        value.value()
    }
}

impl fmt::Display for StackSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}
