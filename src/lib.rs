// ==========================================
// 列车物流规划系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite (本地键值存储)
// 系统定位: 单机单用户的列车编组规划 -
//           吞吐需求 → 车厢数计算 → 命名配置持久化
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 计算/校验/编排
pub mod engine;

// 数据仓储层 - 键值存储与迁移
pub mod repository;

// 配置层 - 数据库位置解析
pub mod config;

// 数据库基础设施 (连接初始化/PRAGMA 统一)
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    generate_item_id, generate_train_id, BeltTier, CarType, Item, ItemFormData, StackSize, Train,
    WorkingSet,
};

// 引擎
pub use engine::{
    array_move, calculate_cars, calculate_fluid_cars, calculate_freight_cars_legacy,
    calculate_freight_cars_rate_based, parse_item_form, throughput_per_freight_car,
    total_freight_cars, validate_item_form, validate_train_name, CalcError, FormErrors,
    PlannerError, TrainNameError, TrainPlanner,
};

// 仓储
pub use repository::{
    KeyValueStore, MemoryStore, RepositoryError, RepositoryResult, SqliteStore, TrainRepository,
};

// 配置
pub use config::AppConfig;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "列车物流规划系统";
