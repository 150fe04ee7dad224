// ==========================================
// 列车物流规划系统 - 引擎层
// ==========================================
// 职责: 运力计算、表单校验、序列重排、规划编排
// 红线: Engine 不拼 SQL, 派生字段只在引擎内产出
// ==========================================

pub mod calculator;
pub mod ordering;
pub mod planner;
pub mod throughput;
pub mod validator;

// 重导出核心引擎
pub use calculator::{
    calculate_cars, calculate_fluid_cars, calculate_freight_cars_legacy,
    calculate_freight_cars_rate_based, total_freight_cars, CalcError, FLUID_CAR_MAX_THROUGHPUT,
    FREIGHT_CAR_CAPACITY,
};
pub use ordering::array_move;
pub use planner::{PlannerError, PlannerResult, TrainPlanner};
pub use throughput::throughput_per_freight_car;
pub use validator::{
    parse_item_form, validate_image_file, validate_item_form, validate_train_name, FormErrors,
    TrainNameError, ValidatedItemForm, ALLOWED_IMAGE_TYPES, MAX_IMAGE_SIZE_BYTES,
    MAX_TRAIN_NAME_LEN,
};
