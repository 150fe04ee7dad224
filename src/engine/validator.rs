// ==========================================
// 列车物流规划系统 - 表单校验器
// ==========================================
// 职责: 原始表单输入的准入校验
// 约束: 校验错误按字段逐项报告, 永远不以异常形式越过表单边界
// ==========================================

use crate::domain::item::ItemFormData;
use crate::domain::train::Train;
use crate::domain::types::{BeltTier, CarType, StackSize};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// 图片附件大小上限 (字节)
pub const MAX_IMAGE_SIZE_BYTES: u64 = 500 * 1024;

/// 允许的图片 MIME 类型
pub const ALLOWED_IMAGE_TYPES: [&str; 5] = [
    "image/png",
    "image/jpeg",
    "image/jpg",
    "image/gif",
    "image/webp",
];

/// 列车名称长度上限 (去除首尾空白后)
pub const MAX_TRAIN_NAME_LEN: usize = 50;

// ==========================================
// FormErrors - 字段级校验结果
// ==========================================

/// 字段名 → 可读错误消息; 空映射即校验通过
///
/// BTreeMap 保证序列化输出的字段顺序稳定
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormErrors {
    #[serde(flatten)]
    errors: BTreeMap<String, String>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.errors.insert(field.to_string(), message.into());
    }
}

// ==========================================
// 货物表单校验
// ==========================================

/// 通过校验的货物表单 (枚举字段已解析为强类型)
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedItemForm {
    pub name: String,
    pub car_type: CarType,
    pub required_parts: f64,
    pub stack_size: StackSize,
    pub belt_tier: BeltTier,
    pub loop_time: Option<f64>,
    pub image_data: Option<String>,
}

/// 解析并校验货物表单
///
/// 通过时返回强类型表单 (名称已去除首尾空白),
/// 否则返回字段级错误映射
pub fn parse_item_form(data: &ItemFormData) -> Result<ValidatedItemForm, FormErrors> {
    let mut errors = FormErrors::default();

    let name = data.name.trim();
    if name.is_empty() {
        errors.insert("name", "货物名称不能为空");
    }

    let car_type = data.parsed_car_type();
    if car_type.is_none() {
        errors.insert("carType", "车厢类型必须为 freight 或 fluid");
    }

    if !(data.required_parts.is_finite() && data.required_parts > 0.0) {
        errors.insert("requiredParts", "需求吞吐必须大于 0");
    }

    let stack_size = data.parsed_stack_size();
    if stack_size.is_none() {
        errors.insert("stackSize", "堆叠规格必须为 50/100/200/500");
    }

    let belt_tier = data.parsed_belt_tier();
    if belt_tier.is_none() {
        errors.insert("beltTier", "传送带等级必须为 mk5 或 mk6");
    }

    if let Some(loop_time) = data.loop_time {
        if !(loop_time.is_finite() && loop_time > 0.0) {
            errors.insert("loopTime", "往返周期必须大于 0");
        }
    }

    match (errors.is_empty(), car_type, stack_size, belt_tier) {
        (true, Some(car_type), Some(stack_size), Some(belt_tier)) => Ok(ValidatedItemForm {
            name: name.to_string(),
            car_type,
            required_parts: data.required_parts,
            stack_size,
            belt_tier,
            loop_time: data.loop_time,
            image_data: data.image_data.clone(),
        }),
        _ => Err(errors),
    }
}

/// 校验货物表单, 仅返回字段级错误映射 (表单边界用)
pub fn validate_item_form(data: &ItemFormData) -> FormErrors {
    match parse_item_form(data) {
        Ok(_) => FormErrors::default(),
        Err(errors) => errors,
    }
}

/// 校验图片附件 (元信息, 内容本身视为不透明数据原样往返)
pub fn validate_image_file(size_bytes: u64, mime_type: &str) -> Result<(), String> {
    if size_bytes > MAX_IMAGE_SIZE_BYTES {
        return Err("图片不能超过 500KB".to_string());
    }
    if !ALLOWED_IMAGE_TYPES.contains(&mime_type) {
        return Err("仅支持 PNG/JPG/GIF/WebP 格式图片".to_string());
    }
    Ok(())
}

// ==========================================
// 列车名称校验
// ==========================================

/// 列车名称校验错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrainNameError {
    #[error("列车名称不能为空")]
    Empty,

    #[error("列车名称不能超过 50 字符")]
    TooLong,

    #[error("列车名称已存在: {0}")]
    Duplicate(String),
}

/// 校验列车名称, 通过时返回去除首尾空白后的名称
///
/// # 参数
/// - raw: 原始输入
/// - existing: 现有列车集合 (唯一性不区分大小写)
/// - exclude_id: 重命名时排除自身
pub fn validate_train_name(
    raw: &str,
    existing: &[Train],
    exclude_id: Option<&str>,
) -> Result<String, TrainNameError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(TrainNameError::Empty);
    }
    if name.chars().count() > MAX_TRAIN_NAME_LEN {
        return Err(TrainNameError::TooLong);
    }

    let lowered = name.to_lowercase();
    let duplicate = existing.iter().any(|train| {
        exclude_id != Some(train.id.as_str()) && train.name.to_lowercase() == lowered
    });
    if duplicate {
        return Err(TrainNameError::Duplicate(name.to_string()));
    }

    Ok(name.to_string())
}
