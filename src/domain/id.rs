// ==========================================
// 列车物流规划系统 - 标识符生成
// ==========================================
// 格式: {毫秒时间戳}-{base36 随机后缀} (货物)
//       train-{毫秒时间戳}-{base36 随机后缀} (列车)
// 约束: 时间戳分量随生成时间单调不减, 可按创建顺序排序
// ==========================================

use chrono::Utc;
use rand::Rng;

/// 列车标识符前缀 (与货物标识符区分命名空间)
pub const TRAIN_ID_PREFIX: &str = "train";

/// 随机后缀长度
const RANDOM_SUFFIX_LEN: usize = 9;

const BASE36_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// 生成 base36 随机后缀
fn random_suffix() -> String {
    let mut rng = rand::thread_rng();
    (0..RANDOM_SUFFIX_LEN)
        .map(|_| BASE36_ALPHABET[rng.gen_range(0..BASE36_ALPHABET.len())] as char)
        .collect()
}

/// 生成货物标识符
///
/// 单机单用户场景下碰撞概率可忽略 (同毫秒内需撞中同一 36^9 后缀)
pub fn generate_item_id() -> String {
    format!("{}-{}", Utc::now().timestamp_millis(), random_suffix())
}

/// 生成列车标识符
pub fn generate_train_id() -> String {
    format!(
        "{}-{}-{}",
        TRAIN_ID_PREFIX,
        Utc::now().timestamp_millis(),
        random_suffix()
    )
}
