// ==========================================
// 列车物流规划系统 - 配置层
// ==========================================
// 职责: 解析数据库文件位置
// 覆写顺序: TRAIN_PLANNER_DB 环境变量 > 系统数据目录默认值
// ==========================================

use std::path::PathBuf;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "TRAIN_PLANNER_DB";

/// 系统数据目录下的应用子目录名
pub const APP_DIR_NAME: &str = "train-planner";

/// 数据库文件名
pub const DB_FILE_NAME: &str = "planner.db";

/// 应用配置
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// SQLite 数据库文件路径
    pub db_path: PathBuf,
}

impl AppConfig {
    /// 按覆写顺序解析配置
    pub fn resolve() -> Self {
        let db_path = std::env::var_os(DB_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);
        Self { db_path }
    }

    /// 确保数据库所在目录存在
    pub fn ensure_data_dir(&self) -> std::io::Result<()> {
        match self.db_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
            _ => Ok(()),
        }
    }
}

/// 默认数据库路径: {系统数据目录}/train-planner/planner.db
///
/// 数据目录不可用时退回当前工作目录
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join(DB_FILE_NAME)
}
