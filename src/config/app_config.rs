// ==========================================
// 缝纫车间生产看板 - 进程配置
// ==========================================
// 来源: 环境变量（启动时先加载 .env）
// 规则: 缺失或非法值一律记录告警并回退默认值，不阻断启动
// ==========================================

use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use tracing::{info, warn};

/// 默认监听端口
pub const DEFAULT_PORT: u16 = 3200;

/// 默认界面语言
pub const DEFAULT_LOCALE: &str = "uz";

/// 排行调度默认轮询间隔（秒）
pub const DEFAULT_RANKING_POLL_SECS: u64 = 60;

// ==========================================
// AppConfig - 进程级配置
// ==========================================
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub db_path: String,
    pub public_dir: PathBuf,
    pub locale: String,
    pub ranking_poll_interval: Duration,
}

impl AppConfig {
    /// 从环境变量加载
    pub fn load() -> Self {
        Self {
            port: try_load("PORT", DEFAULT_PORT),
            db_path: get_default_db_path(),
            public_dir: PathBuf::from(
                var("SEWING_TRACKER_PUBLIC_DIR").unwrap_or_else(|| "./public".to_string()),
            ),
            locale: var("APP_LOCALE").unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
            ranking_poll_interval: Duration::from_secs(
                try_load("RANKING_POLL_SECS", DEFAULT_RANKING_POLL_SECS).max(1),
            ),
        }
    }

    /// 监听地址
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match var(key) {
        None => {
            info!("{key} not set, using default: {default}");
            default
        }
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value ({raw}): {e}, using default: {default}");
            default
        }),
    }
}

/// 获取默认数据库路径
///
/// 优先级:
/// 1. 环境变量 SEWING_TRACKER_DB_PATH
/// 2. 用户数据目录下的 sewing-tracker/sewing_tracker.db
/// 3. 当前目录 ./sewing_tracker.db
pub fn get_default_db_path() -> String {
    if let Some(path) = var("SEWING_TRACKER_DB_PATH") {
        return path;
    }

    let mut path = PathBuf::from("./sewing_tracker.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("sewing-tracker");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("sewing_tracker.db");
        } else {
            warn!("无法创建数据目录 {}，使用当前目录", dir.display());
        }
    }

    path.to_string_lossy().to_string()
}
