// ==========================================
// 缝纫车间生产看板 - 配置管理器
// ==========================================
// 职责: 运行期可调参数的加载、查询、覆写
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::stations::{StationTable, DEFAULT_FINISHING_TARGET, DEFAULT_SEWING_TARGET};
use crate::domain::ranking::DEFAULT_RANKING_TOP_N;
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;

        Ok(())
    }

    /// 获取所有 global 配置
    pub fn list_global_configs(&self) -> Result<HashMap<String, String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map = HashMap::new();
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(config_map)
    }

    /// 读取正整数配置，缺失或格式错误时回退默认值
    fn get_positive_or_default<T>(&self, key: &str, default: T) -> Result<T, Box<dyn Error>>
    where
        T: std::str::FromStr + PartialOrd + Default + Copy + std::fmt::Display,
    {
        let Some(raw) = self.get_config_value(key)? else {
            return Ok(default);
        };

        match raw.trim().parse::<T>() {
            Ok(v) if v > T::default() => Ok(v),
            _ => {
                tracing::warn!(
                    config_key = key,
                    raw_value = %raw,
                    "配置值无效，使用默认值 {}",
                    default
                );
                Ok(default)
            }
        }
    }

    // ===== 排行榜配置 =====

    /// 排行榜长度（默认 3）
    pub fn get_ranking_top_n(&self) -> Result<usize, Box<dyn Error>> {
        self.get_positive_or_default(config_keys::RANKING_TOP_N, DEFAULT_RANKING_TOP_N)
    }

    // ===== 日目标配置 =====

    /// 缝纫站日目标（默认 1000）
    pub fn get_sewing_daily_target(&self) -> Result<i64, Box<dyn Error>> {
        self.get_positive_or_default(config_keys::SEWING_DAILY_TARGET, DEFAULT_SEWING_TARGET)
    }

    /// 熨烫/包装站日目标（默认 500）
    pub fn get_finishing_daily_target(&self) -> Result<i64, Box<dyn Error>> {
        self.get_positive_or_default(config_keys::FINISHING_DAILY_TARGET, DEFAULT_FINISHING_TARGET)
    }

    /// 按当前配置构建站点表
    pub fn load_station_table(&self) -> Result<StationTable, Box<dyn Error>> {
        Ok(StationTable::with_targets(
            self.get_sewing_daily_target()?,
            self.get_finishing_daily_target()?,
        ))
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 排行榜
    pub const RANKING_TOP_N: &str = "ranking_top_n";

    // 日目标
    pub const SEWING_DAILY_TARGET: &str = "sewing_daily_target";
    pub const FINISHING_DAILY_TARGET: &str = "finishing_daily_target";
}
