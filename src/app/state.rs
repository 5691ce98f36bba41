// ==========================================
// 缝纫车间生产看板 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// 说明: 所有仓储共享同一个 SQLite 连接 (Arc<Mutex<Connection>>)
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::api::{DashboardApi, ProductionApi};
use crate::config::{AppConfig, ConfigManager};
use crate::db::{init_schema, open_sqlite_connection, read_schema_version, CURRENT_SCHEMA_VERSION};
use crate::engine::{Aggregator, RankingEngine, RankingScheduler};
use crate::perf::{install_sqlite_tracing, PerfSettings};
use crate::repository::{MonthlyRankingRepository, ProductionRecordRepository};

/// 应用状态
///
/// axum 处理器之间共享 (Clone 只复制 Arc)
#[derive(Clone)]
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 静态文件目录
    pub public_dir: PathBuf,

    /// 生产记录API
    pub production_api: Arc<ProductionApi>,

    /// 看板API
    pub dashboard_api: Arc<DashboardApi>,

    /// 月度排行引擎 (调度器与手动触发共用)
    pub ranking_engine: Arc<RankingEngine>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - config: 进程配置
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误
    pub fn new(config: &AppConfig) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", config.db_path);

        if let Some(parent) = std::path::Path::new(&config.db_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| format!("无法创建数据库目录: {}", e))?;
            }
        }

        let mut conn = open_sqlite_connection(&config.db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        install_sqlite_tracing(&mut conn, PerfSettings::from_env());

        Self::from_connection(conn, config.db_path.clone(), config.public_dir.clone())
    }

    /// 从已打开的连接构建 (测试使用内存库或临时文件)
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 拒绝版本高于当前程序的数据库
    /// 2. 幂等建表
    /// 3. 从 config_kv 读取站点日目标与排行长度
    /// 3. 创建 Repository / Engine / API 实例
    pub fn from_connection(
        conn: Connection,
        db_path: String,
        public_dir: PathBuf,
    ) -> Result<Self, String> {
        let found_version =
            read_schema_version(&conn).map_err(|e| format!("读取schema版本失败: {}", e))?;
        if let Some(version) = found_version {
            if version > CURRENT_SCHEMA_VERSION {
                return Err(format!(
                    "数据库schema版本 {} 高于程序支持的版本 {}",
                    version, CURRENT_SCHEMA_VERSION
                ));
            }
        }
        init_schema(&conn).map_err(|e| format!("数据库初始化失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let record_repo = Arc::new(ProductionRecordRepository::new(conn.clone()));
        let ranking_repo = Arc::new(MonthlyRankingRepository::new(conn.clone()));

        // ==========================================
        // 初始化Engine层
        // ==========================================
        let config_manager = ConfigManager::from_connection(conn.clone());

        let overrides = config_manager
            .list_global_configs()
            .map_err(|e| format!("配置读取失败: {}", e))?;
        for (key, value) in &overrides {
            tracing::info!(config_key = %key, value = %value, "config_kv 覆写");
        }

        let stations = config_manager
            .load_station_table()
            .map_err(|e| format!("站点配置加载失败: {}", e))?;
        let top_n = config_manager
            .get_ranking_top_n()
            .map_err(|e| format!("排行配置加载失败: {}", e))?;

        let aggregator = Arc::new(Aggregator::new(stations));
        let ranking_engine = Arc::new(RankingEngine::new(
            record_repo.clone(),
            ranking_repo,
            top_n,
        ));

        // ==========================================
        // 初始化API层
        // ==========================================
        let production_api = Arc::new(ProductionApi::new(
            record_repo.clone(),
            ranking_engine.clone(),
        ));
        let dashboard_api = Arc::new(DashboardApi::new(
            record_repo,
            ranking_engine.clone(),
            aggregator,
        ));

        tracing::info!(top_n, "AppState初始化完成");

        Ok(Self {
            db_path,
            public_dir,
            production_api,
            dashboard_api,
            ranking_engine,
        })
    }

    /// 构建月度排行调度器
    pub fn ranking_scheduler(&self, config: &AppConfig) -> RankingScheduler {
        RankingScheduler::new(self.ranking_engine.clone(), config.ranking_poll_interval)
    }
}
